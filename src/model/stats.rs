use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::engine::error::SchemaError;

/// Lower bound of every bounded stat.
pub const STAT_MIN: i64 = 0;
/// Upper bound of every bounded stat.
pub const STAT_MAX: i64 = 100;

/// The eleven stats every character carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatKey {
    NetWorth,
    Income,
    Job,
    MaritalStatus,
    RicePurityScore,
    Looks,
    Luck,
    Strength,
    Health,
    Happiness,
    Discipline,
}

impl StatKey {
    pub const ALL: [StatKey; 11] = [
        StatKey::NetWorth,
        StatKey::Income,
        StatKey::Job,
        StatKey::MaritalStatus,
        StatKey::RicePurityScore,
        StatKey::Looks,
        StatKey::Luck,
        StatKey::Strength,
        StatKey::Health,
        StatKey::Happiness,
        StatKey::Discipline,
    ];

    /// Rolled at random once the character is named.
    pub const PERSONALITY: [StatKey; 6] = [
        StatKey::Looks,
        StatKey::Luck,
        StatKey::Strength,
        StatKey::Health,
        StatKey::Happiness,
        StatKey::Discipline,
    ];

    /// Wire name used in generator payloads.
    pub fn name(self) -> &'static str {
        match self {
            StatKey::NetWorth => "netWorth",
            StatKey::Income => "income",
            StatKey::Job => "job",
            StatKey::MaritalStatus => "maritalStatus",
            StatKey::RicePurityScore => "ricePurityScore",
            StatKey::Looks => "looks",
            StatKey::Luck => "luck",
            StatKey::Strength => "strength",
            StatKey::Health => "health",
            StatKey::Happiness => "happiness",
            StatKey::Discipline => "discipline",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatKey::NetWorth => "Net Worth",
            StatKey::Income => "Income",
            StatKey::Job => "Job",
            StatKey::MaritalStatus => "Marital Status",
            StatKey::RicePurityScore => "Rice Purity Score",
            StatKey::Looks => "Looks",
            StatKey::Luck => "Luck",
            StatKey::Strength => "Strength",
            StatKey::Health => "Health",
            StatKey::Happiness => "Happiness",
            StatKey::Discipline => "Discipline",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        StatKey::ALL.into_iter().find(|key| key.name() == name)
    }

    /// Clamped to `STAT_MIN..=STAT_MAX` on every update.
    pub fn is_bounded(self) -> bool {
        matches!(
            self,
            StatKey::RicePurityScore
                | StatKey::Looks
                | StatKey::Luck
                | StatKey::Strength
                | StatKey::Health
                | StatKey::Happiness
                | StatKey::Discipline
        )
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatValue {
    Number(i64),
    Text(String),
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Number(n) => write!(f, "{}", n),
            StatValue::Text(s) => f.write_str(s),
        }
    }
}

/// Life stats of one character. Always holds all eleven fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatBlock {
    pub net_worth: i64,
    pub income: i64,
    pub job: String,
    pub marital_status: String,
    pub rice_purity_score: i64,
    pub looks: i64,
    pub luck: i64,
    pub strength: i64,
    pub health: i64,
    pub happiness: i64,
    pub discipline: i64,
}

impl Default for StatBlock {
    fn default() -> Self {
        Self {
            net_worth: 0,
            income: 0,
            job: "Student".into(),
            marital_status: "Single".into(),
            rice_purity_score: 100,
            looks: 0,
            luck: 0,
            strength: 0,
            health: 0,
            happiness: 0,
            discipline: 0,
        }
    }
}

impl StatBlock {
    pub fn get(&self, key: StatKey) -> StatValue {
        match key {
            StatKey::NetWorth => StatValue::Number(self.net_worth),
            StatKey::Income => StatValue::Number(self.income),
            StatKey::Job => StatValue::Text(self.job.clone()),
            StatKey::MaritalStatus => StatValue::Text(self.marital_status.clone()),
            StatKey::RicePurityScore => StatValue::Number(self.rice_purity_score),
            StatKey::Looks => StatValue::Number(self.looks),
            StatKey::Luck => StatValue::Number(self.luck),
            StatKey::Strength => StatValue::Number(self.strength),
            StatKey::Health => StatValue::Number(self.health),
            StatKey::Happiness => StatValue::Number(self.happiness),
            StatKey::Discipline => StatValue::Number(self.discipline),
        }
    }

    /// Mutable access to a bounded stat, `None` for the others.
    pub fn bounded_mut(&mut self, key: StatKey) -> Option<&mut i64> {
        match key {
            StatKey::RicePurityScore => Some(&mut self.rice_purity_score),
            StatKey::Looks => Some(&mut self.looks),
            StatKey::Luck => Some(&mut self.luck),
            StatKey::Strength => Some(&mut self.strength),
            StatKey::Health => Some(&mut self.health),
            StatKey::Happiness => Some(&mut self.happiness),
            StatKey::Discipline => Some(&mut self.discipline),
            _ => None,
        }
    }

    /// Panics if a bounded stat escaped its range. Reaching this is a bug in
    /// the stat applier, not a recoverable condition.
    pub fn assert_bounded(&self) {
        for key in StatKey::ALL.into_iter().filter(|k| k.is_bounded()) {
            if let StatValue::Number(value) = self.get(key) {
                assert!(
                    (STAT_MIN..=STAT_MAX).contains(&value),
                    "invariant violation: {} = {} is outside {}..={}",
                    key,
                    value,
                    STAT_MIN,
                    STAT_MAX
                );
            }
        }
    }
}

/// A partial stat update proposed by the generator.
/// Values are absolute, not relative. Absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub net_worth: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub income: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marital_status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rice_purity_score: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub looks: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub luck: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strength: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub health: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub happiness: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub discipline: Option<i64>,
}

impl StatPatch {
    /// Sets `key` from a raw JSON value, checking its type strictly.
    /// Numeric stats take JSON integers only; text stats take JSON strings only.
    pub fn set_json(&mut self, key: StatKey, value: &Value) -> Result<(), SchemaError> {
        match key {
            StatKey::NetWorth => self.net_worth = Some(expect_integer(key, value)?),
            StatKey::Income => self.income = Some(expect_integer(key, value)?),
            StatKey::Job => self.job = Some(expect_text(key, value)?),
            StatKey::MaritalStatus => self.marital_status = Some(expect_text(key, value)?),
            StatKey::RicePurityScore => {
                self.rice_purity_score = Some(expect_integer(key, value)?)
            }
            StatKey::Looks => self.looks = Some(expect_integer(key, value)?),
            StatKey::Luck => self.luck = Some(expect_integer(key, value)?),
            StatKey::Strength => self.strength = Some(expect_integer(key, value)?),
            StatKey::Health => self.health = Some(expect_integer(key, value)?),
            StatKey::Happiness => self.happiness = Some(expect_integer(key, value)?),
            StatKey::Discipline => self.discipline = Some(expect_integer(key, value)?),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        *self == StatPatch::default()
    }
}

fn expect_integer(key: StatKey, value: &Value) -> Result<i64, SchemaError> {
    value.as_i64().ok_or_else(|| SchemaError::StatValue {
        key: key.name().to_string(),
        reason: format!("expected an integer, got {}", value),
    })
}

fn expect_text(key: StatKey, value: &Value) -> Result<String, SchemaError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| SchemaError::StatValue {
            key: key.name().to_string(),
            reason: format!("expected a string, got {}", value),
        })
}
