use crate::model::stats::{StatBlock, StatKey, StatValue};
use crate::model::turn::TurnKind;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatChange {
    pub key: StatKey,
    pub before: StatValue,
    pub after: StatValue,
}

impl StatChange {
    /// Absolute numeric change, `None` for text stats.
    pub fn magnitude(&self) -> Option<u64> {
        match (&self.before, &self.after) {
            (StatValue::Number(a), StatValue::Number(b)) => Some(a.abs_diff(*b)),
            _ => None,
        }
    }
}

/// What a completed turn did to the character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnReport {
    pub kind: TurnKind,
    pub text: String,
    pub changes: Vec<StatChange>,
    /// Set only when the achievement was not already unlocked.
    pub achievement: Option<String>,
}

pub fn diff_stats(before: &StatBlock, after: &StatBlock) -> Vec<StatChange> {
    StatKey::ALL
        .into_iter()
        .filter_map(|key| {
            let (old, new) = (before.get(key), after.get(key));
            (old != new).then_some(StatChange {
                key,
                before: old,
                after: new,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diff_lists_only_changed_stats() {
        let before = StatBlock::default();
        let after = StatBlock {
            net_worth: 500,
            job: "Paperboy".into(),
            ..StatBlock::default()
        };
        let changes = diff_stats(&before, &after);
        assert_eq!(changes.len(), 2);
        assert_eq!(changes[0].key, StatKey::NetWorth);
        assert_eq!(changes[0].magnitude(), Some(500));
        assert_eq!(changes[1].key, StatKey::Job);
        assert_eq!(changes[1].magnitude(), None);
    }

    #[test]
    fn magnitude_spans_the_whole_integer_range() {
        let change = StatChange {
            key: StatKey::NetWorth,
            before: StatValue::Number(i64::MIN),
            after: StatValue::Number(i64::MAX),
        };
        assert_eq!(change.magnitude(), Some(u64::MAX));

        let drop = StatChange {
            key: StatKey::Income,
            before: StatValue::Number(40),
            after: StatValue::Number(-10),
        };
        assert_eq!(drop.magnitude(), Some(50));
    }
}
