use crate::model::stats::{StatBlock, StatPatch, STAT_MAX, STAT_MIN};

pub fn clamp_stat(value: i64) -> i64 {
    value.clamp(STAT_MIN, STAT_MAX)
}

/// Merge a validated patch into `current`, clamping the bounded stats.
/// Fields absent from the patch keep their current value.
pub fn apply_stats(current: &StatBlock, patch: &StatPatch) -> StatBlock {
    let mut next = current.clone();

    // Unbounded
    if let Some(value) = patch.net_worth {
        next.net_worth = value;
    }
    if let Some(value) = patch.income {
        next.income = value;
    }
    if let Some(value) = &patch.job {
        next.job = value.clone();
    }
    if let Some(value) = &patch.marital_status {
        next.marital_status = value.clone();
    }

    // Bounded
    if let Some(value) = patch.rice_purity_score {
        next.rice_purity_score = clamp_stat(value);
    }
    if let Some(value) = patch.looks {
        next.looks = clamp_stat(value);
    }
    if let Some(value) = patch.luck {
        next.luck = clamp_stat(value);
    }
    if let Some(value) = patch.strength {
        next.strength = clamp_stat(value);
    }
    if let Some(value) = patch.health {
        next.health = clamp_stat(value);
    }
    if let Some(value) = patch.happiness {
        next.happiness = clamp_stat(value);
    }
    if let Some(value) = patch.discipline {
        next.discipline = clamp_stat(value);
    }

    next
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::stats::StatKey;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn merge_keeps_untouched_stats() {
        let current = StatBlock {
            health: 50,
            luck: 20,
            ..StatBlock::default()
        };
        let patch = StatPatch {
            health: Some(65),
            ..StatPatch::default()
        };
        let next = apply_stats(&current, &patch);
        assert_eq!(next.health, 65);
        assert_eq!(next.luck, 20);
        assert_eq!(next.job, "Student");
    }

    #[test]
    fn clamps_at_both_ends() {
        let current = StatBlock {
            happiness: 90,
            looks: 10,
            ..StatBlock::default()
        };
        let patch = StatPatch {
            happiness: Some(150),
            looks: Some(-30),
            ..StatPatch::default()
        };
        let next = apply_stats(&current, &patch);
        assert_eq!(next.happiness, 100);
        assert_eq!(next.looks, 0);
    }

    #[test]
    fn money_is_not_clamped() {
        let patch = StatPatch {
            net_worth: Some(-2_500),
            income: Some(1_000_000),
            ..StatPatch::default()
        };
        let next = apply_stats(&StatBlock::default(), &patch);
        assert_eq!(next.net_worth, -2_500);
        assert_eq!(next.income, 1_000_000);
    }

    #[test]
    fn text_stats_are_replaced_verbatim() {
        let patch = StatPatch {
            job: Some("Astronaut".into()),
            marital_status: Some("Married".into()),
            ..StatPatch::default()
        };
        let next = apply_stats(&StatBlock::default(), &patch);
        assert_eq!(next.job, "Astronaut");
        assert_eq!(next.marital_status, "Married");
    }

    #[test]
    fn empty_patch_is_identity() {
        let current = StatBlock {
            strength: 42,
            ..StatBlock::default()
        };
        assert_eq!(apply_stats(&current, &StatPatch::default()), current);
    }

    #[test]
    fn bounded_stats_survive_arbitrary_patch_sequences() {
        let mut rng = StdRng::seed_from_u64(2024);
        let mut stats = StatBlock::default();
        for _ in 0..1_000 {
            let mut patch = StatPatch::default();
            for key in StatKey::ALL.into_iter().filter(|k| k.is_bounded()) {
                if rng.gen_bool(0.5) {
                    let value = serde_json::json!(rng.gen_range(-1_000i64..1_000));
                    patch.set_json(key, &value).unwrap();
                }
            }
            stats = apply_stats(&stats, &patch);
            stats.assert_bounded();
        }
    }
}
