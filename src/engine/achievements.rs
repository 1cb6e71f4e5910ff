/// Append `candidate` unless it is absent, blank, or already unlocked.
/// Returns true when something was appended.
pub fn record(achievements: &mut Vec<String>, candidate: Option<&str>) -> bool {
    let Some(candidate) = candidate else {
        return false;
    };
    if candidate.trim().is_empty() || achievements.iter().any(|a| a == candidate) {
        return false;
    }
    achievements.push(candidate.to_string());
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_leaves_list_alone() {
        let mut list = vec!["First Words".to_string()];
        assert!(!record(&mut list, None));
        assert_eq!(list, ["First Words"]);
    }

    #[test]
    fn duplicate_is_ignored_and_order_preserved() {
        let mut list = Vec::new();
        assert!(record(&mut list, Some("Honor Roll")));
        assert!(!record(&mut list, Some("Honor Roll")));
        assert!(record(&mut list, Some("First Job")));
        assert!(!record(&mut list, Some("Honor Roll")));
        assert!(record(&mut list, Some("Married")));
        assert_eq!(list, ["Honor Roll", "First Job", "Married"]);
    }

    #[test]
    fn match_is_exact() {
        let mut list = vec!["Honor Roll".to_string()];
        assert!(record(&mut list, Some("honor roll")));
        assert_eq!(list.len(), 2);
    }
}
