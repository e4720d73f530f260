//! Unique naming within a control group.
//!
//! A new entity keeps its name when no sibling collides; otherwise `_<n>` is
//! appended, where `n` counts the colliding siblings. Conditions collide on
//! the exact name or the `name_` prefix, rules only on the `name_` prefix.

/// Name for a new condition given the names already in the group.
pub fn unique_condition_name<'a>(existing: impl IntoIterator<Item = &'a str>, name: &str) -> String {
    let prefix = format!("{name}_");
    let count = existing
        .into_iter()
        .filter(|n| *n == name || n.starts_with(&prefix))
        .count();
    suffixed(name, count)
}

/// Name for a new rule given the names already in the group.
pub fn unique_rule_name<'a>(existing: impl IntoIterator<Item = &'a str>, name: &str) -> String {
    let prefix = format!("{name}_");
    let count = existing
        .into_iter()
        .filter(|n| n.starts_with(&prefix))
        .count();
    suffixed(name, count)
}

fn suffixed(name: &str, count: usize) -> String {
    if count == 0 {
        name.to_string()
    } else {
        format!("{name}_{count}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condition_counts_exact_and_prefixed() {
        assert_eq!(unique_condition_name([], "t1"), "t1");
        assert_eq!(unique_condition_name(["t1"], "t1"), "t1_1");
        assert_eq!(unique_condition_name(["t1", "t1_1"], "t1"), "t1_2");
        assert_eq!(unique_condition_name(["t10"], "t1"), "t1");
    }

    #[test]
    fn rule_ignores_exact_match() {
        // an existing rule with the same name does not count
        assert_eq!(unique_rule_name(["c1"], "c1"), "c1");
        assert_eq!(unique_rule_name(["c1", "c1_x"], "c1"), "c1_1");
    }
}
