//! Project grouping for the timeline view.
//!
//! There is no group column in the data, so groups come from a naming
//! convention: a leading all-caps word longer than three characters
//! ("SYSTEM Login", "SYSTEM Logout") is taken as the group label. Names that
//! don't follow the convention are attached by first letter, then by a
//! fallback. Wrong clustering is cosmetic, never an error.

use serde::{Deserialize, Serialize};

/// Where a name lands when no existing group shares its first letter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Unmatched {
    /// Append to the first group created (used whenever any group exists)
    #[default]
    FirstGroup,
    /// Start a group labeled by the name's own uppercased first word
    OwnGroup,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupingOptions {
    pub unmatched: Unmatched,
}

/// A labeled cluster of project names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineGroup {
    pub label: String,
    pub projects: Vec<String>,
}

/// Partition distinct project names into display groups.
///
/// `names` may contain duplicates; only the first occurrence counts. Groups
/// come back in creation order and every distinct name appears in exactly one
/// group.
pub fn group_projects<S: AsRef<str>>(names: &[S], options: GroupingOptions) -> Vec<TimelineGroup> {
    let mut distinct: Vec<&str> = Vec::new();
    for name in names {
        let name = name.as_ref();
        if !distinct.contains(&name) {
            distinct.push(name);
        }
    }

    let mut groups: Vec<TimelineGroup> = Vec::new();
    let mut ungrouped: Vec<&str> = Vec::new();

    // Pass 1: explicit all-caps prefixes
    for name in distinct {
        match prefix_label(name) {
            Some(label) => push_into(&mut groups, label, name),
            None => ungrouped.push(name),
        }
    }

    // Pass 2: attach leftovers by first letter, else fall back
    for name in ungrouped {
        let first_char: String = name
            .chars()
            .next()
            .into_iter()
            .flat_map(char::to_uppercase)
            .collect();

        if let Some(group) = groups
            .iter_mut()
            .find(|g| !first_char.is_empty() && g.label.starts_with(&first_char))
        {
            group.projects.push(name.to_string());
            continue;
        }

        if options.unmatched == Unmatched::FirstGroup {
            if let Some(first) = groups.first_mut() {
                first.projects.push(name.to_string());
                continue;
            }
        }
        push_into(&mut groups, first_word_label(name), name);
    }

    groups
}

/// Group label for names like "SYSTEM Login": more than one word, first word
/// entirely uppercase and longer than three characters
fn prefix_label(name: &str) -> Option<String> {
    let mut words = name.split_whitespace();
    let first = words.next()?;
    words.next()?;

    let upper = first.to_uppercase();
    if upper == first && first.chars().count() > 3 {
        Some(upper)
    } else {
        None
    }
}

fn first_word_label(name: &str) -> String {
    name.split_whitespace()
        .next()
        .unwrap_or(name)
        .to_uppercase()
}

fn push_into(groups: &mut Vec<TimelineGroup>, label: String, name: &str) {
    match groups.iter_mut().find(|g| g.label == label) {
        Some(group) => group.projects.push(name.to_string()),
        None => groups.push(TimelineGroup {
            label,
            projects: vec![name.to_string()],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn group(label: &str, projects: &[&str]) -> TimelineGroup {
        TimelineGroup {
            label: label.to_string(),
            projects: projects.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn default_groups(names: &[&str]) -> Vec<TimelineGroup> {
        group_projects(names, GroupingOptions::default())
    }

    // ==================== Prefix Groups ====================

    #[test]
    fn test_all_caps_prefixes_form_independent_groups() {
        let groups = default_groups(&["SYSTEM Login", "SYSTEM Logout", "RANDOM Task"]);
        assert_eq!(
            groups,
            vec![
                group("SYSTEM", &["SYSTEM Login", "SYSTEM Logout"]),
                group("RANDOM", &["RANDOM Task"]),
            ]
        );
    }

    #[test]
    fn test_mixed_case_first_word_is_ungrouped() {
        // "Random" is not all caps, so it falls back; no group starts with R
        let groups = default_groups(&["SYSTEM Login", "SYSTEM Logout", "Random Task"]);
        assert_eq!(
            groups,
            vec![group(
                "SYSTEM",
                &["SYSTEM Login", "SYSTEM Logout", "Random Task"]
            )]
        );
    }

    #[test]
    fn test_short_caps_word_is_not_a_group() {
        let groups = default_groups(&["API Gateway", "EDUCATION Portal"]);
        assert_eq!(
            groups,
            vec![group("EDUCATION", &["EDUCATION Portal", "API Gateway"])]
        );
    }

    #[test]
    fn test_single_word_caps_name_is_not_a_group() {
        let groups = default_groups(&["RESEARCH", "RESEARCH Lab"]);
        assert_eq!(groups, vec![group("RESEARCH", &["RESEARCH Lab", "RESEARCH"])]);
    }

    #[test]
    fn test_duplicate_names_counted_once() {
        let groups = default_groups(&["SYSTEM Login", "SYSTEM Login", "SYSTEM Audit"]);
        assert_eq!(groups, vec![group("SYSTEM", &["SYSTEM Login", "SYSTEM Audit"])]);
    }

    // ==================== Ungrouped Names ====================

    #[test]
    fn test_ungrouped_joins_group_with_same_initial() {
        let groups = default_groups(&["DEVELOPMENT Core", "REVAMPS Site", "redesign docs"]);
        assert_eq!(
            groups,
            vec![
                group("DEVELOPMENT", &["DEVELOPMENT Core"]),
                group("REVAMPS", &["REVAMPS Site", "redesign docs"]),
            ]
        );
    }

    #[test]
    fn test_no_groups_at_all_synthesizes_from_first_word() {
        let groups = default_groups(&["alpha one", "beta two", "Alpine"]);
        assert_eq!(
            groups,
            vec![group("ALPHA", &["alpha one", "beta two", "Alpine"])]
        );
    }

    #[test]
    fn test_own_group_option_isolates_unmatched_names() {
        let options = GroupingOptions {
            unmatched: Unmatched::OwnGroup,
        };
        let groups = group_projects(&["SYSTEM Login", "Budget review", "billing"], options);
        assert_eq!(
            groups,
            vec![
                group("SYSTEM", &["SYSTEM Login"]),
                group("BUDGET", &["Budget review", "billing"]),
            ]
        );
    }

    #[test]
    fn test_empty_input_yields_no_groups() {
        let names: [&str; 0] = [];
        assert!(default_groups(&names).is_empty());
    }

    #[test]
    fn test_every_name_lands_in_exactly_one_group() {
        let names = [
            "SYSTEM Login",
            "misc",
            "EDUCATION Portal",
            "Zeta",
            "SYSTEM Logout",
            "engine work",
        ];
        let groups = default_groups(&names);
        let mut seen: Vec<&str> = groups
            .iter()
            .flat_map(|g| g.projects.iter().map(String::as_str))
            .collect();
        seen.sort_unstable();
        let mut expected = names.to_vec();
        expected.sort_unstable();
        assert_eq!(seen, expected);
    }
}
