use crate::model::CommitType;

/// One classification rule: accepted subject prefixes and the canonical type
/// they map to. Adding a prefix is a data change here, nothing else.
struct Rule {
    prefixes: &'static [&'static str],
    kind: CommitType,
}

const RULES: &[Rule] = &[
    Rule { prefixes: &["feat", "feature"], kind: CommitType::Feat },
    Rule { prefixes: &["fix", "bugfix"], kind: CommitType::Fix },
    Rule { prefixes: &["docs", "doc"], kind: CommitType::Docs },
    Rule { prefixes: &["refactor"], kind: CommitType::Refactor },
    Rule { prefixes: &["test", "tests"], kind: CommitType::Test },
    Rule { prefixes: &["chore"], kind: CommitType::Chore },
    Rule { prefixes: &["style"], kind: CommitType::Style },
    Rule { prefixes: &["perf", "performance"], kind: CommitType::Perf },
    Rule { prefixes: &["build"], kind: CommitType::Build },
    Rule { prefixes: &["ci"], kind: CommitType::Ci },
    Rule { prefixes: &["revert"], kind: CommitType::Revert },
];

/// Classify a commit subject by its conventional-commit prefix.
///
/// The prefix is matched case-insensitively, followed by an optional
/// `(scope)` and a `:`. Subjects without a recognized prefix map to
/// [`CommitType::Other`]. First matching rule wins.
pub fn classify(subject: &str) -> CommitType {
    let subject = subject.to_lowercase();
    for rule in RULES {
        for prefix in rule.prefixes {
            if matches_prefix(&subject, prefix) {
                return rule.kind;
            }
        }
    }
    CommitType::Other
}

fn matches_prefix(subject: &str, prefix: &str) -> bool {
    let Some(rest) = subject.strip_prefix(prefix) else {
        return false;
    };
    let rest = match rest.strip_prefix('(') {
        Some(after_paren) => match after_paren.find(')') {
            Some(close) => &after_paren[close + 1..],
            None => return false,
        },
        None => rest,
    };
    rest.starts_with(':')
}
