use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use gitweek::classify::classify;
use gitweek::collect::{build_document, ordered_authors};
use gitweek::error::GitweekError;
use gitweek::model::{Commit, CommitType, Period, ReportDocument};
use gitweek::render::render_markdown;
use pretty_assertions::assert_eq;

fn ts(day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, day, hour, 0, 0).unwrap()
}

fn commit(id: &str, author: &str, subject: &str, ins: u32, del: u32, files: u32, at: DateTime<Utc>) -> Commit {
    Commit {
        id: id.to_string(),
        author: author.to_string(),
        timestamp: at,
        subject: subject.to_string(),
        kind: classify(subject),
        files_changed: files,
        insertions: ins,
        deletions: del,
    }
}

fn period() -> Period {
    Period::parse("2024-01-01", "2024-01-07").unwrap()
}

fn example_document() -> ReportDocument {
    build_document(
        period(),
        vec![
            commit("a1a1a1a1", "A", "feat: add login", 40, 2, 3, ts(1, 10)),
            commit("a2a2a2a2", "A", "fix: null check", 5, 1, 1, ts(2, 10)),
            commit("b1b1b1b1", "B", "docs: update readme", 10, 0, 1, ts(3, 10)),
        ],
    )
}

#[test]
fn classify_recognizes_conventional_prefixes() {
    assert_eq!(classify("feat: add login"), CommitType::Feat);
    assert_eq!(classify("FIX: null check"), CommitType::Fix);
    assert_eq!(classify("docs(readme): update"), CommitType::Docs);
    assert_eq!(classify("refactor(core): split module"), CommitType::Refactor);
    assert_eq!(classify("ci: pin toolchain"), CommitType::Ci);
    assert_eq!(classify("revert: feat: add login"), CommitType::Revert);
}

#[test]
fn classify_accepts_alias_spellings() {
    assert_eq!(classify("feature: dark mode"), CommitType::Feat);
    assert_eq!(classify("bugfix: off by one"), CommitType::Fix);
    assert_eq!(classify("doc: typo"), CommitType::Docs);
    assert_eq!(classify("tests: cover renderer"), CommitType::Test);
    assert_eq!(classify("performance(parser): fewer allocs"), CommitType::Perf);
}

#[test]
fn classify_falls_back_to_other() {
    assert_eq!(classify("update stuff"), CommitType::Other);
    assert_eq!(classify("feat add login"), CommitType::Other);
    assert_eq!(classify("feat(unclosed: scope"), CommitType::Other);
    assert_eq!(classify("fixing the build"), CommitType::Other);
    assert_eq!(classify(""), CommitType::Other);
}

#[test]
fn aggregates_example_scenario() {
    let document = example_document();

    let a = &document.authors["A"];
    assert_eq!(a.stats.total_commits, 2);
    assert_eq!(a.stats.insertions, 45);
    assert_eq!(a.stats.deletions, 3);
    assert_eq!(a.stats.files_changed, 4);
    assert_eq!(a.commit_types[&CommitType::Feat], 1);
    assert_eq!(a.commit_types[&CommitType::Fix], 1);

    let b = &document.authors["B"];
    assert_eq!(b.stats.total_commits, 1);
    assert_eq!(b.stats.insertions, 10);

    let overall = &document.overall_stats;
    assert_eq!(overall.total_commits, 3);
    assert_eq!(overall.active_contributors, 2);
    assert_eq!(overall.total_insertions, 55);
    assert_eq!(overall.total_deletions, 3);
    assert_eq!(overall.total_files_changed, 5);

    let ordered: Vec<&str> = ordered_authors(&document)
        .iter()
        .map(|r| r.author.as_str())
        .collect();
    assert_eq!(ordered, vec!["A", "B"]);
}

#[test]
fn overall_stats_match_per_author_sums() {
    let document = example_document();
    let overall = &document.overall_stats;

    let commits: u32 = document.authors.values().map(|r| r.stats.total_commits).sum();
    let insertions: u64 = document.authors.values().map(|r| r.stats.insertions).sum();
    let deletions: u64 = document.authors.values().map(|r| r.stats.deletions).sum();
    let files: u64 = document.authors.values().map(|r| r.stats.files_changed).sum();

    assert_eq!(overall.total_commits, commits);
    assert_eq!(overall.total_insertions, insertions);
    assert_eq!(overall.total_deletions, deletions);
    assert_eq!(overall.total_files_changed, files);
}

#[test]
fn type_counts_sum_to_total_commits() {
    let document = example_document();
    for report in document.authors.values() {
        let sum: u32 = report.commit_types.values().sum();
        assert_eq!(sum, report.stats.total_commits);
    }
}

#[test]
fn author_commits_are_chronological() {
    let document = build_document(
        period(),
        vec![
            commit("c3", "A", "chore: later", 1, 0, 1, ts(5, 9)),
            commit("c1", "A", "feat: earlier", 1, 0, 1, ts(1, 9)),
            commit("c2", "A", "fix: middle", 1, 0, 1, ts(3, 9)),
        ],
    );
    let ids: Vec<&str> = document.authors["A"].commits.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["c1", "c2", "c3"]);
}

#[test]
fn author_ordering_breaks_ties_by_name() {
    let document = build_document(
        period(),
        vec![
            commit("z1", "Zoe", "feat: one", 1, 0, 1, ts(1, 8)),
            commit("m1", "Mia", "fix: one", 1, 0, 1, ts(1, 9)),
            commit("a1", "Abe", "docs: one", 1, 0, 1, ts(1, 10)),
        ],
    );
    let ordered: Vec<&str> = ordered_authors(&document)
        .iter()
        .map(|r| r.author.as_str())
        .collect();
    assert_eq!(ordered, vec!["Abe", "Mia", "Zoe"]);
}

#[test]
fn rendering_is_deterministic() {
    let document = example_document();
    let first = render_markdown(&document).unwrap();
    let second = render_markdown(&document).unwrap();
    assert_eq!(first, second);
}

#[test]
fn rendered_report_has_fixed_structure() {
    let document = example_document();
    let markdown = render_markdown(&document).unwrap();

    assert!(markdown.starts_with("# Weekly Report (2024-01-01 ~ 2024-01-07)\n"));
    assert!(markdown.contains("## Overall Statistics"));
    assert!(markdown.contains("- **Total commits**: 3"));
    assert!(markdown.contains("- **Active contributors**: 2"));
    assert!(markdown.contains("## Team Summary"));

    // A (2 commits) comes before B (1 commit)
    let a_pos = markdown.find("\n## A\n").unwrap();
    let b_pos = markdown.find("\n## B\n").unwrap();
    assert!(a_pos < b_pos);

    // type table includes zero-count rows in enum order
    assert!(markdown.contains("| feat | 1 |"));
    assert!(markdown.contains("| revert | 0 |"));

    // detail rows use the short id and every commit appears exactly once
    assert_eq!(markdown.matches("| a1a1a1a | feat: add login | 40 | 2 | 3 |").count(), 1);
    assert_eq!(markdown.matches("| b1b1b1b |").count(), 1);
}

#[test]
fn empty_period_renders_valid_report() {
    let document = build_document(period(), Vec::new());
    assert!(document.authors.is_empty());
    assert_eq!(document.overall_stats.total_commits, 0);
    assert_eq!(document.overall_stats.active_contributors, 0);

    let markdown = render_markdown(&document).unwrap();
    assert!(markdown.contains("- **Total commits**: 0"));
    assert!(markdown.contains("No commits in this period."));
}

#[test]
fn document_round_trips_through_json() {
    let document = example_document();
    let json = serde_json::to_string(&document).unwrap();
    let parsed: ReportDocument = serde_json::from_str(&json).unwrap();
    assert_eq!(render_markdown(&document).unwrap(), render_markdown(&parsed).unwrap());
}

#[test]
fn subjects_are_escaped_and_truncated() {
    let long_subject = format!("feat: {}", "x".repeat(80));
    let document = build_document(
        period(),
        vec![
            commit("p1", "A", "fix: handle a | b", 1, 0, 1, ts(1, 8)),
            commit("p2", "A", &long_subject, 1, 0, 1, ts(2, 8)),
        ],
    );
    let markdown = render_markdown(&document).unwrap();
    assert!(markdown.contains("fix: handle a \\| b"));
    assert!(markdown.contains("..."));
    assert!(!markdown.contains(&long_subject));
}

#[test]
fn summary_text_is_passed_through_verbatim() {
    let mut document = example_document();
    document
        .authors
        .get_mut("A")
        .unwrap()
        .summary = Some("Shipped the login flow.".to_string());

    let markdown = render_markdown(&document).unwrap();
    assert!(markdown.contains("Shipped the login flow."));
    // B has no summary, so the placeholder shows up exactly once
    assert_eq!(markdown.matches("_No summary provided._").count(), 1);
}

#[test]
fn inconsistent_document_is_rejected() {
    let mut document = example_document();
    document.authors.get_mut("A").unwrap().commits.clear();

    let err = render_markdown(&document).unwrap_err();
    assert!(matches!(err, GitweekError::MalformedDocument(_)));
}

#[test]
fn inconsistent_type_counts_are_rejected() {
    let mut document = example_document();
    document
        .authors
        .get_mut("A")
        .unwrap()
        .commit_types
        .insert(CommitType::Chore, 5);

    let err = render_markdown(&document).unwrap_err();
    assert!(matches!(err, GitweekError::MalformedDocument(_)));
}

#[test]
fn period_rejects_inverted_and_invalid_dates() {
    assert!(matches!(
        Period::parse("2024-01-07", "2024-01-01").unwrap_err(),
        GitweekError::InvalidRange(_)
    ));
    assert!(matches!(
        Period::parse("not-a-date", "2024-01-01").unwrap_err(),
        GitweekError::InvalidRange(_)
    ));
    assert!(Period::parse("2024-01-01", "2024-01-01").is_ok());
}

#[test]
fn week_ranges_are_monday_to_sunday() {
    let wednesday = NaiveDate::from_ymd_opt(2024, 1, 3).unwrap();
    assert_eq!(
        gitweek::util::week_range(wednesday),
        (
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 7).unwrap()
        )
    );
    assert_eq!(
        gitweek::util::last_week_range(wednesday),
        (
            NaiveDate::from_ymd_opt(2023, 12, 25).unwrap(),
            NaiveDate::from_ymd_opt(2023, 12, 31).unwrap()
        )
    );
}
