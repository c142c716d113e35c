use crate::classify::classify;
use crate::error::Result;
use crate::git::{GitRepo, RawCommit};
use crate::model::{
    AuthorReport, AuthorStats, Commit, CommitType, OverallStats, Period, ReportDocument,
    SCHEMA_VERSION,
};
use std::collections::BTreeMap;

/// Strategy for mapping a commit author string to a report bucket.
///
/// Merging aliases (name vs. email vs. account id) is project-specific, so
/// the default keeps the author string byte-exact and callers can plug in
/// their own policy.
pub trait AuthorIdentity {
    fn resolve(&self, author: &str) -> String;
}

/// Default identity: the raw author string, unmodified.
pub struct Verbatim;

impl AuthorIdentity for Verbatim {
    fn resolve(&self, author: &str) -> String {
        author.to_string()
    }
}

/// Query history for `period` and aggregate it into a report document.
pub fn collect(repo: &GitRepo, period: &Period, include_merges: bool) -> Result<ReportDocument> {
    let raw = repo.collect_commits(period, include_merges)?;
    let commits = raw.into_iter().map(into_commit).collect();
    Ok(build_document(*period, commits))
}

fn into_commit(raw: RawCommit) -> Commit {
    let kind = classify(&raw.subject);
    Commit {
        id: raw.id,
        author: raw.author,
        timestamp: raw.timestamp,
        subject: raw.subject,
        kind,
        files_changed: raw.files_changed,
        insertions: raw.insertions,
        deletions: raw.deletions,
    }
}

pub fn build_document(period: Period, commits: Vec<Commit>) -> ReportDocument {
    build_document_with_identity(period, commits, &Verbatim)
}

/// Group classified commits by author and aggregate per-author and overall
/// stats. Zero commits produce an empty document, not an error.
pub fn build_document_with_identity(
    period: Period,
    mut commits: Vec<Commit>,
    identity: &dyn AuthorIdentity,
) -> ReportDocument {
    commits.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));

    let mut authors: BTreeMap<String, AuthorReport> = BTreeMap::new();
    for commit in commits {
        let key = identity.resolve(&commit.author);
        let report = authors.entry(key.clone()).or_insert_with(|| AuthorReport {
            author: key,
            summary: None,
            commits: Vec::new(),
            stats: AuthorStats::default(),
            commit_types: BTreeMap::new(),
        });

        report.stats.total_commits += 1;
        report.stats.files_changed += commit.files_changed as u64;
        report.stats.insertions += commit.insertions as u64;
        report.stats.deletions += commit.deletions as u64;
        *report.commit_types.entry(commit.kind).or_insert(0) += 1;
        report.commits.push(commit);
    }

    let overall_stats = overall_stats(&authors);

    ReportDocument {
        version: SCHEMA_VERSION,
        period,
        authors,
        overall_stats,
    }
}

fn overall_stats(authors: &BTreeMap<String, AuthorReport>) -> OverallStats {
    let mut overall = OverallStats {
        active_contributors: authors.len() as u32,
        ..OverallStats::default()
    };
    for report in authors.values() {
        overall.total_commits += report.stats.total_commits;
        overall.total_insertions += report.stats.insertions;
        overall.total_deletions += report.stats.deletions;
        overall.total_files_changed += report.stats.files_changed;
    }
    overall
}

/// Authors ordered for rendering: descending commit count, then ascending
/// name. Total order, so identical documents always render identically.
pub fn ordered_authors(document: &ReportDocument) -> Vec<&AuthorReport> {
    let mut authors: Vec<&AuthorReport> = document.authors.values().collect();
    authors.sort_by(|a, b| {
        b.stats
            .total_commits
            .cmp(&a.stats.total_commits)
            .then_with(|| a.author.cmp(&b.author))
    });
    authors
}

/// Top classification types for one author, by count then enum order.
pub fn leading_types(report: &AuthorReport, limit: usize) -> Vec<(CommitType, u32)> {
    let mut types: Vec<(CommitType, u32)> = report
        .commit_types
        .iter()
        .map(|(kind, count)| (*kind, *count))
        .collect();
    types.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    types.truncate(limit);
    types
}
