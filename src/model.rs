use crate::error::{GitweekError, Result};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// Conventional-commit classification. Variant order is the rendering order
/// of the type distribution table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Refactor,
    Test,
    Chore,
    Style,
    Perf,
    Build,
    Ci,
    Revert,
    Other,
}

impl CommitType {
    pub const ALL: [CommitType; 12] = [
        CommitType::Feat,
        CommitType::Fix,
        CommitType::Docs,
        CommitType::Refactor,
        CommitType::Test,
        CommitType::Chore,
        CommitType::Style,
        CommitType::Perf,
        CommitType::Build,
        CommitType::Ci,
        CommitType::Revert,
        CommitType::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CommitType::Feat => "feat",
            CommitType::Fix => "fix",
            CommitType::Docs => "docs",
            CommitType::Refactor => "refactor",
            CommitType::Test => "test",
            CommitType::Chore => "chore",
            CommitType::Style => "style",
            CommitType::Perf => "perf",
            CommitType::Build => "build",
            CommitType::Ci => "ci",
            CommitType::Revert => "revert",
            CommitType::Other => "other",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Commit {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    #[serde(rename = "type")]
    pub kind: CommitType,
    pub files_changed: u32,
    pub insertions: u32,
    pub deletions: u32,
}

impl Commit {
    /// Abbreviated id for table rendering, like `git log --abbrev-commit`.
    pub fn short_id(&self) -> String {
        self.id.chars().take(7).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorStats {
    pub total_commits: u32,
    pub files_changed: u64,
    pub insertions: u64,
    pub deletions: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorReport {
    pub author: String,
    /// Externally supplied work overview, passed through verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    pub commits: Vec<Commit>,
    pub stats: AuthorStats,
    pub commit_types: BTreeMap<CommitType, u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverallStats {
    pub total_commits: u32,
    pub active_contributors: u32,
    pub total_insertions: u64,
    pub total_deletions: u64,
    pub total_files_changed: u64,
}

/// Inclusive calendar-date bounds of one reporting period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    pub since: NaiveDate,
    pub until: NaiveDate,
}

impl Period {
    pub fn new(since: NaiveDate, until: NaiveDate) -> Result<Self> {
        if since > until {
            return Err(GitweekError::InvalidRange(format!(
                "since ({since}) is after until ({until})"
            )));
        }
        Ok(Self { since, until })
    }

    pub fn parse(since: &str, until: &str) -> Result<Self> {
        let since = parse_date(since)?;
        let until = parse_date(until)?;
        Self::new(since, until)
    }

    /// Timestamp bounds covering the whole period: since 00:00:00 through
    /// until 23:59:59, both UTC.
    pub fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = Utc.from_utc_datetime(&self.since.and_hms_opt(0, 0, 0).unwrap_or_default());
        let end = Utc.from_utc_datetime(&self.until.and_hms_opt(23, 59, 59).unwrap_or_default());
        (start, end)
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        let (start, end) = self.bounds();
        *timestamp >= start && *timestamp <= end
    }
}

fn parse_date(input: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .map_err(|_| GitweekError::InvalidRange(format!("invalid date '{input}', expected YYYY-MM-DD")))
}

/// The serialization contract between collector and renderer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    pub version: u32,
    pub period: Period,
    pub authors: BTreeMap<String, AuthorReport>,
    pub overall_stats: OverallStats,
}
