use crate::collect::{leading_types, ordered_authors};
use crate::error::{GitweekError, Result};
use crate::model::{AuthorReport, CommitType, ReportDocument};
use std::fmt::Write;

const SUBJECT_MAX_CHARS: usize = 50;

/// Render a report document as Markdown.
///
/// Rendering is deterministic: the same document always produces
/// byte-identical output. The document is validated first and a
/// [`GitweekError::MalformedDocument`] is returned if its internal counts
/// disagree, which only happens with hand-authored input.
pub fn render_markdown(document: &ReportDocument) -> Result<String> {
    validate(document)?;

    let mut out = String::new();
    let period = &document.period;
    let overall = &document.overall_stats;

    let _ = writeln!(out, "# Weekly Report ({} ~ {})", period.since, period.until);
    out.push('\n');
    out.push_str("## Overall Statistics\n\n");
    let _ = writeln!(out, "- **Total commits**: {}", overall.total_commits);
    let _ = writeln!(out, "- **Active contributors**: {}", overall.active_contributors);
    let _ = writeln!(out, "- **Lines added**: +{}", overall.total_insertions);
    let _ = writeln!(out, "- **Lines deleted**: -{}", overall.total_deletions);
    let _ = writeln!(out, "- **Files changed**: {}", overall.total_files_changed);
    out.push('\n');

    out.push_str("## Team Summary\n\n");
    let authors = ordered_authors(document);
    if authors.is_empty() {
        out.push_str("No commits in this period.\n");
    } else {
        for report in &authors {
            let types = leading_types(report, 3)
                .into_iter()
                .map(|(kind, count)| format!("{}({})", kind.as_str(), count))
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(
                out,
                "- **{}**: {} commits ({})",
                report.author, report.stats.total_commits, types
            );
        }
    }
    out.push('\n');
    out.push_str("---\n");

    if authors.is_empty() {
        out.push_str("\n## Details\n\nNo commits in this period.\n");
        return Ok(out);
    }

    for report in authors {
        render_author_section(&mut out, report);
    }

    Ok(out)
}

fn render_author_section(out: &mut String, report: &AuthorReport) {
    let stats = &report.stats;

    let _ = writeln!(out, "\n## {}", report.author);
    out.push_str("\n### Work Overview\n\n");
    match &report.summary {
        Some(summary) => {
            out.push_str(summary);
            out.push('\n');
        }
        None => out.push_str("_No summary provided._\n"),
    }

    out.push_str("\n### Commit Statistics\n\n");
    let _ = writeln!(out, "- **Commits**: {}", stats.total_commits);
    let _ = writeln!(out, "- **Files changed**: {}", stats.files_changed);
    let _ = writeln!(out, "- **Lines added**: +{}", stats.insertions);
    let _ = writeln!(out, "- **Lines deleted**: -{}", stats.deletions);

    out.push_str("\n### Commit Type Distribution\n\n");
    out.push_str("| Type | Count |\n");
    out.push_str("|------|------:|\n");
    for kind in CommitType::ALL {
        let count = report.commit_types.get(&kind).copied().unwrap_or(0);
        let _ = writeln!(out, "| {} | {} |", kind.as_str(), count);
    }

    out.push_str("\n### Commits\n\n");
    out.push_str("| Id | Subject | Added | Deleted | Files |\n");
    out.push_str("|----|---------|------:|--------:|------:|\n");
    for commit in &report.commits {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} |",
            commit.short_id(),
            table_cell(&commit.subject),
            commit.insertions,
            commit.deletions,
            commit.files_changed
        );
    }

    out.push_str("\n---\n");
}

/// Subjects are truncated and pipe-escaped so they cannot break table rows.
fn table_cell(subject: &str) -> String {
    let truncated = if subject.chars().count() > SUBJECT_MAX_CHARS {
        let mut short: String = subject.chars().take(SUBJECT_MAX_CHARS - 3).collect();
        short.push_str("...");
        short
    } else {
        subject.to_string()
    };
    truncated.replace('|', "\\|")
}

fn validate(document: &ReportDocument) -> Result<()> {
    for (name, report) in &document.authors {
        let total = report.stats.total_commits;
        if report.commits.len() as u32 != total {
            return Err(GitweekError::MalformedDocument(format!(
                "author '{name}' lists {} commits but total_commits is {total}",
                report.commits.len()
            )));
        }
        let type_sum: u32 = report.commit_types.values().sum();
        if type_sum != total {
            return Err(GitweekError::MalformedDocument(format!(
                "author '{name}' type counts sum to {type_sum}, expected {total}"
            )));
        }
    }
    Ok(())
}
