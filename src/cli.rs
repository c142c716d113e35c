use crate::collect;
use crate::git::GitRepo;
use crate::model::{Period, ReportDocument};
use crate::render::render_markdown;
use anyhow::{Context, Result};
use chrono::Local;
use clap::{Args, Parser, Subcommand};
use console::style;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "gitweek")]
#[command(about = "Weekly Markdown activity reports from git history, grouped by author")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone)]
pub struct CommonArgs {
    #[arg(long, help = "Path to git repository")]
    pub repo: Option<PathBuf>,

    #[arg(long, help = "Start date (YYYY-MM-DD), defaults to Monday of the current week")]
    pub since: Option<String>,

    #[arg(long, help = "End date (YYYY-MM-DD), defaults to Sunday of the current week")]
    pub until: Option<String>,

    #[arg(long, help = "Report on last week instead of the current one", conflicts_with_all = ["since", "until", "this_week"])]
    pub last_week: bool,

    #[arg(long, help = "Report on the current week (default)", conflicts_with_all = ["since", "until"])]
    pub this_week: bool,

    #[arg(long, help = "Include merge commits", default_value_t = true)]
    pub include_merges: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Collect commits and render the Markdown report
    Report {
        #[arg(long, short, help = "Output Markdown file (stdout if omitted)")]
        output: Option<PathBuf>,

        #[arg(long, help = "Also write the intermediate JSON document here")]
        json_output: Option<PathBuf>,
    },
    /// Collect commits and emit the JSON report document only
    Collect {
        #[arg(long, short, help = "Output JSON file (stdout if omitted)")]
        output: Option<PathBuf>,
    },
    /// Render a previously collected JSON report document
    Render {
        #[arg(help = "Path to a JSON report document")]
        input: PathBuf,

        #[arg(long, short, help = "Output Markdown file (stdout if omitted)")]
        output: Option<PathBuf>,
    },
}

impl CommonArgs {
    /// Resolve the reporting period. Date defaulting happens here, not in
    /// the collector: absent bounds fall back to the current week, and
    /// `--last-week` selects the previous Monday..Sunday.
    pub fn resolve_period(&self) -> Result<Period> {
        let today = Local::now().date_naive();
        if self.last_week {
            let (since, until) = crate::util::last_week_range(today);
            return Ok(Period::new(since, until)?);
        }

        let (default_since, default_until) = crate::util::week_range(today);
        let since = match &self.since {
            Some(s) => s.clone(),
            None => default_since.format("%Y-%m-%d").to_string(),
        };
        let until = match &self.until {
            Some(u) => u.clone(),
            None => default_until.format("%Y-%m-%d").to_string(),
        };
        Ok(Period::parse(&since, &until)?)
    }
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Report { output, json_output } => {
                exec_report(self.common, output.as_deref(), json_output.as_deref())
            }
            Commands::Collect { output } => exec_collect(self.common, output.as_deref()),
            Commands::Render { input, output } => exec_render(&input, output.as_deref()),
        }
    }
}

fn collect_document(common: &CommonArgs) -> Result<ReportDocument> {
    let period = common.resolve_period()?;
    eprintln!(
        "{} {} ~ {}",
        style("Collecting commits:").bold(),
        period.since,
        period.until
    );

    let repo = GitRepo::open(common.repo.as_ref()).context("Failed to open git repository")?;
    let document = collect::collect(&repo, &period, common.include_merges)
        .context("Failed to collect commits from repository")?;

    let overall = &document.overall_stats;
    if overall.total_commits == 0 {
        eprintln!("No commits found in this period");
    } else {
        eprintln!(
            "Found {} commits from {} contributors ({} / {})",
            style(overall.total_commits).cyan(),
            style(overall.active_contributors).yellow(),
            style(format!("+{}", overall.total_insertions)).green(),
            style(format!("-{}", overall.total_deletions)).red()
        );
    }

    Ok(document)
}

fn exec_report(
    common: CommonArgs,
    output: Option<&Path>,
    json_output: Option<&Path>,
) -> Result<()> {
    let document = collect_document(&common)?;
    let markdown = render_markdown(&document).context("Failed to render report")?;

    if let Some(path) = json_output {
        write_file(path, &to_json(&document)?)?;
        eprintln!("JSON document written to {}", path.display());
    }

    emit(output, &markdown)?;
    if let Some(path) = output {
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}

fn exec_collect(common: CommonArgs, output: Option<&Path>) -> Result<()> {
    let document = collect_document(&common)?;
    emit(output, &to_json(&document)?)?;
    if let Some(path) = output {
        eprintln!("JSON document written to {}", path.display());
    }
    Ok(())
}

fn exec_render(input: &Path, output: Option<&Path>) -> Result<()> {
    let raw = std::fs::read_to_string(input)
        .with_context(|| format!("Failed to read document {}", input.display()))?;
    let document: ReportDocument = serde_json::from_str(&raw)
        .map_err(|e| crate::error::GitweekError::MalformedDocument(e.to_string()))?;

    let markdown = render_markdown(&document).context("Failed to render report")?;
    emit(output, &markdown)?;
    if let Some(path) = output {
        eprintln!("Report written to {}", path.display());
    }
    Ok(())
}

fn to_json(document: &ReportDocument) -> Result<String> {
    let mut json = serde_json::to_string_pretty(document)?;
    json.push('\n');
    Ok(json)
}

// The payload is rendered fully in memory first, so a failed run never
// leaves a partial file behind.
fn emit(output: Option<&Path>, payload: &str) -> Result<()> {
    match output {
        Some(path) => write_file(path, payload),
        None => {
            print!("{payload}");
            Ok(())
        }
    }
}

fn write_file(path: &Path, payload: &str) -> Result<()> {
    std::fs::write(path, payload).with_context(|| format!("Failed to write {}", path.display()))
}
