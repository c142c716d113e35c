use crate::error::Result;
use crate::model::Period;
use chrono::{DateTime, Utc};
use gix::object::tree::diff::ChangeDetached;
use gix::{discover, ObjectId, Repository};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};

/// One commit as reported by the history query: identity, subject and
/// per-commit aggregate numstat. Classification and grouping happen later.
#[derive(Debug, Clone)]
pub struct RawCommit {
    pub id: String,
    pub author: String,
    pub timestamp: DateTime<Utc>,
    pub subject: String,
    pub files_changed: u32,
    pub insertions: u32,
    pub deletions: u32,
}

pub struct GitRepo {
    repo: Repository,
    path: PathBuf,
}

impl GitRepo {
    /// Open a repository at `path`, or current dir if `None`
    pub fn open<P: AsRef<Path>>(path: Option<P>) -> Result<Self> {
        let repo_path = path
            .map(|p| p.as_ref().to_path_buf())
            .unwrap_or(std::env::current_dir()?);

        let repo = discover(&repo_path)?;
        let path = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();

        Ok(Self { repo, path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Walk history from HEAD and return every commit inside `period`.
    ///
    /// Out-of-range commits are traversed but not reported, so a window in
    /// the middle of history still reaches its ancestors. An unborn HEAD
    /// yields an empty list rather than an error.
    pub fn collect_commits(&self, period: &Period, include_merges: bool) -> Result<Vec<RawCommit>> {
        let mut head = self.repo.head()?;
        if head.is_unborn() {
            return Ok(Vec::new());
        }
        let head_commit = head.peel_to_commit_in_place()?;

        let mut commits = Vec::new();
        let mut seen: HashSet<ObjectId> = HashSet::new();
        let mut stack: VecDeque<ObjectId> = VecDeque::from([head_commit.id]);

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Collecting commits...");

        while let Some(commit_id) = stack.pop_back() {
            if !seen.insert(commit_id) {
                continue;
            }

            let commit = self.repo.find_commit(commit_id)?;
            let secs = commit.time()?.seconds;
            let timestamp = DateTime::from_timestamp(secs, 0)
                .ok_or_else(|| crate::error::GitweekError::Parse(format!("Invalid timestamp: {secs}")))?;

            let parents: Vec<ObjectId> = commit.parent_ids().map(|id| id.into()).collect();

            if !period.contains(&timestamp) {
                for pid in parents {
                    stack.push_back(pid);
                }
                continue;
            }

            if !include_merges && parents.len() > 1 {
                for pid in parents {
                    stack.push_back(pid);
                }
                pb.inc(1);
                continue;
            }

            let author = commit.author()?;
            let subject = commit.message()?.title.to_string();
            let (files_changed, insertions, deletions) =
                self.numstat(commit_id, parents.first().copied())?;

            commits.push(RawCommit {
                id: commit_id.to_string(),
                author: author.name.to_string(),
                timestamp,
                subject,
                files_changed,
                insertions,
                deletions,
            });

            for pid in parents {
                stack.push_back(pid);
            }

            pb.inc(1);
        }

        pb.finish_and_clear();
        Ok(commits)
    }

    /// Per-commit totals from the tree diff against the first parent, or
    /// against the empty tree for root commits. Binary files count toward
    /// `files_changed` with zero line counts, matching git numstat.
    fn numstat(&self, commit_id: ObjectId, parent_id: Option<ObjectId>) -> Result<(u32, u32, u32)> {
        let commit_tree = self.repo.find_commit(commit_id)?.tree()?;
        let parent_tree = match parent_id {
            Some(pid) => Some(self.repo.find_commit(pid)?.tree()?),
            None => None,
        };

        let changes: Vec<ChangeDetached> =
            self.repo
                .diff_tree_to_tree(parent_tree.as_ref(), Some(&commit_tree), None)?;

        let mut files_changed = 0u32;
        let mut insertions = 0u32;
        let mut deletions = 0u32;

        for change in changes {
            match change {
                ChangeDetached::Addition { id, .. } => {
                    if let Ok(obj) = self.repo.find_object(id) {
                        files_changed += 1;
                        if !is_binary_object(&obj) {
                            insertions += count_lines(&obj);
                        }
                    }
                }
                ChangeDetached::Deletion { id, .. } => {
                    if let Ok(obj) = self.repo.find_object(id) {
                        files_changed += 1;
                        if !is_binary_object(&obj) {
                            deletions += count_lines(&obj);
                        }
                    }
                }
                ChangeDetached::Modification { previous_id, id, .. }
                | ChangeDetached::Rewrite { source_id: previous_id, id, .. } => {
                    if let (Ok(old_obj), Ok(new_obj)) =
                        (self.repo.find_object(previous_id), self.repo.find_object(id))
                    {
                        files_changed += 1;
                        if !is_binary_object(&old_obj) && !is_binary_object(&new_obj) {
                            let (added, deleted) = line_diff(&old_obj, &new_obj);
                            insertions += added;
                            deletions += deleted;
                        }
                    }
                }
            }
        }

        Ok((files_changed, insertions, deletions))
    }
}

fn is_binary_object(object: &gix::Object) -> bool {
    object.data.as_slice().iter().take(8192).any(|&b| b == 0)
}

fn count_lines(object: &gix::Object) -> u32 {
    std::str::from_utf8(object.data.as_slice())
        .map(|t| t.lines().count() as u32)
        .unwrap_or(0)
}

fn line_diff(old_object: &gix::Object, new_object: &gix::Object) -> (u32, u32) {
    let old_text = std::str::from_utf8(old_object.data.as_slice()).unwrap_or("");
    let new_text = std::str::from_utf8(new_object.data.as_slice()).unwrap_or("");

    let old_lines: Vec<&str> = old_text.lines().collect();
    let new_lines: Vec<&str> = new_text.lines().collect();

    let mut added = 0usize;
    let mut deleted = 0usize;
    let (mut oi, mut ni) = (0usize, 0usize);

    while oi < old_lines.len() || ni < new_lines.len() {
        if oi >= old_lines.len() {
            added += new_lines.len() - ni;
            break;
        }
        if ni >= new_lines.len() {
            deleted += old_lines.len() - oi;
            break;
        }

        if old_lines[oi] == new_lines[ni] {
            oi += 1;
            ni += 1;
            continue;
        }

        let mut found = false;
        for look_ahead in 1..=3 {
            if oi + look_ahead < old_lines.len() && old_lines[oi + look_ahead] == new_lines[ni] {
                deleted += look_ahead;
                oi += look_ahead;
                found = true;
                break;
            }
            if ni + look_ahead < new_lines.len() && old_lines[oi] == new_lines[ni + look_ahead] {
                added += look_ahead;
                ni += look_ahead;
                found = true;
                break;
            }
        }

        if !found {
            deleted += 1;
            added += 1;
            oi += 1;
            ni += 1;
        }
    }

    (added as u32, deleted as u32)
}
