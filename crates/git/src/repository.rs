use anyhow::{anyhow, bail, Context, Result};
use derive_more::Display;
use git2::{Oid, Repository as Git2Repository, Sort};
use log::{debug, trace};
use path_clean::PathClean;
use std::path::{Component, Path, PathBuf};

/// Represents a git commit
#[derive(Debug, Clone, PartialEq, Eq, Display)]
#[display(fmt = "{} {}", short_id, message)]
pub struct Commit {
    /// The commit's SHA-1 hash
    pub id: String,
    /// The commit's short hash (first 7 characters)
    pub short_id: String,
    /// The first line of the commit message
    pub message: String,
    /// The commit author name
    pub author_name: String,
    /// The commit author email
    pub author_email: String,
    /// The commit timestamp (seconds since epoch)
    pub time: i64,
}

impl Commit {
    fn from_git2(commit: &git2::Commit<'_>) -> Self {
        let message = commit
            .message()
            .unwrap_or("")
            .lines()
            .next()
            .unwrap_or("")
            .to_string();

        let id = commit.id().to_string();
        let author = commit.author();
        Self {
            short_id: id.chars().take(7).collect(),
            id,
            message,
            author_name: author.name().unwrap_or("Unknown").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            time: commit.time().seconds(),
        }
    }
}

/// The identity configured as `user.name` / `user.email`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GitUser {
    pub name: Option<String>,
    pub email: Option<String>,
}

impl GitUser {
    /// Whether `commit` was authored by this user, by name or by email
    pub fn authored(&self, commit: &Commit) -> bool {
        self.name.as_deref() == Some(commit.author_name.as_str())
            || self.email.as_deref() == Some(commit.author_email.as_str())
    }
}

/// The most recent commit in `history` authored by `user`
pub fn last_commit_by<'a>(history: &'a [Commit], user: &GitUser) -> Option<&'a Commit> {
    history.iter().find(|commit| user.authored(commit))
}

/// A wrapper around git2::Repository that supplies diff base texts
pub struct Repository {
    /// The underlying git2 repository
    inner: Git2Repository,
    /// The repository's working directory
    work_dir: PathBuf,
}

impl Repository {
    /// Open the git repository containing the given path
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let repo = Git2Repository::discover(path)
            .with_context(|| format!("Failed to discover git repository at {}", path.display()))?;

        let work_dir = repo
            .workdir()
            .ok_or_else(|| anyhow!("Repository has no working directory"))?
            .to_path_buf();

        debug!("opened repository at {}", work_dir.display());
        Ok(Self {
            inner: repo,
            work_dir,
        })
    }

    /// Get the repository's working directory
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Turn a document path into a path relative to the work tree.
    ///
    /// Absolute paths must lie inside the work tree.
    pub fn relativize(&self, path: &Path) -> Result<PathBuf> {
        let cleaned = path.clean();
        let relative = if cleaned.is_absolute() {
            pathdiff::diff_paths(&cleaned, self.work_dir.clean()).ok_or_else(|| {
                anyhow!("Cannot express {} relative to the work tree", path.display())
            })?
        } else {
            cleaned
        };

        if relative
            .components()
            .any(|component| matches!(component, Component::ParentDir))
        {
            bail!(
                "{} is outside the work tree {}",
                path.display(),
                self.work_dir.display()
            );
        }
        Ok(relative)
    }

    /// Get the content of a file from the repository HEAD
    pub fn head_content(&self, path: &Path) -> Result<Option<String>> {
        self.content_at_revision("HEAD", path)
    }

    /// Get the content of a file at a specific commit/revision
    pub fn content_at_revision(&self, revision: &str, path: &Path) -> Result<Option<String>> {
        let path = self.relativize(path)?;
        let obj = match self.inner.revparse_single(revision) {
            Ok(obj) => obj,
            Err(_) => return Ok(None),
        };

        let commit = obj.peel_to_commit()?;
        let tree = commit.tree()?;

        let entry = match tree.get_path(&path) {
            Ok(entry) => entry,
            Err(_) => return Ok(None),
        };

        let blob = entry.to_object(&self.inner)?.peel_to_blob()?;
        let content = String::from_utf8_lossy(blob.content()).to_string();

        trace!("read {} at {} ({} bytes)", path.display(), revision, content.len());
        Ok(Some(content))
    }

    /// The diff base of a file at `revision`; a file unknown at that revision
    /// has an empty base, so every working line shows as added
    pub fn base_text(&self, path: &Path, revision: &str) -> Result<String> {
        Ok(self
            .content_at_revision(revision, path)?
            .unwrap_or_default())
    }

    /// Get the content of a file from the working directory
    pub fn working_content(&self, path: &Path) -> Result<Option<String>> {
        let full_path = self.work_dir.join(self.relativize(path)?);
        if !full_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&full_path)
            .with_context(|| format!("Failed to read file {}", full_path.display()))?;

        Ok(Some(content))
    }

    /// Commits that changed a file, newest first, at most `max_count` of them
    pub fn file_history(&self, path: &Path, max_count: usize) -> Result<Vec<Commit>> {
        let path = self.relativize(path)?;
        if self.inner.is_empty()? {
            return Ok(Vec::new());
        }

        let mut revwalk = self.inner.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push_head()?;

        let mut commits = Vec::new();
        for oid_result in revwalk {
            if commits.len() >= max_count {
                break;
            }

            let commit = self.inner.find_commit(oid_result?)?;
            let parent_blob = match commit.parent(0) {
                Ok(parent) => blob_id(&parent, &path),
                Err(_) => None,
            };
            if blob_id(&commit, &path) != parent_blob {
                commits.push(Commit::from_git2(&commit));
            }
        }

        debug!("{} commits touch {}", commits.len(), path.display());
        Ok(commits)
    }

    /// The identity from the repository's git configuration
    pub fn current_user(&self) -> Result<GitUser> {
        let config = self.inner.config()?;
        Ok(GitUser {
            name: config.get_string("user.name").ok(),
            email: config.get_string("user.email").ok(),
        })
    }
}

/// Blob id of `path` in the tree of `commit`
fn blob_id(commit: &git2::Commit<'_>, path: &Path) -> Option<Oid> {
    commit.tree().ok()?.get_path(path).ok().map(|entry| entry.id())
}
