//! Git delegate - checks component sources out into a local cache.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use git2::{Commit, FetchOptions, Repository, ResetType};
use indexmap::IndexMap;
use url::Url;

use crate::sources::{FetchDelegate, FetchRequest};
use crate::util::hash::short_hash;

/// A delegate that clones each component at its pinned revision.
///
/// Checkouts live under `<cache_dir>/git/<host-path>-<hash>`, keyed by
/// repository URL and revision so different revisions never share a
/// working tree.
pub struct GitDelegate {
    /// Cache root
    cache_dir: PathBuf,

    /// Component name -> checkout path, in fetch order
    checkouts: IndexMap<String, PathBuf>,
}

impl GitDelegate {
    /// Create a new git delegate.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        GitDelegate {
            cache_dir: cache_dir.into(),
            checkouts: IndexMap::new(),
        }
    }

    /// Checked-out components and where their sources are.
    pub fn checkouts(&self) -> &IndexMap<String, PathBuf> {
        &self.checkouts
    }

    /// Checkout directory for a repository at a revision.
    pub fn checkout_path(&self, remote: &Url, revision: &str) -> PathBuf {
        let dir_name = format!(
            "{}-{}",
            sanitize_url_for_path(remote),
            &short_hash(&format!("{}@{}", remote, revision))[..8]
        );
        self.cache_dir.join("git").join(dir_name)
    }

    fn open_or_clone(&self, remote: &Url, path: &Path) -> Result<Repository> {
        if path.exists() {
            tracing::info!("Updating {}", remote);

            let repo = Repository::open(path)
                .with_context(|| format!("failed to open git repository: {}", path.display()))?;

            {
                let mut origin = repo.find_remote("origin")?;
                let mut opts = FetchOptions::new();
                opts.download_tags(git2::AutotagOption::All);
                origin
                    .fetch(&["refs/heads/*:refs/remotes/origin/*"], Some(&mut opts), None)
                    .with_context(|| format!("failed to fetch {}", remote))?;
            }

            Ok(repo)
        } else {
            tracing::info!("Cloning {}", remote);

            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }

            Repository::clone(remote.as_str(), path)
                .with_context(|| format!("failed to clone {}", remote))
        }
    }
}

impl FetchDelegate for GitDelegate {
    fn fetch(&mut self, request: &FetchRequest) -> Result<()> {
        let remote = Url::parse(&request.repository)
            .with_context(|| format!("invalid repository URL '{}'", request.repository))?;

        let path = self.checkout_path(&remote, &request.revision);
        let repo = self.open_or_clone(&remote, &path)?;

        let commit = find_revision(&repo, &request.revision).with_context(|| {
            format!(
                "revision '{}' not found in {}",
                request.revision, request.repository
            )
        })?;

        repo.reset(commit.as_object(), ResetType::Hard, None)
            .with_context(|| format!("failed to check out {}", request.revision))?;

        tracing::debug!(
            "Checked out {} {} at {} into {}",
            request.name,
            request.version,
            commit.id(),
            path.display()
        );

        self.checkouts.insert(request.name.clone(), path);
        Ok(())
    }
}

/// Resolve a tag name or commit id to a commit.
fn find_revision<'r>(repo: &'r Repository, revision: &str) -> Result<Commit<'r>> {
    if let Ok(tag_ref) = repo.find_reference(&format!("refs/tags/{}", revision)) {
        return Ok(tag_ref.peel_to_commit()?);
    }

    if let Ok(oid) = git2::Oid::from_str(revision) {
        if let Ok(commit) = repo.find_commit(oid) {
            return Ok(commit);
        }
    }

    match repo.revparse_single(revision) {
        Ok(object) => Ok(object.peel_to_commit()?),
        Err(_) => bail!("no tag or commit named '{}'", revision),
    }
}

/// Sanitize a URL for use as a directory name.
fn sanitize_url_for_path(url: &Url) -> String {
    let mut name = String::new();

    if let Some(host) = url.host_str() {
        name.push_str(host);
    }

    let path = url.path().trim_matches('/');
    if !path.is_empty() {
        name.push('-');
        name.push_str(&path.replace('/', "-"));
    }

    // Remove .git suffix
    if name.ends_with(".git") {
        name.truncate(name.len() - 4);
    }

    name
}
