//! Version metadata for the page title.

use std::error::Error;
use std::path::PathBuf;

use gix::commit::describe::SelectRef;

/// Hex digits of an abbreviated commit hash.
const HASH_LEN: usize = 7;

/// Parsed project version.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VersionInfo {
    /// Release tag (e.g. "v4.0.0").
    pub tag: String,
    /// Commits since the tag, if not exactly on it.
    pub commits: Option<u32>,
    /// Abbreviated commit hash, if not exactly on the tag.
    pub hash: Option<String>,
    /// Working tree has uncommitted changes.
    pub dirty: bool,
}

impl VersionInfo {
    /// Version exactly on a tag.
    #[must_use]
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            commits: None,
            hash: None,
            dirty: false,
        }
    }
}

/// Error returned when the version can't be determined.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// No git repository at or above the directory.
    #[error("No git repository at {}: {source}", dir.display())]
    Repository {
        /// Directory searched from.
        dir: PathBuf,
        /// Discovery error.
        source: Box<gix::discover::Error>,
    },
    /// HEAD couldn't be described.
    #[error("Failed to describe HEAD in {}: {source}", dir.display())]
    Describe {
        /// Repository directory.
        dir: PathBuf,
        /// Underlying git error.
        source: Box<dyn Error + Send + Sync>,
    },
    /// No tag is reachable from HEAD.
    #[error("No tag reachable from HEAD in {}", dir.display())]
    NoTag {
        /// Repository directory.
        dir: PathBuf,
    },
}

/// Source of the project version.
pub trait MetadataProvider: Send + Sync {
    /// Current project version.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError`] if the version can't be determined.
    fn version(&self) -> Result<VersionInfo, MetadataError>;
}

/// Fixed version tag.
#[derive(Clone, Debug)]
pub struct StaticMetadata {
    tag: String,
}

impl StaticMetadata {
    /// Create a provider returning `tag`.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl MetadataProvider for StaticMetadata {
    fn version(&self) -> Result<VersionInfo, MetadataError> {
        Ok(VersionInfo::tagged(self.tag.clone()))
    }
}

/// Version described from the nearest tag reachable from HEAD.
///
/// Equivalent to `git describe --tags --dirty`: lightweight and annotated
/// tags both count, and `dirty` reports tracked changes in the worktree.
#[derive(Clone, Debug)]
pub struct GitDescribe {
    repo_dir: PathBuf,
}

impl GitDescribe {
    /// Create a provider for the repository containing `repo_dir`.
    #[must_use]
    pub fn new(repo_dir: PathBuf) -> Self {
        Self { repo_dir }
    }

    fn describe_error(&self, err: impl Error + Send + Sync + 'static) -> MetadataError {
        tracing::warn!(dir = %self.repo_dir.display(), error = %err, "git describe failed");
        MetadataError::Describe {
            dir: self.repo_dir.clone(),
            source: Box::new(err),
        }
    }
}

impl MetadataProvider for GitDescribe {
    fn version(&self) -> Result<VersionInfo, MetadataError> {
        let repo = gix::discover(&self.repo_dir).map_err(|source| MetadataError::Repository {
            dir: self.repo_dir.clone(),
            source: Box::new(source),
        })?;

        let head = repo.head_commit().map_err(|e| self.describe_error(e))?;
        let resolution = head
            .describe()
            .names(SelectRef::AllTags)
            .try_resolve()
            .map_err(|e| self.describe_error(e))?;
        let Some(outcome) = resolution.map(|r| r.outcome) else {
            tracing::warn!(dir = %self.repo_dir.display(), "No tag reachable from HEAD");
            return Err(MetadataError::NoTag {
                dir: self.repo_dir.clone(),
            });
        };
        let Some(tag) = outcome.name.as_ref().map(ToString::to_string) else {
            return Err(MetadataError::NoTag {
                dir: self.repo_dir.clone(),
            });
        };

        let dirty = repo.is_dirty().map_err(|e| self.describe_error(e))?;

        let version = if outcome.depth == 0 {
            VersionInfo {
                dirty,
                ..VersionInfo::tagged(tag)
            }
        } else {
            VersionInfo {
                tag,
                commits: Some(outcome.depth),
                hash: Some(outcome.id.to_hex_with_len(HASH_LEN).to_string()),
                dirty,
            }
        };
        tracing::debug!(tag = %version.tag, commits = ?version.commits, dirty, "Resolved version");
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::Path;

    use gix::refs::transaction::PreviousValue;
    use pretty_assertions::assert_eq;

    use super::*;

    /// Create a repository with a committer identity in its local config.
    fn init_repo(dir: &Path) -> gix::Repository {
        gix::init(dir).unwrap();
        let config = dir.join(".git/config");
        let mut text = fs::read_to_string(&config).unwrap();
        text.push_str("[user]\n\tname = Opsheet Test\n\temail = test@example.com\n");
        fs::write(&config, text).unwrap();
        gix::open(dir).unwrap()
    }

    fn commit(repo: &gix::Repository, message: &str) -> gix::ObjectId {
        let tree = repo.write_object(gix::objs::Tree::empty()).unwrap().detach();
        let parents: Vec<gix::ObjectId> = repo
            .head_id()
            .ok()
            .map(gix::Id::detach)
            .into_iter()
            .collect();
        repo.commit("HEAD", message, tree, parents).unwrap().detach()
    }

    fn tag(repo: &gix::Repository, name: &str, target: gix::ObjectId) {
        repo.tag_reference(name, target, PreviousValue::MustNotExist)
            .unwrap();
    }

    #[test]
    fn test_static_metadata() {
        let version = StaticMetadata::new("v4.0.0").version().unwrap();
        assert_eq!(version, VersionInfo::tagged("v4.0.0"));
    }

    #[test]
    fn test_describe_exact_tag() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        let id = commit(&repo, "initial");
        tag(&repo, "v4.0.0", id);

        let version = GitDescribe::new(dir.path().to_path_buf()).version().unwrap();
        assert_eq!(version, VersionInfo::tagged("v4.0.0"));
    }

    #[test]
    fn test_describe_commits_after_tag() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        let first = commit(&repo, "initial");
        tag(&repo, "v3.2.0", first);
        commit(&repo, "second");
        let head = commit(&repo, "third");

        let version = GitDescribe::new(dir.path().to_path_buf()).version().unwrap();
        assert_eq!(
            version,
            VersionInfo {
                tag: "v3.2.0".to_owned(),
                commits: Some(2),
                hash: Some(head.to_hex_with_len(HASH_LEN).to_string()),
                dirty: false,
            }
        );
    }

    #[test]
    fn test_describe_from_subdirectory() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        let id = commit(&repo, "initial");
        tag(&repo, "v4.0.0", id);
        let nested = dir.path().join("base/docs");
        fs::create_dir_all(&nested).unwrap();

        let version = GitDescribe::new(nested).version().unwrap();
        assert_eq!(version.tag, "v4.0.0");
    }

    #[test]
    fn test_describe_without_tag() {
        let dir = tempfile::tempdir().unwrap();
        let repo = init_repo(dir.path());
        commit(&repo, "initial");

        let err = GitDescribe::new(dir.path().to_path_buf())
            .version()
            .unwrap_err();
        assert!(matches!(err, MetadataError::NoTag { .. }));
    }

    #[test]
    fn test_describe_without_commits() {
        let dir = tempfile::tempdir().unwrap();
        init_repo(dir.path());

        let err = GitDescribe::new(dir.path().to_path_buf())
            .version()
            .unwrap_err();
        assert!(matches!(err, MetadataError::Describe { .. }));
    }

    #[test]
    fn test_describe_outside_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = GitDescribe::new(dir.path().to_path_buf())
            .version()
            .unwrap_err();
        // The temp dir may itself sit inside a repository without tags.
        assert!(matches!(
            err,
            MetadataError::Repository { .. }
                | MetadataError::Describe { .. }
                | MetadataError::NoTag { .. }
        ));
    }
}
