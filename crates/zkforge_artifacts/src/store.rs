use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use ignore::WalkBuilder;
use indexmap::IndexMap;
use tracing::{debug, warn};

use crate::artifact::{ZkArtifact, parse_fully_qualified_name};
use crate::error::ArtifactError;
use crate::loader::ArtifactLoader;

/// Directory the compiler writes build metadata to; it holds no artifacts.
const BUILD_INFO_DIR: &str = "build-info";
const DEBUG_FILE_SUFFIX: &str = ".dbg.json";

// ---------------------------------------------------------------------------
// Filesystem store
// ---------------------------------------------------------------------------

/// Reads artifacts from a build directory laid out as
/// `<root>/<sourceName>/<contractName>.json`.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    root: PathBuf,
}

impl FsArtifactStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where the artifact for `source_name:contract_name` lives. `None` when
    /// either part would leave the build directory.
    pub fn artifact_path(&self, source_name: &str, contract_name: &str) -> Option<PathBuf> {
        let source_is_relative = Path::new(source_name)
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        let contract_is_file_name = !contract_name.contains(['/', '\\']);
        if !source_is_relative || !contract_is_file_name {
            return None;
        }
        Some(
            self.root
                .join(source_name)
                .join(format!("{contract_name}.json")),
        )
    }

    /// Read the file at `path`, which must hold the artifact `identity`.
    /// `name` is what the caller asked for and is reported on failure.
    async fn read_expected(
        path: &Path,
        identity: &str,
        name: &str,
    ) -> Result<ZkArtifact, ArtifactError> {
        let artifact = Self::read_file(path, name).await?;
        if artifact.identity() != identity {
            warn!(
                path = %path.display(),
                expected = %identity,
                found = %artifact.identity(),
                "artifact file holds a different contract"
            );
            return Err(ArtifactError::NotFound {
                name: name.to_string(),
            });
        }
        Ok(artifact)
    }

    async fn read_file(path: &Path, name: &str) -> Result<ZkArtifact, ArtifactError> {
        let raw = match tokio::fs::read_to_string(path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(ArtifactError::NotFound {
                    name: name.to_string(),
                });
            }
            Err(source) => {
                return Err(ArtifactError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let artifact = serde_json::from_str(&raw).map_err(|source| ArtifactError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        debug!(path = %path.display(), "artifact read");
        Ok(artifact)
    }

    /// Walk the build directory and list `(fully qualified name, path)` for
    /// every artifact file, sorted by name.
    async fn scan(&self) -> Result<Vec<(String, PathBuf)>, ArtifactError> {
        let root = self.root.clone();
        tokio::task::spawn_blocking(move || scan_artifact_files(&root))
            .await
            .map_err(|e| ArtifactError::Io {
                path: self.root.clone(),
                source: std::io::Error::other(e),
            })
    }
}

/// Build output is usually gitignored, so ignore files must not apply here.
fn scan_artifact_files(root: &Path) -> Vec<(String, PathBuf)> {
    let walker = WalkBuilder::new(root)
        .standard_filters(false)
        .filter_entry(|entry| entry.file_name() != BUILD_INFO_DIR)
        .build();

    let mut found = Vec::new();
    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(_) => continue,
        };

        let path = entry.path();
        if !entry.file_type().is_some_and(|t| t.is_file()) {
            continue;
        }
        let Some(file_name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if !file_name.ends_with(".json") || file_name.ends_with(DEBUG_FILE_SUFFIX) {
            continue;
        }

        let Ok(relative) = path.strip_prefix(root) else {
            continue;
        };
        let Some(source_dir) = relative.parent() else {
            continue;
        };
        let source_name = source_dir
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if source_name.is_empty() {
            continue;
        }
        let contract_name = file_name.trim_end_matches(".json");

        found.push((format!("{source_name}:{contract_name}"), path.to_path_buf()));
    }

    found.sort_by(|a, b| a.0.cmp(&b.0));
    found
}

#[async_trait]
impl ArtifactLoader for FsArtifactStore {
    async fn read_artifact(&self, name: &str) -> Result<ZkArtifact, ArtifactError> {
        if let Some((source_name, contract_name)) = parse_fully_qualified_name(name) {
            let Some(path) = self.artifact_path(source_name, contract_name) else {
                warn!(name = %name, "artifact name escapes the build directory");
                return Err(ArtifactError::NotFound {
                    name: name.to_string(),
                });
            };
            return Self::read_expected(&path, name, name).await;
        }

        let mut matches: Vec<(String, PathBuf)> = self
            .scan()
            .await?
            .into_iter()
            .filter(|(fqn, _)| {
                parse_fully_qualified_name(fqn).is_some_and(|(_, contract)| contract == name)
            })
            .collect();

        match matches.len() {
            0 => Err(ArtifactError::NotFound {
                name: name.to_string(),
            }),
            1 => {
                let (fqn, path) = matches.remove(0);
                Self::read_expected(&path, &fqn, name).await
            }
            _ => Err(ArtifactError::Ambiguous {
                name: name.to_string(),
                candidates: matches.into_iter().map(|(fqn, _)| fqn).collect(),
            }),
        }
    }

    async fn fully_qualified_names(&self) -> Result<Vec<String>, ArtifactError> {
        Ok(self.scan().await?.into_iter().map(|(fqn, _)| fqn).collect())
    }
}

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// Artifacts held in memory, keyed by fully qualified name.
#[derive(Debug, Clone, Default)]
pub struct MemoryArtifactStore {
    artifacts: IndexMap<String, ZkArtifact>,
}

impl MemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace an artifact under its identity.
    pub fn insert(&mut self, artifact: ZkArtifact) {
        self.artifacts.insert(artifact.identity(), artifact);
    }

    pub fn len(&self) -> usize {
        self.artifacts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.artifacts.is_empty()
    }
}

impl FromIterator<ZkArtifact> for MemoryArtifactStore {
    fn from_iter<I: IntoIterator<Item = ZkArtifact>>(iter: I) -> Self {
        let mut store = Self::new();
        for artifact in iter {
            store.insert(artifact);
        }
        store
    }
}

#[async_trait]
impl ArtifactLoader for MemoryArtifactStore {
    async fn read_artifact(&self, name: &str) -> Result<ZkArtifact, ArtifactError> {
        if parse_fully_qualified_name(name).is_some() {
            return self
                .artifacts
                .get(name)
                .cloned()
                .ok_or_else(|| ArtifactError::NotFound {
                    name: name.to_string(),
                });
        }

        let mut matches = self
            .artifacts
            .values()
            .filter(|artifact| artifact.contract_name == name);
        match (matches.next(), matches.next()) {
            (None, _) => Err(ArtifactError::NotFound {
                name: name.to_string(),
            }),
            (Some(artifact), None) => Ok(artifact.clone()),
            (Some(_), Some(_)) => {
                let mut candidates: Vec<String> = self
                    .artifacts
                    .values()
                    .filter(|artifact| artifact.contract_name == name)
                    .map(ZkArtifact::identity)
                    .collect();
                candidates.sort();
                Err(ArtifactError::Ambiguous {
                    name: name.to_string(),
                    candidates,
                })
            }
        }
    }

    async fn fully_qualified_names(&self) -> Result<Vec<String>, ArtifactError> {
        Ok(self.artifacts.keys().cloned().collect())
    }
}
