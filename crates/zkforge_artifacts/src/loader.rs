use async_trait::async_trait;

use crate::artifact::ZkArtifact;
use crate::error::ArtifactError;

/// Read-only access to compiled artifacts.
///
/// Implementations must tolerate concurrent reads; artifacts never change
/// once a build has finished.
#[async_trait]
pub trait ArtifactLoader: Send + Sync {
    /// Read an artifact by bare or fully qualified name, without checking
    /// which compiler produced it.
    async fn read_artifact(&self, name: &str) -> Result<ZkArtifact, ArtifactError>;

    /// Fully qualified names of every artifact this loader knows about.
    async fn fully_qualified_names(&self) -> Result<Vec<String>, ArtifactError>;

    /// Read an artifact and reject it unless zksolc or zkvyper produced it.
    async fn load_artifact(&self, name: &str) -> Result<ZkArtifact, ArtifactError> {
        let artifact = self.read_artifact(name).await?;
        if artifact.format().is_none() {
            return Err(ArtifactError::NotCompiledByExpectedToolchain {
                name: name.to_string(),
                format: artifact.format_version,
            });
        }
        Ok(artifact)
    }

    async fn artifact_exists(&self, name: &str) -> Result<bool, ArtifactError> {
        match self.read_artifact(name).await {
            Ok(_) => Ok(true),
            Err(ArtifactError::NotFound { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
