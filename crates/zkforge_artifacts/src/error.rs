//! Artifact error types.

use std::path::PathBuf;

use crate::artifact::{ZKSOLC_ARTIFACT_FORMAT, ZKVYPER_ARTIFACT_FORMAT};

/// Errors raised while locating, reading or validating artifacts.
#[derive(Debug, thiserror::Error)]
pub enum ArtifactError {
    /// No build artifact exists for the requested contract.
    #[error("Artifact for contract \"{name}\" not found. Make sure it is compiled.")]
    NotFound { name: String },

    /// The artifact was produced by a compiler other than zksolc or zkvyper.
    #[error(
        "Artifact {name} was not compiled by zksolc or zkvyper (format \"{format}\", expected \
         \"{}\" or \"{}\")",
        ZKSOLC_ARTIFACT_FORMAT,
        ZKVYPER_ARTIFACT_FORMAT
    )]
    NotCompiledByExpectedToolchain { name: String, format: String },

    /// A bare contract name matched several source units.
    #[error(
        "There are multiple artifacts for contract \"{name}\", use one of these fully qualified names: {}",
        .candidates.join(", ")
    )]
    Ambiguous {
        name: String,
        candidates: Vec<String>,
    },

    #[error("I/O error reading {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed artifact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl ArtifactError {
    /// The contract name the error refers to, when there is one.
    pub fn contract_name(&self) -> Option<&str> {
        match self {
            ArtifactError::NotFound { name }
            | ArtifactError::NotCompiledByExpectedToolchain { name, .. }
            | ArtifactError::Ambiguous { name, .. } => Some(name),
            ArtifactError::Io { .. } | ArtifactError::Parse { .. } => None,
        }
    }
}
