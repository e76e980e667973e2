//! Compiled zkSync contract artifacts.
//!
//! - **Model**: [`ZkArtifact`] mirrors the JSON files zksolc/zkvyper emit
//!   under `artifacts-zk/`, including the insertion-ordered `factoryDeps`.
//! - **Loading**: [`ArtifactLoader`] is the read-only seam; [`FsArtifactStore`]
//!   reads a build directory, [`MemoryArtifactStore`] holds artifacts in memory.
//! - **Resolution**: [`extract_factory_deps`] walks factory dependencies
//!   depth-first and returns every distinct dependency bytecode once.

pub mod artifact;
pub mod error;
pub mod loader;
pub mod resolver;
pub mod store;

pub use artifact::{
    ArtifactFormat, ZKSOLC_ARTIFACT_FORMAT, ZKVYPER_ARTIFACT_FORMAT, ZkArtifact,
    fully_qualified_name, parse_fully_qualified_name,
};
pub use error::ArtifactError;
pub use loader::ArtifactLoader;
pub use resolver::extract_factory_deps;
pub use store::{FsArtifactStore, MemoryArtifactStore};
