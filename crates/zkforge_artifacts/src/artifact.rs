use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// `_format` tag written by the zksolc compiler plugin.
pub const ZKSOLC_ARTIFACT_FORMAT: &str = "hh-zksolc-artifact-1";
/// `_format` tag written by the zkvyper compiler plugin.
pub const ZKVYPER_ARTIFACT_FORMAT: &str = "hh-zkvyper-artifact-1";

/// Bytecode value of an abstract contract or interface.
const EMPTY_BYTECODE: &str = "0x";

/// Compilers whose artifacts can be deployed to zkSync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArtifactFormat {
    Zksolc,
    Zkvyper,
}

impl ArtifactFormat {
    /// The `_format` tag this compiler writes.
    pub fn tag(&self) -> &'static str {
        match self {
            ArtifactFormat::Zksolc => ZKSOLC_ARTIFACT_FORMAT,
            ArtifactFormat::Zkvyper => ZKVYPER_ARTIFACT_FORMAT,
        }
    }

    /// Match a `_format` tag against the allow-list.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            ZKSOLC_ARTIFACT_FORMAT => Some(ArtifactFormat::Zksolc),
            ZKVYPER_ARTIFACT_FORMAT => Some(ArtifactFormat::Zkvyper),
            _ => None,
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// A compiled contract as written to `artifacts-zk/<sourceName>/<contractName>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ZkArtifact {
    #[serde(rename = "_format")]
    pub format_version: String,
    pub contract_name: String,
    pub source_name: String,
    #[serde(default)]
    pub abi: Vec<serde_json::Value>,
    pub bytecode: String,
    #[serde(default)]
    pub deployed_bytecode: String,
    #[serde(default)]
    pub link_references: serde_json::Value,
    #[serde(default)]
    pub deployed_link_references: serde_json::Value,
    /// Bytecode hash -> fully qualified name, in compiler emission order.
    #[serde(default)]
    pub factory_deps: IndexMap<String, String>,
}

impl ZkArtifact {
    /// Create a zksolc artifact with an empty ABI and no factory dependencies.
    pub fn new(
        source_name: impl Into<String>,
        contract_name: impl Into<String>,
        bytecode: impl Into<String>,
    ) -> Self {
        let bytecode = bytecode.into();
        Self {
            format_version: ZKSOLC_ARTIFACT_FORMAT.to_string(),
            contract_name: contract_name.into(),
            source_name: source_name.into(),
            abi: Vec::new(),
            deployed_bytecode: bytecode.clone(),
            bytecode,
            link_references: serde_json::Value::Object(Default::default()),
            deployed_link_references: serde_json::Value::Object(Default::default()),
            factory_deps: IndexMap::new(),
        }
    }

    /// Append a factory dependency entry.
    pub fn with_factory_dep(mut self, hash: impl Into<String>, name: impl Into<String>) -> Self {
        self.factory_deps.insert(hash.into(), name.into());
        self
    }

    pub fn with_abi(mut self, abi: Vec<serde_json::Value>) -> Self {
        self.abi = abi;
        self
    }

    pub fn with_format(mut self, format_version: impl Into<String>) -> Self {
        self.format_version = format_version.into();
        self
    }

    /// `sourceName:contractName`, the key used for deduplication.
    pub fn identity(&self) -> String {
        fully_qualified_name(&self.source_name, &self.contract_name)
    }

    /// The producing compiler, if it is one of the recognized zkSync compilers.
    pub fn format(&self) -> Option<ArtifactFormat> {
        ArtifactFormat::from_tag(&self.format_version)
    }

    /// Abstract contracts and interfaces compile to empty bytecode.
    pub fn is_abstract(&self) -> bool {
        self.bytecode.is_empty() || self.bytecode == EMPTY_BYTECODE
    }
}

/// Join a source unit and contract name into `source:Contract`.
pub fn fully_qualified_name(source_name: &str, contract_name: &str) -> String {
    format!("{source_name}:{contract_name}")
}

/// Split `source:Contract` on the last colon. Bare names return `None`.
pub fn parse_fully_qualified_name(name: &str) -> Option<(&str, &str)> {
    let (source, contract) = name.rsplit_once(':')?;
    if source.is_empty() || contract.is_empty() {
        return None;
    }
    Some((source, contract))
}
