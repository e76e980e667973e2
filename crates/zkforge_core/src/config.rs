use std::fmt;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// File name looked up in a project root.
pub const CONFIG_FILE_NAME: &str = "zkforge.config.json";

const DEFAULT_NETWORK: &str = "inMemoryNode";
const IN_MEMORY_NODE_URL: &str = "http://127.0.0.1:8011";
const IN_MEMORY_NODE_CHAIN_ID: u64 = 260;

/// Errors raised while reading, writing or validating project configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Network '{0}' is not defined in the config")]
    UnknownNetwork(String),

    #[error("Network '{network}' has an invalid RPC URL: {url}")]
    InvalidUrl { network: String, url: String },

    #[error("Network '{0}' is marked as zkSync but has no RPC URL")]
    MissingUrl(String),

    #[error("Invalid accounts value '{0}': expected \"remote\" or a list of private keys")]
    InvalidAccounts(String),
}

// ---------------------------------------------------------------------------
// Accounts
// ---------------------------------------------------------------------------

/// Where a network's signing accounts come from.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AccountsRepr", into = "AccountsRepr")]
pub enum AccountsConfig {
    /// Accounts are managed by the node; no keys are held locally.
    #[default]
    Remote,
    /// Hex-encoded private keys, in selection order.
    PrivateKeys(Vec<String>),
}

impl AccountsConfig {
    /// Locally held private keys. Empty for remote accounts.
    pub fn private_keys(&self) -> &[String] {
        match self {
            AccountsConfig::Remote => &[],
            AccountsConfig::PrivateKeys(keys) => keys,
        }
    }
}

// Keys never reach logs or panic messages; only their count is shown.
impl fmt::Debug for AccountsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccountsConfig::Remote => f.write_str("Remote"),
            AccountsConfig::PrivateKeys(keys) => f
                .debug_tuple("PrivateKeys")
                .field(&format_args!("<{} redacted>", keys.len()))
                .finish(),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum AccountsRepr {
    Keyword(String),
    Keys(Vec<String>),
}

impl TryFrom<AccountsRepr> for AccountsConfig {
    type Error = ConfigError;

    fn try_from(repr: AccountsRepr) -> Result<Self, Self::Error> {
        match repr {
            AccountsRepr::Keyword(word) if word == "remote" => Ok(AccountsConfig::Remote),
            AccountsRepr::Keyword(word) => Err(ConfigError::InvalidAccounts(word)),
            AccountsRepr::Keys(keys) => Ok(AccountsConfig::PrivateKeys(keys)),
        }
    }
}

impl From<AccountsConfig> for AccountsRepr {
    fn from(accounts: AccountsConfig) -> Self {
        match accounts {
            AccountsConfig::Remote => AccountsRepr::Keyword("remote".to_string()),
            AccountsConfig::PrivateKeys(keys) => AccountsRepr::Keys(keys),
        }
    }
}

// ---------------------------------------------------------------------------
// Networks & paths
// ---------------------------------------------------------------------------

/// Configuration for a single named network.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkConfig {
    /// JSON-RPC endpoint of the zkSync node.
    pub url: Option<String>,
    /// Whether the network runs the zkSync execution model.
    pub zksync: bool,
    /// Name or URL of the L1 network the zkSync chain settles on.
    pub eth_network: Option<String>,
    pub chain_id: Option<u64>,
    pub accounts: AccountsConfig,
}

/// Project directory layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    pub root: PathBuf,
    pub artifacts: PathBuf,
    pub cache: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            artifacts: PathBuf::from("artifacts-zk"),
            cache: PathBuf::from("cache-zk"),
        }
    }
}

impl PathsConfig {
    /// Absolute (or root-relative) directory holding compiled artifacts.
    pub fn artifacts_dir(&self) -> PathBuf {
        self.root.join(&self.artifacts)
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join(&self.cache)
    }
}

// ---------------------------------------------------------------------------
// ZkForgeConfig
// ---------------------------------------------------------------------------

/// Project configuration stored at `<root>/zkforge.config.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ZkForgeConfig {
    pub default_network: String,
    pub networks: IndexMap<String, NetworkConfig>,
    pub paths: PathsConfig,
}

impl Default for ZkForgeConfig {
    fn default() -> Self {
        let mut networks = IndexMap::new();
        networks.insert(
            DEFAULT_NETWORK.to_string(),
            NetworkConfig {
                url: Some(IN_MEMORY_NODE_URL.to_string()),
                zksync: true,
                eth_network: None,
                chain_id: Some(IN_MEMORY_NODE_CHAIN_ID),
                accounts: AccountsConfig::Remote,
            },
        );
        Self {
            default_network: DEFAULT_NETWORK.to_string(),
            networks,
            paths: PathsConfig::default(),
        }
    }
}

impl ZkForgeConfig {
    /// Load and validate a config file. A relative `paths.root` is resolved
    /// against the directory containing the file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let parse_error = |source: serde_json::Error| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        };
        // Struct-level defaults would otherwise accept `[]` as an empty config.
        let value: serde_json::Value = serde_json::from_str(&data).map_err(parse_error)?;
        if !value.is_object() {
            return Err(parse_error(serde::de::Error::custom(
                "expected a JSON object at the top level",
            )));
        }
        let mut config: Self = serde_json::from_value(value).map_err(parse_error)?;

        if config.paths.root.is_relative() {
            if let Some(parent) = path.parent() {
                config.paths.root = parent.join(&config.paths.root);
            }
        }

        config.validate()?;
        info!(
            path = %path.display(),
            networks = config.networks.len(),
            "zkforge config loaded"
        );
        Ok(config)
    }

    /// Load config from a file, or return defaults if it is missing or broken.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "config file not found, using defaults");
            return Self::default();
        }
        match Self::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Unusable config file, using defaults: {e}");
                Self::default()
            }
        }
    }

    /// Persist the config as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Check cross-field consistency: the default network exists, every URL
    /// is http(s), and every zkSync network has an endpoint.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.networks.contains_key(&self.default_network) {
            return Err(ConfigError::UnknownNetwork(self.default_network.clone()));
        }

        for (name, network) in &self.networks {
            match &network.url {
                Some(url) if !validate_url(url) => {
                    return Err(ConfigError::InvalidUrl {
                        network: name.clone(),
                        url: url.clone(),
                    });
                }
                None if network.zksync => return Err(ConfigError::MissingUrl(name.clone())),
                _ => {}
            }
        }
        Ok(())
    }

    /// Look up a network by name.
    pub fn network(&self, name: &str) -> Result<&NetworkConfig, ConfigError> {
        self.networks
            .get(name)
            .ok_or_else(|| ConfigError::UnknownNetwork(name.to_string()))
    }

    pub fn default_network(&self) -> Result<&NetworkConfig, ConfigError> {
        self.network(&self.default_network)
    }
}

/// Validate that a URL is well-formed and uses HTTP or HTTPS.
pub fn validate_url(url: &str) -> bool {
    match url::Url::parse(url) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            (scheme == "http" || scheme == "https") && parsed.host().is_some()
        }
        Err(_) => false,
    }
}
