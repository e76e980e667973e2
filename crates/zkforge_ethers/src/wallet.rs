use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;
use zkforge_core::{ConfigError, NetworkConfig};

use crate::error::EthersError;

const PRIVATE_KEY_LEN: usize = 32;

/// A secp256k1 private key. `Debug` never prints the key material.
#[derive(Clone, PartialEq, Eq)]
pub struct PrivateKey([u8; PRIVATE_KEY_LEN]);

impl PrivateKey {
    /// Parse a 32-byte hex key, with or without `0x`.
    pub fn from_hex(key: &str) -> Result<Self, EthersError> {
        let digits = key.trim().strip_prefix("0x").unwrap_or(key.trim());
        let bytes = hex::decode(digits).map_err(|e| EthersError::InvalidPrivateKey(e.to_string()))?;
        let bytes: [u8; PRIVATE_KEY_LEN] = bytes.try_into().map_err(|b: Vec<u8>| {
            EthersError::InvalidPrivateKey(format!(
                "expected {PRIVATE_KEY_LEN} bytes, got {}",
                b.len()
            ))
        })?;
        if bytes.iter().all(|b| *b == 0) {
            return Err(EthersError::InvalidPrivateKey("key is zero".into()));
        }
        Ok(Self(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_LEN] {
        &self.0
    }

    /// `0x`-prefixed lowercase hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey(<redacted>)")
    }
}

/// Which configured account a wallet should be built from.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum WalletSelector {
    /// The first configured account.
    #[default]
    Default,
    /// An account by position in the network's `accounts` list.
    Index(usize),
    /// An explicit key, independent of the configured accounts.
    PrivateKey(String),
}

impl fmt::Debug for WalletSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WalletSelector::Default => f.write_str("Default"),
            WalletSelector::Index(index) => f.debug_tuple("Index").field(index).finish(),
            WalletSelector::PrivateKey(_) => f.write_str("PrivateKey(<redacted>)"),
        }
    }
}

impl From<usize> for WalletSelector {
    fn from(index: usize) -> Self {
        WalletSelector::Index(index)
    }
}

/// The zkSync network a wallet is connected to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkBinding {
    pub name: String,
    pub url: String,
    pub eth_network: Option<String>,
    pub chain_id: Option<u64>,
}

impl NetworkBinding {
    /// Bind to a configured network. Only zkSync networks with an RPC URL
    /// qualify.
    pub fn from_config(name: &str, network: &NetworkConfig) -> Result<Self, EthersError> {
        if !network.zksync {
            return Err(EthersError::NotZkSyncNetwork(name.to_string()));
        }
        let url = network
            .url
            .clone()
            .ok_or_else(|| ConfigError::MissingUrl(name.to_string()))?;
        Ok(Self {
            name: name.to_string(),
            url,
            eth_network: network.eth_network.clone(),
            chain_id: network.chain_id,
        })
    }
}

/// A private key bound to a zkSync network. Signing happens in the
/// external SDK that consumes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wallet {
    pub private_key: PrivateKey,
    pub network: NetworkBinding,
}

impl Wallet {
    pub fn new(private_key: PrivateKey, network: NetworkBinding) -> Self {
        Self {
            private_key,
            network,
        }
    }
}

/// Build one wallet for `network` according to `selector`.
pub fn get_wallet(
    name: &str,
    network: &NetworkConfig,
    selector: &WalletSelector,
) -> Result<Wallet, EthersError> {
    let binding = NetworkBinding::from_config(name, network)?;
    let keys = network.accounts.private_keys();

    let key = match selector {
        WalletSelector::PrivateKey(key) => key.as_str(),
        WalletSelector::Default => {
            keys.first()
                .map(String::as_str)
                .ok_or_else(|| EthersError::NoAccounts {
                    network: name.to_string(),
                })?
        }
        WalletSelector::Index(index) => {
            if keys.is_empty() {
                return Err(EthersError::NoAccounts {
                    network: name.to_string(),
                });
            }
            keys.get(*index)
                .map(String::as_str)
                .ok_or(EthersError::AccountIndexOutOfRange {
                    index: *index,
                    count: keys.len(),
                })?
        }
    };

    let wallet = Wallet::new(PrivateKey::from_hex(key)?, binding);
    debug!(network = %name, selector = %selector_kind(selector), "wallet selected");
    Ok(wallet)
}

/// One wallet per configured private key, in config order. Remote accounts
/// yield no wallets.
pub fn get_wallets(name: &str, network: &NetworkConfig) -> Result<Vec<Wallet>, EthersError> {
    let binding = NetworkBinding::from_config(name, network)?;
    network
        .accounts
        .private_keys()
        .iter()
        .map(|key| PrivateKey::from_hex(key).map(|pk| Wallet::new(pk, binding.clone())))
        .collect()
}

/// Selector description that is safe to log.
fn selector_kind(selector: &WalletSelector) -> String {
    match selector {
        WalletSelector::Default => "default".into(),
        WalletSelector::Index(i) => format!("index {i}"),
        WalletSelector::PrivateKey(_) => "explicit key".into(),
    }
}
