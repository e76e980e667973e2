use serde::{Deserialize, Serialize};

use crate::deployer::DeployResult;
use crate::error::EthersError;
use crate::wallet::Wallet;

const ADDRESS_HEX_LEN: usize = 40;

/// Where a contract's interface comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractInterface {
    /// Bare or fully qualified artifact name.
    Artifact(String),
    Abi(Vec<serde_json::Value>),
}

/// A deployed contract: address, interface and the wallet used to call it.
#[derive(Debug, Clone)]
pub struct Contract {
    pub address: String,
    pub abi: Vec<serde_json::Value>,
    pub wallet: Option<Wallet>,
    /// Present when this handle was produced by a deployment.
    pub deployment: Option<DeployResult>,
}

impl Contract {
    pub fn new(
        address: impl Into<String>,
        abi: Vec<serde_json::Value>,
        wallet: Option<Wallet>,
    ) -> Result<Self, EthersError> {
        let address = address.into();
        validate_address(&address)?;
        Ok(Self {
            address,
            abi,
            wallet,
            deployment: None,
        })
    }

    /// The same contract, called through another wallet.
    pub fn connect(&self, wallet: Wallet) -> Self {
        Self {
            wallet: Some(wallet),
            ..self.clone()
        }
    }

    /// Names of the `function` entries in the ABI.
    pub fn function_names(&self) -> Vec<&str> {
        self.abi
            .iter()
            .filter(|entry| entry.get("type").and_then(|t| t.as_str()) == Some("function"))
            .filter_map(|entry| entry.get("name").and_then(|n| n.as_str()))
            .collect()
    }
}

/// `0x` followed by 40 hex digits.
pub fn validate_address(address: &str) -> Result<(), EthersError> {
    let valid = address.strip_prefix("0x").is_some_and(|digits| {
        digits.len() == ADDRESS_HEX_LEN && digits.chars().all(|c| c.is_ascii_hexdigit())
    });
    if valid {
        Ok(())
    } else {
        Err(EthersError::InvalidAddress(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ADDRESS: &str = "0x36615Cf349d7F6344891B1e7CA7C72883F5dc049";

    #[test]
    fn accepts_checksummed_address() {
        let contract = Contract::new(ADDRESS, vec![], None).unwrap();
        assert_eq!(contract.address, ADDRESS);
        assert!(contract.deployment.is_none());
    }

    #[test]
    fn rejects_malformed_addresses() {
        let bad_addresses = [
            "",
            "0x",
            "36615Cf349d7F6344891B1e7CA7C72883F5dc049",
            "0x1234",
            "0xZZ615Cf349d7F6344891B1e7CA7C72883F5dc049",
        ];
        for bad in bad_addresses {
            assert!(
                matches!(Contract::new(bad, vec![], None), Err(EthersError::InvalidAddress(_))),
                "accepted {bad}"
            );
        }
    }

    #[test]
    fn lists_function_names() {
        let abi = vec![
            json!({ "type": "constructor", "inputs": [] }),
            json!({ "type": "function", "name": "greet", "inputs": [] }),
            json!({ "type": "event", "name": "Greeted" }),
            json!({ "type": "function", "name": "setGreeting", "inputs": [] }),
        ];
        let contract = Contract::new(ADDRESS, abi, None).unwrap();
        assert_eq!(contract.function_names(), ["greet", "setGreeting"]);
    }
}
