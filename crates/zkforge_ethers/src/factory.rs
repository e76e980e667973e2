use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;
use zkforge_artifacts::ZkArtifact;

use crate::bytecode::{decode_bytecode, normalize_bytecode};
use crate::contract::Contract;
use crate::deployer::{Deployer, DeploymentRequest, Overrides};
use crate::error::EthersError;
use crate::wallet::Wallet;

const SALT_LEN: usize = 32;

/// How the contract deployer system contract creates the new account.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DeploymentType {
    #[default]
    Create,
    Create2,
    CreateAccount,
    Create2Account,
}

impl DeploymentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeploymentType::Create => "create",
            DeploymentType::Create2 => "create2",
            DeploymentType::CreateAccount => "createAccount",
            DeploymentType::Create2Account => "create2Account",
        }
    }

    /// CREATE2 variants derive the address from a caller-supplied salt.
    pub fn requires_salt(&self) -> bool {
        matches!(self, DeploymentType::Create2 | DeploymentType::Create2Account)
    }
}

impl fmt::Display for DeploymentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a factory is built from: a compiled artifact or a raw ABI/bytecode pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractSource {
    /// Bare or fully qualified artifact name.
    Artifact(String),
    Abi {
        abi: Vec<serde_json::Value>,
        bytecode: String,
    },
}

/// Prepares deployments of one contract.
#[derive(Debug, Clone)]
pub struct ContractFactory {
    pub abi: Vec<serde_json::Value>,
    /// Normalized `0x` hex.
    pub bytecode: String,
    pub wallet: Option<Wallet>,
    pub deployment_type: DeploymentType,
    contract_name: Option<String>,
}

impl ContractFactory {
    pub fn new(
        abi: Vec<serde_json::Value>,
        bytecode: &str,
        wallet: Option<Wallet>,
        deployment_type: DeploymentType,
    ) -> Result<Self, EthersError> {
        let bytecode = normalize_bytecode(bytecode)?;
        if bytecode == "0x" {
            return Err(EthersError::InvalidBytecode("bytecode is empty".into()));
        }
        Ok(Self {
            abi,
            bytecode,
            wallet,
            deployment_type,
            contract_name: None,
        })
    }

    /// Build a factory from an artifact, refusing abstract contracts.
    pub fn from_artifact(
        artifact: &ZkArtifact,
        wallet: Option<Wallet>,
        deployment_type: DeploymentType,
    ) -> Result<Self, EthersError> {
        if artifact.is_abstract() {
            return Err(EthersError::AbstractContract {
                name: artifact.contract_name.clone(),
            });
        }
        let mut factory = Self::new(
            artifact.abi.clone(),
            &artifact.bytecode,
            wallet,
            deployment_type,
        )?;
        factory.contract_name = Some(artifact.identity());
        Ok(factory)
    }

    /// Fully qualified name, when built from an artifact.
    pub fn contract_name(&self) -> Option<&str> {
        self.contract_name.as_deref()
    }

    pub fn connect(&self, wallet: Wallet) -> Self {
        Self {
            wallet: Some(wallet),
            ..self.clone()
        }
    }

    /// Assemble a deployment without submitting it.
    pub fn deployment_request(
        &self,
        constructor_args: Vec<serde_json::Value>,
        overrides: Overrides,
        factory_deps: Vec<String>,
    ) -> Result<DeploymentRequest, EthersError> {
        let wallet = self.wallet.clone().ok_or(EthersError::MissingWallet)?;

        if self.deployment_type.requires_salt() {
            let salt = overrides
                .salt
                .as_deref()
                .ok_or_else(|| EthersError::MissingSalt(self.deployment_type.to_string()))?;
            validate_salt(salt)?;
        }

        let factory_deps = factory_deps
            .iter()
            .map(|dep| normalize_bytecode(dep))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(DeploymentRequest {
            bytecode: self.bytecode.clone(),
            abi: self.abi.clone(),
            constructor_args,
            factory_deps,
            deployment_type: self.deployment_type,
            overrides,
            wallet,
        })
    }

    /// Submit a deployment through `deployer` and return a handle to the
    /// new contract.
    pub async fn deploy<D>(
        &self,
        deployer: &D,
        constructor_args: Vec<serde_json::Value>,
        overrides: Overrides,
        factory_deps: Vec<String>,
    ) -> Result<Contract, EthersError>
    where
        D: Deployer + ?Sized,
    {
        let request = self.deployment_request(constructor_args, overrides, factory_deps)?;
        let wallet = request.wallet.clone();
        let dep_count = request.factory_deps.len();

        let result = deployer.deploy(request).await?;
        info!(
            contract = self.contract_name().unwrap_or("<abi>"),
            address = %result.contract_address,
            tx_hash = %result.tx_hash,
            factory_deps = dep_count,
            "contract deployed"
        );

        let mut contract = Contract::new(&result.contract_address, self.abi.clone(), Some(wallet))?;
        contract.deployment = Some(result);
        Ok(contract)
    }
}

fn validate_salt(salt: &str) -> Result<(), EthersError> {
    let bytes = decode_bytecode(salt).map_err(|e| EthersError::InvalidSalt(e.to_string()))?;
    if bytes.len() != SALT_LEN {
        return Err(EthersError::InvalidSalt(format!(
            "expected {SALT_LEN} bytes, got {}",
            bytes.len()
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::{NetworkBinding, PrivateKey};

    const KEY: &str = "0x7726827caac94a7f9e1b160f7ea819f172f7b6f9d2a97f992c38edeab82d4110";

    fn wallet() -> Wallet {
        Wallet::new(
            PrivateKey::from_hex(KEY).unwrap(),
            NetworkBinding {
                name: "local".into(),
                url: "http://127.0.0.1:8011".into(),
                eth_network: None,
                chain_id: Some(260),
            },
        )
    }

    fn salt() -> String {
        format!("0x{}", "11".repeat(SALT_LEN))
    }

    #[test]
    fn deployment_type_serde_names() {
        let json = serde_json::to_string(&DeploymentType::Create2Account).unwrap();
        assert_eq!(json, "\"create2Account\"");
        let parsed: DeploymentType = serde_json::from_str("\"createAccount\"").unwrap();
        assert_eq!(parsed, DeploymentType::CreateAccount);
        assert_eq!(DeploymentType::default(), DeploymentType::Create);
    }

    #[test]
    fn abstract_artifact_is_rejected() {
        let artifact = ZkArtifact::new("contracts/IGreeter.sol", "IGreeter", "0x");
        match ContractFactory::from_artifact(&artifact, None, DeploymentType::Create) {
            Err(EthersError::AbstractContract { name }) => assert_eq!(name, "IGreeter"),
            other => panic!("expected abstract error, got {other:?}"),
        }
    }

    #[test]
    fn factory_from_artifact_keeps_name_and_normalizes() {
        let artifact = ZkArtifact::new("contracts/Greeter.sol", "Greeter", "0xABCD");
        let factory =
            ContractFactory::from_artifact(&artifact, Some(wallet()), DeploymentType::Create)
                .unwrap();
        assert_eq!(factory.bytecode, "0xabcd");
        assert_eq!(factory.contract_name(), Some("contracts/Greeter.sol:Greeter"));
    }

    #[test]
    fn raw_factory_rejects_bad_bytecode() {
        assert!(matches!(
            ContractFactory::new(vec![], "0x", None, DeploymentType::Create),
            Err(EthersError::InvalidBytecode(_))
        ));
        assert!(matches!(
            ContractFactory::new(vec![], "0xnothex", None, DeploymentType::Create),
            Err(EthersError::InvalidBytecode(_))
        ));
    }

    #[test]
    fn request_requires_wallet() {
        let factory = ContractFactory::new(vec![], "0x00", None, DeploymentType::Create).unwrap();
        assert!(matches!(
            factory.deployment_request(vec![], Overrides::default(), vec![]),
            Err(EthersError::MissingWallet)
        ));

        let connected = factory.connect(wallet());
        assert!(
            connected
                .deployment_request(vec![], Overrides::default(), vec![])
                .is_ok()
        );
    }

    #[test]
    fn create2_requires_valid_salt() {
        let factory =
            ContractFactory::new(vec![], "0x00", Some(wallet()), DeploymentType::Create2).unwrap();

        assert!(matches!(
            factory.deployment_request(vec![], Overrides::default(), vec![]),
            Err(EthersError::MissingSalt(kind)) if kind == "create2"
        ));

        let short = Overrides {
            salt: Some("0x01".into()),
            ..Default::default()
        };
        assert!(matches!(
            factory.deployment_request(vec![], short, vec![]),
            Err(EthersError::InvalidSalt(_))
        ));

        let good = Overrides {
            salt: Some(salt()),
            ..Default::default()
        };
        let request = factory.deployment_request(vec![], good, vec![]).unwrap();
        assert_eq!(request.deployment_type, DeploymentType::Create2);
    }

    #[test]
    fn request_carries_args_and_normalized_deps() {
        let factory =
            ContractFactory::new(vec![], "0x00", Some(wallet()), DeploymentType::Create).unwrap();
        let request = factory
            .deployment_request(
                vec![serde_json::json!("hello")],
                Overrides::default(),
                vec!["0xAA".into(), "bb".into()],
            )
            .unwrap();
        assert_eq!(request.constructor_args, [serde_json::json!("hello")]);
        assert_eq!(request.factory_deps, ["0xaa", "0xbb"]);
        assert_eq!(request.wallet, wallet());
    }
}
