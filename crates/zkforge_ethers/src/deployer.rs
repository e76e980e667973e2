use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::bytecode::hash_bytecode;
use crate::error::EthersError;
use crate::factory::DeploymentType;
use crate::wallet::Wallet;

/// Transaction fields a caller may pin instead of letting the SDK estimate them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Overrides {
    pub gas_limit: Option<u64>,
    /// Decimal wei amount.
    pub gas_price: Option<String>,
    /// Decimal wei amount sent to the constructor.
    pub value: Option<String>,
    pub nonce: Option<u64>,
    /// 32-byte hex salt, required for CREATE2 deployments.
    pub salt: Option<String>,
    pub gas_per_pubdata: Option<u64>,
}

/// Everything the SDK needs to build and sign a deployment transaction.
#[derive(Debug, Clone)]
pub struct DeploymentRequest {
    pub bytecode: String,
    pub abi: Vec<serde_json::Value>,
    /// Constructor arguments, still to be ABI-encoded by the SDK.
    pub constructor_args: Vec<serde_json::Value>,
    /// Bytecode of every contract the deployed code may create.
    pub factory_deps: Vec<String>,
    pub deployment_type: DeploymentType,
    pub overrides: Overrides,
    pub wallet: Wallet,
}

impl DeploymentRequest {
    pub fn bytecode_hash(&self) -> Result<[u8; 32], EthersError> {
        hash_bytecode(&self.bytecode)
    }

    /// zkSync hashes of the factory dependencies, in request order.
    pub fn factory_dep_hashes(&self) -> Result<Vec<[u8; 32]>, EthersError> {
        self.factory_deps.iter().map(|dep| hash_bytecode(dep)).collect()
    }
}

/// Outcome of a submitted deployment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployResult {
    pub tx_hash: String,
    pub contract_address: String,
    pub gas_used: u64,
}

/// Signs and broadcasts deployment transactions.
#[async_trait]
pub trait Deployer: Send + Sync {
    async fn deploy(&self, request: DeploymentRequest) -> Result<DeployResult, EthersError>;
}
