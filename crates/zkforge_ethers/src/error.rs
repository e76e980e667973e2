//! Errors surfaced by the wallet and contract helpers.

use zkforge_artifacts::ArtifactError;
use zkforge_core::ConfigError;

/// Errors that can occur while selecting wallets or preparing deployments.
#[derive(Debug, thiserror::Error)]
pub enum EthersError {
    #[error(transparent)]
    Artifact(#[from] ArtifactError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The selected network does not run the zkSync execution model.
    #[error("Network '{0}' is not a zkSync network; set `zksync: true` in its config")]
    NotZkSyncNetwork(String),

    /// No locally held accounts to build a wallet from.
    #[error("No private keys configured for network '{network}'")]
    NoAccounts { network: String },

    #[error("Account index {index} is out of range, network has {count} accounts")]
    AccountIndexOutOfRange { index: usize, count: usize },

    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Abstract contracts and interfaces have no deployable bytecode.
    #[error(
        "You are trying to create a contract factory for the contract {name}, which is abstract \
         and can't be deployed. If you want to call a contract using {name} as its interface use \
         get_contract_at instead."
    )]
    AbstractContract { name: String },

    #[error("Invalid bytecode: {0}")]
    InvalidBytecode(String),

    #[error("Invalid contract address: {0}")]
    InvalidAddress(String),

    /// A deployment needs a signer but none is attached.
    #[error("No wallet attached to the contract factory")]
    MissingWallet,

    #[error("Salt is required for {0} deployment")]
    MissingSalt(String),

    #[error("Invalid salt: {0}")]
    InvalidSalt(String),

    /// The external deployer rejected or failed to submit the transaction.
    #[error("Deployment failed: {0}")]
    Deployment(String),
}
