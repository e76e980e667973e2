//! Wallet, contract-factory and deployment helpers for zkSync projects.
//!
//! [`ZkEthers`] is the entry point: it binds a project config and an
//! artifact loader to one network and hands out wallets, factories and
//! contract handles. Signing and broadcasting stay behind the [`Deployer`]
//! trait, which the embedding SDK implements.

pub mod bytecode;
pub mod contract;
pub mod deployer;
pub mod environment;
pub mod error;
pub mod factory;
pub mod wallet;

pub use bytecode::{hash_bytecode, normalize_bytecode};
pub use contract::{Contract, ContractInterface};
pub use deployer::{DeployResult, Deployer, DeploymentRequest, Overrides};
pub use environment::ZkEthers;
pub use error::EthersError;
pub use factory::{ContractFactory, ContractSource, DeploymentType};
pub use wallet::{NetworkBinding, PrivateKey, Wallet, WalletSelector, get_wallet, get_wallets};
