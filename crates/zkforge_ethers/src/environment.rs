use tracing::{debug, info};
use zkforge_artifacts::{ArtifactLoader, FsArtifactStore, ZkArtifact, extract_factory_deps};
use zkforge_core::ZkForgeConfig;

use crate::contract::{Contract, ContractInterface};
use crate::deployer::{Deployer, Overrides};
use crate::error::EthersError;
use crate::factory::{ContractFactory, ContractSource, DeploymentType};
use crate::wallet::{self, NetworkBinding, Wallet, WalletSelector};

/// Project-bound helpers for one zkSync network.
pub struct ZkEthers<L> {
    config: ZkForgeConfig,
    network: NetworkBinding,
    loader: L,
}

impl ZkEthers<FsArtifactStore> {
    /// Read artifacts from the project's `paths.artifacts` directory.
    pub fn from_config(
        config: ZkForgeConfig,
        network_name: Option<&str>,
    ) -> Result<Self, EthersError> {
        let store = FsArtifactStore::new(config.paths.artifacts_dir());
        Self::new(config, network_name, store)
    }
}

impl<L: ArtifactLoader> ZkEthers<L> {
    /// Bind to `network_name`, or the config's default network.
    pub fn new(
        config: ZkForgeConfig,
        network_name: Option<&str>,
        loader: L,
    ) -> Result<Self, EthersError> {
        let name = network_name.unwrap_or(&config.default_network).to_string();
        let network = NetworkBinding::from_config(&name, config.network(&name)?)?;
        info!(network = %name, url = %network.url, "zkSync network selected");
        Ok(Self {
            config,
            network,
            loader,
        })
    }

    pub fn network(&self) -> &NetworkBinding {
        &self.network
    }

    pub fn config(&self) -> &ZkForgeConfig {
        &self.config
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn get_wallet(&self, selector: &WalletSelector) -> Result<Wallet, EthersError> {
        let network = self.config.network(&self.network.name)?;
        wallet::get_wallet(&self.network.name, network, selector)
    }

    pub fn get_wallets(&self) -> Result<Vec<Wallet>, EthersError> {
        let network = self.config.network(&self.network.name)?;
        wallet::get_wallets(&self.network.name, network)
    }

    /// Load an artifact, rejecting ones not built by zksolc or zkvyper.
    pub async fn load_artifact(&self, name: &str) -> Result<ZkArtifact, EthersError> {
        Ok(self.loader.load_artifact(name).await?)
    }

    /// Bytecode of every contract `artifact` may deploy, transitively.
    pub async fn extract_factory_deps(
        &self,
        artifact: &ZkArtifact,
    ) -> Result<Vec<String>, EthersError> {
        Ok(extract_factory_deps(&self.loader, artifact).await?)
    }

    /// A factory for `source`. Without an explicit wallet the default account
    /// is used.
    pub async fn get_contract_factory(
        &self,
        source: ContractSource,
        wallet: Option<Wallet>,
        deployment_type: DeploymentType,
    ) -> Result<ContractFactory, EthersError> {
        let wallet = self.wallet_or_default(wallet)?;
        match source {
            ContractSource::Artifact(name) => {
                let artifact = self.load_artifact(&name).await?;
                ContractFactory::from_artifact(&artifact, Some(wallet), deployment_type)
            }
            ContractSource::Abi { abi, bytecode } => {
                ContractFactory::new(abi, &bytecode, Some(wallet), deployment_type)
            }
        }
    }

    pub fn get_contract_factory_from_artifact(
        &self,
        artifact: &ZkArtifact,
        wallet: Option<Wallet>,
        deployment_type: DeploymentType,
    ) -> Result<ContractFactory, EthersError> {
        let wallet = self.wallet_or_default(wallet)?;
        ContractFactory::from_artifact(artifact, Some(wallet), deployment_type)
    }

    /// A handle to an already deployed contract. Abstract artifacts are fine
    /// here. Without a wallet the default account is attached when one is
    /// configured; otherwise the handle is read-only.
    pub async fn get_contract_at(
        &self,
        interface: ContractInterface,
        address: &str,
        wallet: Option<Wallet>,
    ) -> Result<Contract, EthersError> {
        let abi = match interface {
            ContractInterface::Artifact(name) => self.load_artifact(&name).await?.abi,
            ContractInterface::Abi(abi) => abi,
        };
        let wallet = match wallet {
            Some(wallet) => Some(wallet),
            None => match self.get_wallet(&WalletSelector::Default) {
                Ok(wallet) => Some(wallet),
                Err(EthersError::NoAccounts { .. }) => None,
                Err(e) => return Err(e),
            },
        };
        Contract::new(address, abi, wallet)
    }

    /// Load `name`, resolve its factory dependencies and deploy it.
    ///
    /// `additional_factory_deps` are appended after the resolved ones, in the
    /// order given.
    pub async fn deploy_contract<D>(
        &self,
        deployer: &D,
        name: &str,
        constructor_args: Vec<serde_json::Value>,
        wallet: Option<Wallet>,
        overrides: Overrides,
        additional_factory_deps: Vec<String>,
    ) -> Result<Contract, EthersError>
    where
        D: Deployer + ?Sized,
    {
        let artifact = self.load_artifact(name).await?;
        if artifact.is_abstract() {
            return Err(EthersError::AbstractContract {
                name: artifact.contract_name.clone(),
            });
        }

        let mut factory_deps = self.extract_factory_deps(&artifact).await?;
        factory_deps.extend(additional_factory_deps);
        debug!(
            contract = %artifact.identity(),
            factory_deps = factory_deps.len(),
            "deploying contract"
        );

        let factory =
            self.get_contract_factory_from_artifact(&artifact, wallet, DeploymentType::Create)?;
        factory
            .deploy(deployer, constructor_args, overrides, factory_deps)
            .await
    }

    fn wallet_or_default(&self, wallet: Option<Wallet>) -> Result<Wallet, EthersError> {
        match wallet {
            Some(wallet) => Ok(wallet),
            None => self.get_wallet(&WalletSelector::Default),
        }
    }
}
