use std::path::Path;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::json;
use zkforge_artifacts::{ArtifactError, ZkArtifact};
use zkforge_core::ZkForgeConfig;
use zkforge_ethers::{
    ContractSource, DeployResult, Deployer, DeploymentRequest, DeploymentType, EthersError,
    Overrides, WalletSelector, ZkEthers,
};

const KEY_A: &str = "0x7726827caac94a7f9e1b160f7ea819f172f7b6f9d2a97f992c38edeab82d4110";
const KEY_B: &str = "0xac1e735be8536c6534bb4f17f06f6afc73b2b5ba84ac2cfb12f7461b20c0bbe3";
const DEPLOYED_AT: &str = "0x111bb0b1e0d1b71e2a7b4bda4e4a2fb7cbf2f1c0";

/// Records every request instead of broadcasting it.
#[derive(Default)]
struct RecordingDeployer {
    requests: Mutex<Vec<DeploymentRequest>>,
}

#[async_trait]
impl Deployer for RecordingDeployer {
    async fn deploy(&self, request: DeploymentRequest) -> Result<DeployResult, EthersError> {
        self.requests.lock().push(request);
        Ok(DeployResult {
            tx_hash: "0xfeed".into(),
            contract_address: DEPLOYED_AT.into(),
            gas_used: 42,
        })
    }
}

struct FailingDeployer;

#[async_trait]
impl Deployer for FailingDeployer {
    async fn deploy(&self, _request: DeploymentRequest) -> Result<DeployResult, EthersError> {
        Err(EthersError::Deployment("insufficient funds".into()))
    }
}

fn word(byte: &str) -> String {
    format!("0x{}", byte.repeat(32))
}

fn write_artifact(root: &Path, artifact: &ZkArtifact) {
    let dir = root.join(&artifact.source_name);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(
        dir.join(format!("{}.json", artifact.contract_name)),
        serde_json::to_string_pretty(artifact).unwrap(),
    )
    .unwrap();
}

/// A project directory with a config file and a small build:
/// Factory -> {Pair, Router}, Pair -> Lp, Router -> Lp.
fn project() -> (tempfile::TempDir, ZkEthers<zkforge_artifacts::FsArtifactStore>) {
    let tmp = tempfile::tempdir().unwrap();
    let config_path = tmp.path().join("zkforge.config.json");
    std::fs::write(
        &config_path,
        json!({
            "defaultNetwork": "local",
            "networks": {
                "local": {
                    "url": "http://127.0.0.1:8011",
                    "zksync": true,
                    "chainId": 260,
                    "accounts": [KEY_A, KEY_B]
                }
            }
        })
        .to_string(),
    )
    .unwrap();

    let artifacts = tmp.path().join("artifacts-zk");
    let abi = vec![json!({ "type": "function", "name": "createPair", "inputs": [] })];
    for artifact in [
        ZkArtifact::new("contracts/Factory.sol", "Factory", word("0f"))
            .with_abi(abi)
            .with_factory_dep("0x0100aa", "contracts/Pair.sol:Pair")
            .with_factory_dep("0x0100bb", "contracts/Router.sol:Router"),
        ZkArtifact::new("contracts/Pair.sol", "Pair", word("0a"))
            .with_factory_dep("0x0100cc", "contracts/Lp.sol:Lp"),
        ZkArtifact::new("contracts/Router.sol", "Router", word("0b"))
            .with_factory_dep("0x0100cc", "contracts/Lp.sol:Lp"),
        ZkArtifact::new("contracts/Lp.sol", "Lp", word("0c")),
        ZkArtifact::new("contracts/IPair.sol", "IPair", "0x"),
        ZkArtifact::new("contracts/Broken.sol", "Broken", word("0d"))
            .with_factory_dep("0x0100dd", "contracts/Gone.sol:Gone"),
        ZkArtifact::new("contracts/Evm.sol", "Evm", word("0e")).with_format("hh-sol-artifact-1"),
    ] {
        write_artifact(&artifacts, &artifact);
    }

    let config = ZkForgeConfig::load_from_file(&config_path).unwrap();
    let env = ZkEthers::from_config(config, None).unwrap();
    (tmp, env)
}

#[tokio::test]
async fn deploy_contract_sends_resolved_and_additional_deps() {
    let (_tmp, env) = project();
    let deployer = RecordingDeployer::default();

    let contract = env
        .deploy_contract(
            &deployer,
            "Factory",
            vec![json!(1)],
            None,
            Overrides::default(),
            vec![word("aa")],
        )
        .await
        .unwrap();

    assert_eq!(contract.address, DEPLOYED_AT);
    assert_eq!(contract.function_names(), ["createPair"]);
    assert_eq!(contract.deployment.as_ref().unwrap().tx_hash, "0xfeed");

    let requests = deployer.requests.lock();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert_eq!(request.bytecode, word("0f"));
    assert_eq!(
        request.factory_deps,
        [word("0a"), word("0c"), word("0b"), word("aa")]
    );
    assert_eq!(request.constructor_args, [json!(1)]);
    assert_eq!(request.wallet.private_key.to_hex(), KEY_A);
    assert_eq!(request.factory_dep_hashes().unwrap().len(), 4);
    assert_eq!(&request.bytecode_hash().unwrap()[..4], &[1, 0, 0, 1]);
}

#[tokio::test]
async fn deploy_contract_uses_explicit_wallet() {
    let (_tmp, env) = project();
    let deployer = RecordingDeployer::default();
    let wallet = env.get_wallet(&WalletSelector::Index(1)).unwrap();

    env.deploy_contract(
        &deployer,
        "contracts/Lp.sol:Lp",
        vec![],
        Some(wallet),
        Overrides::default(),
        vec![],
    )
    .await
    .unwrap();

    let requests = deployer.requests.lock();
    assert_eq!(requests[0].wallet.private_key.to_hex(), KEY_B);
    assert!(requests[0].factory_deps.is_empty());
}

#[tokio::test]
async fn abstract_contract_is_never_submitted() {
    let (_tmp, env) = project();
    let deployer = RecordingDeployer::default();

    let err = env
        .deploy_contract(&deployer, "IPair", vec![], None, Overrides::default(), vec![])
        .await
        .unwrap_err();

    assert!(matches!(err, EthersError::AbstractContract { ref name } if name == "IPair"));
    assert!(deployer.requests.lock().is_empty());
}

#[tokio::test]
async fn missing_dependency_aborts_before_submission() {
    let (_tmp, env) = project();
    let deployer = RecordingDeployer::default();

    let err = env
        .deploy_contract(&deployer, "Broken", vec![], None, Overrides::default(), vec![])
        .await
        .unwrap_err();

    match err {
        EthersError::Artifact(ArtifactError::NotFound { name }) => {
            assert_eq!(name, "contracts/Gone.sol:Gone")
        }
        other => panic!("expected NotFound, got {other:?}"),
    }
    assert!(deployer.requests.lock().is_empty());
}

#[tokio::test]
async fn foreign_compiler_artifact_is_rejected() {
    let (_tmp, env) = project();
    let err = env.load_artifact("Evm").await.unwrap_err();
    assert!(matches!(
        err,
        EthersError::Artifact(ArtifactError::NotCompiledByExpectedToolchain { .. })
    ));
}

#[tokio::test]
async fn deployer_failures_propagate() {
    let (_tmp, env) = project();
    let err = env
        .deploy_contract(&FailingDeployer, "Lp", vec![], None, Overrides::default(), vec![])
        .await
        .unwrap_err();
    assert!(err.to_string().contains("insufficient funds"));
}

#[tokio::test]
async fn create2_factory_from_raw_abi() {
    let (_tmp, env) = project();
    let deployer = RecordingDeployer::default();

    let factory = env
        .get_contract_factory(
            ContractSource::Abi {
                abi: vec![],
                bytecode: word("0c"),
            },
            None,
            DeploymentType::Create2,
        )
        .await
        .unwrap();

    assert!(matches!(
        factory.deploy(&deployer, vec![], Overrides::default(), vec![]).await,
        Err(EthersError::MissingSalt(_))
    ));

    let overrides = Overrides {
        salt: Some(word("01")),
        ..Default::default()
    };
    factory.deploy(&deployer, vec![], overrides, vec![]).await.unwrap();

    let requests = deployer.requests.lock();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].deployment_type, DeploymentType::Create2);
    assert_eq!(requests[0].overrides.salt.as_deref(), Some(word("01").as_str()));
}

#[tokio::test]
async fn wallets_follow_config() {
    let (_tmp, env) = project();
    let keys: Vec<String> = env
        .get_wallets()
        .unwrap()
        .iter()
        .map(|w| w.private_key.to_hex())
        .collect();
    assert_eq!(keys, [KEY_A, KEY_B]);
    assert_eq!(env.network().url, "http://127.0.0.1:8011");
}
