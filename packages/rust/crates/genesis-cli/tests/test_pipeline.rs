//! End-to-end patch runs against a fixture contracts directory.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use genesis_io::{IoError, WorkspaceLock};
use l2p_genesis::{
    GenesisError, GenesisRunner, GenesisSettings, Network, ProfileOverrides, RunOptions,
    ToolchainSettings,
};
use tempfile::TempDir;

const CONTRACTS: [(&str, &str); 8] = [
    (
        "System.sol",
        "contract System {\n    uint16 public constant l2pChainID = 0x0038;\n}\n",
    ),
    (
        "SystemReward.sol",
        "contract SystemReward {\n    function init() external {\n        operators[LIGHT_CLIENT_ADDR] = true;\n        numOperator = 2;\n    }\n}\n",
    ),
    ("GovHub.sol", "contract GovHub {}\n"),
    (
        "SlashIndicator.sol",
        "contract SlashIndicator {\n    uint256 public constant MISDEMEANOR_THRESHOLD = 50;\n    uint256 public constant FELONY_THRESHOLD = 150;\n    uint256 public constant INIT_FELONY_SLASH_SCOPE = 28800;\n\n    function init() external {\n        alreadyInit = true;\n    }\n}\n",
    ),
    (
        "L2PValidatorSet.sol",
        "contract L2PValidatorSet {\n    uint256 public constant INIT_BURN_RATIO = 0;\n    bytes public constant INIT_VALIDATORSET_BYTES = hex\"00\";\n\n    function init() external {\n        for (uint256 i; i < validatorSetPkg.validatorSet.length; ++i) {\n            currentValidatorSet.push(validatorSetPkg.validatorSet[i]);\n        }\n    }\n}\n",
    ),
    (
        "StakeHub.sol",
        "contract StakeHub {\n    uint256 public constant BREATHE_BLOCK_INTERVAL = 1 days;\n\n    function initialize() external initializer {\n        maxElectedValidators = 29;\n        unbondPeriod = 7 days;\n        downtimeJailTime = 2 days;\n        felonyJailTime = 30 days;\n        __Protectable_init_unchained(0x08E68Ec70FA3b629784fDB28887e206ce8561E08);\n    }\n}\n",
    ),
    (
        "L2PGovernor.sol",
        "contract L2PGovernor {\n    uint256 private constant BLOCK_INTERVAL = 3 seconds;\n    uint256 private constant INIT_VOTING_DELAY = 0 hours / BLOCK_INTERVAL;\n    uint256 private constant INIT_VOTING_PERIOD = 7 days / BLOCK_INTERVAL;\n    uint256 private constant INIT_PROPOSAL_THRESHOLD = 200 ether;\n    uint256 private constant INIT_QUORUM_NUMERATOR = 10;\n    uint256 private constant PROPOSE_START_GOVL2P_SUPPLY_THRESHOLD = 10_000_000 ether;\n    uint64 private constant INIT_MIN_PERIOD_AFTER_QUORUM = uint64(1 days / BLOCK_INTERVAL);\n\n    function initialize() external initializer {\n        __Protectable_init_unchained(0x08E68Ec70FA3b629784fDB28887e206ce8561E08);\n    }\n}\n",
    ),
    (
        "L2PTimelock.sol",
        "contract L2PTimelock {\n    uint256 private constant INIT_MINIMAL_DELAY = 24 hours;\n}\n",
    ),
];

fn setup() -> TempDir {
    let dir = TempDir::new().expect("Should create temp dir");
    let contracts = dir.path().join("contracts");
    fs::create_dir(&contracts).expect("Should create contracts dir");
    for (name, content) in CONTRACTS {
        fs::write(contracts.join(name), content).expect("Should write contract");
    }
    dir
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join("contracts").join(name)).expect("Should read contract")
}

fn snapshot(dir: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fs::read_dir(dir.join("contracts"))
        .expect("Should list contracts")
        .map(|entry| {
            let path = entry.expect("Should read entry").path();
            let bytes = fs::read(&path).expect("Should read file");
            (path, bytes)
        })
        .collect()
}

fn dev_options() -> RunOptions {
    RunOptions {
        overrides: ProfileOverrides {
            init_validator_set_bytes: Some("0xf90001".to_string()),
            ..ProfileOverrides::default()
        },
        skip_genesis: true,
        ..RunOptions::new(Network::Dev)
    }
}

#[test]
fn test_dev_run_patches_every_contract() {
    let dir = setup();
    let runner = GenesisRunner::new(dir.path(), GenesisSettings::default());

    let report = runner.run(&dev_options()).expect("Should run");

    assert_eq!(report.contracts.len(), 8);
    assert_eq!(report.hex_chain_id, "02ca");
    assert_eq!(report.total_edits(), 28);
    assert!(report.genesis.is_none());

    assert!(read(dir.path(), "System.sol").contains("l2pChainID = 0x02ca;"));

    let reward = read(dir.path(), "SystemReward.sol");
    assert!(reward.contains(
        "\t\toperators[VALIDATOR_CONTRACT_ADDR] = true;\n\t\toperators[SLASH_CONTRACT_ADDR] = true;\n        numOperator = 4;\n"
    ));

    let slash = read(dir.path(), "SlashIndicator.sol");
    assert!(slash.contains("\t\tenableMaliciousVoteSlash = true;\n        alreadyInit = true;"));

    let validators = read(dir.path(), "L2PValidatorSet.sol");
    assert!(validators.contains("INIT_VALIDATORSET_BYTES = hex\"f90001\";"));
    assert!(validators.contains("INIT_BURN_RATIO = 1000;"));
    assert!(validators.contains(
        "\t\t\tvalidatorExtraSet.push(validatorExtra);\n\t\t\tvalidatorExtraSet[i].voteAddress=validatorSetPkg.voteAddrs[i];\n            currentValidatorSet.push"
    ));

    let stake_hub = read(dir.path(), "StakeHub.sol");
    assert!(stake_hub.contains("maxElectedValidators = 45;"));
    assert!(stake_hub.contains("__Protectable_init_unchained(address(0xdEaD));"));

    let governor = read(dir.path(), "L2PGovernor.sol");
    assert!(governor.contains("__Protectable_init_unchained(address(0xdEaD));"));
    assert!(governor.contains("INIT_MIN_PERIOD_AFTER_QUORUM = uint64(1 days / BLOCK_INTERVAL);"));

    assert!(dir.path().join("contracts/GovHub.bak").exists());
    assert!(WorkspaceLock::acquire(dir.path()).is_ok());
}

#[test]
fn test_mainnet_skips_system_reward() {
    let dir = setup();
    let runner = GenesisRunner::new(dir.path(), GenesisSettings::default());
    let options = RunOptions {
        skip_genesis: true,
        ..RunOptions::new(Network::Mainnet)
    };

    let report = runner.run(&options).expect("Should run");

    assert_eq!(report.contracts.len(), 7);
    assert_eq!(report.chain_id, 12216);
    assert!(read(dir.path(), "System.sol").contains("l2pChainID = 0x2fb8;"));
    assert!(read(dir.path(), "StakeHub.sol").contains(
        "__Protectable_init_unchained(0xC27bD3c844842C0D376bF419087F9E98231D4693);"
    ));
    assert_eq!(read(dir.path(), "SystemReward.sol"), CONTRACTS[1].1);
    assert!(!dir.path().join("contracts/SystemReward.bak").exists());
    assert!(!read(dir.path(), "SlashIndicator.sol").contains("enableMaliciousVoteSlash"));
}

#[test]
fn test_recover_restores_pristine_sources() {
    let dir = setup();
    let before = snapshot(dir.path());
    let runner = GenesisRunner::new(dir.path(), GenesisSettings::default());

    runner.run(&dev_options()).expect("Should run");
    assert_ne!(snapshot(dir.path()), before);

    let report = runner.recover().expect("Should recover");
    assert_eq!(report.restored.len(), 8);
    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn test_missing_anchor_stops_run() {
    let dir = setup();
    let stake_hub = "contract StakeHub {\n    uint256 public constant BREATHE_BLOCK_INTERVAL = 1 days;\n}\n";
    fs::write(dir.path().join("contracts/StakeHub.sol"), stake_hub).expect("Should write");
    let runner = GenesisRunner::new(dir.path(), GenesisSettings::default());

    let err = runner.run(&dev_options()).expect_err("Should fail");

    assert!(err.is_anchor_not_found());
    assert!(err.to_string().contains("StakeHub.sol"));
    // Earlier routines stay applied, the failing file is untouched, later ones never ran.
    assert!(read(dir.path(), "L2PValidatorSet.sol").contains("hex\"f90001\""));
    assert_eq!(read(dir.path(), "StakeHub.sol"), stake_hub);
    assert_eq!(read(dir.path(), "L2PTimelock.sol"), CONTRACTS[7].1);
    assert!(!dir.path().join("contracts/L2PTimelock.bak").exists());
    assert!(WorkspaceLock::acquire(dir.path()).is_ok());
}

#[test]
fn test_settings_and_flags_layer_over_profile() {
    let dir = setup();
    let settings = GenesisSettings {
        testnet: ProfileOverrides {
            chain_id: Some(5611),
            felony_threshold: Some("300".to_string()),
            ..ProfileOverrides::default()
        },
        ..GenesisSettings::default()
    };
    let runner = GenesisRunner::new(dir.path(), settings);
    let options = RunOptions {
        overrides: ProfileOverrides {
            felony_threshold: Some("500".to_string()),
            ..ProfileOverrides::default()
        },
        skip_genesis: true,
        ..RunOptions::new(Network::Testnet)
    };

    let report = runner.run(&options).expect("Should run");

    assert_eq!(report.hex_chain_id, "15eb");
    let slash = read(dir.path(), "SlashIndicator.sol");
    assert!(slash.contains("FELONY_THRESHOLD = 500;"));
    assert!(slash.contains("MISDEMEANOR_THRESHOLD = 50;"));
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = setup();
    let before = snapshot(dir.path());
    let runner = GenesisRunner::new(dir.path(), GenesisSettings::default());
    let options = RunOptions {
        dry_run: true,
        skip_genesis: false,
        ..dev_options()
    };

    let report = runner.run(&options).expect("Should run");

    assert!(report.dry_run);
    assert!(report.genesis.is_none());
    assert!(report.contracts.iter().all(|c| !c.patch.written && c.backup.is_none()));
    assert!(
        report.contracts[0]
            .patch
            .diff
            .contains("+    uint16 public constant l2pChainID = 0x02ca;")
    );
    assert_eq!(snapshot(dir.path()), before);
}

#[test]
fn test_concurrent_run_is_rejected() {
    let dir = setup();
    let runner = GenesisRunner::new(dir.path(), GenesisSettings::default());
    let _held = WorkspaceLock::acquire(dir.path()).expect("Should lock");

    let err = runner.run(&dev_options()).expect_err("Should fail");
    assert!(matches!(err, GenesisError::Io(IoError::Locked(_))));
    assert!(matches!(
        runner.recover(),
        Err(GenesisError::Io(IoError::Locked(_)))
    ));
    assert_eq!(read(dir.path(), "System.sol"), CONTRACTS[0].1);
}

#[cfg(unix)]
#[test]
fn test_toolchain_runs_after_patching() {
    let dir = setup();
    let settings = GenesisSettings {
        toolchain: ToolchainSettings {
            forge: Some("true".to_string()),
            node: Some("true".to_string()),
            ..ToolchainSettings::default()
        },
        ..GenesisSettings::default()
    };
    let runner = GenesisRunner::new(dir.path(), settings);
    let options = RunOptions {
        skip_genesis: false,
        ..dev_options()
    };

    let report = runner.run(&options).expect("Should run");
    assert_eq!(report.genesis, Some(dir.path().join("./genesis-dev.json")));
}

#[cfg(unix)]
#[test]
fn test_failed_build_is_fatal() {
    let dir = setup();
    let settings = GenesisSettings {
        toolchain: ToolchainSettings {
            forge: Some("false".to_string()),
            ..ToolchainSettings::default()
        },
        ..GenesisSettings::default()
    };
    let runner = GenesisRunner::new(dir.path(), settings);
    let options = RunOptions {
        skip_genesis: false,
        ..dev_options()
    };

    let err = runner.run(&options).expect_err("Should fail");
    assert!(matches!(err, GenesisError::Subprocess { .. }));
    // Patches stay on disk for inspection or recovery.
    assert!(read(dir.path(), "System.sol").contains("0x02ca"));
}
