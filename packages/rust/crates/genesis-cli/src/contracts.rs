//! Per-contract patch routines.
//!
//! [`PATCH_SEQUENCE`] runs in a fixed order. Each routine backs up its file
//! (a failed backup only warns), stages every edit for the file in memory and
//! commits once. There is no rollback across files: when routine N fails,
//! routines before it stay applied and the rest never run.

use std::path::PathBuf;

use genesis_edit::{EditConfig, FilePatch, StagedFile, literal_replacement};
use genesis_io::BackupStore;
use serde::Serialize;

use crate::error::{GenesisError, Result};
use crate::profile::{Network, ParameterProfile};

/// Contracts patched by a run, in the order they are patched.
pub const PATCH_SEQUENCE: [Contract; 8] = [
    Contract::System,
    Contract::SystemReward,
    Contract::GovHub,
    Contract::SlashIndicator,
    Contract::ValidatorSet,
    Contract::StakeHub,
    Contract::Governor,
    Contract::Timelock,
];

const PROTECTOR_PATTERN: &str = r"__Protectable_init_unchained\(.*\);";
const VALIDATOR_LOOP_PATTERN: &str =
    r"for \(uint256 i; i < validatorSetPkg\.validatorSet\.length; \+\+i\)";
const VALIDATOR_PUSH_PATTERN: &str = r"currentValidatorSet\.push\(validatorSetPkg.validatorSet\[i\]\);";

/// A genesis system contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Contract {
    /// `System.sol`: chain id.
    System,
    /// `SystemReward.sol`: extra operators (dev only).
    SystemReward,
    /// `GovHub.sol`: backed up, never edited.
    GovHub,
    /// `SlashIndicator.sol`: slashing thresholds.
    SlashIndicator,
    /// `L2PValidatorSet.sol`: burn ratio and initial validators.
    ValidatorSet,
    /// `StakeHub.sol`: staking periods and protector.
    StakeHub,
    /// `L2PGovernor.sol`: governance parameters and protector.
    Governor,
    /// `L2PTimelock.sol`: minimal delay.
    Timelock,
}

impl Contract {
    /// Source file stem inside the contracts directory.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::System => "System",
            Self::SystemReward => "SystemReward",
            Self::GovHub => "GovHub",
            Self::SlashIndicator => "SlashIndicator",
            Self::ValidatorSet => "L2PValidatorSet",
            Self::StakeHub => "StakeHub",
            Self::Governor => "L2PGovernor",
            Self::Timelock => "L2PTimelock",
        }
    }

    /// Whether this contract takes part in a run for `network`.
    #[must_use]
    pub fn applies_to(self, network: Network) -> bool {
        !matches!(self, Self::SystemReward) || network == Network::Dev
    }
}

impl std::fmt::Display for Contract {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Everything a patch routine needs, passed explicitly.
#[derive(Debug)]
pub struct PatchContext<'a> {
    /// Target environment.
    pub network: Network,
    /// Values to patch in.
    pub profile: &'a ParameterProfile,
    /// Directory holding the sources and their backups.
    pub backups: &'a BackupStore,
    /// Size limit and dry-run switch.
    pub edit: EditConfig,
}

impl PatchContext<'_> {
    /// Source path of `contract`.
    #[must_use]
    pub fn source_path(&self, contract: Contract) -> PathBuf {
        self.backups
            .dir()
            .join(contract.name())
            .with_extension(self.backups.source_extension())
    }

    fn is_dev(&self) -> bool {
        self.network == Network::Dev
    }
}

/// Outcome of one patch routine.
#[derive(Debug, Clone, Serialize)]
pub struct ContractPatch {
    /// Patched contract.
    pub contract: Contract,
    /// Backup written before editing (`None` on dry run or backup failure).
    pub backup: Option<PathBuf>,
    /// Committed edits.
    #[serde(flatten)]
    pub patch: FilePatch,
}

/// Run one routine. Returns `None` when `contract` does not apply to the
/// context's network.
///
/// # Errors
/// `AnchorNotFound` when an expected statement is missing (the file is left
/// as it was), read/write failures, and `ValidatorSet` when no validator set
/// bytes are available.
pub fn patch_contract(
    contract: Contract,
    ctx: &PatchContext<'_>,
) -> Result<Option<ContractPatch>> {
    if !contract.applies_to(ctx.network) {
        tracing::debug!(contract = %contract, network = %ctx.network, "skipped");
        return Ok(None);
    }

    let path = ctx.source_path(contract);
    let backup = if ctx.edit.dry_run {
        None
    } else {
        ctx.backups.backup_or_warn(&path)
    };

    let mut file = StagedFile::open(&path, ctx.edit)?;
    match contract {
        Contract::System => stage_system(&mut file, ctx)?,
        Contract::SystemReward => stage_system_reward(&mut file)?,
        Contract::GovHub => {}
        Contract::SlashIndicator => stage_slash_indicator(&mut file, ctx)?,
        Contract::ValidatorSet => stage_validator_set(&mut file, ctx)?,
        Contract::StakeHub => stage_stake_hub(&mut file, ctx)?,
        Contract::Governor => stage_governor(&mut file, ctx)?,
        Contract::Timelock => stage_timelock(&mut file, ctx)?,
    }
    let patch = file.commit()?;

    tracing::info!(
        contract = %contract,
        edits = patch.count,
        written = patch.written,
        "contract patched"
    );
    Ok(Some(ContractPatch {
        contract,
        backup,
        patch,
    }))
}

fn stage_system(file: &mut StagedFile, ctx: &PatchContext<'_>) -> Result<()> {
    let hex_chain_id = ctx.profile.hex_chain_id();
    file.replace_parameter("uint16 public constant l2pChainID", &format!("0x{hex_chain_id}"))?;
    Ok(())
}

fn stage_system_reward(file: &mut StagedFile) -> Result<()> {
    file.insert("numOperator = 2;", "\t\toperators[VALIDATOR_CONTRACT_ADDR] = true;")?
        .insert("numOperator = 2;", "\t\toperators[SLASH_CONTRACT_ADDR] = true;")?
        .replace("numOperator = 2;", "numOperator = 4;", 1)?;
    Ok(())
}

fn stage_slash_indicator(file: &mut StagedFile, ctx: &PatchContext<'_>) -> Result<()> {
    let p = ctx.profile;
    file.replace_parameter(
        "uint256 public constant MISDEMEANOR_THRESHOLD",
        &p.misdemeanor_threshold,
    )?
    .replace_parameter("uint256 public constant FELONY_THRESHOLD", &p.felony_threshold)?
    .replace_parameter(
        "uint256 public constant INIT_FELONY_SLASH_SCOPE",
        &p.init_felony_slash_scope,
    )?;

    if ctx.is_dev() {
        file.insert("alreadyInit = true;", "\t\tenableMaliciousVoteSlash = true;")?;
    }
    Ok(())
}

fn stage_validator_set(file: &mut StagedFile, ctx: &PatchContext<'_>) -> Result<()> {
    let p = ctx.profile;
    let bytes = p.init_validator_set_bytes.as_deref().ok_or_else(|| {
        GenesisError::ValidatorSet(format!("no validator set bytes for {}", ctx.network))
    })?;

    file.replace_parameter("uint256 public constant INIT_BURN_RATIO", &p.init_burn_ratio)?
        .replace_parameter(
            "bytes public constant INIT_VALIDATORSET_BYTES",
            &format!("hex\"{bytes}\""),
        )?;

    if ctx.is_dev() {
        file.insert(VALIDATOR_LOOP_PATTERN, "\t\tValidatorExtra memory validatorExtra;")?
            .insert(
                VALIDATOR_PUSH_PATTERN,
                "\t\t\tvalidatorExtraSet.push(validatorExtra);",
            )?
            .insert(
                VALIDATOR_PUSH_PATTERN,
                "\t\t\tvalidatorExtraSet[i].voteAddress=validatorSetPkg.voteAddrs[i];",
            )?;
    }
    Ok(())
}

fn stage_stake_hub(file: &mut StagedFile, ctx: &PatchContext<'_>) -> Result<()> {
    let p = ctx.profile;
    file.replace_parameter(
        "uint256 public constant BREATHE_BLOCK_INTERVAL",
        &p.breathe_block_interval,
    )?;
    for (field, value) in [
        ("maxElectedValidators", &p.max_elected_validators),
        ("unbondPeriod", &p.unbond_period),
        ("downtimeJailTime", &p.downtime_jail_time),
        ("felonyJailTime", &p.felony_jail_time),
    ] {
        replace_assignment(file, field, value)?;
    }
    replace_protector(file, &p.stake_hub_protector)
}

fn stage_governor(file: &mut StagedFile, ctx: &PatchContext<'_>) -> Result<()> {
    let p = ctx.profile;
    for (name, value) in [
        ("uint256 private constant BLOCK_INTERVAL", &p.block_interval),
        ("uint256 private constant INIT_VOTING_DELAY", &p.init_voting_delay),
        ("uint256 private constant INIT_VOTING_PERIOD", &p.init_voting_period),
        (
            "uint256 private constant INIT_PROPOSAL_THRESHOLD",
            &p.init_proposal_threshold,
        ),
        (
            "uint256 private constant INIT_QUORUM_NUMERATOR",
            &p.init_quorum_numerator,
        ),
        (
            "uint256 private constant PROPOSE_START_GOVL2P_SUPPLY_THRESHOLD",
            &p.propose_start_threshold,
        ),
        (
            "uint64 private constant INIT_MIN_PERIOD_AFTER_QUORUM",
            &p.init_min_period_after_quorum,
        ),
    ] {
        file.replace_parameter(name, value)?;
    }
    replace_protector(file, &p.governor_protector)
}

fn stage_timelock(file: &mut StagedFile, ctx: &PatchContext<'_>) -> Result<()> {
    file.replace_parameter(
        "uint256 private constant INIT_MINIMAL_DELAY",
        &ctx.profile.init_minimal_delay,
    )?;
    Ok(())
}

/// `field = <anything>;` on one line becomes `field = value;`.
fn replace_assignment(file: &mut StagedFile, field: &str, value: &str) -> Result<()> {
    file.replace(
        &format!("{field} = .*;"),
        &literal_replacement(&format!("{field} = {value};")),
        1,
    )?;
    Ok(())
}

fn replace_protector(file: &mut StagedFile, protector: &str) -> Result<()> {
    file.replace(
        PROTECTOR_PATTERN,
        &literal_replacement(&format!("__Protectable_init_unchained({protector});")),
        1,
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const STAKE_HUB: &str = "\
contract StakeHub {
    uint256 public constant BREATHE_BLOCK_INTERVAL = 1 days;

    function initialize() external initializer {
        maxElectedValidators = 29;
        unbondPeriod = 7 days;
        downtimeJailTime = 2 days;
        felonyJailTime = 30 days;
        __Protectable_init_unchained(0x08E68Ec70FA3b629784fDB28887e206ce8561E08);
    }
}
";

    fn context<'a>(profile: &'a ParameterProfile, backups: &'a BackupStore) -> PatchContext<'a> {
        PatchContext {
            network: Network::Dev,
            profile,
            backups,
            edit: EditConfig::default(),
        }
    }

    #[test]
    fn test_sequence_order() {
        let names: Vec<&str> = PATCH_SEQUENCE.iter().map(|c| c.name()).collect();
        assert_eq!(
            names,
            [
                "System",
                "SystemReward",
                "GovHub",
                "SlashIndicator",
                "L2PValidatorSet",
                "StakeHub",
                "L2PGovernor",
                "L2PTimelock"
            ]
        );
    }

    #[test]
    fn test_system_reward_is_dev_only() {
        assert!(Contract::SystemReward.applies_to(Network::Dev));
        assert!(!Contract::SystemReward.applies_to(Network::Mainnet));
        assert!(!Contract::SystemReward.applies_to(Network::Testnet));
        assert!(Contract::GovHub.applies_to(Network::Mainnet));
    }

    #[test]
    fn test_stake_hub_assignments() {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("StakeHub.sol");
        fs::write(&path, STAKE_HUB).expect("Should write");

        let profile = ParameterProfile::testnet();
        let backups = BackupStore::new(dir.path());
        let patch = patch_contract(Contract::StakeHub, &context(&profile, &backups))
            .expect("Should patch")
            .expect("Should apply");

        assert_eq!(patch.patch.count, 6);
        assert_eq!(patch.backup, Some(dir.path().join("StakeHub.bak")));
        let content = fs::read_to_string(&path).expect("Should read");
        assert!(content.contains("maxElectedValidators = 9;"));
        assert!(content.contains("felonyJailTime = 5 days;"));
        assert!(content.contains(
            "__Protectable_init_unchained(0x30151DA466EC8AB345BEF3d6983023E050fb0673);"
        ));
        assert_eq!(
            fs::read_to_string(dir.path().join("StakeHub.bak")).expect("Should read backup"),
            STAKE_HUB
        );
    }

    #[test]
    fn test_gov_hub_backup_only() {
        let dir = TempDir::new().expect("Should create temp dir");
        fs::write(dir.path().join("GovHub.sol"), "contract GovHub {}\n").expect("Should write");

        let profile = ParameterProfile::dev();
        let backups = BackupStore::new(dir.path());
        let patch = patch_contract(Contract::GovHub, &context(&profile, &backups))
            .expect("Should patch")
            .expect("Should apply");

        assert_eq!(patch.patch.count, 0);
        assert!(!patch.patch.written);
        assert!(dir.path().join("GovHub.bak").exists());
    }

    #[test]
    fn test_missing_validator_bytes() {
        let dir = TempDir::new().expect("Should create temp dir");
        fs::write(
            dir.path().join("L2PValidatorSet.sol"),
            "uint256 public constant INIT_BURN_RATIO = 0;\n",
        )
        .expect("Should write");

        let profile = ParameterProfile::dev();
        let backups = BackupStore::new(dir.path());
        let err = patch_contract(Contract::ValidatorSet, &context(&profile, &backups))
            .expect_err("Should fail");
        assert!(matches!(err, GenesisError::ValidatorSet(_)));
    }

    #[test]
    fn test_dry_run_skips_backup() {
        let dir = TempDir::new().expect("Should create temp dir");
        let path = dir.path().join("StakeHub.sol");
        fs::write(&path, STAKE_HUB).expect("Should write");

        let profile = ParameterProfile::mainnet();
        let backups = BackupStore::new(dir.path());
        let mut ctx = context(&profile, &backups);
        ctx.edit.dry_run = true;

        let patch = patch_contract(Contract::StakeHub, &ctx)
            .expect("Should patch")
            .expect("Should apply");
        assert!(patch.backup.is_none());
        assert!(!patch.patch.written);
        assert!(patch.patch.diff.contains("+        maxElectedValidators = 45;"));
        assert_eq!(fs::read_to_string(&path).expect("Should read"), STAKE_HUB);
        assert!(!dir.path().join("StakeHub.bak").exists());
    }
}
