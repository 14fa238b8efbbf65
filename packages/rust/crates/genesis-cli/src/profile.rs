//! Deployment profiles: the values patched into the genesis contracts.
//!
//! A [`ParameterProfile`] is chosen once per run from the built-in table for a
//! [`Network`], then layered with settings-file and command-line overrides
//! ([`ProfileOverrides`]). Values are Solidity expressions and are written
//! verbatim (`"7 days"`, `"200 ether"`, `"address(0xdEaD)"`).

use serde::{Deserialize, Serialize};

use crate::chain_id::format_chain_id;

const MAINNET_VALIDATOR_SET_BYTES: &str = "f9016380f9015ff87394ae11fb1f89c83c3ad49636a283732a3692de76f994ae11fb1f89c83c3ad49636a283732a3692de76f994ae11fb1f89c83c3ad49636a283732a3692de76f98207d1b0b990452e4365ee99b1ae0bef9ade1639c45f9560a7e334abad2b802ae3b6ae53d8a613924e3d94716287438e44aef774f8739498803ed812d591b5dcc319652645036b6ca32d1b9498803ed812d591b5dcc319652645036b6ca32d1b9498803ed812d591b5dcc319652645036b6ca32d1b8207d1b084a27e33f9a4d177ece0792106c648c1b91937782b119e06aa274485798f60bac26b1363656ecf8ecdabade91b292326f87394da209d1508a1680be75751d0a9923d74997d90f294da209d1508a1680be75751d0a9923d74997d90f294da209d1508a1680be75751d0a9923d74997d90f28207d1b0ab314870c4485be98da76207e4bcbbff0e45506631966e27f9424105351f8a66c44177e1e9f58038878308eee1a3ce77";

const TESTNET_VALIDATOR_SET_BYTES: &str = "f901a880f901a4f844941284214b9b9c85549ab3d2b972df0deef66ac2c9946ddf42a51534fc98d0c0a3b42c963cace8441ddf946ddf42a51534fc98d0c0a3b42c963cace8441ddf8410000000f84494a2959d3f95eae5dc7d70144ce1b73b403b7eb6e0948081ef03f1d9e0bb4a5bf38f16285c879299f07f948081ef03f1d9e0bb4a5bf38f16285c879299f07f8410000000f8449435552c16704d214347f29fa77f77da6d75d7c75294dc4973e838e3949c77aced16ac2315dc2d7ab11194dc4973e838e3949c77aced16ac2315dc2d7ab1118410000000f84494980a75ecd1309ea12fa2ed87a8744fbfc9b863d594cc6ac05c95a99c1f7b5f88de0e3486c82293b27094cc6ac05c95a99c1f7b5f88de0e3486c82293b2708410000000f84494f474cf03cceff28abc65c9cbae594f725c80e12d94e61a183325a18a173319dd8e19c8d069459e217594e61a183325a18a173319dd8e19c8d069459e21758410000000f84494b71b214cb885500844365e95cd9942c7276e7fd894d22ca3ba2141d23adab65ce4940eb7665ea2b6a794d22ca3ba2141d23adab65ce4940eb7665ea2b6a78410000000";

const MAINNET_ENS_REGISTRY_OWNER: &str = "0x1B272dC2635CFBE67116434CdBfD7525f8F5196F";
const MAINNET_PROTECTOR: &str = "0xC27bD3c844842C0D376bF419087F9E98231D4693";
const TESTNET_PROTECTOR: &str = "0x30151DA466EC8AB345BEF3d6983023E050fb0673";
const DEV_PROTECTOR: &str = "address(0xdEaD)";

/// Deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// L2P mainnet (chain id 12216).
    Mainnet,
    /// L2P testnet (chain id 97).
    Testnet,
    /// Local development chain (chain id 714 unless overridden).
    Dev,
}

impl Network {
    /// Lowercase name used in logs and settings keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Dev => "dev",
        }
    }

    /// Genesis file written by the generator, relative to the work dir.
    #[must_use]
    pub const fn genesis_output(self) -> &'static str {
        match self {
            Self::Mainnet => "./genesis.json",
            Self::Testnet => "./genesis-testnet.json",
            Self::Dev => "./genesis-dev.json",
        }
    }

    /// Built-in profile.
    #[must_use]
    pub fn profile(self) -> ParameterProfile {
        match self {
            Self::Mainnet => ParameterProfile::mainnet(),
            Self::Testnet => ParameterProfile::testnet(),
            Self::Dev => ParameterProfile::dev(),
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every value patched into the contracts for one network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterProfile {
    /// Decimal chain id.
    pub chain_id: u64,
    /// Passed to the genesis generator when set.
    pub ens_registry_owner: Option<String>,
    /// `INIT_BURN_RATIO` of L2PValidatorSet.
    pub init_burn_ratio: String,
    /// RLP-encoded initial validator set, hex without `0x`. `None` for dev
    /// means "ask `scripts/validators.js`".
    pub init_validator_set_bytes: Option<String>,
    /// `BLOCK_INTERVAL` of L2PGovernor.
    pub block_interval: String,
    /// `BREATHE_BLOCK_INTERVAL` of StakeHub.
    pub breathe_block_interval: String,
    /// `maxElectedValidators` of StakeHub.
    pub max_elected_validators: String,
    /// `unbondPeriod` of StakeHub.
    pub unbond_period: String,
    /// `downtimeJailTime` of StakeHub.
    pub downtime_jail_time: String,
    /// `felonyJailTime` of StakeHub.
    pub felony_jail_time: String,
    /// `INIT_FELONY_SLASH_SCOPE` of SlashIndicator.
    pub init_felony_slash_scope: String,
    /// `MISDEMEANOR_THRESHOLD` of SlashIndicator.
    pub misdemeanor_threshold: String,
    /// `FELONY_THRESHOLD` of SlashIndicator.
    pub felony_threshold: String,
    /// `INIT_VOTING_DELAY` of L2PGovernor.
    pub init_voting_delay: String,
    /// `INIT_VOTING_PERIOD` of L2PGovernor.
    pub init_voting_period: String,
    /// `INIT_PROPOSAL_THRESHOLD` of L2PGovernor.
    pub init_proposal_threshold: String,
    /// `INIT_QUORUM_NUMERATOR` of L2PGovernor.
    pub init_quorum_numerator: String,
    /// `PROPOSE_START_GOVL2P_SUPPLY_THRESHOLD` of L2PGovernor.
    pub propose_start_threshold: String,
    /// `INIT_MIN_PERIOD_AFTER_QUORUM` of L2PGovernor.
    pub init_min_period_after_quorum: String,
    /// `INIT_MINIMAL_DELAY` of L2PTimelock.
    pub init_minimal_delay: String,
    /// Protector address of StakeHub.
    pub stake_hub_protector: String,
    /// Protector address of L2PGovernor.
    pub governor_protector: String,
}

impl ParameterProfile {
    /// Mainnet values.
    #[must_use]
    pub fn mainnet() -> Self {
        Self {
            chain_id: 12216,
            ens_registry_owner: Some(MAINNET_ENS_REGISTRY_OWNER.to_string()),
            init_validator_set_bytes: Some(MAINNET_VALIDATOR_SET_BYTES.to_string()),
            stake_hub_protector: MAINNET_PROTECTOR.to_string(),
            governor_protector: MAINNET_PROTECTOR.to_string(),
            ..Self::dev()
        }
    }

    /// Testnet values.
    #[must_use]
    pub fn testnet() -> Self {
        Self {
            chain_id: 97,
            ens_registry_owner: None,
            init_validator_set_bytes: Some(TESTNET_VALIDATOR_SET_BYTES.to_string()),
            max_elected_validators: "9".to_string(),
            felony_jail_time: "5 days".to_string(),
            init_voting_period: "1 days / BLOCK_INTERVAL".to_string(),
            init_proposal_threshold: "100 ether".to_string(),
            init_min_period_after_quorum: "uint64(1 hours / BLOCK_INTERVAL)".to_string(),
            init_minimal_delay: "6 hours".to_string(),
            stake_hub_protector: TESTNET_PROTECTOR.to_string(),
            governor_protector: TESTNET_PROTECTOR.to_string(),
            ..Self::dev()
        }
    }

    /// Development defaults; validator bytes are resolved at run time.
    #[must_use]
    pub fn dev() -> Self {
        Self {
            chain_id: 714,
            ens_registry_owner: None,
            init_burn_ratio: "1000".to_string(),
            init_validator_set_bytes: None,
            block_interval: "3 seconds".to_string(),
            breathe_block_interval: "1 days".to_string(),
            max_elected_validators: "45".to_string(),
            unbond_period: "7 days".to_string(),
            downtime_jail_time: "2 days".to_string(),
            felony_jail_time: "30 days".to_string(),
            init_felony_slash_scope: "28800".to_string(),
            misdemeanor_threshold: "50".to_string(),
            felony_threshold: "150".to_string(),
            init_voting_delay: "0 hours / BLOCK_INTERVAL".to_string(),
            init_voting_period: "7 days / BLOCK_INTERVAL".to_string(),
            init_proposal_threshold: "200 ether".to_string(),
            init_quorum_numerator: "10".to_string(),
            propose_start_threshold: "10_000_000 ether".to_string(),
            init_min_period_after_quorum: "uint64(1 days / BLOCK_INTERVAL)".to_string(),
            init_minimal_delay: "24 hours".to_string(),
            stake_hub_protector: DEV_PROTECTOR.to_string(),
            governor_protector: DEV_PROTECTOR.to_string(),
        }
    }

    /// Chain id as written into `System.sol` (without `0x`).
    #[must_use]
    pub fn hex_chain_id(&self) -> String {
        format_chain_id(self.chain_id)
    }

    /// Copy of `self` with every field set in `overrides` replaced.
    #[must_use]
    pub fn with_overrides(self, overrides: ProfileOverrides) -> Self {
        Self {
            chain_id: overrides.chain_id.unwrap_or(self.chain_id),
            ens_registry_owner: overrides.ens_registry_owner.or(self.ens_registry_owner),
            init_burn_ratio: overrides.init_burn_ratio.unwrap_or(self.init_burn_ratio),
            init_validator_set_bytes: overrides
                .init_validator_set_bytes
                .map(|bytes| strip_hex_prefix(&bytes).to_string())
                .or(self.init_validator_set_bytes),
            block_interval: overrides.block_interval.unwrap_or(self.block_interval),
            breathe_block_interval: overrides
                .breathe_block_interval
                .unwrap_or(self.breathe_block_interval),
            max_elected_validators: overrides
                .max_elected_validators
                .unwrap_or(self.max_elected_validators),
            unbond_period: overrides.unbond_period.unwrap_or(self.unbond_period),
            downtime_jail_time: overrides
                .downtime_jail_time
                .unwrap_or(self.downtime_jail_time),
            felony_jail_time: overrides.felony_jail_time.unwrap_or(self.felony_jail_time),
            init_felony_slash_scope: overrides
                .init_felony_slash_scope
                .unwrap_or(self.init_felony_slash_scope),
            misdemeanor_threshold: overrides
                .misdemeanor_threshold
                .unwrap_or(self.misdemeanor_threshold),
            felony_threshold: overrides.felony_threshold.unwrap_or(self.felony_threshold),
            init_voting_delay: overrides.init_voting_delay.unwrap_or(self.init_voting_delay),
            init_voting_period: overrides
                .init_voting_period
                .unwrap_or(self.init_voting_period),
            init_proposal_threshold: overrides
                .init_proposal_threshold
                .unwrap_or(self.init_proposal_threshold),
            init_quorum_numerator: overrides
                .init_quorum_numerator
                .unwrap_or(self.init_quorum_numerator),
            propose_start_threshold: overrides
                .propose_start_threshold
                .unwrap_or(self.propose_start_threshold),
            init_min_period_after_quorum: overrides
                .init_min_period_after_quorum
                .unwrap_or(self.init_min_period_after_quorum),
            init_minimal_delay: overrides
                .init_minimal_delay
                .unwrap_or(self.init_minimal_delay),
            stake_hub_protector: overrides
                .stake_hub_protector
                .unwrap_or(self.stake_hub_protector),
            governor_protector: overrides
                .governor_protector
                .unwrap_or(self.governor_protector),
        }
    }
}

/// Optional per-field overrides, from `genesis.yaml` or command-line flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, clap::Args)]
#[serde(default, deny_unknown_fields)]
pub struct ProfileOverrides {
    /// Chain id (decimal).
    #[arg(long, alias = "dev-chain-id")]
    pub chain_id: Option<u64>,
    /// ENS registry owner passed to the genesis generator.
    #[arg(long)]
    pub ens_registry_owner: Option<String>,
    /// Init burn ratio of L2PValidatorSet.
    #[arg(long)]
    pub init_burn_ratio: Option<String>,
    /// Initial validator set bytes (hex, `0x` optional).
    #[arg(long)]
    pub init_validator_set_bytes: Option<String>,
    /// Block interval of Parlia.
    #[arg(long)]
    pub block_interval: Option<String>,
    /// Breathe block interval of Parlia.
    #[arg(long)]
    pub breathe_block_interval: Option<String>,
    /// maxElectedValidators of StakeHub.
    #[arg(long)]
    pub max_elected_validators: Option<String>,
    /// unbondPeriod of StakeHub.
    #[arg(long)]
    pub unbond_period: Option<String>,
    /// downtimeJailTime of StakeHub.
    #[arg(long)]
    pub downtime_jail_time: Option<String>,
    /// felonyJailTime of StakeHub.
    #[arg(long)]
    pub felony_jail_time: Option<String>,
    /// INIT_FELONY_SLASH_SCOPE of SlashIndicator.
    #[arg(long)]
    pub init_felony_slash_scope: Option<String>,
    /// MISDEMEANOR_THRESHOLD of SlashIndicator.
    #[arg(long)]
    pub misdemeanor_threshold: Option<String>,
    /// FELONY_THRESHOLD of SlashIndicator.
    #[arg(long)]
    pub felony_threshold: Option<String>,
    /// INIT_VOTING_DELAY of L2PGovernor.
    #[arg(long)]
    pub init_voting_delay: Option<String>,
    /// INIT_VOTING_PERIOD of L2PGovernor.
    #[arg(long)]
    pub init_voting_period: Option<String>,
    /// INIT_PROPOSAL_THRESHOLD of L2PGovernor.
    #[arg(long)]
    pub init_proposal_threshold: Option<String>,
    /// INIT_QUORUM_NUMERATOR of L2PGovernor.
    #[arg(long)]
    pub init_quorum_numerator: Option<String>,
    /// PROPOSE_START_GOVL2P_SUPPLY_THRESHOLD of L2PGovernor.
    #[arg(long)]
    pub propose_start_threshold: Option<String>,
    /// INIT_MIN_PERIOD_AFTER_QUORUM of L2PGovernor.
    #[arg(long)]
    pub init_min_period_after_quorum: Option<String>,
    /// INIT_MINIMAL_DELAY of L2PTimelock.
    #[arg(long)]
    pub init_minimal_delay: Option<String>,
    /// assetProtector of StakeHub.
    #[arg(long)]
    pub stake_hub_protector: Option<String>,
    /// governorProtector of L2PGovernor.
    #[arg(long)]
    pub governor_protector: Option<String>,
}

impl ProfileOverrides {
    /// Field-wise merge; values set in `overlay` win.
    #[must_use]
    pub fn merge(self, overlay: Self) -> Self {
        Self {
            chain_id: overlay.chain_id.or(self.chain_id),
            ens_registry_owner: overlay.ens_registry_owner.or(self.ens_registry_owner),
            init_burn_ratio: overlay.init_burn_ratio.or(self.init_burn_ratio),
            init_validator_set_bytes: overlay
                .init_validator_set_bytes
                .or(self.init_validator_set_bytes),
            block_interval: overlay.block_interval.or(self.block_interval),
            breathe_block_interval: overlay
                .breathe_block_interval
                .or(self.breathe_block_interval),
            max_elected_validators: overlay
                .max_elected_validators
                .or(self.max_elected_validators),
            unbond_period: overlay.unbond_period.or(self.unbond_period),
            downtime_jail_time: overlay.downtime_jail_time.or(self.downtime_jail_time),
            felony_jail_time: overlay.felony_jail_time.or(self.felony_jail_time),
            init_felony_slash_scope: overlay
                .init_felony_slash_scope
                .or(self.init_felony_slash_scope),
            misdemeanor_threshold: overlay.misdemeanor_threshold.or(self.misdemeanor_threshold),
            felony_threshold: overlay.felony_threshold.or(self.felony_threshold),
            init_voting_delay: overlay.init_voting_delay.or(self.init_voting_delay),
            init_voting_period: overlay.init_voting_period.or(self.init_voting_period),
            init_proposal_threshold: overlay
                .init_proposal_threshold
                .or(self.init_proposal_threshold),
            init_quorum_numerator: overlay.init_quorum_numerator.or(self.init_quorum_numerator),
            propose_start_threshold: overlay
                .propose_start_threshold
                .or(self.propose_start_threshold),
            init_min_period_after_quorum: overlay
                .init_min_period_after_quorum
                .or(self.init_min_period_after_quorum),
            init_minimal_delay: overlay.init_minimal_delay.or(self.init_minimal_delay),
            stake_hub_protector: overlay.stake_hub_protector.or(self.stake_hub_protector),
            governor_protector: overlay.governor_protector.or(self.governor_protector),
        }
    }
}

/// Drop a leading `0x` / `0X`.
#[must_use]
pub fn strip_hex_prefix(raw: &str) -> &str {
    raw.strip_prefix("0x")
        .or_else(|| raw.strip_prefix("0X"))
        .unwrap_or(raw)
}
