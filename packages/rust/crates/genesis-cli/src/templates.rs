//! Helper-script generation from Jinja templates.
//!
//! `init_holders.js` and `validators.js` are rendered from templates kept in
//! `scripts/`; all paths are relative to the work dir.

use std::path::{Path, PathBuf};

use genesis_io::{read_text_safe, write_text};
use minijinja::{Environment, UndefinedBehavior, context};
use serde::Serialize;

use crate::error::{GenesisError, Result};

/// Default init holders template.
pub const DEFAULT_INIT_HOLDERS_TEMPLATE: &str = "./scripts/init_holders.template";
/// Default init holders output.
pub const DEFAULT_INIT_HOLDERS_OUTPUT: &str = "./scripts/init_holders.js";
/// Default validators config.
pub const DEFAULT_VALIDATORS_CONF: &str = "./validators.conf";
/// Default validators template.
pub const DEFAULT_VALIDATORS_TEMPLATE: &str = "./scripts/validators.template";
/// Default validators output.
pub const DEFAULT_VALIDATORS_OUTPUT: &str = "./scripts/validators.js";

const VALIDATOR_FIELDS: usize = 5;
const MAX_INPUT_SIZE: u64 = 1024 * 1024;

/// One line of `validators.conf`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatorInfo {
    /// Consensus address.
    pub consensus_addr: String,
    /// Fee address.
    pub fee_addr: String,
    /// L2P fee address.
    pub l2p_fee_addr: String,
    /// Voting power.
    pub voting_power: String,
    /// BLS public key.
    #[serde(rename = "bLSPublicKey")]
    pub bls_public_key: String,
}

/// Parse `validators.conf`: one validator per line, five comma-separated
/// fields. Blank lines are skipped.
///
/// # Errors
/// `InvalidValidator` for a line with the wrong number of fields.
pub fn parse_validators(content: &str) -> Result<Vec<ValidatorInfo>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let fields: Vec<&str> = line.trim().split(',').map(str::trim).collect();
            match fields.as_slice() {
                [consensus, fee, l2p_fee, power, bls] => Ok(ValidatorInfo {
                    consensus_addr: (*consensus).to_string(),
                    fee_addr: (*fee).to_string(),
                    l2p_fee_addr: (*l2p_fee).to_string(),
                    voting_power: (*power).to_string(),
                    bls_public_key: (*bls).to_string(),
                }),
                _ => Err(GenesisError::InvalidValidator {
                    line: index + 1,
                    content: format!(
                        "{} (expected {VALIDATOR_FIELDS} fields, got {})",
                        line.trim(),
                        fields.len()
                    ),
                }),
            }
        })
        .collect()
}

/// Split a comma-separated address list, dropping empty entries.
#[must_use]
pub fn parse_init_holders(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|holder| !holder.is_empty())
        .map(str::to_string)
        .collect()
}

/// Renders templates relative to a work dir.
#[derive(Debug)]
pub struct TemplateRenderer {
    work_dir: PathBuf,
    env: Environment<'static>,
}

impl TemplateRenderer {
    /// Renderer with strict undefined-variable handling.
    pub fn new<P: Into<PathBuf>>(work_dir: P) -> Self {
        let mut env = Environment::new();
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        Self {
            work_dir: work_dir.into(),
            env,
        }
    }

    /// Render `template_file` with `data` and write `output_file`.
    ///
    /// # Errors
    /// Template read, render, or output write failures.
    pub fn render_to_file<S: Serialize>(
        &self,
        template_file: &Path,
        data: S,
        output_file: &Path,
    ) -> Result<PathBuf> {
        let template_path = self.work_dir.join(template_file);
        let template = read_text_safe(&template_path, MAX_INPUT_SIZE)?;
        let rendered = self.env.render_str(&template, data)?;

        let output_path = self.work_dir.join(output_file);
        write_text(&output_path, &rendered)?;
        tracing::info!(
            template = %template_path.display(),
            output = %output_path.display(),
            "template rendered"
        );
        Ok(output_path)
    }

    /// Render the init holders script.
    ///
    /// # Errors
    /// See [`TemplateRenderer::render_to_file`].
    pub fn generate_init_holders(
        &self,
        init_holders: &str,
        template_file: &Path,
        output_file: &Path,
    ) -> Result<PathBuf> {
        let holders = parse_init_holders(init_holders);
        self.render_to_file(
            template_file,
            context! { initHolders => holders },
            output_file,
        )
    }

    /// Render the validators script from a validators config file.
    ///
    /// # Errors
    /// `InvalidValidator` for malformed config lines, plus
    /// [`TemplateRenderer::render_to_file`] failures.
    pub fn generate_validators(
        &self,
        file_path: &Path,
        template_file: &Path,
        output_file: &Path,
    ) -> Result<PathBuf> {
        let conf = read_text_safe(self.work_dir.join(file_path), MAX_INPUT_SIZE)?;
        let validators = parse_validators(&conf)?;
        tracing::debug!(count = validators.len(), "parsed validators");
        self.render_to_file(
            template_file,
            context! { validators => validators },
            output_file,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_validators() {
        let conf = "0xA,0xB,0xC,0x0000000010000000,0xbls\n\n0xD, 0xE, 0xF, 1, 0xbls2\n";
        let validators = parse_validators(conf).expect("Should parse");

        assert_eq!(validators.len(), 2);
        assert_eq!(validators[1].fee_addr, "0xE");
        assert_eq!(validators[1].bls_public_key, "0xbls2");
    }

    #[test]
    fn test_parse_validators_wrong_field_count() {
        let err = parse_validators("0xA,0xB,0xC,1,0xbls\n0xA,0xB\n").expect_err("Should fail");
        assert!(matches!(err, GenesisError::InvalidValidator { line: 2, .. }));
    }

    #[test]
    fn test_validator_field_names() {
        let validators = parse_validators("a,b,c,d,e").expect("Should parse");
        let json = serde_json::to_value(&validators[0]).expect("Should serialize");
        assert_eq!(json["consensusAddr"], "a");
        assert_eq!(json["l2pFeeAddr"], "c");
        assert_eq!(json["votingPower"], "d");
        assert_eq!(json["bLSPublicKey"], "e");
    }

    #[test]
    fn test_parse_init_holders() {
        assert_eq!(
            parse_init_holders("0x1, 0x2,,0x3"),
            vec!["0x1".to_string(), "0x2".to_string(), "0x3".to_string()]
        );
        assert!(parse_init_holders("").is_empty());
    }
}
