// Run configuration: everything the pipeline needs, resolved once from the
// command line and the environment before any network activity.

use crate::api::DEFAULT_ENDPOINT;
use crate::cli::Cli;
use crate::error::{FoldError, Result};
use crate::viewer::{OutputMode, ViewerSpec};
use std::fmt;
use std::path::PathBuf;
use tracing::debug;

/// Environment variable holding the NGC API key.
pub const CREDENTIAL_VAR: &str = "NGC_API_KEY";

/// Optional endpoint override.
pub const ENDPOINT_VAR: &str = "ESMFOLD_URL";

pub const DEFAULT_OUTPUT: &str = "protein.html";

/// Sequence folded when none is given on the command line.
pub const DEFAULT_SEQUENCE: &str = "MDILCEENTSLSSTTNSLMQLNDDTRLYSNDFNSGEANTSDAFNWTVDSENRTNLSCEGCLSPSCLSLLHLQEKNWSALLTAVVIILTIAGNILVIMAVSLEKKLQNATNYFLMSLAIADMLLGFLVMPVSMLTILYGYRWPLPSKLCAVWIYLDVLFSTASIMHLCAISLDRYVAIQNPIHHSRFNSRTKAFLKIIAVWTISVGISMPIPVFGLQDDSKVFKEGSCLLADDNFVLIGSFVSFFIPLTIMVITYFLTIKSLQKEATLCVSDLGTRAKLASFSFLPQSSLSSEKLFQRSIHREPGSYTGRRTMQSISNEQKACKVLGIVFFLFVVMWCPFFITNIMAVICKESCNEDVIGALLNVFVWIGYLSSAVNPLVYTLFNKTYRSAFSRYIQCQYKENKKPLQLILVNTIPALAYKSSQLQMGQKKNSKQDAKTTDNDCSMVALGKQHSEEASKDNSDGVNEKVSCV";

/// One-letter residue codes accepted in a sequence, including the
/// ambiguity codes B, Z and X and the rare U and O.
const RESIDUE_CODES: &str = "ACDEFGHIKLMNPQRSTVWYBZXUO";

/// Bearer token for the prediction service. Never empty; `Debug` output
/// is redacted.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(raw: impl Into<String>) -> Option<Self> {
        let raw = raw.into();
        if raw.trim().is_empty() {
            None
        } else {
            Some(Credential(raw))
        }
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(****)")
    }
}

/// Reject empty sequences and anything outside the one-letter residue codes.
pub fn validate_sequence(sequence: &str) -> Result<()> {
    if sequence.is_empty() {
        return Err(FoldError::InvalidSequence("sequence is empty".into()));
    }
    if let Some((pos, c)) = sequence
        .char_indices()
        .find(|(_, c)| !RESIDUE_CODES.contains(*c))
    {
        return Err(FoldError::InvalidSequence(format!(
            "unexpected character {c:?} at position {pos}"
        )));
    }
    Ok(())
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub credential: Credential,
    pub endpoint: String,
    pub sequence: String,
    pub output: OutputMode,
    pub viewer: ViewerSpec,
}

impl Settings {
    /// Resolve settings from the command line and the process environment.
    pub fn from_env(cli: &Cli) -> Result<Self> {
        Self::resolve(cli, |key| std::env::var(key).ok())
    }

    /// Resolve settings with an explicit environment lookup. The credential
    /// is checked first so a missing key fails before anything else.
    pub fn resolve<F>(cli: &Cli, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let Some(credential) = lookup(CREDENTIAL_VAR).and_then(Credential::new) else {
            return Err(FoldError::MissingCredential {
                var: CREDENTIAL_VAR,
            });
        };

        let endpoint = cli
            .url
            .clone()
            .or_else(|| lookup(ENDPOINT_VAR).filter(|u| !u.trim().is_empty()))
            .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

        let sequence = cli
            .sequence
            .clone()
            .unwrap_or_else(|| DEFAULT_SEQUENCE.to_string());
        validate_sequence(&sequence)?;

        let output = if cli.display {
            OutputMode::Display
        } else {
            OutputMode::Export(
                cli.output
                    .clone()
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            )
        };

        let viewer = ViewerSpec {
            width: cli.width,
            height: cli.height,
            ..ViewerSpec::default()
        };

        let settings = Settings {
            credential,
            endpoint,
            sequence,
            output,
            viewer,
        };
        debug!(
            endpoint = %settings.endpoint,
            residues = settings.sequence.len(),
            output = ?settings.output,
            "resolved settings"
        );
        Ok(settings)
    }
}
