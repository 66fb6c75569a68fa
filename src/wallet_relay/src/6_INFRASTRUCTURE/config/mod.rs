//! Runtime configuration
//!
//! Canister ids are injected from here instead of being baked into the
//! orchestrators. A JSON file provides overrides; every field has a default
//! except the wallet canister, which is only required for relayed calls.

use std::path::{Path, PathBuf};
use std::time::Duration;

use candid::Principal;
use serde::{Deserialize, Serialize};

use crate::infrastructure::constants::*;
use crate::infrastructure::errors::{CallerError, ConfigError, Result, ValidationError};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RelayConfig {
    /// Replica or boundary node URL
    pub network_url: String,
    /// Cycles wallet that pays for relayed calls (`dfx identity get-wallet`)
    pub wallet_canister: Option<String>,
    pub ledger_canister: String,
    pub kongswap_canister: String,
    pub cycle_budget: u64,
    pub call_timeout_secs: u64,
    pub deadline_window_nanos: u64,
    /// Directory holding `<principal>.pem` files
    pub identity_dir: PathBuf,
    pub account_book: PathBuf,
    /// Log the caller's ICP balance before and after each operation
    pub log_balances: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            network_url: DEFAULT_NETWORK_URL.to_string(),
            wallet_canister: None,
            ledger_canister: ICP_LEDGER_ID.to_string(),
            kongswap_canister: KONGSWAP_BACKEND_ID.to_string(),
            cycle_budget: DEFAULT_CYCLE_BUDGET,
            call_timeout_secs: CALL_TIMEOUT_SECS,
            deadline_window_nanos: DEADLINE_WINDOW_NANOS,
            identity_dir: PathBuf::from("."),
            account_book: PathBuf::from(DEFAULT_ACCOUNT_BOOK),
            log_balances: true,
        }
    }
}

impl RelayConfig {
    /// Load from a JSON file; missing fields fall back to defaults
    pub fn load(path: &Path) -> Result<Self> {
        let display = path.display().to_string();
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: display.clone(),
            reason: e.to_string(),
        })?;
        let config: RelayConfig = serde_json::from_str(&raw).map_err(|e| ConfigError::Parse {
            path: display,
            reason: e.to_string(),
        })?;
        Ok(config)
    }

    pub fn wallet_principal(&self) -> Result<Principal> {
        let text = self.wallet_canister.as_deref().ok_or_else(|| ConfigError::Missing {
            name: "wallet_canister".to_string(),
        })?;
        parse_principal(text)
    }

    pub fn ledger_principal(&self) -> Result<Principal> {
        parse_principal(&self.ledger_canister)
    }

    pub fn kongswap_principal(&self) -> Result<Principal> {
        parse_principal(&self.kongswap_canister)
    }

    pub fn call_timeout(&self) -> Duration {
        Duration::from_secs(self.call_timeout_secs)
    }
}

/// Parse principal text, mapping failures into the validation taxonomy
pub fn parse_principal(text: &str) -> Result<Principal> {
    Principal::from_text(text.trim()).map_err(|e| {
        CallerError::Validation(ValidationError::InvalidPrincipal {
            principal: text.to_string(),
            reason: e.to_string(),
        })
    })
}
