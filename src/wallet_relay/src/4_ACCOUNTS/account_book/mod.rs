//! # Account Book
//!
//! Flat text table of generated wallets:
//!
//! ```text
//! num, principalID, accountID, balance
//! 1, <principal>, <account id>, 0.000000
//! ```
//!
//! Rows are appended at generation time and only their balance field is
//! rewritten afterwards. Every write replaces the whole file, so two
//! processes must not work on the same book at once.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use rust_decimal::Decimal;
use tracing::{info, warn};

use super::balance::BalanceOracle;
use super::identity::IdentityStore;
use crate::_3_CALL_RELAY::transport::CanisterTransport;
use crate::infrastructure::{BookError, OracleError, Result, ACCOUNT_BOOK_HEADER};

#[derive(Debug, Clone, PartialEq)]
pub struct AccountRecord {
    pub num: u64,
    pub principal: String,
    pub account_id: String,
    pub balance: Decimal,
}

impl AccountRecord {
    pub fn to_line(&self) -> String {
        format!("{}, {}, {}, {:.6}", self.num, self.principal, self.account_id, self.balance)
    }

    /// Parse one data line; fields are trimmed
    pub fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        if parts.len() < 4 {
            return None;
        }
        Some(Self {
            num: parts[0].parse().ok()?,
            principal: parts[1].to_string(),
            account_id: parts[2].to_string(),
            balance: Decimal::from_str(parts[3]).ok()?,
        })
    }
}

/// What a refresh pass did
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    /// Rows whose query failed; their balance was written as zero
    pub failed: Vec<(String, OracleError)>,
    /// Malformed rows left untouched
    pub skipped: usize,
}

#[derive(Debug, Clone)]
pub struct AccountBook {
    path: PathBuf,
}

impl AccountBook {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create `count` identities and write a fresh book for them
    ///
    /// An existing book is only replaced when `overwrite` is set; its rows
    /// are gone afterwards even though their `.pem` files stay.
    /// A failed generation is logged and skipped; its sequence number is not
    /// reused. New keys hold nothing, so balances start at zero.
    pub fn generate_batch(&self, store: &IdentityStore, count: usize, overwrite: bool) -> Result<Vec<AccountRecord>> {
        if self.path.exists() {
            if !overwrite {
                return Err(BookError::Exists { path: self.path.display().to_string() }.into());
            }
            warn!("⚠️ Replacing account book {}, its rows will be dropped", self.path.display());
        }

        let mut records = Vec::with_capacity(count);

        for num in 1..=count as u64 {
            match store.create() {
                Ok(created) => records.push(AccountRecord {
                    num,
                    principal: created.principal.to_text(),
                    account_id: created.account_id,
                    balance: Decimal::ZERO,
                }),
                Err(e) => warn!("⚠️ Wallet #{} generation failed, skipping: {}", num, e),
            }
        }

        let mut lines = vec![ACCOUNT_BOOK_HEADER.to_string()];
        lines.extend(records.iter().map(AccountRecord::to_line));
        self.write_lines(&lines)?;

        info!("✅ Generated {} wallets into {}", records.len(), self.path.display());
        Ok(records)
    }

    /// All well-formed records, in file order
    pub fn records(&self) -> Result<Vec<AccountRecord>> {
        let lines = self.read_lines()?;
        Ok(lines
            .iter()
            .skip(1)
            .filter_map(|line| {
                let record = AccountRecord::parse(line);
                if record.is_none() && !line.trim().is_empty() {
                    warn!("⚠️ Invalid line format: {}", line);
                }
                record
            })
            .collect())
    }

    /// Re-query every row's balance and rewrite the file
    ///
    /// A failed query writes `0.000000` for that row, as older books expect,
    /// and is listed in the summary so the failure stays visible.
    pub async fn refresh_balances<T: CanisterTransport>(
        &self,
        oracle: &BalanceOracle<'_, T>,
    ) -> Result<RefreshSummary> {
        let mut lines = self.read_lines()?;
        let mut summary = RefreshSummary::default();

        for line in lines.iter_mut().skip(1) {
            if line.trim().is_empty() {
                continue;
            }

            let mut parts: Vec<String> = line.split(',').map(|p| p.trim().to_string()).collect();
            if parts.len() < 4 {
                warn!("⚠️ Invalid line format: {}", line);
                summary.skipped += 1;
                continue;
            }

            let balance = match oracle.query_balance(&parts[2]).await {
                Ok(balance) => {
                    summary.refreshed += 1;
                    balance
                }
                Err(e) => {
                    warn!("⚠️ Balance of {} unavailable, writing zero: {}", parts[2], e);
                    summary.failed.push((parts[2].clone(), e));
                    Decimal::ZERO
                }
            };

            parts[3] = format!("{:.6}", balance);
            *line = parts.join(", ");
        }

        self.write_lines(&lines)?;

        info!(
            "✅ Balances updated: {} refreshed, {} failed, {} skipped",
            summary.refreshed,
            summary.failed.len(),
            summary.skipped
        );
        Ok(summary)
    }

    fn read_lines(&self) -> Result<Vec<String>> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| BookError::Read {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(content.lines().map(str::to_string).collect())
    }

    fn write_lines(&self, lines: &[String]) -> Result<()> {
        let mut content = lines.join("\n");
        content.push('\n');
        std::fs::write(&self.path, content).map_err(|e| BookError::Write {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(())
    }
}
