//! # Identity Store
//!
//! Secp256k1 identities persisted as SEC1 PEM files named `<label>.pem`.
//! The label is normally the principal text written by `create`, but any
//! file stem works (e.g. a copied dfx identity renamed to an alias).
//!
//! Identities are never rewritten after creation.

use std::path::PathBuf;

use candid::Principal;
use ic_agent::identity::Secp256k1Identity;
use ic_agent::Identity;
use ic_ledger_types::{AccountIdentifier, DEFAULT_SUBACCOUNT};
use k256::pkcs8::LineEnding;
use k256::SecretKey;
use tracing::{debug, info};

use crate::infrastructure::{IdentityError, Result, IDENTITY_FILE_EXTENSION};

/// Principal + account id of a freshly generated identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIdentity {
    pub principal: Principal,
    pub account_id: String,
}

/// An identity loaded for signing, with its derived ids
pub struct LoadedIdentity {
    pub identity: Secp256k1Identity,
    pub principal: Principal,
    pub account_id: String,
}

#[derive(Debug, Clone)]
pub struct IdentityStore {
    dir: PathBuf,
}

impl IdentityStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, label: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", label, IDENTITY_FILE_EXTENSION))
    }

    /// Generate a new identity and persist it as `<principal>.pem`
    pub fn create(&self) -> Result<CreatedIdentity> {
        let secret = SecretKey::random(&mut rand::thread_rng());
        let pem = secret
            .to_sec1_pem(LineEnding::LF)
            .map_err(|e| IdentityError::Generation { reason: format!("PEM export failed: {}", e) })?;

        let identity = Secp256k1Identity::from_private_key(secret);
        let principal = identity
            .sender()
            .map_err(|reason| IdentityError::Generation { reason })?;

        let path = self.path_for(&principal.to_text());
        std::fs::write(&path, pem.as_bytes()).map_err(|e| IdentityError::Persistence {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let account_id = derive_account_id(&principal);
        info!("🔑 Created identity {} (account {})", principal, account_id);

        Ok(CreatedIdentity { principal, account_id })
    }

    /// Load the identity stored under `label`
    pub fn load(&self, label: &str) -> Result<LoadedIdentity> {
        let path = self.path_for(label);
        let shown = path.display().to_string();

        if !path.is_file() {
            return Err(IdentityError::NotFound { path: shown }.into());
        }

        let identity = Secp256k1Identity::from_pem_file(&path).map_err(|e| IdentityError::Format {
            path: shown.clone(),
            reason: e.to_string(),
        })?;
        let principal = identity.sender().map_err(|reason| IdentityError::Format {
            path: shown.clone(),
            reason,
        })?;
        let account_id = derive_account_id(&principal);

        debug!("Loaded identity {} from {}", principal, shown);

        Ok(LoadedIdentity { identity, principal, account_id })
    }

    pub fn principal_of(&self, label: &str) -> Result<Principal> {
        Ok(self.load(label)?.principal)
    }

    pub fn account_id_of(&self, label: &str) -> Result<String> {
        Ok(self.load(label)?.account_id)
    }
}

/// Default-subaccount ledger account id, as 64 lowercase hex chars
pub fn derive_account_id(principal: &Principal) -> String {
    AccountIdentifier::new(principal, &DEFAULT_SUBACCOUNT).to_string()
}
