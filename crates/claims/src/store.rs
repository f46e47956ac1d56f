use std::collections::HashMap;
use std::sync::RwLock;

use thiserror::Error;
use tracing::debug;

use crate::{ApplicationId, Claim, ClaimId, Omission, Verification};

#[derive(Debug, Error)]
pub enum ClaimsError {
    #[error("claim not found: {0}")]
    NotFound(ClaimId),

    #[error("claim {0} has already been verified")]
    AlreadyVerified(ClaimId),

    #[error("claim {claim} belongs to {actual}, not {expected}")]
    WrongApplication {
        claim: ClaimId,
        expected: ApplicationId,
        actual: ApplicationId,
    },

    #[error("store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ClaimsError>;

/// Source of claims and omissions for one application.
pub trait ClaimStore: Send + Sync {
    fn get_claims(&self, application_id: &str) -> Result<Vec<Claim>>;
    fn get_omissions(&self, application_id: &str) -> Result<Vec<Omission>>;
}

#[derive(Default)]
struct Inner {
    claims: HashMap<ApplicationId, Vec<Claim>>,
    omissions: HashMap<ApplicationId, Vec<Omission>>,
}

/// Process-local claim store.
#[derive(Default)]
pub struct InMemoryClaimStore {
    inner: RwLock<Inner>,
}

impl InMemoryClaimStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the extracted claims of one application.
    pub fn put_claims(&self, application_id: &str, claims: Vec<Claim>) -> Result<()> {
        if let Some(c) = claims.iter().find(|c| c.application_id != application_id) {
            return Err(ClaimsError::WrongApplication {
                claim: c.id.clone(),
                expected: application_id.to_string(),
                actual: c.application_id.clone(),
            });
        }

        let mut inner = self.write()?;
        debug!(application_id, count = claims.len(), "claims stored");
        inner.claims.insert(application_id.to_string(), claims);
        Ok(())
    }

    pub fn put_omissions(&self, application_id: &str, omissions: Vec<Omission>) -> Result<()> {
        let mut inner = self.write()?;
        inner.omissions.insert(application_id.to_string(), omissions);
        Ok(())
    }

    /// Writes the verifier's verdict. A claim accepts exactly one verdict.
    pub fn record_verification(
        &self,
        application_id: &str,
        claim_id: &str,
        verification: Verification,
    ) -> Result<Claim> {
        let mut inner = self.write()?;
        let claim = inner
            .claims
            .get_mut(application_id)
            .and_then(|claims| claims.iter_mut().find(|c| c.id == claim_id))
            .ok_or_else(|| ClaimsError::NotFound(claim_id.to_string()))?;

        if claim.is_verified() {
            return Err(ClaimsError::AlreadyVerified(claim.id.clone()));
        }

        claim.status = verification.status;
        claim.benchmark_flag = verification.benchmark_flag;
        claim.verified = true;
        debug!(application_id, claim_id, status = ?claim.status, "claim verified");

        Ok(claim.clone())
    }

    fn write(&self) -> Result<std::sync::RwLockWriteGuard<'_, Inner>> {
        self.inner
            .write()
            .map_err(|e| ClaimsError::Store(e.to_string()))
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Inner>> {
        self.inner
            .read()
            .map_err(|e| ClaimsError::Store(e.to_string()))
    }
}

impl ClaimStore for InMemoryClaimStore {
    fn get_claims(&self, application_id: &str) -> Result<Vec<Claim>> {
        Ok(self
            .read()?
            .claims
            .get(application_id)
            .cloned()
            .unwrap_or_default())
    }

    fn get_omissions(&self, application_id: &str) -> Result<Vec<Omission>> {
        Ok(self
            .read()?
            .omissions
            .get(application_id)
            .cloned()
            .unwrap_or_default())
    }
}
