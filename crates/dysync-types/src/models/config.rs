//! Run configuration models.
//!
//! A [`SyncConfig`] is assembled once from CLI flags and environment defaults,
//! then checked by [`SyncConfig::plan`] into the immutable [`SyncPlan`] the
//! engine runs. Mode selection, including the copy-only forcing rule for
//! filtered runs, happens in that step and nowhere else.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use validator::Validate;

use crate::error::ConfigError;

/// Worker count used when the available parallelism cannot be determined.
pub const FALLBACK_CONCURRENCY: usize = 4;

// ============================================================================
// Credentials
// ============================================================================

/// Credentials and endpoint for one side of the sync.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct AccountCredentials {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    /// Role to assume with the credentials above
    pub role_arn: Option<String>,
    /// Endpoint override (local emulators)
    pub endpoint_url: Option<String>,
}

impl AccountCredentials {
    /// Static key pair, if both halves are present and non-empty.
    pub fn static_keys(&self) -> Option<(&str, &str)> {
        match (self.access_key_id.as_deref(), self.secret_access_key.as_deref()) {
            (Some(key), Some(secret)) if !key.is_empty() && !secret.is_empty() => {
                Some((key, secret))
            },
            _ => None,
        }
    }

    fn role(&self) -> Option<&str> {
        self.role_arn.as_deref().filter(|role| !role.is_empty())
    }

    /// Whether `destination` would authenticate as the same principal as `self`.
    ///
    /// A side without a static key pair uses the default provider chain, which
    /// reads the same environment the source keys are usually taken from.
    /// Only a role of its own sets such a destination apart.
    fn shares_principal_with(&self, destination: &Self) -> bool {
        match (self.static_keys(), destination.static_keys()) {
            (Some(source_keys), Some(destination_keys)) => source_keys == destination_keys,
            (Some(_), None) => destination.role().is_none(),
            (None, Some(_)) => false,
            (None, None) => self.role() == destination.role(),
        }
    }
}

impl fmt::Debug for AccountCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccountCredentials")
            .field("region", &self.region)
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &self.secret_access_key.as_ref().map(|_| "<redacted>"))
            .field("role_arn", &self.role_arn)
            .field("endpoint_url", &self.endpoint_url)
            .finish()
    }
}

// ============================================================================
// Filter & mode
// ============================================================================

/// Optional identity filter restricting which source items are fetched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemFilter {
    /// Hash key value
    pub id: Option<String>,
    /// Range key value
    pub sk: Option<String>,
}

impl ItemFilter {
    /// Build a filter; empty strings count as absent.
    pub fn new(id: Option<String>, sk: Option<String>) -> Self {
        Self { id: id.filter(|v| !v.is_empty()), sk: sk.filter(|v| !v.is_empty()) }
    }

    pub fn is_empty(&self) -> bool {
        self.id.is_none() && self.sk.is_none()
    }
}

/// Effective run mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Copy, then delete destination items absent from source
    #[default]
    FullSync,
    /// Copy only, never delete
    CopyOnly,
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::FullSync => write!(f, "full-sync"),
            SyncMode::CopyOnly => write!(f, "copy-only"),
        }
    }
}

// ============================================================================
// Config & plan
// ============================================================================

/// Raw run configuration as supplied by the operator.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SyncConfig {
    #[validate(length(min = 1, message = "table cannot be empty"))]
    pub table: String,
    pub source: AccountCredentials,
    pub destination: AccountCredentials,
    pub filter: ItemFilter,
    /// Operator asked for copy-only
    pub copy_only: bool,
    #[validate(range(min = 1, message = "concurrency must be at least 1"))]
    pub concurrency: usize,
    pub dry_run: bool,
}

impl SyncConfig {
    /// Check the configuration and resolve the effective mode.
    ///
    /// A filtered fetch never yields the full source identity set, so any
    /// filter forces copy-only regardless of `copy_only`.
    pub fn plan(&self) -> Result<SyncPlan, ConfigError> {
        if self.table.trim().is_empty() {
            return Err(ConfigError::MissingTable);
        }
        if self.source.shares_principal_with(&self.destination) {
            return Err(ConfigError::SameCredentials);
        }
        Validate::validate(self).map_err(|e| ConfigError::from_validation_errors(&e))?;

        let forced_copy_only = !self.filter.is_empty() && !self.copy_only;
        let mode = if self.copy_only || !self.filter.is_empty() {
            SyncMode::CopyOnly
        } else {
            SyncMode::FullSync
        };

        Ok(SyncPlan {
            table: self.table.clone(),
            filter: self.filter.clone(),
            mode,
            concurrency: self.concurrency,
            dry_run: self.dry_run,
            forced_copy_only,
        })
    }
}

/// Validated, immutable description of one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncPlan {
    pub table: String,
    pub filter: ItemFilter,
    pub mode: SyncMode,
    pub concurrency: usize,
    pub dry_run: bool,
    /// Copy-only was imposed by the filter rather than requested
    pub forced_copy_only: bool,
}

impl SyncPlan {
    pub fn deletes_enabled(&self) -> bool {
        self.mode == SyncMode::FullSync
    }
}

/// Default worker count: twice the available parallelism.
pub fn default_concurrency() -> usize {
    std::thread::available_parallelism()
        .map(|n| NonZeroUsize::get(n) * 2)
        .unwrap_or(FALLBACK_CONCURRENCY)
}
