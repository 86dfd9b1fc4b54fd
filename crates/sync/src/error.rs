use std::fmt;

use willwatch_ledger::{LedgerError, MutationError};

/// Which discovery call failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStage {
    CreationLog,
    TestatorEnumeration,
}

impl fmt::Display for DiscoveryStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiscoveryStage::CreationLog => f.write_str("creation log scan"),
            DiscoveryStage::TestatorEnumeration => f.write_str("testator enumeration"),
        }
    }
}

/// Errors that abort a synchronization pass.
///
/// Only discovery failures are fatal. Individual record lookups that fail
/// are skipped and reported in the snapshot instead.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SyncError {
    #[error("discovery failed during {stage}: {source}")]
    Discovery {
        stage: DiscoveryStage,
        source: LedgerError,
    },
}

/// Errors from [`crate::WillRegistry::submit`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("registry has no caller address to submit as")]
    NoCaller,

    #[error("invalid mutation: {0}")]
    Invalid(#[from] MutationError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Sync(#[from] SyncError),
}
