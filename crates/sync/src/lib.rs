//! Will registry synchronization.
//!
//! Turns raw ledger state into a consistent [`RegistrySnapshot`]: every
//! testator's record normalized into a [`WillRecord`], given a
//! [`DerivedStatus`] at one observation time, and aggregated. The
//! [`WillRegistry`] holds the current snapshot and refreshes it through a
//! [`SyncEngine`].

pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod normalize;
pub mod observer;
pub mod record;
pub mod registry;
pub mod snapshot;
pub mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SyncConfig;
pub use engine::SyncEngine;
pub use error::{DiscoveryStage, RegistryError, SyncError};
pub use format::{format_amount, format_amount_rounded, WEI_DECIMALS};
pub use normalize::{backfill_created_at, creation_times, normalize};
pub use observer::{NoopObserver, SyncObserver, TracingObserver};
pub use record::{WillRecord, WillView};
pub use registry::{RefreshOutcome, SyncState, WillRegistry};
pub use snapshot::{RegistrySnapshot, SkippedRecord};
pub use status::{derive_status, DerivedStatus, StatusView, TimeRemaining};
