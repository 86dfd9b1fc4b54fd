//! willwatch-ledger: the boundary between willwatch and the ledger that
//! holds will records.
//!
//! Provides the [`LedgerClient`] / [`LedgerMutator`] traits implemented by
//! ledger adapters, the raw record and event types those adapters return,
//! the will contract's field layout ([`abi`]), and an [`InMemoryLedger`]
//! with contract semantics for tests and fixtures.

pub mod abi;
mod address;
mod error;
pub mod memory;
mod mutation;
mod record;
mod traits;

pub use address::{Address, AddressParseError};
pub use error::{LedgerError, MutationError};
pub use memory::{InMemoryLedger, LedgerFixture};
pub use mutation::{MutationKind, MutationReceipt, WillMutation, MAX_BENEFICIARIES};
pub use record::{amount, amount_list, Amount, BlockRange, CreationEvent, RawRecord};
pub use traits::{LedgerClient, LedgerMutator};
