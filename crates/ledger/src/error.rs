/// All errors that can be returned by a ledger client or mutator.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The record for this address could not be read (node unreachable,
    /// storage slot unreadable, response undecodable).
    #[error("record unavailable for {address}")]
    Unavailable { address: String },

    /// The call did not complete within the adapter's deadline.
    #[error("ledger call timed out: {operation}")]
    Timeout { operation: String },

    /// The ledger refused a mutation (e.g. the inactivity timeout has not
    /// elapsed yet for an execute request).
    #[error("mutation rejected: {reason}")]
    Rejected { reason: String },

    /// A transport or RPC-level failure.
    #[error("ledger rpc error: {0}")]
    Rpc(String),
}

/// Request invariant violations detected before a mutation is submitted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MutationError {
    #[error("a will needs between 1 and {max} beneficiaries, got {count}")]
    BeneficiaryCount { count: usize, max: usize },

    #[error("{beneficiaries} beneficiaries but {allocations} allocations")]
    LengthMismatch {
        beneficiaries: usize,
        allocations: usize,
    },

    #[error("beneficiary {index} is the zero address")]
    ZeroAddress { index: usize },

    #[error("allocation {index} must be greater than zero")]
    ZeroAllocation { index: usize },

    #[error("inactivity timeout must be greater than zero")]
    ZeroTimeout,

    #[error("deposit {deposit} is below the allocated total {allocated}")]
    InsufficientDeposit { deposit: u128, allocated: u128 },
}
