use std::fmt;

use serde::{Deserialize, Serialize};

use crate::address::Address;
use crate::error::MutationError;
use crate::record::Amount;

/// Upper bound on beneficiaries per will, enforced by the contract.
pub const MAX_BENEFICIARIES: usize = 10;

/// A state-changing call against the will contract.
///
/// The sender is passed alongside the mutation: `Create`, `Ping`, and
/// `Cancel` act on the sender's own will, `Execute` on someone else's.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WillMutation {
    Create {
        beneficiaries: Vec<Address>,
        #[serde(with = "crate::record::amount_list")]
        allocations: Vec<Amount>,
        inactivity_timeout: u64,
        #[serde(with = "crate::record::amount")]
        deposit: Amount,
    },
    Ping,
    Cancel,
    Execute {
        testator: Address,
    },
}

impl WillMutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            WillMutation::Create { .. } => MutationKind::Create,
            WillMutation::Ping => MutationKind::Ping,
            WillMutation::Cancel => MutationKind::Cancel,
            WillMutation::Execute { .. } => MutationKind::Execute,
        }
    }

    /// Check the request invariants the contract enforces, so an obviously
    /// doomed request is never sent.
    pub fn validate(&self) -> Result<(), MutationError> {
        let WillMutation::Create {
            beneficiaries,
            allocations,
            inactivity_timeout,
            deposit,
        } = self
        else {
            return Ok(());
        };

        if beneficiaries.is_empty() || beneficiaries.len() > MAX_BENEFICIARIES {
            return Err(MutationError::BeneficiaryCount {
                count: beneficiaries.len(),
                max: MAX_BENEFICIARIES,
            });
        }
        if beneficiaries.len() != allocations.len() {
            return Err(MutationError::LengthMismatch {
                beneficiaries: beneficiaries.len(),
                allocations: allocations.len(),
            });
        }
        if let Some(index) = beneficiaries.iter().position(Address::is_zero) {
            return Err(MutationError::ZeroAddress { index });
        }
        if let Some(index) = allocations.iter().position(|a| *a == 0) {
            return Err(MutationError::ZeroAllocation { index });
        }
        if *inactivity_timeout == 0 {
            return Err(MutationError::ZeroTimeout);
        }
        let allocated = allocations
            .iter()
            .fold(0u128, |acc, a| acc.saturating_add(*a));
        if *deposit < allocated {
            return Err(MutationError::InsufficientDeposit {
                deposit: *deposit,
                allocated,
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MutationKind {
    Create,
    Ping,
    Cancel,
    Execute,
}

impl fmt::Display for MutationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MutationKind::Create => "create",
            MutationKind::Ping => "ping",
            MutationKind::Cancel => "cancel",
            MutationKind::Execute => "execute",
        };
        f.write_str(s)
    }
}

/// Confirmation that a mutation was included in a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationReceipt {
    pub kind: MutationKind,
    pub sender: Address,
    pub block_number: u64,
}
