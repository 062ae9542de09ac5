// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Boundary to the ledger that carries out proxied calls.
//!
//! Meta-transactions and batches execute calls on behalf of a signer. The
//! engine never applies a call directly: it asks the [`CallExecutor`] to
//! stage the whole list first (staging must not mutate) and commits only
//! after signature and nonce checks have passed. A list that cannot be staged
//! in full is rejected with nothing applied.

use std::collections::BTreeMap;

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// One proxied call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Call {
    /// Call target.
    #[schema(value_type = String, example = "0x70997970C51812dc3A010C7d01b50e0d17dc79C8")]
    pub to: Address,
    /// Native value transferred with the call.
    #[serde(default)]
    pub value: u128,
    /// Opaque call payload.
    #[serde(default)]
    #[schema(value_type = String, example = "0x")]
    pub data: Bytes,
}

/// Result of a committed call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CallReceipt {
    #[schema(value_type = String)]
    pub sender: Address,
    #[schema(value_type = String)]
    pub to: Address,
    pub value: u128,
    #[schema(value_type = String)]
    pub data: Bytes,
    /// Position of this call in the ledger's call log.
    pub sequence: u64,
}

/// Ledger-side call failures. Codes belong to the ledger, not the engine.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CallError {
    #[error("insufficient balance: {sender} holds {available}, call needs {required}")]
    InsufficientBalance {
        sender: Address,
        available: u128,
        required: u128,
    },

    #[error("sender cannot transfer value to itself")]
    SelfTransfer,

    #[error("call target is the zero address")]
    ZeroTarget,

    #[error("call rejected: {0}")]
    Rejected(String),
}

impl CallError {
    pub fn code(&self) -> u32 {
        match self {
            CallError::InsufficientBalance { .. } => 1,
            CallError::SelfTransfer => 2,
            CallError::ZeroTarget => 3,
            CallError::Rejected(_) => 4,
        }
    }
}

/// Executes proxied calls as a two-phase stage/commit.
pub trait CallExecutor: Send + Sync {
    /// Everything `commit` needs to apply the staged calls.
    type Staged: Send;

    /// Validate `calls` in order as if each earlier one had been applied.
    /// Must not change observable state.
    fn stage(&self, sender: Address, calls: &[Call]) -> Result<Self::Staged, CallError>;

    /// Apply a previously staged list. Cannot fail.
    fn commit(&mut self, staged: Self::Staged) -> Vec<CallReceipt>;
}

/// In-process ledger of native balances and executed calls.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    balances: BTreeMap<Address, u128>,
    log: Vec<CallReceipt>,
}

/// Balance overlay and pending receipts for one staged list.
#[derive(Debug)]
pub struct StagedCalls {
    balances: BTreeMap<Address, u128>,
    receipts: Vec<CallReceipt>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn credit(&mut self, account: Address, amount: u128) {
        let balance = self.balances.entry(account).or_default();
        *balance = balance.saturating_add(amount);
    }

    pub fn balance_of(&self, account: Address) -> u128 {
        self.balances.get(&account).copied().unwrap_or(0)
    }

    /// Every committed call, oldest first.
    pub fn calls(&self) -> &[CallReceipt] {
        &self.log
    }
}

impl CallExecutor for InMemoryLedger {
    type Staged = StagedCalls;

    fn stage(&self, sender: Address, calls: &[Call]) -> Result<StagedCalls, CallError> {
        let mut overlay: BTreeMap<Address, u128> = BTreeMap::new();
        let mut receipts = Vec::with_capacity(calls.len());
        let mut sequence = self.log.len() as u64;

        for call in calls {
            if call.to == Address::ZERO {
                return Err(CallError::ZeroTarget);
            }

            if call.value > 0 {
                if call.to == sender {
                    return Err(CallError::SelfTransfer);
                }

                let available = overlay
                    .get(&sender)
                    .copied()
                    .unwrap_or_else(|| self.balance_of(sender));
                if available < call.value {
                    return Err(CallError::InsufficientBalance {
                        sender,
                        available,
                        required: call.value,
                    });
                }
                let receiver = overlay
                    .get(&call.to)
                    .copied()
                    .unwrap_or_else(|| self.balance_of(call.to));

                overlay.insert(sender, available - call.value);
                overlay.insert(call.to, receiver.saturating_add(call.value));
            }

            receipts.push(CallReceipt {
                sender,
                to: call.to,
                value: call.value,
                data: call.data.clone(),
                sequence,
            });
            sequence += 1;
        }

        Ok(StagedCalls {
            balances: overlay,
            receipts,
        })
    }

    fn commit(&mut self, staged: StagedCalls) -> Vec<CallReceipt> {
        self.balances.extend(staged.balances);
        self.log.extend(staged.receipts.iter().cloned());
        staged.receipts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALICE: Address = Address::repeat_byte(0xa1);
    const BOB: Address = Address::repeat_byte(0xb0);
    const CAROL: Address = Address::repeat_byte(0xc0);

    fn call(to: Address, value: u128) -> Call {
        Call {
            to,
            value,
            data: Bytes::new(),
        }
    }

    #[test]
    fn staging_does_not_mutate() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(ALICE, 100);

        let staged = ledger.stage(ALICE, &[call(BOB, 40)]).unwrap();
        assert_eq!(ledger.balance_of(ALICE), 100);
        assert!(ledger.calls().is_empty());

        let receipts = ledger.commit(staged);
        assert_eq!(receipts.len(), 1);
        assert_eq!(ledger.balance_of(ALICE), 60);
        assert_eq!(ledger.balance_of(BOB), 40);
        assert_eq!(ledger.calls().len(), 1);
    }

    #[test]
    fn later_calls_see_earlier_ones() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(ALICE, 100);

        let err = ledger
            .stage(ALICE, &[call(BOB, 60), call(CAROL, 60)])
            .unwrap_err();
        assert_eq!(
            err,
            CallError::InsufficientBalance {
                sender: ALICE,
                available: 40,
                required: 60
            }
        );

        let staged = ledger.stage(ALICE, &[call(BOB, 60), call(CAROL, 40)]).unwrap();
        ledger.commit(staged);
        assert_eq!(ledger.balance_of(ALICE), 0);
        assert_eq!(ledger.balance_of(CAROL), 40);
    }

    #[test]
    fn rejects_zero_target_and_self_transfer() {
        let mut ledger = InMemoryLedger::new();
        ledger.credit(ALICE, 10);

        assert_eq!(
            ledger.stage(ALICE, &[call(Address::ZERO, 0)]).unwrap_err(),
            CallError::ZeroTarget
        );
        assert_eq!(
            ledger.stage(ALICE, &[call(ALICE, 1)]).unwrap_err(),
            CallError::SelfTransfer
        );
    }

    #[test]
    fn zero_value_calls_only_log() {
        let mut ledger = InMemoryLedger::new();
        let staged = ledger
            .stage(
                ALICE,
                &[Call {
                    to: BOB,
                    value: 0,
                    data: Bytes::from_static(b"\x12\x34"),
                }],
            )
            .unwrap();
        let receipts = ledger.commit(staged);

        assert_eq!(receipts[0].sequence, 0);
        assert_eq!(receipts[0].data, Bytes::from_static(b"\x12\x34"));
        assert_eq!(ledger.balance_of(BOB), 0);
    }

    #[test]
    fn empty_list_stages_trivially() {
        let ledger = InMemoryLedger::new();
        let staged = ledger.stage(ALICE, &[]).unwrap();
        assert!(staged.receipts.is_empty());
    }
}
