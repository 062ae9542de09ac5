// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Logical time source for deadline and expiry checks.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::Utc;

/// Externally supplied, monotonically increasing logical time.
pub trait LogicalClock: Send + Sync {
    fn now(&self) -> u64;
}

/// Unix seconds from the host wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl LogicalClock for SystemClock {
    fn now(&self) -> u64 {
        u64::try_from(Utc::now().timestamp()).unwrap_or(0)
    }
}

/// Clock driven by the embedder (ledger height, test time).
#[derive(Debug, Default)]
pub struct ManualClock {
    now: AtomicU64,
}

impl ManualClock {
    pub fn new(start: u64) -> Self {
        Self {
            now: AtomicU64::new(start),
        }
    }

    /// Move time forward. Attempts to move it backwards are ignored.
    pub fn set(&self, now: u64) {
        self.now.fetch_max(now, Ordering::SeqCst);
    }

    pub fn advance(&self, delta: u64) {
        self.now.fetch_add(delta, Ordering::SeqCst);
    }
}

impl LogicalClock for ManualClock {
    fn now(&self) -> u64 {
        self.now.load(Ordering::SeqCst)
    }
}
