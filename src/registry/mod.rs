// Copyright 2021 Datafuse Labs
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Bounded allocator of version identifiers for one logical entry.

pub mod config;
mod free_pool;


use std::fmt;

use log::debug;
use log::warn;
use parking_lot::Mutex;
use serde::Deserialize;
use serde::Serialize;

pub use self::config::RegistryConfig;
use self::free_pool::contiguous_runs;
use self::free_pool::FreePool;
use crate::errors::IdentifiersExhausted;
use crate::errors::InvalidRange;
use crate::errors::ReleaseError;
use crate::identifier::Identifier;
use crate::interval::IdentifierInterval;

/// Hands out identifiers from `[1, capacity)` and takes them back for reuse.
///
/// Every identifier value is in exactly one of three states:
/// - never issued: at or above the high-water mark;
/// - live: below the high-water mark and not free;
/// - free: issued before and released since, held in the free pool.
///
/// [`allocate`](Self::allocate) prefers the smallest free identifier over
/// raising the high-water mark, which keeps live identifiers compact.
///
/// All state sits behind one mutex; registries of different entries share
/// nothing. No operation waits for another identifier to be released.
pub struct IdentifierRegistry {
    capacity: u64,
    state: Mutex<RegistryState>,
}

struct RegistryState {
    /// The never-issued tail `[high_water_mark, capacity)`; its cursor is the
    /// high-water mark.
    unissued: IdentifierInterval,

    free: FreePool,
}

impl RegistryState {
    fn high_water_mark(&self) -> u64 {
        self.unissued.cursor()
    }

    fn is_live(&self, id: u64) -> bool {
        id >= 1 && id < self.high_water_mark() && !self.free.contains(id)
    }

    fn available(&self) -> u64 {
        self.free.len() + self.unissued.remaining()
    }

    fn allocate(&mut self) -> Option<Identifier> {
        self.free.pop_smallest().or_else(|| self.unissued.next())
    }
}

/// A point-in-time summary of a registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryStats {
    pub capacity: u64,
    pub high_water_mark: u64,
    /// Identifiers issued and not released.
    pub live: u64,
    /// Identifiers in the free pool.
    pub free: u64,
    /// Number of intervals in the free pool.
    pub free_intervals: usize,
}

impl IdentifierRegistry {
    /// Create a registry over `[1, capacity)`.
    ///
    /// `capacity == 0` does not describe a range and is rejected.
    /// `capacity == 1` is a valid but empty space.
    pub fn new(capacity: u64) -> Result<Self, InvalidRange> {
        let unissued = IdentifierInterval::new(1, capacity)?;

        Ok(Self {
            capacity,
            state: Mutex::new(RegistryState {
                unissued,
                free: FreePool::new(),
            }),
        })
    }

    pub fn from_config(config: &RegistryConfig) -> Result<Self, InvalidRange> {
        Self::new(config.capacity)
    }

    /// Exclusive upper bound of the identifier space.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// The smallest identifier never issued.
    pub fn high_water_mark(&self) -> u64 {
        self.state.lock().high_water_mark()
    }

    /// Issue an identifier: the smallest free one, otherwise the high-water mark.
    ///
    /// Fails immediately with [`IdentifiersExhausted`] when every identifier
    /// is live.
    pub fn allocate(&self) -> Result<Identifier, IdentifiersExhausted> {
        let mut state = self.state.lock();

        let Some(id) = state.allocate() else {
            warn!(
                "IdentifierRegistry::allocate: no identifiers available, capacity={}",
                self.capacity
            );
            return Err(IdentifiersExhausted {
                capacity: self.capacity,
            });
        };

        debug!(
            "IdentifierRegistry::allocate: {}, high_water_mark: {}",
            id,
            state.high_water_mark()
        );
        Ok(id)
    }

    /// Issue `n` identifiers, smallest first, or none at all.
    pub fn allocate_many(&self, n: usize) -> Result<Vec<Identifier>, IdentifiersExhausted> {
        let mut state = self.state.lock();

        let enough = u64::try_from(n).is_ok_and(|n| n <= state.available());
        if !enough {
            warn!(
                "IdentifierRegistry::allocate_many: {} requested, {} available, capacity={}",
                n,
                state.available(),
                self.capacity
            );
            return Err(IdentifiersExhausted {
                capacity: self.capacity,
            });
        }

        let ids = (0..n).filter_map(|_| state.allocate()).collect::<Vec<_>>();
        debug_assert_eq!(ids.len(), n);

        debug!(
            "IdentifierRegistry::allocate_many: {} identifiers, high_water_mark: {}",
            n,
            state.high_water_mark()
        );
        Ok(ids)
    }

    /// Return identifiers to the free pool.
    ///
    /// Every identifier must be live and held by the caller.
    ///
    /// # Panics
    ///
    /// Panics if any identifier is not live. The registry is left unchanged.
    pub fn release(&self, ids: impl IntoIterator<Item = Identifier>) {
        if let Err(e) = self.try_release(ids) {
            panic!("IdentifierRegistry::release: {}", e);
        }
    }

    /// Return identifiers to the free pool, rejecting the whole batch if any
    /// identifier is not live.
    ///
    /// Duplicates in `ids` collapse. Consecutive identifiers are merged into
    /// one run and coalesced with adjacent free intervals.
    pub fn try_release(&self, ids: impl IntoIterator<Item = Identifier>) -> Result<(), ReleaseError> {
        self.try_release_with(ids, |_| {})
    }

    /// Like [`try_release`](Self::try_release), but once every identifier is
    /// known to be live, call `before_release` with them, sorted and
    /// deduplicated, before they enter the free pool.
    ///
    /// The registry stays locked from validation to release, so no concurrent
    /// release of the same identifiers can interleave with `before_release`.
    /// It is not called if validation fails. It must not call back into this
    /// registry.
    pub fn try_release_with<F>(
        &self,
        ids: impl IntoIterator<Item = Identifier>,
        before_release: F,
    ) -> Result<(), ReleaseError>
    where
        F: FnOnce(&[Identifier]),
    {
        let mut ids = ids.into_iter().collect::<Vec<_>>();
        if ids.is_empty() {
            return Ok(());
        }

        ids.sort_unstable();
        ids.dedup();

        let mut state = self.state.lock();

        if let Some(id) = ids.iter().find(|id| !state.is_live(id.as_u64())) {
            return Err(ReleaseError::NotLive { id: *id });
        }

        before_release(&ids);

        let ids = ids.into_iter().map(u64::from).collect::<Vec<_>>();
        let runs = contiguous_runs(&ids);
        for (lower, upper) in runs.iter() {
            state.free.insert_run(*lower, *upper);
        }

        debug!(
            "IdentifierRegistry::release: {} identifiers in {} runs, free intervals: {}",
            ids.len(),
            runs.len(),
            state.free.interval_count()
        );
        Ok(())
    }

    pub fn is_live(&self, id: Identifier) -> bool {
        self.state.lock().is_live(id.as_u64())
    }

    /// Number of identifiers issued and not released.
    pub fn live_count(&self) -> u64 {
        let state = self.state.lock();
        state.high_water_mark() - 1 - state.free.len()
    }

    /// Number of identifiers waiting in the free pool.
    pub fn free_count(&self) -> u64 {
        self.state.lock().free.len()
    }

    /// Number of identifiers that can still be allocated.
    pub fn available(&self) -> u64 {
        self.state.lock().available()
    }

    /// The unconsumed free ranges, in ascending order.
    pub fn free_intervals(&self) -> Vec<IdentifierInterval> {
        self.state.lock().free.intervals()
    }

    pub fn stats(&self) -> RegistryStats {
        let state = self.state.lock();
        RegistryStats {
            capacity: self.capacity,
            high_water_mark: state.high_water_mark(),
            live: state.high_water_mark() - 1 - state.free.len(),
            free: state.free.len(),
            free_intervals: state.free.interval_count(),
        }
    }
}

impl fmt::Debug for IdentifierRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("IdentifierRegistry")
            .field("capacity", &self.capacity)
            .field("high_water_mark", &state.high_water_mark())
            .field("free", &state.free)
            .finish()
    }
}
