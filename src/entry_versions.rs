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

use std::sync::Arc;

use log::debug;
use log::info;

use crate::commit_log::CommitInstants;
use crate::errors::VersionError;
use crate::identifier::CommitInstant;
use crate::identifier::EntryId;
use crate::identifier::Identifier;
use crate::registry::IdentifierRegistry;

/// Version bookkeeping of one logical entry.
///
/// Owns the entry's [`IdentifierRegistry`] and shares a [`CommitInstants`]
/// log with other entries, using its [`EntryId`] as the key namespace.
///
/// The life of a version:
/// 1. [`new_version`](Self::new_version) before the version is written;
/// 2. [`commit`](Self::commit) at commit time;
/// 3. [`last_commit`](Self::last_commit) / [`is_visible`](Self::is_visible) by readers;
/// 4. [`reclaim`](Self::reclaim) once no present or future snapshot can see it.
///
/// Deciding when step 4 is safe belongs to the transaction manager.
#[derive(Debug)]
pub struct EntryVersions {
    entry_id: EntryId,
    registry: IdentifierRegistry,
    commits: Arc<CommitInstants>,
}

impl EntryVersions {
    pub fn new(entry_id: EntryId, registry: IdentifierRegistry, commits: Arc<CommitInstants>) -> Self {
        Self {
            entry_id,
            registry,
            commits,
        }
    }

    pub fn entry_id(&self) -> EntryId {
        self.entry_id
    }

    pub fn registry(&self) -> &IdentifierRegistry {
        &self.registry
    }

    pub fn new_version(&self) -> Result<Identifier, VersionError> {
        let version = self.registry.allocate()?;
        Ok(version)
    }

    pub fn commit(&self, version: Identifier, instant: CommitInstant) {
        self.commits
            .set_or_update_last_commit(self.entry_id, version, instant);
    }

    pub fn last_commit(&self, version: Identifier) -> Result<CommitInstant, VersionError> {
        let instant = self.commits.get_last_commit(self.entry_id, version)?;
        Ok(instant)
    }

    pub fn is_visible(&self, version: Identifier, snapshot: CommitInstant) -> Result<bool, VersionError> {
        let visible = self.commits.is_visible(self.entry_id, version, snapshot)?;
        Ok(visible)
    }

    /// Garbage-collect unreachable versions: forget their commit instants and
    /// return their identifiers to the registry.
    ///
    /// If any version is not live in the registry, nothing is changed.
    /// Validation, log removal and release happen under the registry lock, so
    /// overlapping reclaims from concurrent sweeps either fully apply or fail.
    pub fn reclaim(&self, versions: &[Identifier]) -> Result<(), VersionError> {
        self.registry
            .try_release_with(versions.iter().copied(), |live| {
                for v in live {
                    self.commits.remove_entry(self.entry_id, *v);
                }
            })?;

        debug!(
            "EntryVersions::reclaim: entry {}: {} versions",
            self.entry_id,
            versions.len()
        );
        Ok(())
    }

    /// Tear down the bookkeeping when the entry itself is dropped.
    ///
    /// Returns the number of commit log keys removed.
    pub fn drop_entry(self) -> usize {
        let removed = self.commits.remove_all(self.entry_id);
        info!(
            "EntryVersions::drop_entry: entry {}: {} commit instants removed, {} identifiers were live",
            self.entry_id,
            removed,
            self.registry.live_count()
        );
        removed
    }
}
