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

//! The last commit instant of every committed `(entry, version)`.

use dashmap::DashMap;
use log::debug;

use crate::errors::NotFound;
use crate::identifier::CommitInstant;
use crate::identifier::CommitKey;
use crate::identifier::EntryId;
use crate::identifier::Identifier;

/// Maps `(entry, version)` to the instant that version was last committed.
///
/// Readers use it to decide whether a version is visible to their snapshot.
///
/// Backed by a sharded concurrent map: operations on different keys do not
/// coordinate, operations on the same key are linearizable. There is no
/// history per key: the last write wins.
#[derive(Debug, Default)]
pub struct CommitInstants {
    commits: DashMap<CommitKey, CommitInstant>,
}

impl CommitInstants {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `instant` as the last commit of `(entry_id, version)`,
    /// overwriting any earlier instant.
    pub fn set_or_update_last_commit(
        &self,
        entry_id: EntryId,
        version: Identifier,
        instant: CommitInstant,
    ) {
        let key = CommitKey::new(entry_id, version);
        let prev = self.commits.insert(key, instant);
        debug!(
            "CommitInstants::set_or_update_last_commit: {}: {:?} -> {}",
            key, prev, instant
        );
    }

    /// Return the last commit instant of `(entry_id, version)`.
    ///
    /// The caller must only ask for keys it knows are committed; an absent key
    /// is a broken precondition reported as [`NotFound`].
    pub fn get_last_commit(
        &self,
        entry_id: EntryId,
        version: Identifier,
    ) -> Result<CommitInstant, NotFound> {
        let key = CommitKey::new(entry_id, version);
        self.commits
            .get(&key)
            .map(|instant| *instant)
            .ok_or(NotFound { key })
    }

    /// Whether `(entry_id, version)` committed no later than `snapshot`.
    pub fn is_visible(
        &self,
        entry_id: EntryId,
        version: Identifier,
        snapshot: CommitInstant,
    ) -> Result<bool, NotFound> {
        let committed = self.get_last_commit(entry_id, version)?;
        Ok(committed.is_visible_at(snapshot))
    }

    /// Forget `(entry_id, version)`. Removing an absent key is a no-op.
    pub fn remove_entry(&self, entry_id: EntryId, version: Identifier) {
        let key = CommitKey::new(entry_id, version);
        let removed = self.commits.remove(&key);
        debug!("CommitInstants::remove_entry: {}: {:?}", key, removed);
    }

    /// Forget every version of `entry_id`, returning how many were removed.
    pub fn remove_all(&self, entry_id: EntryId) -> usize {
        let mut removed = 0;
        self.commits.retain(|key, _| {
            let keep = key.entry_id != entry_id;
            if !keep {
                removed += 1;
            }
            keep
        });

        debug!("CommitInstants::remove_all: {}: {} removed", entry_id, removed);
        removed
    }

    pub fn len(&self) -> usize {
        self.commits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commits.is_empty()
    }
}
