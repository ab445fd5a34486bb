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

//! Value types shared by the registry and the commit log.

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// Names one version of one logical entry.
///
/// Valid identifiers are in `1..capacity` of the owning registry.
/// [`Identifier::RESERVED`] (`0`) is never issued.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(u64);

impl Identifier {
    pub const RESERVED: Self = Self(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Identifier({})", self.0)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Identifier {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<Identifier> for u64 {
    fn from(id: Identifier) -> Self {
        id.0
    }
}

/// Names a logical entry: a table, a collection or a graph.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntryId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// The instant at which a version was committed.
///
/// It can be a logical clock value or a wall clock timestamp; only the
/// ordering matters.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommitInstant(u64);

impl CommitInstant {
    pub const fn new(instant: u64) -> Self {
        Self(instant)
    }

    pub const fn as_u64(self) -> u64 {
        self.0
    }

    /// A version committed at `self` is visible to a snapshot taken at `snapshot`
    /// iff it committed no later than the snapshot.
    pub fn is_visible_at(self, snapshot: CommitInstant) -> bool {
        self <= snapshot
    }
}

impl fmt::Debug for CommitInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CommitInstant({})", self.0)
    }
}

impl fmt::Display for CommitInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for CommitInstant {
    fn from(instant: u64) -> Self {
        Self(instant)
    }
}

/// Key of the commit log: one version of one entry.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
pub struct CommitKey {
    pub entry_id: EntryId,
    pub version: Identifier,
}

impl CommitKey {
    pub fn new(entry_id: EntryId, version: Identifier) -> Self {
        Self { entry_id, version }
    }
}

impl fmt::Display for CommitKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.entry_id, self.version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_conversions() {
        let id = Identifier::from(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(u64::from(id), 42);
        assert_eq!(format!("{}", id), "42");
        assert_eq!(format!("{:?}", id), "Identifier(42)");
        assert_eq!(Identifier::default(), Identifier::RESERVED);
    }

    #[test]
    fn test_commit_instant_visibility() {
        let committed = CommitInstant::new(1000);

        assert!(!committed.is_visible_at(CommitInstant::new(999)));
        assert!(committed.is_visible_at(CommitInstant::new(1000)));
        assert!(committed.is_visible_at(CommitInstant::new(2000)));
    }

    #[test]
    fn test_serialized_as_plain_numbers() -> anyhow::Result<()> {
        assert_eq!(serde_json::to_string(&Identifier::new(7))?, "7");
        assert_eq!(serde_json::to_string(&EntryId::new(3))?, "3");
        assert_eq!(serde_json::to_string(&CommitInstant::new(1000))?, "1000");

        assert_eq!(serde_json::from_str::<Identifier>("7")?, Identifier::new(7));
        assert_eq!(
            serde_json::from_str::<CommitInstant>("1000")?,
            CommitInstant::new(1000)
        );

        let key = CommitKey::new(EntryId::new(7), Identifier::new(3));
        assert_eq!(
            serde_json::to_string(&key)?,
            r#"{"entry_id":7,"version":3}"#
        );
        Ok(())
    }

    #[test]
    fn test_commit_key_display() {
        let key = CommitKey::new(EntryId::new(7), Identifier::new(3));
        assert_eq!(key.to_string(), "(7, 3)");
    }
}
