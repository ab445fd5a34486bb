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

//! # MVCC identifiers
//!
//! Version identifier allocation and commit-instant bookkeeping for one
//! logical entry (a table, a collection or a graph) of a multi-version store.
//!
//! ## Core Components
//!
//! - [`IdentifierInterval`]: a half-open identifier range consumed from its lower end
//! - [`IdentifierRegistry`]: a bounded allocator that reuses released identifiers,
//!   smallest first, and coalesces adjacent free ranges
//! - [`CommitInstants`]: a concurrent map from `(entry, version)` to the instant
//!   the version was last committed
//! - [`EntryVersions`]: the two above, bound to one entry
//!
//! Deciding *when* a version is no longer visible to any snapshot is left to
//! the transaction manager; this crate only records and recycles.
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mvcc_ids::CommitInstant;
//! use mvcc_ids::CommitInstants;
//! use mvcc_ids::EntryId;
//! use mvcc_ids::EntryVersions;
//! use mvcc_ids::IdentifierRegistry;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let commits = Arc::new(CommitInstants::new());
//! let registry = IdentifierRegistry::new(1 << 16)?;
//! let versions = EntryVersions::new(EntryId::new(1), registry, commits);
//!
//! let v = versions.new_version()?;
//! versions.commit(v, CommitInstant::new(100));
//! assert!(versions.is_visible(v, CommitInstant::new(150))?);
//!
//! // Once no snapshot can see it any more:
//! versions.reclaim(&[v])?;
//! # Ok(())
//! # }
//! ```

pub mod commit_log;
pub mod entry_versions;
pub mod errors;
pub mod identifier;
pub mod interval;
pub mod registry;
pub mod reserved;

pub use crate::commit_log::CommitInstants;
pub use crate::entry_versions::EntryVersions;
pub use crate::errors::IdentifiersExhausted;
pub use crate::errors::InvalidRange;
pub use crate::errors::NotFound;
pub use crate::errors::ReleaseError;
pub use crate::errors::ReservedFieldName;
pub use crate::errors::VersionError;
pub use crate::identifier::CommitInstant;
pub use crate::identifier::CommitKey;
pub use crate::identifier::EntryId;
pub use crate::identifier::Identifier;
pub use crate::interval::IdentifierInterval;
pub use crate::registry::IdentifierRegistry;
pub use crate::registry::RegistryConfig;
pub use crate::registry::RegistryStats;
