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

use crate::identifier::CommitKey;
use crate::identifier::Identifier;

/// The bounds of an interval are inconsistent: `upper < lower`.
#[derive(Clone, Copy, PartialEq, Eq, thiserror::Error, Debug)]
#[error("InvalidRange: upper bound {upper} < lower bound {lower}")]
pub struct InvalidRange {
    pub lower: u64,
    pub upper: u64,
}

/// Every identifier in `[1, capacity)` is live.
///
/// Not retryable without raising the capacity or releasing identifiers.
#[derive(Clone, Copy, PartialEq, Eq, thiserror::Error, Debug)]
#[error("IdentifiersExhausted: No identifiers available, capacity={capacity}")]
pub struct IdentifiersExhausted {
    pub capacity: u64,
}

/// Errors that can occur when returning identifiers to a registry.
#[derive(Clone, Copy, PartialEq, Eq, thiserror::Error, Debug)]
pub enum ReleaseError {
    /// The identifier is free already, or was never issued.
    #[error("NotLive: identifier {id} is not live and can not be released")]
    NotLive { id: Identifier },
}

/// No commit instant is recorded for the key.
#[derive(Clone, Copy, PartialEq, Eq, thiserror::Error, Debug)]
#[error("NotFound: no commit instant recorded for {key}")]
pub struct NotFound {
    pub key: CommitKey,
}

/// A user supplied field name collides with a reserved metadata field.
#[derive(Clone, PartialEq, Eq, thiserror::Error, Debug)]
#[error("ReservedFieldName: field name '{name}' is reserved for version metadata")]
pub struct ReservedFieldName {
    pub name: String,
}

/// Errors returned by [`EntryVersions`](crate::EntryVersions).
#[derive(Clone, PartialEq, Eq, thiserror::Error, Debug)]
pub enum VersionError {
    #[error(transparent)]
    Exhausted(#[from] IdentifiersExhausted),

    #[error(transparent)]
    Release(#[from] ReleaseError),

    #[error(transparent)]
    NotFound(#[from] NotFound),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifier::EntryId;

    #[test]
    fn test_error_messages() {
        let e = InvalidRange {
            lower: 10,
            upper: 5,
        };
        assert_eq!(
            e.to_string(),
            "InvalidRange: upper bound 5 < lower bound 10"
        );

        let e = IdentifiersExhausted { capacity: 3 };
        assert_eq!(
            e.to_string(),
            "IdentifiersExhausted: No identifiers available, capacity=3"
        );

        let e = NotFound {
            key: CommitKey::new(EntryId::new(1), Identifier::new(2)),
        };
        assert_eq!(e.to_string(), "NotFound: no commit instant recorded for (1, 2)");
    }

    #[test]
    fn test_version_error_is_transparent() {
        let e = VersionError::from(IdentifiersExhausted { capacity: 3 });
        assert_eq!(
            e.to_string(),
            "IdentifiersExhausted: No identifiers available, capacity=3"
        );

        let e = VersionError::from(ReleaseError::NotLive {
            id: Identifier::new(4),
        });
        assert_eq!(
            e.to_string(),
            "NotLive: identifier 4 is not live and can not be released"
        );
    }
}
