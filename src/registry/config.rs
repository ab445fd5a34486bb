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

use serde::Deserialize;
use serde::Serialize;

/// Identifiers are stored in signed 64-bit metadata columns, so the default
/// space stops at `i64::MAX`.
pub const DEFAULT_CAPACITY: u64 = i64::MAX as u64;

/// Widest identifier encoding accepted by [`RegistryConfig::with_identifier_bits`].
pub const MAX_IDENTIFIER_BITS: u32 = 63;

/// Configuration of an [`IdentifierRegistry`](crate::IdentifierRegistry).
///
/// Intended to be embedded in the configuration of the owning entry; missing
/// fields take their default when deserialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Exclusive upper bound of the identifier space `[1, capacity)`.
    pub capacity: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}

impl RegistryConfig {
    pub fn with_capacity(mut self, capacity: u64) -> Self {
        self.capacity = capacity;
        self
    }

    /// Derive the capacity from the width of the identifier encoding:
    /// `bits` wide identifiers give the space `[1, 2^bits)`.
    pub fn with_identifier_bits(mut self, bits: u32) -> Self {
        let bits = bits.min(MAX_IDENTIFIER_BITS);
        self.capacity = 1u64 << bits;
        self
    }
}
