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

//! Field names under which identifiers are embedded in tuple metadata.

use crate::errors::ReservedFieldName;

/// Field holding the entry identifier of a tuple or document.
pub const IDENTIFIER_KEY: &str = "_eid";

/// Field holding the version of a tuple or document.
pub const VERSION_KEY: &str = "_vid";

pub const RESERVED_FIELD_NAMES: [&str; 2] = [IDENTIFIER_KEY, VERSION_KEY];

pub fn is_reserved(name: &str) -> bool {
    RESERVED_FIELD_NAMES.contains(&name)
}

/// Reject the first user supplied field name that would shadow version metadata.
pub fn check_field_names<'a>(names: impl IntoIterator<Item = &'a str>) -> Result<(), ReservedFieldName> {
    match names.into_iter().find(|name| is_reserved(name)) {
        Some(name) => Err(ReservedFieldName {
            name: name.to_string(),
        }),
        None => Ok(()),
    }
}
