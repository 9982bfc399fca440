// This file is part of the tpg-resource project
//
// Copyright (C) ANEO, 2024-2024. All rights reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License")
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

//! Resource identifiers
//!
//! References to resources are accepted in several shapes (self links, partial paths,
//! shorthands) and normalized into a single canonical [`ResourceId`], which is what gets
//! recorded in the state.
//!
//! ```
//! # use tpg_resource::id::{kinds, IdDefaults, ResourceId};
//! let defaults = IdDefaults::default();
//! let from_url = ResourceId::parse_with_defaults(
//!     "https://www.googleapis.com/compute/v1/projects/test-project/regions/us-central1/addresses/test-address",
//!     &kinds::ADDRESS,
//!     &defaults,
//! )?;
//! let from_path = ResourceId::parse_with_defaults(
//!     "projects/test-project/regions/us-central1/addresses/test-address",
//!     &kinds::ADDRESS,
//!     &defaults,
//! )?;
//! assert_eq!(from_url.canonical_id(), from_path.canonical_id());
//! assert_eq!(from_url.parent(), "projects/test-project/regions/us-central1");
//! # Ok::<(), tpg_resource::IdError>(())
//! ```

mod kind;
mod resource_id;
mod self_link;

pub use kind::{kinds, ContainerKind, ResourceKind, ScopeKind};
pub use resource_id::{IdDefaults, ResourceId, Scope};
pub use self_link::{
    calc_add_remove, convert_self_link_to_v1, extract_field_by_pattern, relative_path,
    same_resource,
};
