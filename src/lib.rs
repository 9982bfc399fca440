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

//! Resource utilities of the Google Cloud Terraform/ToFu provider
//!
//! The crate provides the two leaf utilities the resource handlers rely on:
//! - the resource identifier codec in [`id`], which turns any accepted reference shape into one
//!   canonical [`ResourceId`],
//! - the diff suppressors in [`diff`], which tell the plan engine when a change is only a
//!   formatting difference.
//!
//! Around them live the pieces needed to call them: the provider configuration
//! ([`ProviderConfig`]), a read-only view on the resource state ([`ResourceData`]), the
//! `project`/`region`/`zone` lookups in [`location`], and `{{var}}` substitution in [`template`].

mod attribute_path;
mod diagnostics;
mod utils;

pub mod config;
pub mod diff;
pub mod error;
pub mod id;
pub mod location;
pub mod logging;
pub mod resource_data;
pub mod template;

pub use attribute_path::{AttributePath, AttributePathStep};
pub use config::ProviderConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use diff::{DiffSuppressTable, Suppressor};
pub use error::{IdError, LookupError};
pub use id::{IdDefaults, ResourceId, ResourceKind};
pub use resource_data::{EmptyResourceData, ResourceData, ResourceState};
pub use utils::ExtractDiagnostics;

#[macro_export]
/// Build a [`DiffSuppressTable`]
///
/// # Examples
///
/// ```
/// # use tpg_resource::{suppress_table, diff::Suppressor};
/// let table = suppress_table! {
///     "name" => Suppressor::CaseInsensitive,
///     "labels" => Suppressor::MissingMapKey,
/// };
/// assert_eq!(table.len(), 2);
/// ```
///
/// # Remarks
///
/// Keys are normalized to their schema path, so `"a.0.b"` registers `"a.b"`.
macro_rules! suppress_table {
    {$($key:expr => $value:expr),*} => {
        {
            let mut table = $crate::diff::DiffSuppressTable::new();
            $(
                table.insert($key, $value);
            )*
            table
        }
    };

    {$($key:expr => $value:expr),+ ,} => { $crate::suppress_table!{$($key => $value),+} };
}
