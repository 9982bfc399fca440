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

//! Diff suppressors
//!
//! A suppressor tells the plan engine that the textual change of an attribute is only a
//! formatting difference, like `80` becoming `80-80` or `60s` becoming `60.0s`.
//!
//! Every suppressor is a pure function with the [`SuppressFn`] signature, or a closure with the
//! same signature for the parameterized ones. A malformed operand is never an error: the diff is
//! simply not suppressed.
//!
//! Suppressors are attached to attributes through a [`DiffSuppressTable`]:
//!
//! ```
//! # use tpg_resource::{diff::Suppressor, suppress_table, EmptyResourceData};
//! let table = suppress_table! {
//!     "port_range" => Suppressor::PortRange,
//!     "timeout" => Suppressor::Duration,
//! };
//! assert!(table.suppresses("port_range", "80-80", "80", &EmptyResourceData));
//! assert!(table.suppresses("timeout", "60s", "60.0s", &EmptyResourceData));
//! assert!(!table.suppresses("description", "a", "A", &EmptyResourceData));
//! ```

mod duration;
mod suppress;
mod table;

pub use duration::parse_duration;
pub use suppress::{
    absolute_domain_suppress, case_diff_suppress, compare_resource_names,
    compare_self_link_or_resource_name, compare_self_link_relative_paths, duration_diff_suppress,
    empty_or_default_string_suppress, ip_cidr_range_diff_suppress, location_diff_suppress,
    missing_map_key_suppress, optional_prefix_suppress, optional_surrounding_spaces_suppress,
    port_range_diff_suppress, rfc3339_time_diff_suppress, SuppressFn,
};
pub use table::{DiffSuppressTable, DynSuppressFn, Suppressor};
