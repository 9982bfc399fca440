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

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use crate::{
    attribute_path::{AttributePath, AttributePathStep},
    resource_data::ResourceData,
};

use super::suppress::{
    absolute_domain_suppress, case_diff_suppress, compare_resource_names,
    compare_self_link_or_resource_name, compare_self_link_relative_paths, duration_diff_suppress,
    has_optional_prefix, ip_cidr_range_diff_suppress, is_empty_or_default,
    location_diff_suppress, missing_map_key_suppress, optional_surrounding_spaces_suppress,
    port_range_diff_suppress, rfc3339_time_diff_suppress,
};

/// Closure usable as a [`Suppressor`]
pub type DynSuppressFn = dyn Fn(&str, &str, &str, &dyn ResourceData) -> bool + Send + Sync;

/// Diff suppression rule attached to an attribute
#[derive(Clone)]
pub enum Suppressor {
    OptionalPrefix(String),
    MissingMapKey,
    OptionalSurroundingSpaces,
    CaseInsensitive,
    PortRange,
    Location,
    AbsoluteDomain,
    Duration,
    EmptyOrDefault(String),
    IpCidrRange,
    Rfc3339Time,
    ResourceNames,
    SelfLinkRelativePaths,
    SelfLinkOrResourceName,
    Custom(Arc<DynSuppressFn>),
}

impl Suppressor {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&str, &str, &str, &dyn ResourceData) -> bool + Send + Sync + 'static,
    {
        Self::Custom(Arc::new(f))
    }

    /// Whether the change of `key` from `old` to `new` is only a formatting difference
    pub fn suppress(&self, key: &str, old: &str, new: &str, d: &dyn ResourceData) -> bool {
        match self {
            Suppressor::OptionalPrefix(prefix) => has_optional_prefix(prefix, old, new),
            Suppressor::MissingMapKey => missing_map_key_suppress(key, old, new, d),
            Suppressor::OptionalSurroundingSpaces => {
                optional_surrounding_spaces_suppress(key, old, new, d)
            }
            Suppressor::CaseInsensitive => case_diff_suppress(key, old, new, d),
            Suppressor::PortRange => port_range_diff_suppress(key, old, new, d),
            Suppressor::Location => location_diff_suppress(key, old, new, d),
            Suppressor::AbsoluteDomain => absolute_domain_suppress(key, old, new, d),
            Suppressor::Duration => duration_diff_suppress(key, old, new, d),
            Suppressor::EmptyOrDefault(default) => is_empty_or_default(default, old, new),
            Suppressor::IpCidrRange => ip_cidr_range_diff_suppress(key, old, new, d),
            Suppressor::Rfc3339Time => rfc3339_time_diff_suppress(key, old, new, d),
            Suppressor::ResourceNames => compare_resource_names(key, old, new, d),
            Suppressor::SelfLinkRelativePaths => compare_self_link_relative_paths(key, old, new, d),
            Suppressor::SelfLinkOrResourceName => {
                compare_self_link_or_resource_name(key, old, new, d)
            }
            Suppressor::Custom(f) => f(key, old, new, d),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Suppressor::OptionalPrefix(_) => "optional_prefix",
            Suppressor::MissingMapKey => "missing_map_key",
            Suppressor::OptionalSurroundingSpaces => "optional_surrounding_spaces",
            Suppressor::CaseInsensitive => "case_insensitive",
            Suppressor::PortRange => "port_range",
            Suppressor::Location => "location",
            Suppressor::AbsoluteDomain => "absolute_domain",
            Suppressor::Duration => "duration",
            Suppressor::EmptyOrDefault(_) => "empty_or_default",
            Suppressor::IpCidrRange => "ip_cidr_range",
            Suppressor::Rfc3339Time => "rfc3339_time",
            Suppressor::ResourceNames => "resource_names",
            Suppressor::SelfLinkRelativePaths => "self_link_relative_paths",
            Suppressor::SelfLinkOrResourceName => "self_link_or_resource_name",
            Suppressor::Custom(_) => "custom",
        }
    }
}

impl Debug for Suppressor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Suppressor::OptionalPrefix(prefix) => {
                f.debug_tuple("OptionalPrefix").field(prefix).finish()
            }
            Suppressor::EmptyOrDefault(default) => {
                f.debug_tuple("EmptyOrDefault").field(default).finish()
            }
            Suppressor::Custom(_) => f.write_str("Custom(..)"),
            other => f.write_str(other.name()),
        }
    }
}

/// Suppressors of a resource, keyed by schema attribute path
///
/// Keys are flatmap paths without list indices: `network_interface.alias_ip_range.ip_cidr_range`.
/// Looking up `network_interface.0.alias_ip_range.1.ip_cidr_range` finds that entry, and
/// looking up a map element like `labels.env` falls back on the `labels` entry.
///
/// Attributes nested in a block do not inherit the suppressor of the block:
/// `network_interface.0.network` is not covered by a `network_interface` entry.
#[derive(Clone, Debug, Default)]
pub struct DiffSuppressTable {
    suppressors: HashMap<String, Suppressor>,
}

impl DiffSuppressTable {
    pub fn new() -> Self {
        Default::default()
    }

    /// Register `suppressor` for `key`, replacing the previous one
    pub fn insert<K: AsRef<str>>(&mut self, key: K, suppressor: Suppressor) -> Option<Suppressor> {
        let key = AttributePath::from_flatmap(key.as_ref()).schema_path().to_flatmap();
        self.suppressors.insert(key, suppressor)
    }

    pub fn with<K: AsRef<str>>(mut self, key: K, suppressor: Suppressor) -> Self {
        self.insert(key, suppressor);
        self
    }

    /// Suppressor that applies to the concrete attribute `key`
    pub fn get(&self, key: &str) -> Option<&Suppressor> {
        let path = AttributePath::from_flatmap(key);
        let schema_path = path.schema_path();
        if let Some(suppressor) = self.suppressors.get(&schema_path.to_flatmap()) {
            return Some(suppressor);
        }
        // A map element directly follows its attribute, a block attribute follows an index
        match path.steps.as_slice() {
            [.., AttributePathStep::Attribute(_), AttributePathStep::Attribute(_)] => {
                let parent = schema_path.parent()?;
                self.suppressors.get(&parent.to_flatmap())
            }
            _ => None,
        }
    }

    /// Whether the diff of `key` should be ignored, `false` for attributes without suppressor
    pub fn suppresses(&self, key: &str, old: &str, new: &str, d: &dyn ResourceData) -> bool {
        let Some(suppressor) = self.get(key) else {
            return false;
        };
        let suppressed = suppressor.suppress(key, old, new, d);
        if suppressed {
            tracing::debug!(
                "suppressed diff of {key} ({old:?} => {new:?}) with {}",
                suppressor.name()
            );
        }
        suppressed
    }

    pub fn len(&self) -> usize {
        self.suppressors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.suppressors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Suppressor)> {
        self.suppressors
            .iter()
            .map(|(key, suppressor)| (key.as_str(), suppressor))
    }
}

impl<K: AsRef<str>> FromIterator<(K, Suppressor)> for DiffSuppressTable {
    fn from_iter<T: IntoIterator<Item = (K, Suppressor)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (key, suppressor) in iter {
            table.insert(key, suppressor);
        }
        table
    }
}
