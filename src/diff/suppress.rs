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

use crate::{
    id::{relative_path, same_resource},
    location::resource_name_from_self_link,
    resource_data::ResourceData,
};

use super::duration::parse_duration;

/// Signature shared by every diff suppressor: `(key, old, new, state) -> suppressed`
pub type SuppressFn = fn(&str, &str, &str, &dyn ResourceData) -> bool;

const LOCATION_KEYWORDS: [&str; 3] = ["locations", "zones", "regions"];

/// Suppress the diff when the new value is the old one with `prefix` prepended
///
/// Only the direction `old -> prefix + old` is suppressed.
pub fn optional_prefix_suppress(
    prefix: impl Into<String>,
) -> impl Fn(&str, &str, &str, &dyn ResourceData) -> bool + Clone + Send + Sync {
    let prefix = prefix.into();
    move |_, old, new, _| has_optional_prefix(&prefix, old, new)
}

pub(super) fn has_optional_prefix(prefix: &str, old: &str, new: &str) -> bool {
    !old.starts_with(prefix)
        && new.len() == prefix.len() + old.len()
        && new.starts_with(prefix)
        && new.ends_with(old)
}

/// Suppress the diff when the old value is absent from a map and the new one is set
pub fn missing_map_key_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    old.is_empty() && !new.is_empty()
}

pub fn optional_surrounding_spaces_suppress(
    _: &str,
    old: &str,
    new: &str,
    _: &dyn ResourceData,
) -> bool {
    old.trim() == new.trim()
}

pub fn case_diff_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    old.to_uppercase() == new.to_uppercase()
}

/// Suppress the diff between a single port `N` and the range `N-N`
///
/// Two ranges are never suppressed, even when they are equal.
pub fn port_range_diff_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    let old_single = is_port(old);
    let new_single = is_port(new);
    if !old_single && !new_single {
        return false;
    }
    if (!old_single && !is_port_range(old)) || (!new_single && !is_port_range(new)) {
        return false;
    }
    normalize_port_range(old) == normalize_port_range(new)
}

fn is_port(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
}

fn is_port_range(value: &str) -> bool {
    value
        .split_once('-')
        .is_some_and(|(low, high)| is_port(low) && is_port(high))
}

fn normalize_port_range(value: &str) -> String {
    if is_port(value) {
        format!("{value}-{value}")
    } else {
        value.to_owned()
    }
}

/// Suppress the diff between paths that only differ by their `locations`, `zones` or `regions`
/// keywords
pub fn location_diff_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    let old_segments: Vec<&str> = old.split('/').collect();
    let new_segments: Vec<&str> = new.split('/').collect();
    old_segments.len() == new_segments.len()
        && old_segments
            .iter()
            .zip(&new_segments)
            .all(|(old, new)| {
                old == new
                    || LOCATION_KEYWORDS.contains(old) && LOCATION_KEYWORDS.contains(new)
            })
}

/// Suppress the diff between a domain name and its absolute form with a trailing dot
pub fn absolute_domain_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    old != new && strip_trailing_dot(old) == strip_trailing_dot(new)
}

fn strip_trailing_dot(domain: &str) -> &str {
    domain.strip_suffix('.').unwrap_or(domain)
}

/// Suppress the diff between two spellings of the same duration, like `60s` and `1m`
pub fn duration_diff_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    match (parse_duration(old), parse_duration(new)) {
        (Some(old), Some(new)) => old == new,
        _ => false,
    }
}

/// Suppress the diff between an empty value and `default`
pub fn empty_or_default_string_suppress(
    default: impl Into<String>,
) -> impl Fn(&str, &str, &str, &dyn ResourceData) -> bool + Clone + Send + Sync {
    let default = default.into();
    move |_, old, new, _| is_empty_or_default(&default, old, new)
}

pub(super) fn is_empty_or_default(default: &str, old: &str, new: &str) -> bool {
    (old.is_empty() && new == default) || (new.is_empty() && old == default)
}

/// Suppress the diff when the new value is only the netmask of the old CIDR range
///
/// The API picks the network address when only a netmask like `/24` is given, so
/// `10.128.1.0/24 => /24` is not a change.
pub fn ip_cidr_range_diff_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    if !new.starts_with('/') {
        return false;
    }
    match old.rfind('/') {
        Some(start) => &old[start..] == new,
        None => false,
    }
}

/// Suppress the diff between `H:MM` and `0H:MM`
pub fn rfc3339_time_diff_suppress(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    let padded = |short: &str, long: &str| {
        short.len() == 4 && long.len() == 5 && long.starts_with('0') && &long[1..] == short
    };
    padded(old, new) || padded(new, old)
}

/// Suppress the diff when both values name the same resource
pub fn compare_resource_names(_: &str, old: &str, new: &str, _: &dyn ResourceData) -> bool {
    resource_name_from_self_link(old) == resource_name_from_self_link(new)
}

/// Suppress the diff between self links of different API versions or hosts
pub fn compare_self_link_relative_paths(
    _: &str,
    old: &str,
    new: &str,
    _: &dyn ResourceData,
) -> bool {
    match (relative_path(old), relative_path(new)) {
        (Ok(old), Ok(new)) => old == new,
        _ => false,
    }
}

/// Suppress the diff when the new value is either the name or a self link of the old resource
pub fn compare_self_link_or_resource_name(
    _: &str,
    old: &str,
    new: &str,
    _: &dyn ResourceData,
) -> bool {
    same_resource(old, new)
}
