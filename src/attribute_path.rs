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

use std::{borrow::Cow, fmt::Display};

/// Represent the path to an attribute
///
/// Terraform flattens attribute paths into "flatmap" keys: `network_interface.0.alias_ip_range.0.ip_cidr_range`
/// for nested list blocks, `labels.env` for map elements, `labels.%` and `tags.#` for the element counts.
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct AttributePath {
    pub steps: Vec<AttributePathStep>,
}

impl AttributePath {
    /// Create a new attribute path with the `root` attribute
    pub fn new<T: Into<Cow<'static, str>>>(root: T) -> Self {
        Self {
            steps: vec![AttributePathStep::Attribute(root.into())],
        }
    }
    /// Create a new attribute path where the attribute `.name` has been appended
    pub fn attribute<T: Into<Cow<'static, str>>>(mut self, name: T) -> Self {
        self.add_attribute(name);
        self
    }
    /// Create a new attribute path where the access `[idx]` has been appended
    pub fn index<T: Into<i64>>(mut self, idx: T) -> Self {
        self.add_index(idx);
        self
    }

    /// add name access to the path (ie: `.name`)
    pub fn add_attribute<T: Into<Cow<'static, str>>>(&mut self, name: T) -> &mut Self {
        self.steps.push(AttributePathStep::Attribute(name.into()));
        self
    }
    /// add index access to the path (ie: `[idx]`)
    pub fn add_index<T: Into<i64>>(&mut self, idx: T) -> &mut Self {
        self.steps.push(AttributePathStep::Index(idx.into()));
        self
    }

    /// Parse a flatmap key
    ///
    /// Numeric segments become [`AttributePathStep::Index`], every other segment an attribute:
    /// the flatmap form cannot tell a map key from a nested attribute.
    pub fn from_flatmap(key: &str) -> Self {
        Self {
            steps: key
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(|segment| match segment.parse::<i64>() {
                    Ok(idx) if idx >= 0 => AttributePathStep::Index(idx),
                    _ => AttributePathStep::Attribute(segment.to_owned().into()),
                })
                .collect(),
        }
    }

    /// Render the path as a flatmap key
    pub fn to_flatmap(&self) -> String {
        let mut key = String::new();
        for step in &self.steps {
            if !key.is_empty() {
                key.push('.');
            }
            match step {
                AttributePathStep::Attribute(name) => key.push_str(name),
                AttributePathStep::Index(idx) => key.push_str(&idx.to_string()),
            }
        }
        key
    }

    /// Path of the schema attribute, without the list indices
    pub fn schema_path(&self) -> Self {
        Self {
            steps: self
                .steps
                .iter()
                .filter(|step| !matches!(step, AttributePathStep::Index(_)))
                .cloned()
                .collect(),
        }
    }

    /// Path without its last step, if any
    pub fn parent(&self) -> Option<Self> {
        let (_, steps) = self.steps.split_last()?;
        Some(Self {
            steps: steps.to_vec(),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

impl Display for AttributePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, step) in self.steps.iter().enumerate() {
            if i > 0 && matches!(step, AttributePathStep::Attribute(_)) {
                f.write_str(".")?;
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum AttributePathStep {
    Attribute(Cow<'static, str>),
    Index(i64),
}

impl Display for AttributePathStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AttributePathStep::Attribute(name) => f.write_str(name.as_ref()),
            AttributePathStep::Index(idx) => f.write_fmt(format_args!("[{}]", idx)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flatmap_indices_become_index_steps() {
        let path = AttributePath::from_flatmap("network_interface.0.alias_ip_range.1.ip_cidr_range");
        assert_eq!(
            path,
            AttributePath::new("network_interface")
                .index(0)
                .attribute("alias_ip_range")
                .index(1)
                .attribute("ip_cidr_range")
        );
        assert_eq!(
            path.to_string(),
            "network_interface[0].alias_ip_range[1].ip_cidr_range"
        );
    }

    #[test]
    fn schema_path_drops_indices() {
        let path = AttributePath::from_flatmap("network_interface.0.alias_ip_range.0.ip_cidr_range");
        assert_eq!(
            path.schema_path().to_flatmap(),
            "network_interface.alias_ip_range.ip_cidr_range"
        );
    }

    #[test]
    fn parent_of_map_element() {
        let path = AttributePath::from_flatmap("labels.env");
        assert_eq!(path.parent(), Some(AttributePath::new("labels")));
        assert_eq!(AttributePath::default().parent(), None);
    }

    #[test]
    fn count_keys_are_attributes() {
        let path = AttributePath::from_flatmap("labels.%");
        assert_eq!(path.to_flatmap(), "labels.%");
        assert_eq!(path.steps.len(), 2);
    }
}
