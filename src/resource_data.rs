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

//! Read-only view on the attributes of a resource
//!
//! Resource handlers expose their state through [`ResourceData`]; the field lookups and the
//! diff suppressors only ever read from it.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Read access to the attributes of a resource, addressed by flatmap key
pub trait ResourceData {
    /// Identifier recorded in the state, empty when the resource is not created yet
    fn id(&self) -> &str;

    /// Raw value stored at `key`, if the attribute exists
    fn get(&self, key: &str) -> Option<&Value>;

    /// Value at `key` if it is set to a non-zero value
    ///
    /// Empty strings, `false`, `0`, empty collections and `null` are all reported as unset.
    fn get_ok(&self, key: &str) -> Option<&Value> {
        self.get(key).filter(|value| !is_zero_value(value))
    }

    /// Non-empty string at `key`
    fn get_ok_str(&self, key: &str) -> Option<&str> {
        self.get_ok(key).and_then(Value::as_str)
    }
}

/// Whether `value` is the zero value of its type
pub fn is_zero_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

/// Render a scalar value the way it appears in a URL or an identifier
pub fn value_to_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Null => Cow::Borrowed(""),
        other => Cow::Owned(other.to_string()),
    }
}

/// Resource state backed by a JSON object
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize)]
pub struct ResourceState {
    #[serde(default)]
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl ResourceState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_id<S: Into<String>>(mut self, id: S) -> Self {
        self.id = id.into();
        self
    }

    /// Set a top-level attribute
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }
}

impl ResourceData for ResourceState {
    fn id(&self) -> &str {
        &self.id
    }

    fn get(&self, key: &str) -> Option<&Value> {
        let mut segments = key.split('.');
        let mut current = self.attributes.get(segments.next()?)?;
        for segment in segments {
            current = match current {
                Value::Object(map) => map.get(segment)?,
                Value::Array(list) => list.get(segment.parse::<usize>().ok()?)?,
                _ => return None,
            };
        }
        Some(current)
    }
}

/// Resource without any attribute, for callers that have no state at hand
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct EmptyResourceData;

impl ResourceData for EmptyResourceData {
    fn id(&self) -> &str {
        ""
    }

    fn get(&self, _key: &str) -> Option<&Value> {
        None
    }
}
