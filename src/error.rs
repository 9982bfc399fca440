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

//! Error types returned by the identifier codec and the field lookups.

use thiserror::Error;

/// Errors that can occur when parsing a resource reference.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The reference is empty while a value is required.
    #[error("the reference to {collection} cannot be empty")]
    Empty { collection: String },

    /// The reference does not match any accepted shape.
    #[error("invalid format: got '{raw}', expected format '{expected}'")]
    InvalidFormat { raw: String, expected: String },

    /// The container segment is not a known resource type.
    #[error(
        "unrecognized resource type '{discriminant}' in '{raw}', \
         expected one of projects, folders, organizations, billingAccounts"
    )]
    UnknownContainer { raw: String, discriminant: String },

    /// The container is known, but cannot hold this collection.
    #[error("{collection} cannot be nested under {container} (in '{raw}')")]
    ContainerNotAllowed {
        raw: String,
        container: &'static str,
        collection: String,
    },

    /// A shorthand omits a part and no default is configured for it.
    #[error("'{raw}' does not specify a {field} and no default {field} is configured")]
    MissingDefault { raw: String, field: &'static str },

    /// The parent value does not match the extraction pattern.
    #[error("parent of '{field}' has no matching values from pattern '{pattern}' in value '{parent}'")]
    NoPatternMatch {
        field: String,
        pattern: String,
        parent: String,
    },

    /// A field and its parent disagree.
    #[error("'{field}' has conflicting values of '{from_parent}' (from parent) and '{from_self}' (from self)")]
    ConflictingValues {
        field: String,
        from_parent: String,
        from_self: String,
    },

    /// An extraction pattern failed to compile.
    #[error("invalid pattern: {0}")]
    Pattern(String),

    /// A resource kind description is not of the form `<scope>:<collection>`.
    #[error("unknown resource kind '{0}', expected '<scope>:<collection>', 'sink' or 'exclusion'")]
    UnknownKind(String),
}

impl IdError {
    /// Returns true if this error is about a missing default.
    pub fn is_missing_default(&self) -> bool {
        matches!(self, IdError::MissingDefault { .. })
    }

    /// Returns true if this error is about the container segment.
    pub fn is_container_error(&self) -> bool {
        matches!(
            self,
            IdError::UnknownContainer { .. } | IdError::ContainerNotAllowed { .. }
        )
    }
}

impl From<regex::Error> for IdError {
    fn from(value: regex::Error) -> Self {
        IdError::Pattern(value.to_string())
    }
}

/// Errors that can occur when resolving a field from a resource and the provider configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Neither the resource nor the provider sets the field.
    #[error("{0}: required field is not set")]
    MissingField(String),

    #[error("cannot determine region: set in this resource, or set provider-level 'region' or 'zone'")]
    CannotDetermineRegion,

    #[error("cannot determine zone: set in this resource, or set provider-level zone")]
    CannotDetermineZone,

    #[error("cannot determine location: set in this resource, or set provider-level zone")]
    CannotDetermineLocation,

    /// Template substitution did not converge.
    #[error("recursive substitution detected in '{0}'")]
    RecursiveSubstitution(String),

    /// An environment variable holds a value of the wrong type.
    #[error("invalid value '{value}' for environment variable {name}")]
    InvalidEnv { name: &'static str, value: String },
}
