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

use crate::attribute_path::AttributePath;

/// Errors collected while processing a resource, reported all at once
#[derive(Clone, PartialEq, Eq, Hash, Debug, Default)]
pub struct Diagnostics {
    /// List of errors
    pub errors: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Add an error diagnostic
    pub fn add_error(&mut self, diag: Diagnostic) {
        self.errors.push(diag)
    }
    /// Add an error on the attribute at `attribute`
    pub fn error<S: Into<Cow<'static, str>>>(&mut self, summary: S, attribute: AttributePath) {
        self.add_error(Diagnostic::new(summary, attribute))
    }
    /// Add an error about the whole resource
    pub fn root_error<S: Into<Cow<'static, str>>>(&mut self, summary: S) {
        self.add_error(Diagnostic::root(summary))
    }
    /// Add an internal error if there is no existing errors
    pub fn internal_error(&mut self) {
        if self.errors.is_empty() {
            self.root_error("Internal error");
        }
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

impl Display for Diagnostics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for diag in &self.errors {
            writeln!(f, "Error: {diag}")?;
        }
        Ok(())
    }
}

#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Diagnostic {
    pub summary: Cow<'static, str>,
    pub attribute: AttributePath,
}

impl Diagnostic {
    pub fn new<S: Into<Cow<'static, str>>>(summary: S, attribute: AttributePath) -> Self {
        Self {
            summary: summary.into(),
            attribute,
        }
    }
    /// Create a diagnostic without AttributePath
    pub fn root<S: Into<Cow<'static, str>>>(summary: S) -> Self {
        Self::new(summary, AttributePath::default())
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.attribute.is_empty() {
            write!(f, "{}: ", self.attribute)?;
        }
        f.write_str(&self.summary)
    }
}
