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

use crate::{attribute_path::AttributePath, diagnostics::Diagnostics};

/// Move the error of a result into [`Diagnostics`]
///
/// This is how provider callbacks report failures: they keep going with an [`Option`]
/// and let Terraform display every collected error at once.
pub trait ExtractDiagnostics {
    type Output;
    /// Report the error at the root of the resource
    fn extract_diagnostics(self, diags: &mut Diagnostics) -> Self::Output;
    /// Report the error on the attribute at `attr_path`
    fn extract_diagnostics_at(self, diags: &mut Diagnostics, attr_path: AttributePath)
        -> Self::Output;
}

impl<T> ExtractDiagnostics for Option<T> {
    type Output = Self;
    fn extract_diagnostics(self, diags: &mut Diagnostics) -> Self::Output {
        if self.is_none() {
            diags.internal_error();
        }
        self
    }
    fn extract_diagnostics_at(self, diags: &mut Diagnostics, _: AttributePath) -> Self::Output {
        self.extract_diagnostics(diags)
    }
}

impl<T, E> ExtractDiagnostics for Result<T, E>
where
    E: ToString,
{
    type Output = Option<T>;
    fn extract_diagnostics(self, diags: &mut Diagnostics) -> Self::Output {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                diags.root_error(err.to_string());
                None
            }
        }
    }
    fn extract_diagnostics_at(
        self,
        diags: &mut Diagnostics,
        attr_path: AttributePath,
    ) -> Self::Output {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                diags.error(err.to_string(), attr_path);
                None
            }
        }
    }
}
