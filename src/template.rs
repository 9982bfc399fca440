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

//! `{{var}}` substitution in URL and identifier templates
//!
//! `projects/{{project}}/regions/{{region}}/addresses/{{name}}` is filled from the resource
//! attributes, with `{{project}}`, `{{project_id_or_project}}`, `{{region}}` and `{{zone}}`
//! resolved through the usual provider fallbacks, and unknown names looked up in the provider
//! base paths (`{{ComputeBasePath}}`).

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

use crate::{
    config::ProviderConfig,
    error::LookupError,
    location::{get_project, get_region, get_zone, resource_name_from_self_link},
    resource_data::{value_to_string, ResourceData},
};

const MAX_DEPTH: usize = 10;

static VARIABLE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("Invalid variable regex"));

/// Replace every `{{var}}` of `template`
pub fn replace_vars(
    d: &dyn ResourceData,
    config: &ProviderConfig,
    template: &str,
) -> Result<String, LookupError> {
    replace_vars_recursive(d, config, template, false, 0)
}

/// Same as [`replace_vars`], but attribute values are shortened to their last path segment
///
/// With `access_level = "accessPolicies/foo/accessLevels/bar"`, the template
/// `accessPolicies/{{access_policy}}/accessLevels/{{access_level}}` stays well-formed.
pub fn replace_vars_for_id(
    d: &dyn ResourceData,
    config: &ProviderConfig,
    template: &str,
) -> Result<String, LookupError> {
    replace_vars_recursive(d, config, template, true, 0)
}

// Base paths may themselves contain variables (`https://{{region}}-run.googleapis.com/`).
fn replace_vars_recursive(
    d: &dyn ResourceData,
    config: &ProviderConfig,
    template: &str,
    shorten: bool,
    depth: usize,
) -> Result<String, LookupError> {
    if depth > MAX_DEPTH {
        return Err(LookupError::RecursiveSubstitution(template.to_owned()));
    }

    let re = &*VARIABLE_REGEX;
    let vars = BuiltinVars::resolve(d, config, template)?;

    let replaced = re
        .replace_all(template, |caps: &Captures| {
            vars.lookup(&caps[1], d, config, shorten)
        })
        .into_owned();

    if re.is_match(&replaced) {
        return replace_vars_recursive(d, config, &replaced, shorten, depth + 1);
    }
    Ok(replaced)
}

#[derive(Default)]
struct BuiltinVars {
    project: String,
    project_id: String,
    region: String,
    zone: String,
}

impl BuiltinVars {
    /// Resolve only the variables the template uses, so unused ones cannot fail
    fn resolve(
        d: &dyn ResourceData,
        config: &ProviderConfig,
        template: &str,
    ) -> Result<Self, LookupError> {
        let mut vars = Self::default();
        if template.contains("{{project}}") {
            vars.project = get_project(d, config)?;
        }
        if template.contains("{{project_id_or_project}}") {
            if let Some(project_id) = d.get("project_id") {
                vars.project_id = value_to_string(project_id).into_owned();
            }
            if vars.project_id.is_empty() {
                vars.project = get_project(d, config)?;
            }
        }
        if template.contains("{{region}}") {
            vars.region = get_region(d, config)?;
        }
        if template.contains("{{zone}}") {
            vars.zone = get_zone(d, config)?;
        }
        Ok(vars)
    }

    fn lookup(
        &self,
        name: &str,
        d: &dyn ResourceData,
        config: &ProviderConfig,
        shorten: bool,
    ) -> String {
        match name {
            "project" => self.project.clone(),
            "project_id_or_project" if !self.project_id.is_empty() => self.project_id.clone(),
            "project_id_or_project" => self.project.clone(),
            "region" => self.region.clone(),
            "zone" => self.zone.clone(),
            _ => {
                if let Some(value) = d.get(name) {
                    let value = value_to_string(value);
                    if shorten {
                        return resource_name_from_self_link(&value).to_owned();
                    }
                    return value.into_owned();
                }
                config.base_path(name).unwrap_or_default().to_owned()
            }
        }
    }
}
