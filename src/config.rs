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

//! Provider-level configuration
//!
//! The values here are the fallbacks used whenever a resource does not carry its own
//! `project`, `region` or `zone`.

use std::{collections::HashMap, env};

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

pub const DEFAULT_UNIVERSE_DOMAIN: &str = "googleapis.com";

const PROJECT_ENV_VARS: &[&str] = &[
    "GOOGLE_PROJECT",
    "GOOGLE_CLOUD_PROJECT",
    "GCLOUD_PROJECT",
    "CLOUDSDK_CORE_PROJECT",
];
const BILLING_PROJECT_ENV_VARS: &[&str] = &["GOOGLE_BILLING_PROJECT"];
const REGION_ENV_VARS: &[&str] = &["GOOGLE_REGION", "GCLOUD_REGION", "CLOUDSDK_COMPUTE_REGION"];
const ZONE_ENV_VARS: &[&str] = &["GOOGLE_ZONE", "GCLOUD_ZONE", "CLOUDSDK_COMPUTE_ZONE"];
const USER_PROJECT_OVERRIDE_ENV_VAR: &str = "USER_PROJECT_OVERRIDE";

/// Configuration of the provider block
#[derive(Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub project: String,
    pub billing_project: String,
    pub region: String,
    pub zone: String,
    pub universe_domain: String,
    pub user_project_override: Option<bool>,
    /// Service base paths, keyed like `ComputeBasePath`
    pub base_paths: HashMap<String, String>,
}

impl ProviderConfig {
    /// Fill every unset field from the first non-empty environment variable of its list
    pub fn handle_sdk_defaults(&mut self) -> Result<(), LookupError> {
        self.handle_sdk_defaults_with(|name| env::var(name).ok())
    }

    /// Same as [`ProviderConfig::handle_sdk_defaults`] with a custom variable source
    pub fn handle_sdk_defaults_with<F>(&mut self, lookup: F) -> Result<(), LookupError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let multi_env = |names: &[&str]| {
            names.iter().find_map(|name| {
                let value = lookup(name).filter(|value| !value.is_empty())?;
                tracing::debug!("using {name} from the environment");
                Some(value)
            })
        };

        for (field, names) in [
            (&mut self.project, PROJECT_ENV_VARS),
            (&mut self.billing_project, BILLING_PROJECT_ENV_VARS),
            (&mut self.region, REGION_ENV_VARS),
            (&mut self.zone, ZONE_ENV_VARS),
        ] {
            if field.is_empty() {
                if let Some(value) = multi_env(names) {
                    *field = value;
                }
            }
        }

        if self.user_project_override.is_none() {
            if let Some(value) = multi_env(&[USER_PROJECT_OVERRIDE_ENV_VAR]) {
                let parsed = parse_bool(&value).ok_or(LookupError::InvalidEnv {
                    name: USER_PROJECT_OVERRIDE_ENV_VAR,
                    value,
                })?;
                self.user_project_override = Some(parsed);
            }
        }
        Ok(())
    }

    /// Universe domain, `googleapis.com` when unset
    pub fn universe_domain(&self) -> &str {
        if self.universe_domain.is_empty() {
            DEFAULT_UNIVERSE_DOMAIN
        } else {
            &self.universe_domain
        }
    }

    /// Base URL of the compute API, ending with a slash
    pub fn compute_base_path(&self) -> String {
        match self.base_path("ComputeBasePath") {
            Some(path) => path.to_owned(),
            None => format!("https://compute.{}/compute/v1/", self.universe_domain()),
        }
    }

    /// Look up a configured base path by name
    pub fn base_path(&self, name: &str) -> Option<&str> {
        self.base_paths
            .get(name)
            .map(String::as_str)
            .filter(|path| !path.is_empty())
    }
}

// Accepts the same spellings as Go's strconv.ParseBool.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lookup<'a>(vars: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        move |name| {
            vars.iter()
                .find(|(k, _)| *k == name)
                .map(|(_, v)| v.to_string())
        }
    }

    #[test]
    fn env_precedence_follows_the_list_order() {
        let mut config = ProviderConfig::default();
        config
            .handle_sdk_defaults_with(lookup(&[
                ("GCLOUD_PROJECT", "project-from-GCLOUD_PROJECT"),
                ("GOOGLE_CLOUD_PROJECT", "project-from-GOOGLE_CLOUD_PROJECT"),
                ("GOOGLE_PROJECT", ""),
                ("CLOUDSDK_COMPUTE_REGION", "us-east1"),
                ("GOOGLE_ZONE", "us-central1-a"),
            ]))
            .unwrap();
        assert_eq!(config.project, "project-from-GOOGLE_CLOUD_PROJECT");
        assert_eq!(config.region, "us-east1");
        assert_eq!(config.zone, "us-central1-a");
        assert_eq!(config.billing_project, "");
        assert_eq!(config.user_project_override, None);
    }

    #[test]
    fn explicit_values_win_over_env() {
        let mut config = ProviderConfig {
            project: "explicit".into(),
            ..Default::default()
        };
        config
            .handle_sdk_defaults_with(lookup(&[("GOOGLE_PROJECT", "from-env")]))
            .unwrap();
        assert_eq!(config.project, "explicit");
    }

    #[test]
    fn user_project_override_must_be_a_bool() {
        let mut config = ProviderConfig::default();
        config
            .handle_sdk_defaults_with(lookup(&[("USER_PROJECT_OVERRIDE", "true")]))
            .unwrap();
        assert_eq!(config.user_project_override, Some(true));

        let mut config = ProviderConfig::default();
        let err = config
            .handle_sdk_defaults_with(lookup(&[("USER_PROJECT_OVERRIDE", "maybe")]))
            .unwrap_err();
        assert!(matches!(err, LookupError::InvalidEnv { .. }));
    }

    #[test]
    fn compute_base_path_uses_universe_domain() {
        let mut config = ProviderConfig::default();
        assert_eq!(
            config.compute_base_path(),
            "https://compute.googleapis.com/compute/v1/"
        );
        config.universe_domain = "example.com".into();
        assert_eq!(
            config.compute_base_path(),
            "https://compute.example.com/compute/v1/"
        );
        config
            .base_paths
            .insert("ComputeBasePath".into(), "https://proxy/compute/beta/".into());
        assert_eq!(config.compute_base_path(), "https://proxy/compute/beta/");
    }

    #[test]
    fn deserialize_partial_config() {
        let config: ProviderConfig =
            serde_json::from_str(r#"{"project": "p", "region": "us-central1"}"#).unwrap();
        assert_eq!(config.project, "p");
        assert_eq!(config.region, "us-central1");
        assert!(config.zone.is_empty());
        assert_eq!(config.universe_domain(), DEFAULT_UNIVERSE_DOMAIN);
    }
}
