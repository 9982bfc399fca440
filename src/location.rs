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

//! Resolution of `project`, `region`, `zone` and `location`
//!
//! Each lookup reads the resource first and falls back on the provider configuration.

use crate::{config::ProviderConfig, error::LookupError, resource_data::ResourceData};

/// Last segment of a self link, or the value itself if it has no `/`
pub fn resource_name_from_self_link(link: &str) -> &str {
    link.rsplit('/').next().unwrap_or(link)
}

/// Region of a zone, by removing its last two characters
///
/// `southamerica-west1-a` gives `southamerica-west1`. Inputs of two characters or less give
/// an empty string.
pub fn region_from_zone(zone: &str) -> &str {
    match zone.char_indices().rev().nth(1) {
        Some((idx, _)) => &zone[..idx],
        None => "",
    }
}

/// Whether a location looks like a zone (`us-central1-a`) rather than a region
pub fn is_zone(location: &str) -> bool {
    location.split('-').count() == 3
}

/// Project from the `project_field` attribute of the resource, then from the provider
pub fn get_project_from_schema(
    project_field: &str,
    d: &dyn ResourceData,
    config: &ProviderConfig,
) -> Result<String, LookupError> {
    if !project_field.is_empty() {
        if let Some(project) = d.get_ok_str(project_field) {
            return Ok(project.to_owned());
        }
    }
    if !config.project.is_empty() {
        return Ok(config.project.clone());
    }
    Err(LookupError::MissingField(project_field.to_owned()))
}

/// Project of the resource (`project` attribute), falling back on the provider project
pub fn get_project(d: &dyn ResourceData, config: &ProviderConfig) -> Result<String, LookupError> {
    get_project_from_schema("project", d, config)
}

/// Billing project of the resource (`billing_project` attribute), falling back on the provider
pub fn get_billing_project(
    d: &dyn ResourceData,
    config: &ProviderConfig,
) -> Result<String, LookupError> {
    if let Some(project) = d.get_ok_str("billing_project") {
        return Ok(project.to_owned());
    }
    if !config.billing_project.is_empty() {
        return Ok(config.billing_project.clone());
    }
    Err(LookupError::MissingField("billing_project".to_owned()))
}

/// Universe domain of the resource, the provider, or `googleapis.com`
pub fn get_universe_domain(
    universe_field: &str,
    d: &dyn ResourceData,
    config: &ProviderConfig,
) -> String {
    if !universe_field.is_empty() {
        if let Some(domain) = d.get_ok_str(universe_field) {
            return domain.to_owned();
        }
    }
    config.universe_domain().to_owned()
}

/// Infers the region, in order of priority, from:
/// - `region_field` in the resource,
/// - the region of `zone_field` in the resource,
/// - the provider-level region,
/// - the region of the provider-level zone.
///
/// When both fields are the same attribute (GKE `location`), a zone value is turned into its
/// region and any other value is returned as-is.
pub fn get_region_from_schema(
    region_field: &str,
    zone_field: &str,
    d: &dyn ResourceData,
    config: &ProviderConfig,
) -> Result<String, LookupError> {
    if region_field == zone_field {
        if let Some(location) = d.get_ok_str(region_field) {
            if is_zone(location) {
                return Ok(region_from_zone(location).to_owned());
            }
            return Ok(location.to_owned());
        }
    }

    if !region_field.is_empty() {
        if let Some(region) = d.get_ok_str(region_field) {
            return Ok(resource_name_from_self_link(region).to_owned());
        }
    }
    if !zone_field.is_empty() {
        if let Some(zone) = d.get_ok_str(zone_field) {
            return Ok(region_from_zone(resource_name_from_self_link(zone)).to_owned());
        }
    }
    if !config.region.is_empty() {
        return Ok(config.region.clone());
    }
    if !config.zone.is_empty() {
        return Ok(region_from_zone(&config.zone).to_owned());
    }

    Err(LookupError::CannotDetermineRegion)
}

/// Region of the resource, see [`get_region_from_schema`]
pub fn get_region(d: &dyn ResourceData, config: &ProviderConfig) -> Result<String, LookupError> {
    get_region_from_schema("region", "zone", d, config)
}

/// Zone of the resource (shortened if it is a self link), or the provider-level zone
pub fn get_zone(d: &dyn ResourceData, config: &ProviderConfig) -> Result<String, LookupError> {
    if let Some(zone) = d.get_ok_str("zone") {
        return Ok(resource_name_from_self_link(zone).to_owned());
    }
    if !config.zone.is_empty() {
        return Ok(config.zone.clone());
    }
    Err(LookupError::CannotDetermineZone)
}

/// Location of the resource
///
/// `location` and `region` are returned untouched; `zone` goes through [`get_zone`].
/// The provider-level region is never used.
pub fn get_location(d: &dyn ResourceData, config: &ProviderConfig) -> Result<String, LookupError> {
    for field in ["location", "region"] {
        if let Some(location) = d.get_ok_str(field) {
            return Ok(location.to_owned());
        }
    }
    get_zone(d, config).map_err(|_| LookupError::CannotDetermineLocation)
}

/// Fully qualified name of a service account:
/// `projects/-/serviceAccounts/{account_id}@{project}.iam.gserviceaccount.com`
///
/// A project is only needed when `service_account` is a bare account id.
pub fn service_account_fqn(
    service_account: &str,
    d: &dyn ResourceData,
    config: &ProviderConfig,
) -> Result<String, LookupError> {
    if service_account.starts_with("projects/") {
        return Ok(service_account.to_owned());
    }
    if service_account.contains('@') {
        return Ok(format!("projects/-/serviceAccounts/{service_account}"));
    }
    let project = get_project(d, config)?;
    Ok(format!(
        "projects/-/serviceAccounts/{service_account}@{project}.iam.gserviceaccount.com"
    ))
}
