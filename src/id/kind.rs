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

use std::{borrow::Cow, fmt::Display, str::FromStr};

use crate::error::IdError;

/// Top-level container of a resource
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum ContainerKind {
    Project,
    Folder,
    Organization,
    BillingAccount,
}

impl ContainerKind {
    pub const ALL: [ContainerKind; 4] = [
        ContainerKind::Project,
        ContainerKind::Folder,
        ContainerKind::Organization,
        ContainerKind::BillingAccount,
    ];

    /// Path keyword of the container, as it appears in identifiers
    pub const fn collection(self) -> &'static str {
        match self {
            ContainerKind::Project => "projects",
            ContainerKind::Folder => "folders",
            ContainerKind::Organization => "organizations",
            ContainerKind::BillingAccount => "billingAccounts",
        }
    }

    /// Name of the container id, used in format templates
    pub const fn singular(self) -> &'static str {
        match self {
            ContainerKind::Project => "project",
            ContainerKind::Folder => "folder",
            ContainerKind::Organization => "organization",
            ContainerKind::BillingAccount => "billing_account",
        }
    }

    /// Container with the given path keyword
    pub fn from_collection(collection: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.collection() == collection)
    }
}

impl Display for ContainerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.collection())
    }
}

impl FromStr for ContainerKind {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_collection(s).ok_or_else(|| IdError::UnknownContainer {
            raw: s.to_owned(),
            discriminant: s.to_owned(),
        })
    }
}

/// Shape of the scope segment between the container and the collection
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum ScopeKind {
    /// `.../global/{collection}/...`
    Global,
    /// `.../regions/{region}/{collection}/...`
    Regional,
    /// `.../zones/{zone}/{collection}/...`
    Zonal,
    /// `.../locations/{location}/{collection}/...`
    Location,
    /// `{container}/{id}/{collection}/...`
    Unscoped,
}

impl ScopeKind {
    /// Scope introduced by the path segment `keyword`
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "global" => Some(ScopeKind::Global),
            "regions" => Some(ScopeKind::Regional),
            "zones" => Some(ScopeKind::Zonal),
            "locations" => Some(ScopeKind::Location),
            _ => None,
        }
    }

    /// Path keyword introducing the scope
    pub const fn keyword(self) -> Option<&'static str> {
        match self {
            ScopeKind::Global => Some("global"),
            ScopeKind::Regional => Some("regions"),
            ScopeKind::Zonal => Some("zones"),
            ScopeKind::Location => Some("locations"),
            ScopeKind::Unscoped => None,
        }
    }

    /// Whether the keyword is followed by a value (region, zone or location)
    pub const fn has_value(self) -> bool {
        matches!(
            self,
            ScopeKind::Regional | ScopeKind::Zonal | ScopeKind::Location
        )
    }

    /// Name of the scope value, as reported when it cannot be defaulted
    pub const fn field(self) -> &'static str {
        match self {
            ScopeKind::Regional => "region",
            ScopeKind::Zonal => "zone",
            ScopeKind::Location => "location",
            ScopeKind::Global | ScopeKind::Unscoped => "scope",
        }
    }

    fn template(self) -> &'static str {
        match self {
            ScopeKind::Global => "global/",
            ScopeKind::Regional => "regions/{{region}}/",
            ScopeKind::Zonal => "zones/{{zone}}/",
            ScopeKind::Location => "locations/{{location}}/",
            ScopeKind::Unscoped => "",
        }
    }
}

/// Static description of a resource collection
///
/// A kind tells the parser which scope segment to expect and which containers may hold the
/// collection. Presets for the collections referenced by the provider live in [`kinds`].
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ResourceKind {
    collection: Cow<'static, str>,
    scope: ScopeKind,
    containers: Cow<'static, [ContainerKind]>,
}

const PROJECT_ONLY: &[ContainerKind] = &[ContainerKind::Project];

impl ResourceKind {
    pub const fn new(
        collection: &'static str,
        scope: ScopeKind,
        containers: &'static [ContainerKind],
    ) -> Self {
        Self {
            collection: Cow::Borrowed(collection),
            scope,
            containers: Cow::Borrowed(containers),
        }
    }

    /// Project-level collection under `global/`
    pub const fn global(collection: &'static str) -> Self {
        Self::new(collection, ScopeKind::Global, PROJECT_ONLY)
    }

    /// Project-level collection under `regions/{region}/`
    pub const fn regional(collection: &'static str) -> Self {
        Self::new(collection, ScopeKind::Regional, PROJECT_ONLY)
    }

    /// Project-level collection under `zones/{zone}/`
    pub const fn zonal(collection: &'static str) -> Self {
        Self::new(collection, ScopeKind::Zonal, PROJECT_ONLY)
    }

    /// Project-level collection under `locations/{location}/`
    pub const fn location(collection: &'static str) -> Self {
        Self::new(collection, ScopeKind::Location, PROJECT_ONLY)
    }

    /// Collection directly under the project
    pub const fn project(collection: &'static str) -> Self {
        Self::new(collection, ScopeKind::Unscoped, PROJECT_ONLY)
    }

    /// Kind built at runtime
    pub fn custom<S: Into<String>, C: Into<Vec<ContainerKind>>>(
        collection: S,
        scope: ScopeKind,
        containers: C,
    ) -> Self {
        Self {
            collection: Cow::Owned(collection.into()),
            scope,
            containers: Cow::Owned(containers.into()),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn scope(&self) -> ScopeKind {
        self.scope
    }

    pub fn containers(&self) -> &[ContainerKind] {
        &self.containers
    }

    /// Whether `container` may hold this collection
    pub fn allows(&self, container: ContainerKind) -> bool {
        self.containers.contains(&container)
    }

    /// Canonical format, for error messages
    pub fn expected_format(&self) -> String {
        let container = match self.containers() {
            [single] => format!("{}/{{{{{}}}}}", single.collection(), single.singular()),
            _ => String::from("{{container_type}}/{{container}}"),
        };
        format!(
            "{container}/{}{}/{{{{name}}}}",
            self.scope.template(),
            self.collection
        )
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scope = match self.scope {
            ScopeKind::Global => "global",
            ScopeKind::Regional => "regional",
            ScopeKind::Zonal => "zonal",
            ScopeKind::Location => "location",
            ScopeKind::Unscoped => match self.containers() {
                [ContainerKind::Project] => "project",
                [ContainerKind::Folder] => "folder",
                [ContainerKind::Organization] => "organization",
                [ContainerKind::BillingAccount] => "billing_account",
                _ => "any",
            },
        };
        write!(f, "{scope}:{}", self.collection)
    }
}

impl FromStr for ResourceKind {
    type Err = IdError;

    /// Parse `<scope>:<collection>`, or one of the `sink` and `exclusion` shortcuts
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sink" => return Ok(kinds::LOGGING_SINK),
            "exclusion" => return Ok(kinds::LOGGING_EXCLUSION),
            _ => (),
        }
        let unknown = || IdError::UnknownKind(s.to_owned());
        let (scope, collection) = s.split_once(':').ok_or_else(unknown)?;
        if collection.is_empty()
            || collection.contains('/')
            || ScopeKind::from_keyword(collection).is_some()
        {
            return Err(unknown());
        }
        let (scope, containers): (_, &[ContainerKind]) = match scope {
            "global" => (ScopeKind::Global, PROJECT_ONLY),
            "regional" => (ScopeKind::Regional, PROJECT_ONLY),
            "zonal" => (ScopeKind::Zonal, PROJECT_ONLY),
            "location" => (ScopeKind::Location, PROJECT_ONLY),
            "project" => (ScopeKind::Unscoped, PROJECT_ONLY),
            "folder" => (ScopeKind::Unscoped, &[ContainerKind::Folder]),
            "organization" => (ScopeKind::Unscoped, &[ContainerKind::Organization]),
            "billing_account" => (ScopeKind::Unscoped, &[ContainerKind::BillingAccount]),
            "any" => (ScopeKind::Unscoped, &ContainerKind::ALL),
            _ => return Err(unknown()),
        };
        Ok(Self::custom(collection, scope, containers))
    }
}

/// Kinds of the collections referenced by the provider
pub mod kinds {
    use super::{ContainerKind, ResourceKind, ScopeKind};

    pub const NETWORK: ResourceKind = ResourceKind::global("networks");
    pub const SSL_CERTIFICATE: ResourceKind = ResourceKind::global("sslCertificates");
    pub const HTTP_HEALTH_CHECK: ResourceKind = ResourceKind::global("httpHealthChecks");
    pub const INSTANCE_TEMPLATE: ResourceKind = ResourceKind::global("instanceTemplates");
    pub const MACHINE_IMAGE: ResourceKind = ResourceKind::global("machineImages");
    pub const SECURITY_POLICY: ResourceKind = ResourceKind::global("securityPolicies");

    pub const SUBNETWORK: ResourceKind = ResourceKind::regional("subnetworks");
    pub const ADDRESS: ResourceKind = ResourceKind::regional("addresses");
    pub const REGION_DISK: ResourceKind = ResourceKind::regional("disks");
    pub const REGION_SECURITY_POLICY: ResourceKind = ResourceKind::regional("securityPolicies");
    pub const REGION_NETWORK_ENDPOINT_GROUP: ResourceKind =
        ResourceKind::regional("networkEndpointGroups");

    pub const DISK: ResourceKind = ResourceKind::zonal("disks");
    pub const INSTANCE: ResourceKind = ResourceKind::zonal("instances");
    pub const INSTANCE_GROUP: ResourceKind = ResourceKind::zonal("instanceGroups");
    pub const MACHINE_TYPE: ResourceKind = ResourceKind::zonal("machineTypes");
    pub const ACCELERATOR_TYPE: ResourceKind = ResourceKind::zonal("acceleratorTypes");
    pub const NETWORK_ENDPOINT_GROUP: ResourceKind = ResourceKind::zonal("networkEndpointGroups");

    pub const SERVICE_ACCOUNT: ResourceKind = ResourceKind::project("serviceAccounts");

    /// Custom roles defined at the organization level
    pub const ORGANIZATION_ROLE: ResourceKind =
        ResourceKind::new("roles", ScopeKind::Unscoped, &[ContainerKind::Organization]);

    pub const LOGGING_SINK: ResourceKind =
        ResourceKind::new("sinks", ScopeKind::Unscoped, &ContainerKind::ALL);
    pub const LOGGING_EXCLUSION: ResourceKind =
        ResourceKind::new("exclusions", ScopeKind::Unscoped, &ContainerKind::ALL);
}
