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

use std::{fmt::Display, str::FromStr};

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::{
    config::ProviderConfig,
    error::IdError,
    location::{get_project, get_region, get_zone, region_from_zone, resource_name_from_self_link},
    resource_data::ResourceData,
};

use super::kind::{ContainerKind, ResourceKind, ScopeKind};

/// Scope segment of an identifier
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Scope {
    Global,
    Region(String),
    Zone(String),
    Location(String),
    Unscoped,
}

impl Scope {
    pub fn kind(&self) -> ScopeKind {
        match self {
            Scope::Global => ScopeKind::Global,
            Scope::Region(_) => ScopeKind::Regional,
            Scope::Zone(_) => ScopeKind::Zonal,
            Scope::Location(_) => ScopeKind::Location,
            Scope::Unscoped => ScopeKind::Unscoped,
        }
    }

    /// Region, zone or location name
    pub fn value(&self) -> Option<&str> {
        match self {
            Scope::Region(value) | Scope::Zone(value) | Scope::Location(value) => Some(value),
            Scope::Global | Scope::Unscoped => None,
        }
    }

    fn with_value(kind: ScopeKind, value: Option<&str>) -> Self {
        match (kind, value) {
            (ScopeKind::Regional, Some(value)) => Scope::Region(value.to_owned()),
            (ScopeKind::Zonal, Some(value)) => Scope::Zone(value.to_owned()),
            (ScopeKind::Location, Some(value)) => Scope::Location(value.to_owned()),
            (ScopeKind::Unscoped, _) => Scope::Unscoped,
            _ => Scope::Global,
        }
    }
}

/// Values used to complete a shorthand reference
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct IdDefaults {
    pub project: Option<String>,
    pub region: Option<String>,
    pub zone: Option<String>,
}

impl IdDefaults {
    /// Defaults of the provider block
    ///
    /// When no region is configured, it is derived from the configured zone.
    pub fn from_config(config: &ProviderConfig) -> Self {
        let non_empty = |value: &str| {
            let value = resource_name_from_self_link(value);
            (!value.is_empty()).then(|| value.to_owned())
        };
        let zone = non_empty(&config.zone);
        let region = non_empty(&config.region).or_else(|| {
            zone.as_deref()
                .map(region_from_zone)
                .filter(|region| !region.is_empty())
                .map(str::to_owned)
        });
        Self {
            project: non_empty(&config.project),
            region,
            zone,
        }
    }

    /// Defaults taken from the `project`, `region` and `zone` attributes of a resource, then
    /// from the provider block
    pub fn from_resource(d: &dyn ResourceData, config: &ProviderConfig) -> Self {
        Self {
            project: get_project(d, config).ok(),
            region: get_region(d, config).ok(),
            zone: get_zone(d, config).ok(),
        }
    }

    fn scope_value(&self, kind: ScopeKind) -> Option<&str> {
        match kind {
            ScopeKind::Regional => self.region.as_deref(),
            ScopeKind::Zonal => self.zone.as_deref(),
            ScopeKind::Location => self.region.as_deref().or(self.zone.as_deref()),
            ScopeKind::Global | ScopeKind::Unscoped => None,
        }
    }
}

/// Parsed reference to a resource
///
/// Whatever shape the reference was written in (self link, partial path, shorthand), the
/// parsed value renders to a single canonical identifier:
/// `{container}/{container_id}[/global | /regions/{r} | /zones/{z} | /locations/{l}]/{collection}/{name}`
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct ResourceId {
    container: ContainerKind,
    container_id: String,
    scope: Scope,
    collection: String,
    name: String,
}

impl ResourceId {
    pub fn new<I, C, N>(
        container: ContainerKind,
        container_id: I,
        scope: Scope,
        collection: C,
        name: N,
    ) -> Self
    where
        I: Into<String>,
        C: Into<String>,
        N: Into<String>,
    {
        Self {
            container,
            container_id: container_id.into(),
            scope,
            collection: collection.into(),
            name: name.into(),
        }
    }

    /// Parse a reference to a resource of `kind`, completing shorthands from the provider block
    pub fn parse(raw: &str, kind: &ResourceKind, config: &ProviderConfig) -> Result<Self, IdError> {
        Self::parse_with_defaults(raw, kind, &IdDefaults::from_config(config))
    }

    /// Parse a reference to a resource of `kind`
    ///
    /// The accepted shapes are tried in order, and the first one matching wins:
    /// 1. a full URL: `https://compute.googleapis.com/compute/v1/projects/p/regions/r/addresses/a`
    /// 2. a partial path: `projects/p/regions/r/addresses/a`
    /// 3. a scope-relative path: `regions/r/addresses/a`
    /// 4. a shorthand: `p/r/a`, `r/a` or `a`
    pub fn parse_with_defaults(
        raw: &str,
        kind: &ResourceKind,
        defaults: &IdDefaults,
    ) -> Result<Self, IdError> {
        if raw.is_empty() {
            return Err(IdError::Empty {
                collection: kind.collection().to_owned(),
            });
        }
        let parser = Parser {
            raw,
            kind,
            defaults,
        };

        if let Some(id) = parser.full_url()? {
            return Ok(id);
        }
        if let Some(id) = parser.partial_path()? {
            return Ok(id);
        }
        if let Some(id) = parser.scope_relative_path()? {
            return Ok(id);
        }
        parser.shorthand()
    }

    /// Parse an optional reference
    ///
    /// An empty reference gives `None` when `empty_valid` is set.
    pub fn parse_field(
        raw: &str,
        kind: &ResourceKind,
        defaults: &IdDefaults,
        empty_valid: bool,
    ) -> Result<Option<Self>, IdError> {
        if raw.is_empty() && empty_valid {
            return Ok(None);
        }
        Self::parse_with_defaults(raw, kind, defaults).map(Some)
    }

    pub fn container(&self) -> ContainerKind {
        self.container
    }

    pub fn container_id(&self) -> &str {
        &self.container_id
    }

    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Identifier used as the state key
    pub fn canonical_id(&self) -> String {
        self.to_string()
    }

    /// Path of the collection holding the resource, without the `/{collection}/{name}` suffix
    ///
    /// The scope is kept: the parent of `projects/p/regions/r/addresses/a` is
    /// `projects/p/regions/r`.
    pub fn parent(&self) -> String {
        let mut parent = format!("{}/{}", self.container, self.container_id);
        match &self.scope {
            Scope::Global => parent.push_str("/global"),
            Scope::Region(region) => {
                parent.push_str("/regions/");
                parent.push_str(region);
            }
            Scope::Zone(zone) => {
                parent.push_str("/zones/");
                parent.push_str(zone);
            }
            Scope::Location(location) => {
                parent.push_str("/locations/");
                parent.push_str(location);
            }
            Scope::Unscoped => (),
        }
        parent
    }

    /// Full URL of the resource under the API `base_path`
    pub fn self_link(&self, base_path: &str) -> String {
        if base_path.ends_with('/') {
            format!("{base_path}{self}")
        } else {
            format!("{base_path}/{self}")
        }
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.parent(), self.collection, self.name)
    }
}

impl FromStr for ResourceId {
    type Err = IdError;

    /// Parse a canonical identifier, without any default
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || IdError::InvalidFormat {
            raw: s.to_owned(),
            expected: String::from(
                "{{container_type}}/{{container}}/[{{scope}}/]{{collection}}/{{name}}",
            ),
        };
        let segments: Vec<&str> = s.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(invalid());
        }
        let (container, container_id, rest) = match segments.as_slice() {
            [container, container_id, rest @ ..] => (*container, *container_id, rest),
            _ => return Err(invalid()),
        };
        let container = container.parse::<ContainerKind>().map_err(|_| {
            IdError::UnknownContainer {
                raw: s.to_owned(),
                discriminant: container.to_owned(),
            }
        })?;
        let (scope, collection, name) = match rest {
            [collection, name] => (Scope::Unscoped, *collection, *name),
            ["global", collection, name] => (Scope::Global, *collection, *name),
            ["regions", region, collection, name] => {
                (Scope::Region(region.to_string()), *collection, *name)
            }
            ["zones", zone, collection, name] => (Scope::Zone(zone.to_string()), *collection, *name),
            ["locations", location, collection, name] => {
                (Scope::Location(location.to_string()), *collection, *name)
            }
            _ => return Err(invalid()),
        };
        // `projects/p/regions/r` is the parent of an identifier, not an identifier
        if ScopeKind::from_keyword(collection).is_some() {
            return Err(invalid());
        }
        Ok(Self::new(container, container_id, scope, collection, name))
    }
}

impl Serialize for ResourceId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ResourceId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

const TAIL_PATTERN: &str = "(?P<collection>[^/]+)/(?P<name>[^/]+)$";

/// Reference shapes of the collections living in one kind of scope
///
/// The collection is captured, and compared with the expected one after matching.
struct ScopePatterns {
    full_url: Regex,
    partial_path: Regex,
    scope_relative: Option<Regex>,
}

impl ScopePatterns {
    fn new(scope: ScopeKind) -> Self {
        let tail = match scope.keyword() {
            Some(keyword) if scope.has_value() => {
                format!("{keyword}/(?P<scope>[^/]+)/{TAIL_PATTERN}")
            }
            Some(keyword) => format!("{keyword}/{TAIL_PATTERN}"),
            None => TAIL_PATTERN.to_owned(),
        };
        let compile = |pattern: String| Regex::new(&pattern).expect("Invalid reference pattern");
        Self {
            full_url: compile(format!(
                "^https?://[^/]+/(?:[^/]+/)*?(?P<container>projects|folders|organizations|billingAccounts)/(?P<container_id>[^/]+)/{tail}"
            )),
            partial_path: compile(format!(
                "^(?P<container>[^/]+)/(?P<container_id>[^/]+)/{tail}"
            )),
            scope_relative: scope.keyword().map(|_| compile(format!("^{tail}"))),
        }
    }

    fn of(scope: ScopeKind) -> &'static Self {
        static GLOBAL: Lazy<ScopePatterns> = Lazy::new(|| ScopePatterns::new(ScopeKind::Global));
        static REGIONAL: Lazy<ScopePatterns> =
            Lazy::new(|| ScopePatterns::new(ScopeKind::Regional));
        static ZONAL: Lazy<ScopePatterns> = Lazy::new(|| ScopePatterns::new(ScopeKind::Zonal));
        static LOCATION: Lazy<ScopePatterns> =
            Lazy::new(|| ScopePatterns::new(ScopeKind::Location));
        static UNSCOPED: Lazy<ScopePatterns> =
            Lazy::new(|| ScopePatterns::new(ScopeKind::Unscoped));

        match scope {
            ScopeKind::Global => &*GLOBAL,
            ScopeKind::Regional => &*REGIONAL,
            ScopeKind::Zonal => &*ZONAL,
            ScopeKind::Location => &*LOCATION,
            ScopeKind::Unscoped => &*UNSCOPED,
        }
    }
}

struct Parser<'a> {
    raw: &'a str,
    kind: &'a ResourceKind,
    defaults: &'a IdDefaults,
}

impl<'a> Parser<'a> {
    fn invalid_format(&self) -> IdError {
        IdError::InvalidFormat {
            raw: self.raw.to_owned(),
            expected: self.kind.expected_format(),
        }
    }

    fn missing_default(&self, field: &'static str) -> IdError {
        IdError::MissingDefault {
            raw: self.raw.to_owned(),
            field,
        }
    }

    fn patterns(&self) -> &'static ScopePatterns {
        ScopePatterns::of(self.kind.scope())
    }

    /// Captures of `re` on the reference, if it names a resource of the expected collection
    fn try_match(&self, re: &Regex) -> Option<Captures<'a>> {
        let captures = re
            .captures(self.raw)
            .filter(|captures| &captures["collection"] == self.kind.collection())?;
        tracing::debug!("matching ID {} to pattern {}", self.raw, re.as_str());
        Some(captures)
    }

    fn build(
        &self,
        container: ContainerKind,
        container_id: &str,
        scope: Option<&str>,
        name: &str,
    ) -> ResourceId {
        ResourceId::new(
            container,
            container_id,
            Scope::with_value(self.kind.scope(), scope),
            self.kind.collection(),
            name,
        )
    }

    fn check_container(&self, discriminant: &str) -> Result<ContainerKind, IdError> {
        let container =
            ContainerKind::from_collection(discriminant).ok_or_else(|| IdError::UnknownContainer {
                raw: self.raw.to_owned(),
                discriminant: discriminant.to_owned(),
            })?;
        if !self.kind.allows(container) {
            return Err(IdError::ContainerNotAllowed {
                raw: self.raw.to_owned(),
                container: container.collection(),
                collection: self.kind.collection().to_owned(),
            });
        }
        Ok(container)
    }

    /// Shorthands are only accepted for collections that live in projects alone
    fn project_only(&self) -> bool {
        self.kind.containers() == [ContainerKind::Project]
    }

    fn default_project(&self) -> Result<&'a str, IdError> {
        if !self.project_only() {
            return Err(self.invalid_format());
        }
        self.defaults
            .project
            .as_deref()
            .ok_or_else(|| self.missing_default("project"))
    }

    fn default_scope(&self) -> Result<Option<&str>, IdError> {
        let scope = self.kind.scope();
        if !scope.has_value() {
            return Ok(None);
        }
        match self.defaults.scope_value(scope) {
            Some(value) => Ok(Some(value)),
            None => Err(self.missing_default(scope.field())),
        }
    }

    fn full_url(&self) -> Result<Option<ResourceId>, IdError> {
        self.container_path(&self.patterns().full_url)
    }

    fn partial_path(&self) -> Result<Option<ResourceId>, IdError> {
        self.container_path(&self.patterns().partial_path)
    }

    fn container_path(&self, re: &Regex) -> Result<Option<ResourceId>, IdError> {
        let Some(captures) = self.try_match(re) else {
            return Ok(None);
        };
        let container = self.check_container(&captures["container"])?;
        Ok(Some(self.build(
            container,
            &captures["container_id"],
            captures.name("scope").map(|m| m.as_str()),
            &captures["name"],
        )))
    }

    fn scope_relative_path(&self) -> Result<Option<ResourceId>, IdError> {
        let Some(re) = &self.patterns().scope_relative else {
            return Ok(None);
        };
        let Some(captures) = self.try_match(re) else {
            return Ok(None);
        };
        let project = self.default_project()?;
        Ok(Some(self.build(
            ContainerKind::Project,
            project,
            captures.name("scope").map(|m| m.as_str()),
            &captures["name"],
        )))
    }

    fn shorthand(&self) -> Result<ResourceId, IdError> {
        let segments: Vec<&str> = self.raw.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(self.invalid_format());
        }
        let has_scope = self.kind.scope().has_value();
        let (project, scope, name) = match (segments.as_slice(), has_scope) {
            ([project, scope, name], true) => (Some(*project), Some(*scope), *name),
            ([scope, name], true) => (None, Some(*scope), *name),
            ([project, name], false) => (Some(*project), None, *name),
            ([name], _) => (None, None, *name),
            _ => return Err(self.invalid_format()),
        };
        if !self.project_only() {
            return Err(self.invalid_format());
        }

        let project = match project {
            Some(project) => project,
            None => self.default_project()?,
        };
        let scope = match scope {
            Some(scope) => Some(scope),
            None => self.default_scope()?,
        };
        tracing::debug!(
            "matching ID {} to shorthand of {}",
            self.raw,
            self.kind.expected_format()
        );
        Ok(self.build(ContainerKind::Project, project, scope, name))
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use rstest::rstest;

    use super::*;
    use crate::id::kinds;

    fn defaults(project: Option<&str>, region: Option<&str>, zone: Option<&str>) -> IdDefaults {
        IdDefaults {
            project: project.map(str::to_owned),
            region: region.map(str::to_owned),
            zone: zone.map(str::to_owned),
        }
    }

    fn full() -> IdDefaults {
        defaults(Some("default-project"), Some("default-region"), Some("default-zone"))
    }

    #[rstest]
    #[case::full_url(
        "https://www.googleapis.com/compute/v1/projects/test-project/regions/us-central1/addresses/test-address",
        "projects/test-project/regions/us-central1/addresses/test-address"
    )]
    #[case::http_url(
        "http://localhost:8080/projects/test-project/regions/us-central1/addresses/test-address",
        "projects/test-project/regions/us-central1/addresses/test-address"
    )]
    #[case::partial_path(
        "projects/test-project/regions/us-central1/addresses/test-address",
        "projects/test-project/regions/us-central1/addresses/test-address"
    )]
    #[case::scope_relative(
        "regions/us-central1/addresses/test-address",
        "projects/default-project/regions/us-central1/addresses/test-address"
    )]
    #[case::project_region_name(
        "test-project/us-central1/test-address",
        "projects/test-project/regions/us-central1/addresses/test-address"
    )]
    #[case::region_name(
        "us-central1/test-address",
        "projects/default-project/regions/us-central1/addresses/test-address"
    )]
    #[case::name(
        "test-address",
        "projects/default-project/regions/default-region/addresses/test-address"
    )]
    fn regional_shapes(#[case] raw: &str, #[case] expected: &str) {
        let id = ResourceId::parse_with_defaults(raw, &kinds::ADDRESS, &full()).unwrap();
        assert_eq!(id.canonical_id(), expected);
    }

    #[rstest]
    #[case::url(
        "https://www.googleapis.com/compute/v1/projects/p/zones/us-central1-a/instances/vm",
        "projects/p/zones/us-central1-a/instances/vm"
    )]
    #[case::zone_name("us-central1-a/vm", "projects/default-project/zones/us-central1-a/instances/vm")]
    #[case::name("vm", "projects/default-project/zones/default-zone/instances/vm")]
    fn zonal_shapes(#[case] raw: &str, #[case] expected: &str) {
        let id = ResourceId::parse_with_defaults(raw, &kinds::INSTANCE, &full()).unwrap();
        assert_eq!(id.canonical_id(), expected);
        assert_eq!(id.scope().kind(), ScopeKind::Zonal);
    }

    #[rstest]
    #[case::url(
        "https://compute.googleapis.com/compute/beta/projects/p/global/networks/default",
        "projects/p/global/networks/default"
    )]
    #[case::partial("projects/p/global/networks/default", "projects/p/global/networks/default")]
    #[case::relative("global/networks/default", "projects/default-project/global/networks/default")]
    #[case::project_name("p/default", "projects/p/global/networks/default")]
    #[case::name("default", "projects/default-project/global/networks/default")]
    fn global_shapes(#[case] raw: &str, #[case] expected: &str) {
        let id = ResourceId::parse_with_defaults(raw, &kinds::NETWORK, &full()).unwrap();
        assert_eq!(id.canonical_id(), expected);
    }

    #[rstest]
    #[case::project("projects/my-project/sinks/my-sink", ContainerKind::Project)]
    #[case::folder("folders/123/sinks/my-sink", ContainerKind::Folder)]
    #[case::organization("organizations/456/sinks/my-sink", ContainerKind::Organization)]
    #[case::billing_account("billingAccounts/000-AAA/sinks/my-sink", ContainerKind::BillingAccount)]
    fn logging_sinks(#[case] raw: &str, #[case] container: ContainerKind) {
        let id = ResourceId::parse_with_defaults(raw, &kinds::LOGGING_SINK, &IdDefaults::default())
            .unwrap();
        assert_eq!(id.container(), container);
        assert_eq!(id.canonical_id(), raw);
        assert_eq!(id.parent(), raw.trim_end_matches("/sinks/my-sink"));
        assert_eq!(id.name(), "my-sink");
    }

    #[test]
    fn parent_keeps_the_scope() {
        let id = ResourceId::parse_with_defaults(
            "projects/p/regions/r/addresses/a",
            &kinds::ADDRESS,
            &IdDefaults::default(),
        )
        .unwrap();
        assert_eq!(id.parent(), "projects/p/regions/r");
        assert_eq!(id.scope().value(), Some("r"));
        assert_eq!(
            id.self_link("https://compute.googleapis.com/compute/v1/"),
            "https://compute.googleapis.com/compute/v1/projects/p/regions/r/addresses/a"
        );
        assert_eq!(
            id.self_link("https://compute.googleapis.com/compute/v1"),
            "https://compute.googleapis.com/compute/v1/projects/p/regions/r/addresses/a"
        );
    }

    #[rstest]
    #[case::empty("", kinds::ADDRESS)]
    fn empty_reference(#[case] raw: &str, #[case] kind: ResourceKind) {
        assert_eq!(
            ResourceId::parse_with_defaults(raw, &kind, &full()),
            Err(IdError::Empty {
                collection: "addresses".into()
            })
        );
        assert_eq!(ResourceId::parse_field(raw, &kind, &full(), true), Ok(None));
        assert!(ResourceId::parse_field(raw, &kind, &full(), false).is_err());
    }

    #[rstest]
    #[case::too_many_segments("a/b/c/d", kinds::ADDRESS)]
    #[case::too_many_global("a/b/c", kinds::NETWORK)]
    #[case::empty_segment("p//a", kinds::ADDRESS)]
    #[case::trailing_slash("a/", kinds::NETWORK)]
    #[case::wrong_collection("projects/p/regions/r/subnetworks/s", kinds::ADDRESS)]
    #[case::role_shorthand("my-role", kinds::ORGANIZATION_ROLE)]
    #[case::sink_shorthand("my-sink", kinds::LOGGING_SINK)]
    fn invalid_format(#[case] raw: &str, #[case] kind: ResourceKind) {
        let err = ResourceId::parse_with_defaults(raw, &kind, &full()).unwrap_err();
        assert!(
            matches!(&err, IdError::InvalidFormat { raw: r, .. } if r == raw),
            "{err:?}"
        );
    }

    #[test]
    fn patterns_are_compiled_once_per_scope() {
        let first = ScopePatterns::of(ScopeKind::Regional);
        let second = ScopePatterns::of(ScopeKind::Regional);
        assert!(std::ptr::eq(first, second));
        assert!(ScopePatterns::of(ScopeKind::Unscoped).scope_relative.is_none());

        // The same compiled patterns serve every regional collection.
        for (raw, kind) in [
            ("projects/p/regions/r/addresses/a", kinds::ADDRESS),
            ("projects/p/regions/r/subnetworks/s", kinds::SUBNETWORK),
        ] {
            let id = ResourceId::parse_with_defaults(raw, &kind, &full()).unwrap();
            assert_eq!(id.canonical_id(), raw);
        }
    }

    #[rstest]
    #[case::url(
        "https://www.googleapis.com/compute/v1/projects/p/regions/r/subnetworks/s",
        kinds::ADDRESS
    )]
    #[case::relative("regions/r/subnetworks/s", kinds::ADDRESS)]
    #[case::sink_as_exclusion("folders/1/sinks/s", kinds::LOGGING_EXCLUSION)]
    fn other_collection_is_invalid(#[case] raw: &str, #[case] kind: ResourceKind) {
        let err = ResourceId::parse_with_defaults(raw, &kind, &full()).unwrap_err();
        assert!(matches!(err, IdError::InvalidFormat { .. }), "{err:?}");
    }

    #[rstest]
    #[case::unknown("widgets/x/regions/r/addresses/a", kinds::ADDRESS)]
    #[case::singular_billing_account("billingAccount/x/sinks/s", kinds::LOGGING_SINK)]
    #[case::not_allowed("folders/x/regions/r/addresses/a", kinds::ADDRESS)]
    #[case::role_in_project("projects/p/roles/r", kinds::ORGANIZATION_ROLE)]
    fn container_errors(#[case] raw: &str, #[case] kind: ResourceKind) {
        let err = ResourceId::parse_with_defaults(raw, &kind, &full()).unwrap_err();
        assert!(err.is_container_error(), "{err:?}");
        assert!(err.to_string().contains(raw));
    }

    #[test]
    fn organization_role() {
        let id = ResourceId::parse_with_defaults(
            "organizations/123/roles/customRole",
            &kinds::ORGANIZATION_ROLE,
            &full(),
        )
        .unwrap();
        assert_eq!(id.container(), ContainerKind::Organization);
        assert_eq!(id.parent(), "organizations/123");
    }

    #[rstest]
    #[case::project("my-address", defaults(None, Some("r"), None), "project")]
    #[case::region("my-address", defaults(Some("p"), None, None), "region")]
    #[case::relative_project("regions/r/addresses/a", defaults(None, None, None), "project")]
    fn missing_default(#[case] raw: &str, #[case] defaults: IdDefaults, #[case] field: &str) {
        let err = ResourceId::parse_with_defaults(raw, &kinds::ADDRESS, &defaults).unwrap_err();
        assert!(err.is_missing_default(), "{err:?}");
        assert!(matches!(&err, IdError::MissingDefault { field: f, raw: r } if *f == field && r == raw));
    }

    #[test]
    fn region_defaults_from_zone() {
        let config = ProviderConfig {
            project: "p".into(),
            zone: "us-central1-a".into(),
            ..Default::default()
        };
        let id = ResourceId::parse("a", &kinds::ADDRESS, &config).unwrap();
        assert_eq!(id.canonical_id(), "projects/p/regions/us-central1/addresses/a");
    }

    #[test]
    fn location_defaults_to_region_then_zone() {
        let kind = ResourceKind::location("clusters");
        let id = ResourceId::parse_with_defaults("c", &kind, &defaults(Some("p"), None, Some("z")))
            .unwrap();
        assert_eq!(id.canonical_id(), "projects/p/locations/z/clusters/c");
        let id = ResourceId::parse_with_defaults("c", &kind, &full()).unwrap();
        assert_eq!(
            id.canonical_id(),
            "projects/default-project/locations/default-region/clusters/c"
        );
    }

    #[test]
    fn defaults_from_resource_take_precedence() {
        let config = ProviderConfig {
            project: "provider-project".into(),
            region: "provider-region".into(),
            ..Default::default()
        };
        let d = crate::resource_data::ResourceState::new().with("region", "resource-region");
        let id = ResourceId::parse_with_defaults(
            "a",
            &kinds::ADDRESS,
            &IdDefaults::from_resource(&d, &config),
        )
        .unwrap();
        assert_eq!(
            id.canonical_id(),
            "projects/provider-project/regions/resource-region/addresses/a"
        );
    }

    #[rstest]
    #[case("projects/p/regions/r/addresses/a")]
    #[case("projects/p/global/networks/n")]
    #[case("folders/1/sinks/s")]
    #[case("projects/p/locations/l/clusters/c")]
    fn strict_canonical_parsing(#[case] canonical: &str) {
        let id: ResourceId = canonical.parse().unwrap();
        assert_eq!(id.canonical_id(), canonical);
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{canonical}\""));
        assert_eq!(serde_json::from_str::<ResourceId>(&json).unwrap(), id);
    }

    #[rstest]
    #[case("a")]
    #[case("projects/p")]
    #[case("projects/p/regions/r/a")]
    #[case("projects/p/continents/c/addresses/a")]
    #[case("widgets/w/sinks/s")]
    #[case::parent_path("projects/p/regions/r")]
    #[case::missing_name("projects/p/global/networks")]
    #[case::zone_parent("projects/p/zones/z")]
    #[case::location_parent("organizations/o/locations/l")]
    #[case::nested_scope("projects/p/regions/r/global/n")]
    fn strict_canonical_rejects(#[case] raw: &str) {
        assert!(raw.parse::<ResourceId>().is_err());
        assert!(serde_json::from_str::<ResourceId>(&format!("\"{raw}\"")).is_err());
    }

    fn segment() -> impl Strategy<Value = String> {
        "[a-z][a-z0-9-]{0,12}"
    }

    proptest! {
        #[test]
        fn canonicalization_is_idempotent(
            project in segment(),
            region in segment(),
            name in segment(),
            shape in 0usize..5,
        ) {
            let raw = match shape {
                0 => format!("https://compute.googleapis.com/compute/v1/projects/{project}/regions/{region}/addresses/{name}"),
                1 => format!("projects/{project}/regions/{region}/addresses/{name}"),
                2 => format!("regions/{region}/addresses/{name}"),
                3 => format!("{project}/{region}/{name}"),
                _ => name.clone(),
            };
            let defaults = defaults(Some(project.as_str()), Some(region.as_str()), None);
            let first = ResourceId::parse_with_defaults(&raw, &kinds::ADDRESS, &defaults).unwrap();
            let canonical = first.canonical_id();
            let second = ResourceId::parse_with_defaults(&canonical, &kinds::ADDRESS, &defaults).unwrap();
            prop_assert_eq!(second.canonical_id(), canonical.clone());
            prop_assert_eq!(canonical.parse::<ResourceId>().unwrap(), first);
        }
    }
}
