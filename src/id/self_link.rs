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

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{error::IdError, location::resource_name_from_self_link};

static COMPUTE_VERSION_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new("/compute/[a-zA-Z0-9]*/projects/").expect("Invalid compute version regex")
});

/// Part of a self link starting at `projects/`
///
/// `https://compute.googleapis.com/compute/v1/projects/p/global/networks/n` gives
/// `projects/p/global/networks/n`.
pub fn relative_path(self_link: &str) -> Result<&str, IdError> {
    match self_link.find("projects/") {
        Some(start) => Ok(&self_link[start..]),
        None => Err(IdError::InvalidFormat {
            raw: self_link.to_owned(),
            expected: String::from("{{base_path}}projects/{{project}}/..."),
        }),
    }
}

/// Rewrite a compute self link of any API version to its `v1` form
pub fn convert_self_link_to_v1(link: &str) -> String {
    COMPUTE_VERSION_REGEX
        .replace(link, "/compute/v1/projects/")
        .into_owned()
}

/// Whether two references designate the same resource
///
/// `new` may be a bare name, compared with the last segment of `old`; otherwise both must have
/// the same relative path.
pub fn same_resource(old: &str, new: &str) -> bool {
    if !new.contains('/') && resource_name_from_self_link(old) == new {
        return true;
    }
    match (relative_path(old), relative_path(new)) {
        (Ok(old), Ok(new)) => old == new,
        _ => false,
    }
}

/// Value of `field`, possibly extracted from the value of its parent field
///
/// The first capture group of `pattern` in `parent_value` gives the extracted value. The
/// extracted value and `value` cannot be both set and different.
pub fn extract_field_by_pattern(
    field: &str,
    value: &str,
    parent_value: &str,
    pattern: &str,
) -> Result<String, IdError> {
    let mut extracted = None;
    if !parent_value.is_empty() {
        let re = Regex::new(pattern)?;
        match re.captures(parent_value).and_then(|captures| captures.get(1)) {
            Some(m) => extracted = Some(m.as_str()),
            None if value.is_empty() => {
                return Err(IdError::NoPatternMatch {
                    field: field.to_owned(),
                    pattern: pattern.to_owned(),
                    parent: parent_value.to_owned(),
                })
            }
            None => (),
        }
    }

    match extracted.filter(|extracted| !extracted.is_empty()) {
        Some(extracted) if !value.is_empty() && value != extracted => {
            Err(IdError::ConflictingValues {
                field: field.to_owned(),
                from_parent: extracted.to_owned(),
                from_self: value.to_owned(),
            })
        }
        Some(extracted) => Ok(extracted.to_owned()),
        None => Ok(value.to_owned()),
    }
}

/// References to add and to remove to go from `from` to `to`
///
/// References are matched with [`same_resource`], so a bare name matches a self link.
pub fn calc_add_remove<S: AsRef<str>>(from: &[S], to: &[S]) -> (Vec<String>, Vec<String>) {
    let add = to
        .iter()
        .map(|s| s.as_ref())
        .filter(|u| !from.iter().any(|v| same_resource(v.as_ref(), u)))
        .map(str::to_owned)
        .collect();
    let remove = from
        .iter()
        .map(|s| s.as_ref())
        .filter(|u| !to.iter().any(|v| same_resource(u, v.as_ref())))
        .map(str::to_owned)
        .collect();
    (add, remove)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[test]
    fn relative_path_of_self_link() {
        assert_eq!(
            relative_path("https://compute.googleapis.com/compute/v1/projects/p/global/networks/n"),
            Ok("projects/p/global/networks/n")
        );
        assert!(relative_path("global/networks/n").is_err());
    }

    #[rstest]
    #[case(
        "https://www.googleapis.com/compute/beta/projects/p/zones/z/instances/i",
        "https://www.googleapis.com/compute/v1/projects/p/zones/z/instances/i"
    )]
    #[case(
        "https://www.googleapis.com/compute/v1/projects/p/zones/z/instances/i",
        "https://www.googleapis.com/compute/v1/projects/p/zones/z/instances/i"
    )]
    #[case("projects/p/zones/z/instances/i", "projects/p/zones/z/instances/i")]
    fn self_link_to_v1(#[case] link: &str, #[case] expected: &str) {
        assert_eq!(convert_self_link_to_v1(link), expected);
    }

    #[rstest]
    #[case::no_parent("bar", "", "bar")]
    #[case::from_parent("", "projects/foo/locations/l", "foo")]
    #[case::same_value("foo", "projects/foo/locations/l", "foo")]
    fn extract_field(#[case] value: &str, #[case] parent: &str, #[case] expected: &str) {
        assert_eq!(
            extract_field_by_pattern("project", value, parent, "projects/([^/]+)/").unwrap(),
            expected
        );
    }

    #[test]
    fn extract_field_errors() {
        assert!(matches!(
            extract_field_by_pattern("project", "bar", "projects/foo/locations/l", "projects/([^/]+)/"),
            Err(IdError::ConflictingValues { .. })
        ));
        assert!(matches!(
            extract_field_by_pattern("project", "", "folders/foo", "projects/([^/]+)/"),
            Err(IdError::NoPatternMatch { .. })
        ));
        assert_eq!(
            extract_field_by_pattern("project", "bar", "folders/foo", "projects/([^/]+)/"),
            Ok("bar".to_owned())
        );
        assert!(matches!(
            extract_field_by_pattern("project", "", "x", "("),
            Err(IdError::Pattern(_))
        ));
    }

    #[test]
    fn add_remove_matches_names_and_links() {
        let from = [
            "https://www.googleapis.com/compute/v1/projects/p/global/networks/a",
            "https://www.googleapis.com/compute/v1/projects/p/global/networks/b",
        ];
        let to = ["a", "projects/p/global/networks/c"];
        let (add, remove) = calc_add_remove(&from, &to);
        assert_eq!(add, vec!["projects/p/global/networks/c".to_owned()]);
        assert_eq!(remove, vec![from[1].to_owned()]);
    }
}
