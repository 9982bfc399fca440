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

use std::io::{self, Write};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tpg_resource::{
    diff::Suppressor, logging, AttributePath, Diagnostics, EmptyResourceData, ExtractDiagnostics,
    IdDefaults, ProviderConfig, ResourceId, ResourceKind,
};

/// Canonicalize Google Cloud resource references and evaluate diff suppressors
#[derive(Parser, Debug)]
#[command(name = "tpg-resource")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Default project for shorthand references
    #[arg(long, global = true)]
    project: Option<String>,

    /// Default region for shorthand references
    #[arg(long, global = true)]
    region: Option<String>,

    /// Default zone for shorthand references
    #[arg(long, global = true)]
    zone: Option<String>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the canonical identifier of every reference
    Canonical(CanonicalArgs),

    /// Print the path of the collection holding the referenced resource
    Parent(ParentArgs),

    /// Tell whether the change from OLD to NEW is suppressed by RULE
    Suppress(SuppressArgs),
}

#[derive(Args, Debug)]
struct CanonicalArgs {
    /// Kind of the referenced resources: `regional:addresses`, `zonal:instances`,
    /// `global:networks`, `project:serviceAccounts`, `location:clusters`, `organization:roles`
    /// or `sink`
    #[arg(short, long)]
    kind: ResourceKind,

    /// Print one JSON object per reference
    #[arg(long)]
    json: bool,

    #[arg(required = true)]
    references: Vec<String>,
}

#[derive(Args, Debug)]
struct ParentArgs {
    /// Kind of the referenced resource
    #[arg(short, long)]
    kind: ResourceKind,

    reference: String,
}

#[derive(Args, Debug)]
struct SuppressArgs {
    rule: Rule,

    #[arg(allow_hyphen_values = true)]
    old: String,

    #[arg(allow_hyphen_values = true)]
    new: String,

    /// Attribute key passed to the suppressor
    #[arg(long, default_value = "value")]
    key: String,

    /// Prefix of the `optional-prefix` rule
    #[arg(long)]
    prefix: Option<String>,

    /// Default value of the `empty-or-default` rule
    #[arg(long)]
    default: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Rule {
    OptionalPrefix,
    MissingMapKey,
    SurroundingSpaces,
    Case,
    PortRange,
    Location,
    AbsoluteDomain,
    Duration,
    EmptyOrDefault,
    IpCidrRange,
    Rfc3339Time,
    ResourceNames,
    SelfLinkRelativePaths,
    SelfLinkOrResourceName,
}

#[derive(Serialize)]
struct CanonicalOutput<'a> {
    raw: &'a str,
    id: ResourceId,
    parent: String,
}

impl Cli {
    fn provider_config(&self) -> Result<ProviderConfig> {
        let mut config = ProviderConfig {
            project: self.project.clone().unwrap_or_default(),
            region: self.region.clone().unwrap_or_default(),
            zone: self.zone.clone().unwrap_or_default(),
            ..Default::default()
        };
        config.handle_sdk_defaults()?;
        Ok(config)
    }
}

impl SuppressArgs {
    fn suppressor(&self) -> Result<Suppressor> {
        Ok(match self.rule {
            Rule::OptionalPrefix => Suppressor::OptionalPrefix(
                self.prefix
                    .clone()
                    .context("the optional-prefix rule needs --prefix")?,
            ),
            Rule::MissingMapKey => Suppressor::MissingMapKey,
            Rule::SurroundingSpaces => Suppressor::OptionalSurroundingSpaces,
            Rule::Case => Suppressor::CaseInsensitive,
            Rule::PortRange => Suppressor::PortRange,
            Rule::Location => Suppressor::Location,
            Rule::AbsoluteDomain => Suppressor::AbsoluteDomain,
            Rule::Duration => Suppressor::Duration,
            Rule::EmptyOrDefault => Suppressor::EmptyOrDefault(
                self.default
                    .clone()
                    .context("the empty-or-default rule needs --default")?,
            ),
            Rule::IpCidrRange => Suppressor::IpCidrRange,
            Rule::Rfc3339Time => Suppressor::Rfc3339Time,
            Rule::ResourceNames => Suppressor::ResourceNames,
            Rule::SelfLinkRelativePaths => Suppressor::SelfLinkRelativePaths,
            Rule::SelfLinkOrResourceName => Suppressor::SelfLinkOrResourceName,
        })
    }
}

impl Command {
    /// Run the command, printing results to `out` and diagnostics to `err`
    fn run<O: Write, E: Write>(
        &self,
        config: &ProviderConfig,
        out: &mut O,
        err: &mut E,
    ) -> Result<()> {
        match self {
            Command::Canonical(args) => canonical(args, config, out, err),
            Command::Parent(args) => parent(args, config, out),
            Command::Suppress(args) => suppress(args, out),
        }
    }
}

fn canonical<O: Write, E: Write>(
    args: &CanonicalArgs,
    config: &ProviderConfig,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    let defaults = IdDefaults::from_config(config);
    let mut diags = Diagnostics::default();

    for (i, raw) in args.references.iter().enumerate() {
        let path = AttributePath::new("references").index(i as i64);
        let Some(id) = ResourceId::parse_with_defaults(raw, &args.kind, &defaults)
            .extract_diagnostics_at(&mut diags, path)
        else {
            continue;
        };
        if args.json {
            let output = CanonicalOutput {
                raw,
                parent: id.parent(),
                id,
            };
            writeln!(out, "{}", serde_json::to_string(&output)?)?;
        } else {
            writeln!(out, "{id}")?;
        }
    }

    if diags.has_errors() {
        write!(err, "{diags}")?;
        bail!("{} reference(s) could not be parsed", diags.errors.len());
    }
    Ok(())
}

fn parent<O: Write>(args: &ParentArgs, config: &ProviderConfig, out: &mut O) -> Result<()> {
    let id = ResourceId::parse(&args.reference, &args.kind, config)
        .with_context(|| format!("cannot parse reference to {}", args.kind))?;
    writeln!(out, "{}", id.parent())?;
    Ok(())
}

fn suppress<O: Write>(args: &SuppressArgs, out: &mut O) -> Result<()> {
    let suppressor = args.suppressor()?;
    let suppressed = suppressor.suppress(&args.key, &args.old, &args.new, &EmptyResourceData);
    writeln!(out, "{suppressed}")?;
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose)?;
    let config = cli.provider_config()?;

    cli.command
        .run(&config, &mut io::stdout().lock(), &mut io::stderr().lock())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parameterized_rules_need_their_parameter() {
        let cli = Cli::parse_from(["tpg-resource", "suppress", "optional-prefix", "a", "p/a"]);
        let Command::Suppress(args) = cli.command else {
            panic!("expected the suppress command");
        };
        assert!(args.suppressor().is_err());

        let cli = Cli::parse_from([
            "tpg-resource",
            "suppress",
            "optional-prefix",
            "a",
            "p/a",
            "--prefix",
            "p/",
        ]);
        let Command::Suppress(args) = cli.command else {
            panic!("expected the suppress command");
        };
        assert!(args
            .suppressor()
            .unwrap()
            .suppress(&args.key, &args.old, &args.new, &EmptyResourceData));
    }

    fn config() -> ProviderConfig {
        ProviderConfig {
            project: "p".into(),
            region: "us-central1".into(),
            ..Default::default()
        }
    }

    /// Run the command line `args` and return the result with what was printed on both streams
    fn run(args: &[&str]) -> (Result<()>, String, String) {
        let cli = Cli::parse_from(std::iter::once("tpg-resource").chain(args.iter().copied()));
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let result = cli.command.run(&config(), &mut out, &mut err);
        (
            result,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn canonical_prints_one_id_per_reference() {
        let (result, out, err) = run(&[
            "canonical",
            "--kind",
            "regional:addresses",
            "a",
            "europe-west1/b",
            "https://www.googleapis.com/compute/v1/projects/q/regions/r/addresses/c",
        ]);
        result.unwrap();
        assert_eq!(
            out,
            "projects/p/regions/us-central1/addresses/a\n\
             projects/p/regions/europe-west1/addresses/b\n\
             projects/q/regions/r/addresses/c\n"
        );
        assert_eq!(err, "");
    }

    #[test]
    fn canonical_reports_every_invalid_reference() {
        let (result, out, err) = run(&[
            "canonical",
            "--kind",
            "sink",
            "folders/1/sinks/s",
            "widgets/x/sinks/s",
            "s",
        ]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "2 reference(s) could not be parsed"
        );
        assert_eq!(out, "folders/1/sinks/s\n");

        let lines: Vec<&str> = err.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(
            lines[0].starts_with("Error: references[1]: unrecognized resource type 'widgets'"),
            "{err}"
        );
        assert!(lines[1].starts_with("Error: references[2]: invalid format"), "{err}");
    }

    #[test]
    fn canonical_json_output() {
        let (result, out, _) = run(&[
            "canonical",
            "--kind",
            "zonal:instances",
            "--json",
            "us-central1-a/vm",
        ]);
        result.unwrap();
        let output: serde_json::Value = serde_json::from_str(out.trim_end()).unwrap();
        assert_eq!(
            output,
            serde_json::json!({
                "raw": "us-central1-a/vm",
                "id": "projects/p/zones/us-central1-a/instances/vm",
                "parent": "projects/p/zones/us-central1-a",
            })
        );
    }

    #[test]
    fn parent_command() {
        let (result, out, _) = run(&["parent", "--kind", "sink", "organizations/o/sinks/s"]);
        result.unwrap();
        assert_eq!(out, "organizations/o\n");

        let (result, out, _) = run(&["parent", "--kind", "global:networks", "n"]);
        result.unwrap();
        assert_eq!(out, "projects/p/global\n");

        let (result, out, _) = run(&["parent", "--kind", "organization:roles", "r"]);
        let err = result.unwrap_err();
        assert_eq!(err.to_string(), "cannot parse reference to organization:roles");
        assert!(format!("{err:#}").contains("invalid format"));
        assert_eq!(out, "");
    }

    #[test]
    fn suppress_command() {
        let (result, out, _) = run(&["suppress", "port-range", "80-80", "80"]);
        result.unwrap();
        assert_eq!(out, "true\n");

        let (result, out, _) = run(&["suppress", "duration", "60s", "65s"]);
        result.unwrap();
        assert_eq!(out, "false\n");

        let (result, out, _) = run(&["suppress", "empty-or-default", "", "none", "--default", "none"]);
        result.unwrap();
        assert_eq!(out, "true\n");

        let (result, _, _) = run(&["suppress", "empty-or-default", "", "x"]);
        assert!(result.is_err());
    }

    #[test]
    fn kind_is_parsed() {
        let cli = Cli::parse_from([
            "tpg-resource",
            "--project",
            "p",
            "canonical",
            "--kind",
            "regional:addresses",
            "r/a",
        ]);
        let Command::Canonical(args) = &cli.command else {
            panic!("expected the canonical command");
        };
        assert_eq!(args.kind.collection(), "addresses");
        assert_eq!(cli.project.as_deref(), Some("p"));
    }
}
