//! # Model Check CLI
//!
//! Reads FHIR R4 JSON resources into the typed model and reports what the
//! model's rules say about them.
//!
//! ## Command Line Options
//!
//! ```text
//! atrius-model-check [--format text|json] [-v] <COMMAND>
//!
//!   validate <FILE>...      Parse, then evaluate invariants and bindings
//!       --strict            Treat warnings as failures
//!       --no-constraints    Skip invariant evaluation
//!       --no-bindings       Skip terminology binding checks
//!   walk <FILE>             Print the path of every element
//!   describe <TYPE>         List the invariants and bindings of a resource type
//! ```
//!
//! `--format`, `--verbose` and `--strict` can also be set through
//! `ATRIUS_FORMAT`, `ATRIUS_VERBOSE` and `ATRIUS_STRICT`. `-` reads a
//! resource from stdin.
//!
//! ## Usage Examples
//!
//! ```bash
//! atrius-model-check validate plan.json order.json
//! atrius-model-check --format json validate --strict order.json
//! cat response.json | atrius-model-check walk -
//! atrius-model-check describe InsurancePlan
//! ```

use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use serde_json::json;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use atrius_fhir_lib::r4::*;
use atrius_fhir_lib::terminology::LocalTerminology;
use atrius_fhir_lib::visitor::PathVisitor;
use atrius_fhir_lib::FhirResource;
use atrius_fhirpath_support::FhirValidate;

use crate::engine::PresenceEngine;
use crate::report::{BindingReport, Description, FileReport, InvariantReport, IssueReport, IssueSource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "atrius-model-check", version)]
#[command(about = "Parse, validate and inspect FHIR R4 resources")]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Output format
    #[arg(long, value_enum, env = "ATRIUS_FORMAT", default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,

    /// Log at debug level (RUST_LOG takes precedence)
    #[arg(short, long, env = "ATRIUS_VERBOSE", global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Parse resources and report invariant and binding issues
    Validate {
        /// Resource JSON files (use '-' for stdin)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Treat warnings as failures
        #[arg(long, env = "ATRIUS_STRICT")]
        strict: bool,

        /// Skip FHIRPath invariant evaluation
        #[arg(long)]
        no_constraints: bool,

        /// Skip terminology binding checks
        #[arg(long)]
        no_bindings: bool,
    },

    /// Print the path of every element in a resource
    Walk {
        /// Resource JSON file (use '-' for stdin)
        file: PathBuf,
    },

    /// List the invariants and bindings of a resource type
    Describe {
        /// Resource type name, e.g. InsurancePlan
        resource_type: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
}

/// Runs one command, writing its output to `out`.
///
/// Unreadable files and unknown resource types are errors; files that are
/// read but rejected or that carry failing issues give [`Outcome::Failed`].
pub fn run(args: &Args, out: &mut dyn Write) -> anyhow::Result<Outcome> {
    match &args.command {
        Command::Validate { files, strict, no_constraints, no_bindings } => {
            let mut reports = Vec::with_capacity(files.len());
            for file in files {
                reports.push(check_file(file, !no_constraints, !no_bindings)?);
            }
            let passed = reports.iter().all(|r| r.passed(*strict));
            info!(files = reports.len(), passed, strict, "validation finished");

            match args.format {
                OutputFormat::Text => {
                    for report in &reports {
                        report.write_text(out)?;
                    }
                }
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&reports)?)?,
            }
            Ok(if passed { Outcome::Passed } else { Outcome::Failed })
        }
        Command::Walk { file } => {
            let content = read_input(file)?;
            let resource = match Resource::from_json_str(&content) {
                Ok(resource) => resource,
                Err(err) => {
                    let file = file.display().to_string();
                    warn!(%file, %err, "resource rejected");
                    match args.format {
                        OutputFormat::Text => writeln!(out, "{file}: rejected: {err}")?,
                        OutputFormat::Json => {
                            let rejected = json!({"file": file, "error": err.to_string()});
                            writeln!(out, "{}", serde_json::to_string_pretty(&rejected)?)?;
                        }
                    }
                    return Ok(Outcome::Failed);
                }
            };
            let mut visitor = PathVisitor::default();
            resource.walk(&mut visitor);

            match args.format {
                OutputFormat::Text => {
                    for node in visitor.nodes() {
                        match &node.value {
                            Some(value) => writeln!(out, "{}: {} = {}", node.path, node.type_name, value)?,
                            None => writeln!(out, "{}: {}", node.path, node.type_name)?,
                        }
                    }
                }
                OutputFormat::Json => {
                    let nodes: Vec<_> = visitor
                        .nodes()
                        .iter()
                        .map(|n| json!({"path": n.path, "type": n.type_name, "value": n.value}))
                        .collect();
                    writeln!(out, "{}", serde_json::to_string_pretty(&nodes)?)?;
                }
            }
            Ok(Outcome::Passed)
        }
        Command::Describe { resource_type } => {
            let Some(description) = describe(resource_type) else {
                bail!("unsupported resource type '{resource_type}'");
            };
            match args.format {
                OutputFormat::Text => description.write_text(out)?,
                OutputFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&description)?)?,
            }
            Ok(Outcome::Passed)
        }
    }
}

/// Sends logs to stderr. `RUST_LOG` overrides the level chosen by `verbose`.
pub fn init_tracing(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .try_init();
}

/// Reads from a file or, for `-`, from stdin.
fn read_input(path: &Path) -> anyhow::Result<String> {
    if path.to_str() == Some("-") {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
        Ok(buffer)
    } else {
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
    }
}

fn check_file(path: &Path, constraints: bool, bindings: bool) -> anyhow::Result<FileReport> {
    let file = path.display().to_string();
    let content = read_input(path)?;

    let resource = match Resource::from_json_str(&content) {
        Ok(resource) => resource,
        Err(err) => {
            warn!(%file, %err, "resource rejected");
            return Ok(FileReport { file, resource_type: None, error: Some(err.to_string()), issues: Vec::new() });
        }
    };

    let mut issues = Vec::new();
    if constraints {
        let found = resource.validate_constraints(&PresenceEngine::new());
        issues.extend(found.into_iter().map(|issue| IssueReport::new(IssueSource::Constraint, issue)));
    }
    if bindings {
        let found = resource.validate_bindings(&LocalTerminology);
        issues.extend(found.into_iter().map(|issue| IssueReport::new(IssueSource::Binding, issue)));
    }
    debug!(%file, resource_type = resource.resource_type(), issues = issues.len(), "checked resource");

    Ok(FileReport { file, resource_type: Some(resource.resource_type()), error: None, issues })
}

macro_rules! rules_of {
    ($name:literal: $($ty:ty),+ $(,)?) => {{
        let mut invariants = Vec::new();
        let mut bindings = Vec::new();
        $(
            invariants.extend(<$ty as FhirValidate>::invariants().iter().map(InvariantReport::from));
            bindings.extend(<$ty as FhirValidate>::bindings().iter().map(BindingReport::from));
        )+
        Description { resource_type: $name, invariants, bindings }
    }};
}

/// Invariants and bindings declared on a resource and its backbone elements.
pub fn describe(resource_type: &str) -> Option<Description> {
    let description = match resource_type {
        "AppointmentResponse" => rules_of!("AppointmentResponse": AppointmentResponse),
        "ChargeItemDefinition" => rules_of!(
            "ChargeItemDefinition":
            ChargeItemDefinition,
            ChargeItemDefinitionApplicability,
            ChargeItemDefinitionPropertyGroup,
            ChargeItemDefinitionPropertyGroupPriceComponent,
        ),
        "InsurancePlan" => rules_of!(
            "InsurancePlan":
            InsurancePlan,
            InsurancePlanContact,
            InsurancePlanCoverage,
            InsurancePlanCoverageBenefit,
            InsurancePlanCoverageBenefitLimit,
            InsurancePlanPlan,
            InsurancePlanPlanGeneralCost,
            InsurancePlanPlanSpecificCost,
            InsurancePlanPlanSpecificCostBenefit,
            InsurancePlanPlanSpecificCostBenefitCost,
        ),
        "NutritionOrder" => rules_of!(
            "NutritionOrder":
            NutritionOrder,
            NutritionOrderOralDiet,
            NutritionOrderOralDietNutrient,
            NutritionOrderOralDietTexture,
            NutritionOrderSupplement,
            NutritionOrderEnteralFormula,
            NutritionOrderEnteralFormulaAdministration,
        ),
        _ => return None,
    };
    Some(description)
}
