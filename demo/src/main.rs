//! VIGIL conditional field validation CLI
//!
//! Runs the user-request reference scenarios, or validates a JSON document
//! against schemas loaded from disk.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- premium-user
//!   cargo run -p demo -- validate --schemas ./schemas --schema user_profile --input profile.json
//!   cargo run -p demo -- validate --schemas ./schemas --schema user_profile --input - --fields age,email

use std::{
    io::Read,
    path::{Path, PathBuf},
    sync::Arc,
};

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use vigil_contracts::{
    error::{VigilError, VigilResult},
    value::Record,
    violation::Violation,
};
use vigil_core::ValidationEngine;
use vigil_expr::SimpleExpressionEvaluator;
use vigil_ref_users::scenarios::{age_limits, partial_update, payment_group, premium_user, us_address};
use vigil_registry::{FileSchemaSource, SchemaRegistry};

// ── CLI definition ────────────────────────────────────────────────────────────

/// VIGIL: schema-driven conditional field validation.
#[derive(Parser)]
#[command(
    name = "vigil",
    about = "VIGIL conditional field validation",
    long_about = "Runs the VIGIL reference scenarios, or validates a JSON document\n\
                  against schemas loaded from a directory of TOML/JSON files."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run all five reference scenarios in sequence.
    RunAll,
    /// Scenario A: required INT32 with a range.
    AgeLimits,
    /// Scenario B: tax details required for premium and business users.
    PremiumUser,
    /// Scenario C: all-or-nothing payment fields.
    PaymentGroup,
    /// Scenario D: US address rules over nested paths.
    UsAddress,
    /// Scenario E: partial updates and schema refresh.
    PartialUpdate,
    /// Validate a JSON document against a named schema.
    Validate {
        /// Schema file, or directory of *.toml / *.json schema files.
        #[arg(long)]
        schemas: PathBuf,
        /// Name of the schema to validate against.
        #[arg(long)]
        schema: String,
        /// JSON document to validate; `-` reads stdin.
        #[arg(long)]
        input: PathBuf,
        /// Only check these field paths (comma-separated).
        #[arg(long, value_delimiter = ',')]
        fields: Vec<String>,
        /// Print violations as JSON.
        #[arg(long)]
        json: bool,
    },
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Initialize structured logging.  Set RUST_LOG=debug for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::AgeLimits => with_banner(age_limits::run_scenario),
        Command::PremiumUser => with_banner(premium_user::run_scenario),
        Command::PaymentGroup => with_banner(payment_group::run_scenario),
        Command::UsAddress => with_banner(us_address::run_scenario),
        Command::PartialUpdate => with_banner(partial_update::run_scenario),
        Command::Validate {
            schemas,
            schema,
            input,
            fields,
            json,
        } => match validate(&schemas, &schema, &input, &fields) {
            Ok(violations) => {
                report(&violations, json);
                if !violations.is_empty() {
                    std::process::exit(1);
                }
                return;
            }
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => {
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("vigil error: {}", e);
            std::process::exit(1);
        }
    }
}

// ── Scenario dispatch ─────────────────────────────────────────────────────────

fn run_all() -> VigilResult<()> {
    print_banner();
    age_limits::run_scenario()?;
    premium_user::run_scenario()?;
    payment_group::run_scenario()?;
    us_address::run_scenario()?;
    partial_update::run_scenario()?;
    Ok(())
}

fn with_banner(scenario: fn() -> VigilResult<()>) -> VigilResult<()> {
    print_banner();
    scenario()
}

// ── Validate command ──────────────────────────────────────────────────────────

fn validate(
    schemas: &Path,
    schema_name: &str,
    input: &Path,
    fields: &[String],
) -> VigilResult<Vec<Violation>> {
    let registry = Arc::new(SchemaRegistry::load(FileSchemaSource::new(schemas))?);
    if registry.get_schema(schema_name).is_none() {
        return Err(VigilError::ConfigError {
            reason: format!(
                "schema '{}' not found in {} (available: {})",
                schema_name,
                schemas.display(),
                registry.names().join(", ")
            ),
        });
    }
    info!(schema = %schema_name, input = %input.display(), "validating document");

    let document = read_input(input)?;
    let engine = ValidationEngine::new(registry, Arc::new(SimpleExpressionEvaluator::new()));

    let field_names: Vec<&str> = fields.iter().map(String::as_str).collect();
    let subset = (!field_names.is_empty()).then_some(field_names.as_slice());
    Ok(engine.validate(&document, schema_name, subset))
}

fn read_input(input: &Path) -> VigilResult<Record> {
    let raw = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| VigilError::ConfigError {
                reason: format!("failed to read stdin: {}", e),
            })?;
        buf
    } else {
        std::fs::read_to_string(input).map_err(|e| VigilError::ConfigError {
            reason: format!("failed to read {}: {}", input.display(), e),
        })?
    };
    let value: serde_json::Value = serde_json::from_str(&raw).map_err(|e| VigilError::ConfigError {
        reason: format!("input is not valid JSON: {}", e),
    })?;
    Record::from_json(value)
}

fn report(violations: &[Violation], as_json: bool) {
    if as_json {
        match serde_json::to_string_pretty(violations) {
            Ok(out) => println!("{out}"),
            Err(e) => eprintln!("vigil error: failed to encode violations: {}", e),
        }
        return;
    }
    if violations.is_empty() {
        println!("OK: no violations");
        return;
    }
    println!("{} violation(s):", violations.len());
    for v in violations {
        match &v.trigger {
            Some(trigger) => println!("  - {v}  (triggered by {trigger})"),
            None => println!("  - {v}"),
        }
    }
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("VIGIL: Conditional Field Validation");
    println!("User Request Reference Demo");
    println!("====================================");
    println!();
    println!("Per rule, the engine:");
    println!("  [1] Resolves the field path (dotted, through nested objects)");
    println!("  [2] Decides whether the field is required (always, by condition, or by dependency)");
    println!("  [3] Reports a missing required value, or checks a present value's type and limits");
    println!();
}
