//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the library crates.

use anyhow::{Context, bail};
use schemars::schema_for;
use stackguard_app::{LoadMode, ScanInput};
use stackguard_settings::Overrides;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_default();

    // If we're in the xtask directory, go up one level
    if manifest_dir.ends_with("xtask")
        && let Some(parent) = manifest_dir.parent()
    {
        parent.to_path_buf()
    } else {
        manifest_dir
    }
}

/// Get the schemas directory path.
fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

/// Get the graph fixtures directory path.
fn graph_fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures").join("graphs")
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

const REPORT_SCHEMA: &str = "stackguard.report.v1.json";
const GRAPH_SCHEMA: &str = "stackguard.graph.v1.json";
const CONFIG_SCHEMA: &str = "stackguard.config.v1.json";

fn generate_report_schema() -> schemars::Schema {
    schema_for!(stackguard_types::StackguardReport)
}

fn generate_graph_schema() -> schemars::Schema {
    schema_for!(stackguard_app::GraphDocument)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(stackguard_settings::StackguardConfigV1)
}

/// List of schemas to generate.
fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: REPORT_SCHEMA,
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: GRAPH_SCHEMA,
            generate: generate_graph_schema,
        },
        SchemaSpec {
            filename: CONFIG_SCHEMA,
            generate: generate_config_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

/// Emit schemas to the schemas/ directory.
fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);

        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;

        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Validate that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);

        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate graph fixtures and scan reports against schemas");
    eprintln!("  explain-coverage  Validate all rule IDs have explanations");
}

fn compile(schema: schemars::Schema) -> anyhow::Result<jsonschema::Validator> {
    let value = schema.to_value();
    jsonschema::validator_for(&value).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

fn schema_errors(validator: &jsonschema::Validator, value: &serde_json::Value) -> Vec<String> {
    validator.iter_errors(value).map(|e| e.to_string()).collect()
}

/// Conformance over the graph fixtures.
///
/// This checks:
/// 1. Every fixture validates against the graph document schema.
/// 2. Scanning the fixture succeeds and the report validates against the report schema.
/// 3. Repeated scans of the same fixture are identical once timestamps and version are normalized.
fn conform() -> anyhow::Result<()> {
    let graph_validator = compile(generate_graph_schema())?;
    let report_validator = compile(generate_report_schema())?;
    println!("✓ graph and report schemas compile");

    let fixtures_dir = graph_fixtures_dir();
    let mut paths: Vec<PathBuf> = fs::read_dir(&fixtures_dir)
        .with_context(|| format!("Failed to read {}", fixtures_dir.display()))?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    if paths.is_empty() {
        bail!("No JSON fixtures found in {}", fixtures_dir.display());
    }

    let mut errors = Vec::new();
    for path in &paths {
        errors.extend(conform_fixture(path, &graph_validator, &report_validator)?);
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {} fixtures pass conformance checks!", paths.len());
    Ok(())
}

fn conform_fixture(
    path: &Path,
    graph_validator: &jsonschema::Validator,
    report_validator: &jsonschema::Validator,
) -> anyhow::Result<Vec<String>> {
    let filename = path
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {filename}"))?;
    let graph: serde_json::Value = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse {filename} as JSON"))?;

    let mut errors: Vec<String> = schema_errors(graph_validator, &graph)
        .into_iter()
        .map(|e| format!("{filename}: graph schema: {e}"))
        .collect();

    let scan = |content: &str| -> anyhow::Result<serde_json::Value> {
        let output = stackguard_app::run_scan(ScanInput {
            graph_json: content,
            config_text: "",
            overrides: Overrides::default(),
            mode: LoadMode::Strict,
        })
        .with_context(|| format!("Failed to scan {filename}"))?;
        serde_json::to_value(&output.report).context("Failed to serialize report")
    };

    let first = scan(&content)?;
    errors.extend(
        schema_errors(report_validator, &first)
            .into_iter()
            .map(|e| format!("{filename}: report schema: {e}")),
    );

    let second = scan(&content)?;
    if stackguard_test_util::normalize_nondeterministic(first)
        != stackguard_test_util::normalize_nondeterministic(second)
    {
        errors.push(format!("{filename}: repeated scans differ"));
    }

    if errors.is_empty() {
        println!("  ✓ {filename} validates");
    }
    Ok(errors)
}

/// Validate that all rule IDs have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let rule_ids = stackguard_types::explain::all_rule_ids();
    let mut errors = Vec::new();

    for rule_id in rule_ids
        .iter()
        .copied()
        .chain([stackguard_types::ids::RULE_ENGINE_RULE_FAILURE])
    {
        match stackguard_types::explain::lookup_explanation(rule_id) {
            Some(exp) => {
                if exp.title.is_empty() {
                    errors.push(format!("Rule ID '{rule_id}' has empty title"));
                }
                if exp.description.is_empty() {
                    errors.push(format!("Rule ID '{rule_id}' has empty description"));
                }
                if exp.remediation.is_empty() {
                    errors.push(format!("Rule ID '{rule_id}' has empty remediation"));
                }
            }
            None => {
                errors.push(format!("Rule ID '{rule_id}' has no explanation"));
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} rule IDs have explanations", rule_ids.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!(
            "Explain coverage validation failed with {} errors",
            errors.len()
        )
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for spec in schema_specs() {
                println!("{}", spec.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
