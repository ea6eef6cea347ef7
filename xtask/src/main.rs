//! Developer tasks (schema generation, fixture conformance, explain coverage).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use infraguard_test_util::{normalize_nondeterministic, redact_fingerprints};
use schemars::schema_for;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> PathBuf {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)
        .or_else(|_| std::env::current_dir())
        .unwrap_or_else(|_| PathBuf::from("."));

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or(manifest_dir)
    } else {
        manifest_dir
    }
}

fn schemas_dir() -> PathBuf {
    project_root().join("schemas")
}

fn fixtures_dir() -> PathBuf {
    project_root().join("tests").join("fixtures")
}

/// Schema definition with its target filename.
struct SchemaTarget {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(infraguard_types::InfraguardReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(infraguard_settings::InfraguardConfigV1)
}

fn schema_targets() -> Vec<SchemaTarget> {
    vec![
        SchemaTarget {
            filename: "infraguard.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaTarget {
            filename: "infraguard.config.v1.json",
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

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir();
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for target in schema_targets() {
        let json = serialize_schema(&(target.generate)())?;
        let path = dir.join(target.filename);
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

    for target in schema_targets() {
        let path = dir.join(target.filename);
        if !path.exists() {
            missing.push(target.filename);
            continue;
        }

        let expected = serialize_schema(&(target.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(target.filename);
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
    eprintln!("  conform           Validate golden reports in tests/fixtures against the report schema");
    eprintln!("  conform-full      conform + run the infraguard binary on every fixture");
    eprintln!("  explain-coverage  Validate all rule names and codes have explanations");
}

/// Rule names and codes in a report must be stable lowercase tokens.
fn is_valid_rule_name(s: &str) -> bool {
    s == infraguard_types::ids::RULE_TOOL_RUNTIME
        || (s.starts_with(|c: char| c.is_ascii_lowercase())
            && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-'))
}

fn is_valid_code(s: &str) -> bool {
    s.starts_with(|c: char| c.is_ascii_lowercase())
        && s.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

fn compile_report_schema() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(generate_report_schema()).context("schema to JSON")?;
    jsonschema::validator_for(&schema).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

/// Schema and token checks for one report value; problems are pushed to `errors`.
fn check_report(
    label: &str,
    value: &serde_json::Value,
    validator: &jsonschema::Validator,
    errors: &mut Vec<String>,
) {
    for err in validator.iter_errors(value) {
        errors.push(format!("{label}: schema validation: {err}"));
    }

    let known_codes = infraguard_types::explain::all_codes();
    if let Some(violations) = value.get("violations").and_then(|v| v.as_array()) {
        for (i, v) in violations.iter().enumerate() {
            let rule = v.get("rule_name").and_then(|r| r.as_str()).unwrap_or_default();
            let code = v.get("code").and_then(|c| c.as_str()).unwrap_or_default();
            if !is_valid_rule_name(rule) {
                errors.push(format!("{label}: violations[{i}].rule_name '{rule}' is not a valid token"));
            }
            if !is_valid_code(code) {
                errors.push(format!("{label}: violations[{i}].code '{code}' is not a valid token"));
            } else if code != infraguard_types::ids::CODE_RUNTIME_ERROR
                && !known_codes.contains(&code)
            {
                errors.push(format!("{label}: violations[{i}].code '{code}' is not a known code"));
            }
        }
    }
}

fn fixture_dirs() -> anyhow::Result<Vec<PathBuf>> {
    let mut dirs = Vec::new();
    for entry in fs::read_dir(fixtures_dir()).context("Failed to read tests/fixtures/")? {
        let path = entry?.path();
        if path.is_dir() {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

fn dir_name(path: &Path) -> String {
    path.file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string()
}

/// Validate every golden `expected.report.json` against the generated report schema.
fn conform() -> anyhow::Result<()> {
    let validator = compile_report_schema()?;
    println!("✓ infraguard.report.v1 schema compiles");

    let mut golden_count = 0;
    let mut errors = Vec::new();

    for dir in fixture_dirs()? {
        let golden = dir.join("expected.report.json");
        if !golden.exists() {
            continue;
        }
        let name = dir_name(&dir);
        let content = fs::read_to_string(&golden)
            .with_context(|| format!("Failed to read {}", golden.display()))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {} as JSON", golden.display()))?;

        check_report(&name, &value, &validator, &mut errors);
        golden_count += 1;
        println!("  ✓ {name}/expected.report.json validates");
    }

    if golden_count == 0 {
        bail!("No golden reports found in {}", fixtures_dir().display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {golden_count} golden reports pass conformance checks!");
    Ok(())
}

/// Snapshot entry point of a fixture: `graph.json`, another single JSON file, or the directory.
fn fixture_input(dir: &Path) -> PathBuf {
    let graph = dir.join("graph.json");
    if graph.exists() {
        return graph;
    }
    let json_files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .map(|e| e.path())
                .filter(|p| p.extension().is_some_and(|ext| ext == "json"))
                .filter(|p| !p.ends_with("expected.report.json"))
                .collect()
        })
        .unwrap_or_default();
    match json_files.as_slice() {
        [single] => single.clone(),
        _ => dir.to_path_buf(),
    }
}

/// Run the built binary on every fixture, validate its output, and compare goldens.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: infraguard binary output ---\n");

    let validator = compile_report_schema()?;
    let bin = project_root().join("target").join("debug").join("infraguard");

    #[cfg(target_os = "windows")]
    let bin = bin.with_extension("exe");

    if !bin.exists() {
        bail!(
            "infraguard binary not found at {}.\nRun `cargo build -p infraguard-cli` first.",
            bin.display()
        );
    }

    let mut errors = Vec::new();

    for dir in fixture_dirs()? {
        let name = dir_name(&dir);
        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&bin)
            .current_dir(temp_dir.path())
            .arg("check")
            .arg("--graph")
            .arg(fixture_input(&dir))
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run infraguard on fixture '{name}'"))?;

        match output.status.code() {
            Some(0 | 1 | 2) => {}
            other => {
                errors.push(format!("fixture '{name}': unexpected exit status {other:?}"));
                continue;
            }
        }

        let Ok(content) = fs::read_to_string(&report_out) else {
            errors.push(format!("fixture '{name}': no report output generated"));
            continue;
        };
        let report: serde_json::Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse report for fixture '{name}'"))?;

        check_report(&name, &report, &validator, &mut errors);

        let golden_path = dir.join("expected.report.json");
        if golden_path.exists() {
            let golden: serde_json::Value = serde_json::from_str(&fs::read_to_string(&golden_path)?)?;
            let normalize = |v: serde_json::Value| redact_fingerprints(normalize_nondeterministic(v));
            if normalize(report) != normalize(golden) {
                errors.push(format!("fixture '{name}': output differs from expected.report.json"));
            } else {
                println!("  ✓ fixture '{name}' matches golden report");
            }
        } else {
            println!("  ✓ fixture '{name}' produces a valid report (no golden file)");
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Full conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

/// Validate that all rule names and codes have explanations.
fn explain_coverage() -> anyhow::Result<()> {
    let rule_names = infraguard_types::explain::all_rule_names();
    let codes = infraguard_types::explain::all_codes();

    let mut errors = Vec::new();
    for (kind, ids) in [("Rule", rule_names), ("Code", codes)] {
        for id in ids {
            match infraguard_types::explain::lookup_explanation(id) {
                Some(exp) => {
                    for (field, text) in [
                        ("title", exp.title),
                        ("description", exp.description),
                        ("remediation", exp.remediation),
                    ] {
                        if text.is_empty() {
                            errors.push(format!("{kind} '{id}' has empty {field}"));
                        }
                    }
                }
                None => errors.push(format!("{kind} '{id}' has no explanation")),
            }
        }
    }

    if errors.is_empty() {
        println!("✓ {} rule names have explanations", rule_names.len());
        println!("✓ {} codes have explanations", codes.len());
        println!("\n✓ All explain coverage checks passed!");
        Ok(())
    } else {
        for error in &errors {
            eprintln!("  - {error}");
        }
        bail!("Explain coverage validation failed with {} errors", errors.len())
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
        "conform-full" => conform_full(),
        "explain-coverage" => explain_coverage(),
        "print-schema-ids" => {
            for target in schema_targets() {
                println!("{}", target.filename.trim_end_matches(".json"));
            }
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
