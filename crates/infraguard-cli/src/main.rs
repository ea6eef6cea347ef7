//! CLI entry point for infraguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup and exit
//! codes. All business logic lives in the `infraguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use infraguard_app::{
    CheckInput, ExplainOutput, format_explanation, format_not_found, format_rules, list_rules,
    parse_report_json, render_annotations, render_markdown, run_check, run_explain,
    runtime_error_report, to_renderable, verdict_exit_code, write_report, write_text,
};
use infraguard_settings::Overrides;
use infraguard_types::InfraguardReport;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "INFRAGUARD_LOG";

#[derive(Parser, Debug)]
#[command(
    name = "infraguard",
    version,
    about = "Policy gate for infrastructure resource graphs"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate the policy pack against a resource graph and write artifacts.
    Check {
        /// Resource graph snapshot: a JSON file or a directory of JSON files.
        #[arg(long)]
        graph: Utf8PathBuf,

        /// Path to infraguard config TOML (missing file means defaults).
        #[arg(long, default_value = "infraguard.toml")]
        config: Utf8PathBuf,

        /// Override profile (default|strict|audit).
        #[arg(long)]
        profile: Option<String>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/infraguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/infraguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/infraguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/infraguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a rule name or violation code with remediation guidance.
    Explain {
        /// The rule name (e.g. "ssh-restricted") or code (e.g. "ssh_open_to_world").
        identifier: String,
    },

    /// List the rules of the built-in policy pack.
    Rules,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Check {
            graph,
            config,
            profile,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_check(CheckArgs {
            graph,
            config,
            profile,
            report_out,
            write_markdown,
            markdown_out,
        }),
        Commands::Md { report, output } => cmd_md(&report, output.as_deref()),
        Commands::Annotations { report, max } => cmd_annotations(&report, max),
        Commands::Explain { identifier } => cmd_explain(&identifier),
        Commands::Rules => {
            print!("{}", format_rules(&list_rules()));
            Ok(())
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

struct CheckArgs {
    graph: Utf8PathBuf,
    config: Utf8PathBuf,
    profile: Option<String>,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
}

fn cmd_check(args: CheckArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let cfg_text = read_config(&args.config)?;

        let output = run_check(CheckInput {
            graph_path: &args.graph,
            config_text: &cfg_text,
            overrides: Overrides {
                profile: args.profile.clone(),
            },
        })?;

        write_report(&args.report_out, &output.report).context("write report json")?;

        if args.write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text(&args.markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let profile = args.profile.as_deref().unwrap_or("default");
            let report = runtime_error_report(&format!("{err:#}"), profile);
            if let Err(write_err) = write_report(&args.report_out, &report) {
                tracing::warn!(error = %write_err, "could not write runtime error report");
            }
            eprintln!("infraguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Read the config file; a missing file yields an empty config.
fn read_config(path: &Utf8Path) -> anyhow::Result<String> {
    if !path.exists() {
        tracing::debug!(config = %path, "config file not found; using defaults");
        return Ok(String::new());
    }
    std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))
}

fn load_report(path: &Utf8Path) -> anyhow::Result<InfraguardReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = load_report(report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }

    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = load_report(report_path)?;
    for annotation in render_annotations(&to_renderable(&report), max) {
        println!("{annotation}");
    }
    Ok(())
}

fn cmd_explain(identifier: &str) -> anyhow::Result<()> {
    match run_explain(identifier) {
        ExplainOutput::Found(exp) => {
            print!("{}", format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound {
            identifier,
            available_rules,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_rules, available_codes)
            );
            std::process::exit(1);
        }
    }
}
