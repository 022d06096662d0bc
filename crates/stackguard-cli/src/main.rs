//! CLI entry point for stackguard.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, logging setup, and
//! exit codes. All business logic lives in the `stackguard-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand};
use stackguard_app::{
    format_explanation, format_not_found, format_policies, list_policies, parse_report_json,
    render_annotations, render_markdown, run_check, run_explain, runtime_error_report,
    serialize_report, to_renderable, verdict_exit_code, CheckInput, ExplainOutput,
};
use stackguard_settings::Overrides;
use stackguard_types::StackguardReport;
use std::io::Read;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "stackguard",
    version,
    about = "Compliance policy packs for infrastructure resource descriptors"
)]
struct Cli {
    /// Path to the policy configuration (JSON, or TOML when the extension is `.toml`).
    /// A missing file means built-in defaults.
    #[arg(long, default_value = "stackguard.json")]
    config: Utf8PathBuf,

    /// Force every policy to this level (disabled|advisory|mandatory).
    #[arg(long)]
    enforcement_level: Option<String>,

    /// Override the pack name recorded in reports.
    #[arg(long)]
    pack_name: Option<String>,

    /// Enable debug logging (RUST_LOG takes precedence when set).
    #[arg(long, short)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate resource descriptors and write artifacts.
    Check {
        /// Resource descriptors: a JSON array or JSON Lines. Use `-` for stdin.
        #[arg(long, default_value = "resources.json")]
        resources: Utf8PathBuf,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/stackguard/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/stackguard/comment.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        #[arg(long, default_value = "artifacts/stackguard/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        #[arg(long, default_value = "artifacts/stackguard/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },

    /// Explain a policy name or violation code with remediation guidance.
    Explain {
        /// The policy (e.g. "required-tags") or code (e.g. "missing_tag") to explain.
        identifier: String,
    },

    /// List built-in policies with their effective levels and configuration keys.
    Policies {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.cmd {
        Commands::Check {
            ref resources,
            ref report_out,
            write_markdown,
            ref markdown_out,
        } => cmd_check(&cli, resources, report_out, write_markdown, markdown_out),
        Commands::Md {
            ref report,
            ref output,
        } => cmd_md(report, output.as_deref()),
        Commands::Annotations { ref report, max } => cmd_annotations(report, max),
        Commands::Explain { ref identifier } => cmd_explain(identifier),
        Commands::Policies { json } => cmd_policies(&cli, json),
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn overrides(cli: &Cli) -> anyhow::Result<Overrides> {
    let enforcement_level = cli
        .enforcement_level
        .as_deref()
        .map(|v| stackguard_settings::parse_enforcement_level("cli", "--enforcement-level", v))
        .transpose()
        .context("parse --enforcement-level")?;
    Ok(Overrides {
        enforcement_level,
        pack_name: cli.pack_name.clone(),
    })
}

/// Missing config is allowed: defaults apply.
fn read_config(path: &Utf8Path) -> anyhow::Result<(String, bool)> {
    let is_toml = path.extension() == Some("toml");
    if !path.exists() {
        tracing::debug!(%path, "config not found; using defaults");
        return Ok((String::new(), is_toml));
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("read config: {path}"))?;
    Ok((text, is_toml))
}

fn read_resources(path: &Utf8Path) -> anyhow::Result<String> {
    if path.as_str() == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("read resources from stdin")?;
        return Ok(text);
    }
    std::fs::read_to_string(path).with_context(|| format!("read resources: {path}"))
}

fn cmd_check(
    cli: &Cli,
    resources: &Utf8Path,
    report_out: &Utf8Path,
    write_markdown: bool,
    markdown_out: &Utf8Path,
) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let overrides = overrides(cli)?;
        let (config_text, config_is_toml) = read_config(&cli.config)?;
        let resources_text = read_resources(resources)?;

        let output = run_check(CheckInput {
            config_text: &config_text,
            config_is_toml,
            resources_text: &resources_text,
            overrides,
        })?;

        write_report_file(report_out, &output.report).context("write report json")?;

        if write_markdown {
            let md = render_markdown(&to_renderable(&output.report));
            write_text_file(markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict.status))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            tracing::error!("{err:#}");
            let report = runtime_error_report(&format!("{err:#}"));
            if let Err(write_err) = write_report_file(report_out, &report) {
                tracing::error!("could not write error report: {write_err:#}");
            }
            eprintln!("stackguard error: {err:#}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &StackguardReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    let data = serialize_report(report)?;
    std::fs::write(path, data).with_context(|| format!("write report: {path}"))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {path}"))?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<StackguardReport> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: &Utf8Path, output: Option<&Utf8Path>) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
    let md = render_markdown(&to_renderable(&report));

    match output {
        Some(out_path) => write_text_file(out_path, &md).context("write markdown output")?,
        None => print!("{md}"),
    }
    Ok(())
}

fn cmd_annotations(report_path: &Utf8Path, max: usize) -> anyhow::Result<()> {
    let report = read_report(report_path)?;
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
            available_policies,
            available_codes,
        } => {
            eprint!(
                "{}",
                format_not_found(&identifier, available_policies, available_codes)
            );
            std::process::exit(1);
        }
    }
}

fn cmd_policies(cli: &Cli, json: bool) -> anyhow::Result<()> {
    let (config_text, config_is_toml) = read_config(&cli.config)?;
    let pack = stackguard_settings::load_pack(&config_text, config_is_toml, &overrides(cli)?)
        .context("load policy pack")?;
    let listings = list_policies(&pack);

    if json {
        let text = serde_json::to_string_pretty(&listings).context("serialize policies")?;
        println!("{text}");
    } else {
        print!("{}", format_policies(&listings));
    }
    Ok(())
}
