// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Studmount Team

//! Studmount CLI

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use studmount::geometry::MeshBackend;
use studmount::params::{parse_assignments, ParameterKind};
use studmount::{parts, render, render_batch, KernelConfig, ParameterMap, RenderRequest, RenderedPart};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "studmount")]
#[command(about = "Parametric stud-compatible adapter parts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to studmount.toml plus STUDMOUNT_* overrides)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List available parts
    List,

    /// Show the parameters a part accepts
    Params {
        part: String,

        /// Print the declarations as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render a part and print its geometry statistics
    Render {
        part: String,

        /// Override a parameter, e.g. --set type=B1
        #[arg(short, long = "set", value_name = "NAME=VALUE")]
        assignments: Vec<String>,

        /// JSON or TOML file of parameter overrides
        #[arg(short, long, value_name = "FILE")]
        params: Option<String>,
    },

    /// Render several parts with their defaults in parallel
    Batch {
        #[arg(required = true)]
        parts: Vec<String>,
    },

    /// Show version information
    Version,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => KernelConfig::from_file(path)?,
        None => KernelConfig::load()?,
    };

    match &cli.command {
        Commands::List => list_command(),
        Commands::Params { part, json } => params_command(part, *json)?,
        Commands::Render {
            part,
            assignments,
            params,
        } => render_command(part, assignments, params.as_deref(), &config)?,
        Commands::Batch { parts } => batch_command(parts, &config)?,
        Commands::Version => {
            println!("Studmount v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn list_command() {
    println!("{}", "Available parts".bold());
    for part in parts::catalog::<MeshBackend>() {
        println!("  {:<20} {}", part.name().cyan(), part.description().bright_black());
    }
}

fn params_command(name: &str, json: bool) -> Result<()> {
    let Some(part) = parts::find::<MeshBackend>(name) else {
        bail!("unknown part `{}` (see `studmount list`)", name);
    };
    let definitions = part.parameter_definitions();

    if json {
        println!("{}", serde_json::to_string_pretty(&definitions)?);
        return Ok(());
    }

    println!("{}", part.name().bold());
    for definition in &definitions {
        let detail = match &definition.kind {
            ParameterKind::Choice { values, .. } => values.join(" | "),
            ParameterKind::Float { min, max, .. } => bounds(*min, *max),
            ParameterKind::Int { min, max, .. } => {
                bounds(min.map(|v| v as f64), max.map(|v| v as f64))
            }
            ParameterKind::Checkbox { .. } => String::new(),
        };
        println!(
            "  {:<18} {:<9} {:<8} {} {}",
            definition.name.cyan(),
            definition.kind.label(),
            definition.default_value().to_string().yellow(),
            definition.caption,
            detail.bright_black()
        );
    }
    Ok(())
}

fn bounds(min: Option<f64>, max: Option<f64>) -> String {
    match (min, max) {
        (Some(min), Some(max)) => format!("[{} .. {}]", min, max),
        (Some(min), None) => format!("[>= {}]", min),
        (None, Some(max)) => format!("[<= {}]", max),
        (None, None) => String::new(),
    }
}

fn read_parameter_file(path: &str) -> Result<ParameterMap> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read parameter file: {}", path))?;
    let is_toml = Path::new(path)
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let map = if is_toml {
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML parameters: {}", path))?
    } else {
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse JSON parameters: {}", path))?
    };
    Ok(map)
}

fn render_command(
    name: &str,
    assignments: &[String],
    params_file: Option<&str>,
    config: &KernelConfig,
) -> Result<()> {
    let Some(part) = parts::find::<MeshBackend>(name) else {
        bail!("unknown part `{}` (see `studmount list`)", name);
    };

    let mut overrides = match params_file {
        Some(path) => read_parameter_file(path)?,
        None => ParameterMap::new(),
    };
    // --set wins over the file
    overrides.extend(parse_assignments(&part.parameter_definitions(), assignments)?);

    let start = std::time::Instant::now();
    let rendered = render(name, &overrides, config)?;
    let elapsed = start.elapsed();

    print_rendered(&rendered);
    println!("  {} {:.2?}", "Rendered in:".bright_black(), elapsed);
    Ok(())
}

fn print_rendered(rendered: &RenderedPart) {
    let count = rendered.pieces.len();
    for (index, (piece, stats)) in rendered.pieces.iter().zip(rendered.stats()).enumerate() {
        let title = if count == 1 {
            rendered.name.clone()
        } else {
            format!("{} [{}/{}]", rendered.name, index + 1, count)
        };
        stats.print(&title);
        println!("  {} {}", "Fingerprint: ".bright_black(), piece.fingerprint().yellow());
    }
}

fn batch_command(names: &[String], config: &KernelConfig) -> Result<()> {
    let requests: Vec<RenderRequest> = names.iter().map(RenderRequest::new).collect();

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} [{elapsed_precise}] {msg}")
            .context("Invalid progress template")?,
    );
    progress.set_message(format!("Rendering {} parts", requests.len()));
    progress.enable_steady_tick(std::time::Duration::from_millis(100));

    let results = render_batch(&requests, config);
    progress.finish_and_clear();

    let mut failed = 0;
    for (request, result) in requests.iter().zip(results) {
        match result {
            Ok(rendered) => println!(
                "{} {:<20} {} pieces, {} triangles",
                "✓".green(),
                rendered.name,
                rendered.pieces.len(),
                rendered.triangle_count().to_string().cyan()
            ),
            Err(err) => {
                failed += 1;
                println!("{} {:<20} {}", "✗".red(), request.part, err.to_string().red());
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} parts failed", failed, requests.len());
    }
    Ok(())
}
