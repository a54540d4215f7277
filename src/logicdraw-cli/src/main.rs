// Copyright 2026 The Simlin Authors. All rights reserved.
// Use of this source code is governed by the Apache License,
// Version 2.0, that can be found in the LICENSE file.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser, Subcommand};
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use logicdraw_engine::{IdCounter, RecordTotals, Workspace, io};

#[derive(Parser, Debug)]
#[command(name = "logicdraw", version, about = "Inspect, normalize and check logic diagram documents")]
struct Cli {
    /// More log output (-v debug, -vv trace).  RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the solution tree, record totals and load warnings.
    Inspect {
        path: PathBuf,
        /// Emit JSON on stdout.
        #[arg(long)]
        json: bool,
    },

    /// Rewrite a document in canonical form.
    Normalize {
        path: PathBuf,
        /// Write here instead of stdout.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Load every diagram and verify its connectivity.
    Check { path: PathBuf },
}

#[derive(Serialize, Debug)]
struct ProjectSummary {
    number: u32,
    diagrams: Vec<u32>,
}

#[derive(Serialize, Debug)]
struct Summary {
    solution: u32,
    tag_file: Option<String>,
    table_file: Option<String>,
    tags: usize,
    projects: Vec<ProjectSummary>,
    totals: RecordTotals,
    counter: IdCounter,
    warnings: Vec<String>,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();
}

fn open(path: &Path) -> Result<(Workspace, logicdraw_engine::ParseOutput)> {
    Workspace::open_file(path).with_context(|| format!("failed to open {}", path.display()))
}

fn summarize(path: &Path) -> Result<Summary> {
    let (workspace, output) = open(path)?;
    let solution = &workspace.solution;
    Ok(Summary {
        solution: solution.number,
        tag_file: solution.tag_file.clone(),
        table_file: solution.table_file.clone(),
        tags: workspace.tags.len(),
        projects: solution
            .projects
            .iter()
            .map(|project| ProjectSummary {
                number: project.number,
                diagrams: project.diagrams.iter().map(|d| d.number).collect(),
            })
            .collect(),
        totals: output.totals,
        counter: workspace.counter,
        warnings: output.warnings.iter().map(ToString::to_string).collect(),
    })
}

fn inspect(path: &Path, json: bool) -> Result<String> {
    let summary = summarize(path)?;
    if json {
        return serde_json::to_string_pretty(&summary).context("failed to encode summary");
    }

    let mut out = String::new();
    write!(out, "Solution|{}", summary.solution)?;
    if let Some(tag_file) = &summary.tag_file {
        write!(out, " (tags: {}, {} loaded)", tag_file, summary.tags)?;
    }
    writeln!(out)?;
    for project in summary.projects.iter() {
        writeln!(out, "  Project|{}", project.number)?;
        for diagram in project.diagrams.iter() {
            writeln!(out, "    Diagram|{diagram}")?;
        }
    }
    let t = &summary.totals;
    writeln!(
        out,
        "records: {} pin, {} wire, {} input, {} output, {} and, {} or, {} wire role, {} skipped",
        t.pins, t.wires, t.inputs, t.outputs, t.and_gates, t.or_gates, t.wire_roles, t.skipped
    )?;
    for warning in summary.warnings.iter() {
        writeln!(out, "warning: {warning}")?;
    }
    Ok(out)
}

fn diagrams(workspace: &Workspace) -> Vec<(u32, u32)> {
    workspace
        .solution
        .projects
        .iter()
        .flat_map(|p| p.diagrams.iter().map(move |d| (p.number, d.number)))
        .collect()
}

/// Round-trip every diagram through a live canvas so element and child
/// records come out in canonical order.
fn normalize(path: &Path) -> Result<String> {
    let (mut workspace, output) = open(path)?;
    let mut dropped = output.warnings.len();
    for (project, diagram) in diagrams(&workspace) {
        let loaded = workspace
            .open_diagram(project, diagram)
            .with_context(|| format!("failed to open Diagram|{diagram}"))?;
        dropped += loaded.warnings.len();
    }
    if dropped > 0 {
        debug!("{} record(s) dropped while normalizing", dropped);
    }
    Ok(workspace.generate())
}

/// Every problem found in the document, one per line.
fn check(path: &Path) -> Result<Vec<String>> {
    let (mut workspace, output) = open(path)?;
    let mut problems: Vec<String> = output.warnings.iter().map(ToString::to_string).collect();

    for (project, diagram) in diagrams(&workspace) {
        let loaded = workspace
            .open_diagram(project, diagram)
            .with_context(|| format!("failed to open Diagram|{diagram}"))?;
        let label = format!("Project|{project}/Diagram|{diagram}");
        problems.extend(loaded.warnings.iter().map(|w| format!("{label}: {w}")));
        if let Some(document) = workspace.document() {
            problems.extend(
                document
                    .canvas
                    .verify()
                    .into_iter()
                    .map(|p| format!("{label}: {p}")),
            );
        }
    }
    Ok(problems)
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Inspect { path, json } => {
            print!("{}", inspect(&path, json)?);
            if json {
                println!();
            }
        }
        Command::Normalize { path, output } => {
            let text = normalize(&path)?;
            match output {
                Some(output) => io::save(&output, &text)
                    .with_context(|| format!("failed to write {}", output.display()))?,
                None => println!("{text}"),
            }
        }
        Command::Check { path } => {
            let problems = check(&path)?;
            for problem in problems.iter() {
                eprintln!("{problem}");
            }
            if !problems.is_empty() {
                bail!("{} problem(s) in {}", problems.len(), path.display());
            }
            println!("{}: ok", path.display());
        }
    }
    Ok(())
}
