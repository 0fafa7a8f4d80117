use crate::config::Config;
use crate::detector::{Category, FileType, InferDetector};
use crate::gate::{FileInput, Policy, TypeGate};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use log::debug;
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Parser, Debug)]
#[command(name = "typegate")]
#[command(version, about = "Check files against file type policies by their content", long_about = None)]
pub struct Args {
    /// Configuration file
    #[arg(short, long, value_name = "FILE", env = "TYPEGATE_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode (only the exit code reports the verdict)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Check files against a policy (exit code 0 = allowed, 1 = forbidden)
    Check {
        #[command(flatten)]
        policy: PolicyArgs,

        /// Files or directories to check
        #[arg(value_name = "PATH")]
        paths: Vec<PathBuf>,
    },

    /// Show the detected type and categories of each file
    Detect {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,

        /// Files or directories to inspect
        #[arg(value_name = "PATH", required = true)]
        paths: Vec<PathBuf>,
    },

    /// List known file types and their categories
    Types {
        /// Only list types in this category
        #[arg(long)]
        category: Option<Category>,
    },
}

/// Exactly one way of choosing the policy.
#[derive(clap::Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct PolicyArgs {
    /// Only allow these types (comma separated)
    #[arg(long, value_name = "TYPES", value_delimiter = ',')]
    pub allow_types: Option<Vec<FileType>>,

    /// Reject these types (comma separated)
    #[arg(long, value_name = "TYPES", value_delimiter = ',')]
    pub forbid_types: Option<Vec<FileType>>,

    /// Only allow documents
    #[arg(long)]
    pub allow_documents: bool,

    /// Only allow images
    #[arg(long)]
    pub allow_images: bool,

    /// Only allow archives
    #[arg(long)]
    pub allow_archives: bool,

    /// Reject executables
    #[arg(long)]
    pub forbid_executables: bool,

    /// Use a named policy from the configuration file
    #[arg(long, value_name = "NAME")]
    pub policy: Option<String>,
}

impl PolicyArgs {
    pub fn to_policy(&self, config: &Config) -> Result<Policy> {
        let policy = if let Some(types) = &self.allow_types {
            Policy::AllowTypes(non_empty(types))
        } else if let Some(types) = &self.forbid_types {
            Policy::ForbidTypes(non_empty(types))
        } else if self.allow_documents {
            Policy::allow_documents()
        } else if self.allow_images {
            Policy::allow_images()
        } else if self.allow_archives {
            Policy::allow_archives()
        } else if self.forbid_executables {
            Policy::forbid_executables()
        } else if let Some(name) = &self.policy {
            config.policy(name)?
        } else {
            anyhow::bail!("No policy selected");
        };

        Ok(policy)
    }
}

// `--allow-types ""` yields a single empty name; drop it so the policy reports as empty.
fn non_empty(types: &[FileType]) -> Vec<FileType> {
    types
        .iter()
        .filter(|t| !t.as_str().is_empty())
        .cloned()
        .collect()
}

pub fn init_logging(args: &Args) {
    let level = if args.quiet {
        "error"
    } else if args.verbose {
        "debug"
    } else {
        "warn"
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Runs the selected command. `Ok(false)` means at least one file was forbidden.
pub fn run(args: Args) -> Result<bool> {
    let config = load_config(args.config.as_deref())?;
    let gate = config
        .build_gate()
        .context("Invalid detector configuration")?;

    match &args.command {
        Commands::Check { policy, paths } => {
            let policy = policy.to_policy(&config)?;
            check_files(&gate, &policy, paths, args.quiet)
        }
        Commands::Detect { json, paths } => {
            detect_files(&gate, paths, *json)?;
            Ok(true)
        }
        Commands::Types { category } => {
            show_types(&gate, *category);
            Ok(true)
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            Ok(Config::load(path)?)
        }
        None => Ok(Config::default()),
    }
}

/// Expands directories into the regular files below them, in name order.
fn collect_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry
                    .with_context(|| format!("Failed to walk directory {}", path.display()))?;
                if entry.file_type().is_file() {
                    files.push(entry.into_path());
                }
            }
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn check_files(
    gate: &TypeGate<InferDetector>,
    policy: &Policy,
    paths: &[PathBuf],
    quiet: bool,
) -> Result<bool> {
    let files = collect_files(paths)?;
    check_each(gate, policy, &files, quiet, |path| {
        File::open(path).with_context(|| format!("Failed to open {}", path.display()))
    })
}

/// Checks `files` one at a time, so only one of them is open at any moment.
fn check_each<R, F>(
    gate: &TypeGate<InferDetector>,
    policy: &Policy,
    files: &[PathBuf],
    quiet: bool,
    mut open: F,
) -> Result<bool>
where
    R: Read,
    F: FnMut(&Path) -> Result<R>,
{
    policy.validate()?;
    let mut allowed = true;

    for path in files {
        let source = open(path)?;

        if quiet {
            if !gate.evaluate(policy, FileInput::single(source))? {
                return Ok(false);
            }
            continue;
        }

        for verdict in gate.verdicts(policy, FileInput::single(source))? {
            let detected = verdict
                .file_type
                .as_ref()
                .map_or("unknown", FileType::as_str);

            if verdict.passed {
                println!("{} {} ({})", "✓".green(), path.display(), detected);
            } else {
                println!("{} {} ({})", "✗".red(), path.display(), detected);
                allowed = false;
            }
        }
    }

    if quiet {
        return Ok(true);
    }

    if allowed {
        println!("{} by {}", "Allowed".green().bold(), policy);
    } else {
        println!("{} by {}", "Forbidden".red().bold(), policy);
    }

    Ok(allowed)
}

#[derive(Debug, Serialize)]
struct DetectReport {
    path: PathBuf,
    #[serde(rename = "type")]
    file_type: Option<FileType>,
    categories: Vec<Category>,
}

fn detect_files(gate: &TypeGate<InferDetector>, paths: &[PathBuf], json: bool) -> Result<()> {
    let mut reports = Vec::new();

    for path in collect_files(paths)? {
        let mut file =
            File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
        let file_type = gate
            .detect(&mut file)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let categories = file_type
            .as_ref()
            .map(|t| gate.registry().categories(t))
            .unwrap_or_default();

        reports.push(DetectReport {
            path,
            file_type,
            categories,
        });
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    for report in &reports {
        let categories = report
            .categories
            .iter()
            .map(Category::name)
            .collect::<Vec<_>>()
            .join(", ");

        match &report.file_type {
            Some(file_type) if categories.is_empty() => {
                println!("{}: {}", report.path.display(), file_type)
            }
            Some(file_type) => {
                println!("{}: {} [{}]", report.path.display(), file_type, categories)
            }
            None => println!("{}: {}", report.path.display(), "unknown".yellow()),
        }
    }

    Ok(())
}

fn show_types(gate: &TypeGate<InferDetector>, category: Option<Category>) {
    let registry = gate.registry();

    if let Some(category) = category {
        for file_type in registry.types_in(category) {
            println!("{}", file_type);
        }
        return;
    }

    println!("File Type Category Matrix:");
    println!(
        "{:<10} {}",
        "Type",
        Category::ALL
            .iter()
            .map(|c| format!("{:^10}", c.name()))
            .collect::<Vec<_>>()
            .join(" ")
    );
    println!("{}", "-".repeat(10 + Category::ALL.len() * 11));

    for (file_type, categories) in registry.iter_sorted() {
        print!("{:<10}", file_type.as_str());
        for category in Category::ALL {
            print!(" {:^10}", if categories.contains(&category) { "✓" } else { "✗" });
        }
        println!();
    }
}
