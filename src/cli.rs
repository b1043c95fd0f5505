//! Command-line interface for c9check.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::check::{RuleCatalog, Runner};
use crate::policy::{self, Policy};
use crate::report;

/// Exit codes.
pub const EXIT_SUCCESS: i32 = 0;
pub const EXIT_FINDINGS: i32 = 1;
pub const EXIT_ERROR: i32 = 2;

/// Default policy file names to search for.
const DEFAULT_POLICY_NAMES: &[&str] = &["c9check.yaml", ".c9check.yaml"];

/// Style and symbol-consistency checker for the C9 dialect.
///
/// c9check scans C9 source files and reports two classes of findings:
/// symbols used but never defined or declared external (and the reverse,
/// declared but never used), and violations of the dialect's style and
/// safety rules.
#[derive(Parser)]
#[command(name = "c9check")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check source files against the dialect policy
    #[command(visible_alias = "lint")]
    Check(CheckArgs),
    /// Create a starter policy file
    Init(InitArgs),
}

/// Arguments for the check command.
#[derive(Parser)]
pub struct CheckArgs {
    /// Files or directories to check
    #[arg(required = true)]
    pub paths: Vec<PathBuf>,

    /// Path to a policy YAML file (default: auto-discover)
    #[arg(short, long)]
    pub policy: Option<PathBuf>,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Print the extracted symbol sets for each file
    #[arg(short, long)]
    pub verbose: bool,
}

/// Arguments for the init command.
#[derive(Parser)]
pub struct InitArgs {
    /// Output file path
    #[arg(short, long, default_value = "c9check.yaml")]
    pub output: PathBuf,
}

/// Starter policy template.
const DEFAULT_TEMPLATE: &str = include_str!("templates/default.yaml");

/// Discover a policy file in the current directory.
fn discover_policy() -> Option<PathBuf> {
    DEFAULT_POLICY_NAMES
        .iter()
        .map(PathBuf::from)
        .find(|path| path.exists())
}

/// Expand the argument paths into the list of files to check.
///
/// Directories are walked recursively, keeping dialect extensions and
/// skipping hidden directories and excluded globs. Explicit file arguments
/// pass through untouched; if one is unreadable the runner reports it as a
/// per-file error instead of aborting the run.
fn collect_files(paths: &[PathBuf], policy: &Policy) -> anyhow::Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_dir(path, policy, &mut files)?;
        } else {
            files.push(path.clone());
        }
    }

    Ok(files)
}

fn collect_dir(root: &Path, policy: &Policy, files: &mut Vec<PathBuf>) -> anyhow::Result<()> {
    for entry in WalkDir::new(root)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| {
            let name = e.file_name().to_string_lossy();
            // Skip hidden directories
            if e.file_type().is_dir() && name.starts_with('.') && e.depth() > 0 {
                return false;
            }
            true
        })
    {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if policy.matches_extension(path) && !policy.is_path_excluded(path) {
            files.push(path.to_path_buf());
        }
    }

    Ok(())
}

/// Run the check command.
pub fn run_check(args: &CheckArgs) -> anyhow::Result<i32> {
    // Validate format
    if args.format != "text" && args.format != "json" {
        eprintln!(
            "Error: invalid format {:?}, must be 'text' or 'json'",
            args.format
        );
        return Ok(EXIT_ERROR);
    }

    // Load policy: explicit flag, discovered file, or defaults.
    let loaded = match &args.policy {
        Some(path) => Some(Policy::parse_file(path)?),
        None => match discover_policy() {
            Some(path) => Some(Policy::parse_file(&path)?),
            None => None,
        },
    };
    let policy = loaded.unwrap_or_default();

    if let Err(e) = policy::validate(&policy) {
        eprintln!("Error: invalid policy: {}", e);
        return Ok(EXIT_ERROR);
    }

    let files = collect_files(&args.paths, &policy)?;
    if files.is_empty() {
        eprintln!("Warning: no files to check");
        return Ok(EXIT_SUCCESS);
    }

    let catalog = RuleCatalog::new(&policy)?;
    let runner = Runner::new(&catalog).with_facts(args.verbose);
    let reports = runner.run(&files);

    match args.format.as_str() {
        "json" => report::write_json(&reports)?,
        _ => {
            report::write_text(&reports);
            report::write_summary(&reports);
        }
    }

    // Exit-code convention: processing errors dominate findings.
    if reports.iter().any(|r| r.error.is_some()) {
        Ok(EXIT_ERROR)
    } else if reports.iter().any(|r| !r.findings.is_empty()) {
        Ok(EXIT_FINDINGS)
    } else {
        Ok(EXIT_SUCCESS)
    }
}

/// Run the init command.
pub fn run_init(args: &InitArgs) -> anyhow::Result<i32> {
    if args.output.exists() {
        eprintln!("Error: file already exists: {}", args.output.display());
        eprintln!("Remove it or use --output to specify a different path");
        return Ok(EXIT_ERROR);
    }

    if let Some(parent) = args.output.parent() {
        if !parent.as_os_str().is_empty() && parent != Path::new(".") {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(&args.output, DEFAULT_TEMPLATE)?;

    println!("Created {}", args.output.display());
    println!();
    println!("Next steps:");
    println!("  1. Edit {} to tune the policy", args.output.display());
    println!(
        "  2. Run: c9check check . --policy {}",
        args.output.display()
    );

    Ok(EXIT_SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_template_parses_as_policy() {
        let policy: Policy = serde_yaml::from_str(DEFAULT_TEMPLATE).unwrap();
        assert!(policy::validate(&policy).is_ok());
        assert_eq!(policy.min_identifier_length(), 3);
    }

    #[test]
    fn test_collect_files_walks_directories() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("main.c"), "").unwrap();
        std::fs::write(temp.path().join("arena.h"), "").unwrap();
        std::fs::write(temp.path().join("notes.txt"), "").unwrap();
        std::fs::create_dir(temp.path().join(".git")).unwrap();
        std::fs::write(temp.path().join(".git").join("junk.c"), "").unwrap();

        let files = collect_files(&[temp.path().to_path_buf()], &Policy::default()).unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["arena.h", "main.c"]);
    }

    #[test]
    fn test_collect_files_honors_excluded_globs() {
        let temp = TempDir::new().unwrap();
        let vendor = temp.path().join("vendor");
        std::fs::create_dir(&vendor).unwrap();
        std::fs::write(vendor.join("lib.c"), "").unwrap();
        std::fs::write(temp.path().join("main.c"), "").unwrap();

        let policy = Policy {
            excluded_paths: vec!["**/vendor/**".to_string()],
            ..Policy::default()
        };
        let files = collect_files(&[temp.path().to_path_buf()], &policy).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("main.c"));
    }

    #[test]
    fn test_explicit_file_args_pass_through() {
        let temp = TempDir::new().unwrap();
        let odd = temp.path().join("module.c9");
        std::fs::write(&odd, "").unwrap();

        // Not a default extension, but named explicitly.
        let files = collect_files(&[odd.clone()], &Policy::default()).unwrap();
        assert_eq!(files, vec![odd]);
    }
}
