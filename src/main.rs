use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{CommandFactory, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "tealint",
    version,
    about = "Linter and language server for TEAL programs",
    after_help = "Examples:\n  tealint --path approval.teal\n  tealint --path contracts/\n  tealint lsp"
)]
struct Cli {
    /// Optional explicit subcommand.
    #[command(subcommand)]
    command: Option<Commands>,

    /// Source TEAL file, or a directory whose top-level files are linted.
    #[arg(short, long, value_name = "PATH")]
    path: Option<PathBuf>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the language server over stdio.
    Lsp(LspArgs),
}

#[derive(Debug, Parser)]
struct LspArgs {
    /// Append a protocol trace to this file.
    #[arg(long, value_name = "FILE")]
    debug: Option<PathBuf>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("{err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Lsp(args)) => teal_lsp::run_stdio_server(args.debug),
        None => match cli.path {
            Some(path) => lint_command(&path),
            None => {
                let mut command = Cli::command();
                command.print_help()?;
                println!();
                Ok(())
            }
        },
    }
}

fn lint_command(path: &Path) -> anyhow::Result<()> {
    for path in collect_source_paths(path)? {
        let source = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read TEAL file '{}'", path.display()))?;
        let result = teal_core::process(&source);
        for diagnostic in &result.diagnostics {
            println!(
                "{}:{}: {}",
                path.display(),
                diagnostic.position.line + 1,
                diagnostic.message
            );
        }
    }
    Ok(())
}

fn collect_source_paths(path: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let metadata = std::fs::metadata(path)
        .with_context(|| format!("failed to get TEAL file info for '{}'", path.display()))?;
    if !metadata.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = std::fs::read_dir(path)
        .with_context(|| format!("failed to read source directory '{}'", path.display()))?;
    let mut paths = Vec::new();
    for entry in entries {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            paths.push(entry.path());
        }
    }
    // Directory iteration order is platform-dependent.
    paths.sort();
    Ok(paths)
}
