use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for chairview")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run fmt, clippy, tests and doc in sequence
    Check,
    /// Run cargo fmt --check on all crates
    Fmt,
    /// Run clippy on all crates, warnings denied
    Clippy,
    /// Run all tests
    Test,
    /// Build rustdoc for the workspace
    Doc,
    /// Build the entire workspace
    Build,
    /// Run the scene composition timing bench
    Bench,
}

/// One cargo invocation with a human-readable name.
struct Step {
    name: &'static str,
    args: &'static [&'static str],
}

const FMT: Step = Step {
    name: "cargo fmt --check",
    args: &["fmt", "--all", "--", "--check"],
};
const CLIPPY: Step = Step {
    name: "cargo clippy",
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};
const TEST: Step = Step {
    name: "cargo test",
    args: &["test", "--workspace"],
};
const DOC: Step = Step {
    name: "cargo doc",
    args: &["doc", "--workspace", "--no-deps"],
};
const BUILD: Step = Step {
    name: "cargo build",
    args: &["build", "--workspace"],
};
const BENCH: Step = Step {
    name: "cargo bench",
    args: &["bench", "-p", "chairview-scene", "--bench", "bench_compose"],
};

fn run(step: &Step) -> Result<()> {
    println!("==> Running {}", step.name);
    let status = Command::new("cargo").args(step.args).status()?;
    if !status.success() {
        anyhow::bail!("{} failed ({status})", step.name);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let steps: &[&Step] = match cli.command {
        Commands::Check => &[&FMT, &CLIPPY, &TEST, &DOC],
        Commands::Fmt => &[&FMT],
        Commands::Clippy => &[&CLIPPY],
        Commands::Test => &[&TEST],
        Commands::Doc => &[&DOC],
        Commands::Build => &[&BUILD],
        Commands::Bench => &[&BENCH],
    };
    for step in steps {
        run(step)?;
    }

    Ok(())
}
