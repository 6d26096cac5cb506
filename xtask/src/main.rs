use anyhow::Result;
use clap::{Parser, Subcommand};
use std::process::Command;

#[derive(Parser)]
#[command(name = "xtask", about = "Workspace automation for seascape")]
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
    /// Run the quadtree timing benchmarks
    Bench,
    /// Build rustdoc for the workspace
    Doc,
    /// Build a sample view with the CLI and list its patches
    Demo,
}

/// One cargo invocation and the label it is reported under.
struct Step {
    label: &'static str,
    args: &'static [&'static str],
}

const FMT: Step = Step {
    label: "fmt",
    args: &["fmt", "--all", "--", "--check"],
};
const CLIPPY: Step = Step {
    label: "clippy",
    args: &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
};
const TEST: Step = Step {
    label: "test",
    args: &["test", "--workspace"],
};
const BENCH: Step = Step {
    label: "bench",
    args: &["bench", "-p", "seascape-lod", "--bench", "bench_quadtree"],
};
const DOC: Step = Step {
    label: "doc",
    args: &["doc", "--workspace", "--no-deps"],
};
const DEMO: Step = Step {
    label: "demo",
    args: &[
        "run",
        "-p",
        "seascape-cli",
        "--",
        "build",
        "--eye",
        "0,30,0",
        "--target",
        "200,0,0",
        "--list",
    ],
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let steps: &[&Step] = match cli.command {
        Commands::Check => &[&FMT, &CLIPPY, &TEST, &DOC],
        Commands::Fmt => &[&FMT],
        Commands::Clippy => &[&CLIPPY],
        Commands::Test => &[&TEST],
        Commands::Bench => &[&BENCH],
        Commands::Doc => &[&DOC],
        Commands::Demo => &[&DEMO],
    };

    for step in steps {
        run(step)?;
    }

    Ok(())
}

fn run(step: &Step) -> Result<()> {
    println!("==> cargo {}", step.args.join(" "));
    let status = Command::new("cargo").args(step.args).status()?;
    if !status.success() {
        anyhow::bail!("cargo {} failed", step.label);
    }
    Ok(())
}
