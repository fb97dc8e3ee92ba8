//! rill CLI entry point.
//!
//! Usage:
//!   rill                # Interactive REPL
//!   rill -c <command>   # Execute command and exit
//!   rill script.rl      # Run a script

use std::env;
use std::process::ExitCode;

use anyhow::{Context, Result};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use rill_kernel::{Kernel, KernelConfig};

fn main() -> ExitCode {
    // Log filtering comes from RILL_LOG (e.g. RILL_LOG=debug).
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::try_from_env("RILL_LOG").unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:?}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let args: Vec<String> = env::args().collect();

    match args.get(1).map(|s| s.as_str()) {
        None => {
            rill_repl::run()?;
            Ok(ExitCode::SUCCESS)
        }

        Some("--help" | "-h") => {
            print_help();
            Ok(ExitCode::SUCCESS)
        }

        Some("--version" | "-V") => {
            println!("rill {}", env!("CARGO_PKG_VERSION"));
            Ok(ExitCode::SUCCESS)
        }

        Some("-c") => {
            let cmd = args.get(2).context("-c requires a command argument")?;
            run_source(cmd)
        }

        Some(path) if !path.starts_with('-') => run_script(path),

        Some(unknown) => {
            eprintln!("Unknown option: {unknown}");
            eprintln!("Run 'rill --help' for usage.");
            Ok(ExitCode::FAILURE)
        }
    }
}

fn print_help() {
    println!(
        r#"rill v{}

Usage:
  rill                Interactive REPL
  rill -c <command>   Execute command string and exit
  rill <script.rl>    Run a script file

Options:
  -c <command>        Execute command string and exit
  -h, --help          Show this help
  -V, --version       Show version

Examples:
  rill                          # Start interactive REPL
  rill -c 'seq 100 | sum'       # Run a pipeline
  rill fanout.rl                # Run a script
"#,
        env!("CARGO_PKG_VERSION")
    );
}

/// Run a script file.
fn run_script(path: &str) -> Result<ExitCode> {
    let source =
        std::fs::read_to_string(path).with_context(|| format!("Failed to read script: {path}"))?;

    // Skip shebang if present.
    let source = if source.starts_with("#!") {
        source.lines().skip(1).collect::<Vec<_>>().join("\n")
    } else {
        source
    };

    run_source(&source)
}

/// Execute source text against a fresh kernel, printing each result.
fn run_source(source: &str) -> Result<ExitCode> {
    let kernel = Kernel::new(KernelConfig::default()).context("Failed to create kernel")?;

    let rt = tokio::runtime::Runtime::new()?;
    let result = rt.block_on(kernel.execute_streaming(source, |r| {
        if !r.out.is_empty() {
            print!("{}", r.out);
        }
        if !r.err.is_empty() {
            eprint!("{}", r.err);
        }
    }))?;

    if result.ok() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(result.code.clamp(1, 255) as u8))
    }
}
