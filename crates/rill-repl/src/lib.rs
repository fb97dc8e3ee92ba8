//! Interactive REPL for the rill kernel.
//!
//! Meta commands are `/`-prefixed so they can never collide with tool
//! names; everything else is handed to the kernel verbatim.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tokio::runtime::Runtime;

use rill_kernel::{Kernel, KernelConfig};

/// Run the interactive REPL until /quit or end-of-input.
pub fn run() -> Result<()> {
    Repl::new()?.run_loop()
}

/// The interactive shell: a kernel, a runtime to drive it, and a line
/// editor.
pub struct Repl {
    kernel: Kernel,
    runtime: Runtime,
    editor: DefaultEditor,
}

impl Repl {
    pub fn new() -> Result<Self> {
        Ok(Self {
            kernel: Kernel::new(KernelConfig::named("repl"))?,
            runtime: Runtime::new()?,
            editor: DefaultEditor::new()?,
        })
    }

    pub fn run_loop(&mut self) -> Result<()> {
        println!("rill v{}", env!("CARGO_PKG_VERSION"));
        println!("Type /help for commands, /quit to exit.\n");

        loop {
            match self.editor.readline("rill> ") {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);

                    if let Some(meta) = line.strip_prefix('/') {
                        if !self.handle_meta(meta) {
                            break;
                        }
                        continue;
                    }

                    self.execute(line);
                }
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => break,
                Err(e) => return Err(e.into()),
            }
        }

        // Let outstanding background jobs finish before exiting.
        self.runtime.block_on(self.kernel.shutdown());
        Ok(())
    }

    fn execute(&mut self, line: &str) {
        let result = self.runtime.block_on(self.kernel.execute_streaming(line, |r| {
            if !r.out.is_empty() {
                print!("{}", r.out);
            }
            if !r.err.is_empty() {
                eprint!("{}", r.err);
            }
        }));

        if let Err(e) = result {
            eprintln!("error: {e}");
        }
    }

    /// Handle a `/` meta command. Returns false to exit the loop.
    fn handle_meta(&mut self, cmd: &str) -> bool {
        match cmd {
            "quit" | "q" | "exit" => return false,
            "help" | "h" => print_help(),
            "jobs" => {
                let jobs = self.runtime.block_on(self.kernel.jobs().list());
                if jobs.is_empty() {
                    println!("(no jobs)");
                } else {
                    for info in jobs {
                        println!("[{}] {} {}", info.id, info.status, info.command);
                    }
                }
            }
            "vars" => {
                let vars = self.runtime.block_on(self.kernel.vars());
                if vars.is_empty() {
                    println!("(no variables)");
                } else {
                    for (name, value) in vars {
                        println!("{} = {}", name, value);
                    }
                }
            }
            "tools" => {
                for schema in self.kernel.tool_schemas() {
                    println!("{:<10} {}", schema.name, schema.description);
                }
            }
            other => println!("unknown command: /{} (try /help)", other),
        }
        true
    }
}

fn print_help() {
    println!("Meta commands:");
    println!("  /help    Show this help");
    println!("  /jobs    List background jobs");
    println!("  /vars    List scope variables");
    println!("  /tools   List available tools");
    println!("  /quit    Exit the REPL");
}
