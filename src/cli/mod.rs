//! Command-line interface for tgscaffold.
//!
//! # Commands
//!
//! - `scaffold` - Generate a `terragrunt.hcl` for a module
//! - `inputs` - List the input variables a local module declares
//!
//! # Global Options
//!
//! - `--verbose` - Enable debug output
//! - `--quiet` - Only report errors
//!
//! `RUST_LOG`, when set, overrides both flags. Logs go to stderr so command
//! output on stdout stays machine-readable.
//!
//! # Examples
//!
//! ```bash
//! # Scaffold the latest release of a module into the current directory
//! tgscaffold scaffold github.com/org/modules//vpc
//!
//! # Pin a version, use SSH URLs and a custom template
//! tgscaffold scaffold "git::https://github.com/org/modules.git//vpc?ref=v1.4.0" \
//!     github.com/org/templates//vpc --var SourceUrlType=git-ssh
//!
//! # Inspect a module checkout
//! tgscaffold inputs ./modules/vpc --format json
//! ```

mod inputs;
mod scaffold;

pub use inputs::{InputsCommand, OutputFormat};
pub use scaffold::ScaffoldCommand;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// Generate Terragrunt configuration for reusable Terraform modules.
#[derive(Parser, Debug)]
#[command(
    name = "tgscaffold",
    about = "Scaffold Terragrunt configuration from Terraform modules",
    version,
    long_about = "tgscaffold downloads a Terraform module, reads its input variables and renders \
                  a ready-to-edit terragrunt.hcl from a template."
)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output for debugging and detailed information.
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only print errors.
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a terragrunt.hcl for a module.
    ///
    /// See [`ScaffoldCommand`] for options.
    Scaffold(ScaffoldCommand),

    /// List the input variables declared by a local module.
    ///
    /// See [`InputsCommand`] for options.
    Inputs(InputsCommand),
}

impl Cli {
    /// Initialize logging and run the selected command.
    pub async fn execute(self) -> Result<()> {
        init_logging(self.log_level());

        match self.command {
            Commands::Scaffold(cmd) => cmd.execute().await,
            Commands::Inputs(cmd) => cmd.execute(),
        }
    }

    /// Level used when `RUST_LOG` is not set.
    #[must_use]
    pub fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}

/// Install the global subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `default_level` when it is set. Calling this more than
/// once is harmless.
pub fn init_logging(default_level: &str) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(default_level)
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
