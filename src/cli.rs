//! Command-line interface implementation for wpscaffold.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

/// Command-line arguments structure for wpscaffold.
#[derive(Parser, Debug)]
#[command(author, version, about = "wpscaffold: generate a WordPress plugin from a template", long_about = None)]
pub struct Args {
    /// Directory where the plugin will be created (must not exist or be empty)
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Path to the template directory
    #[arg(short, long, value_name = "DIR", default_value = ".")]
    pub template: PathBuf,

    /// Configuration file to use instead of template.config.{json,yml,yaml}
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Read answers as a JSON object from stdin.
    /// Questions without an answer there take their default.
    #[arg(short, long)]
    pub stdin: bool,

    /// Accept every default without prompting
    #[arg(short = 'y', long)]
    pub defaults: bool,

    /// Show the files that would be generated without writing them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
