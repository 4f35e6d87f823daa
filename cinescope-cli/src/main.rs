//! Cinescope CLI - Command-line interface
//!
//! Search the movie catalog, browse trending searches, or type queries
//! interactively through the debounced pipeline.

mod commands;
mod render;

use cinescope_core::CinescopeError;
use cinescope_core::tracing_setup::{CliLogLevel, init_tracing};
use clap::Parser;

#[derive(Parser)]
#[command(name = "cinescope")]
#[command(about = "Movie search with debounced queries and trending searches")]
struct Cli {
    /// Console log level (RUST_LOG overrides)
    #[arg(long, global = true, value_enum, default_value_t = CliLogLevel::Warn)]
    log_level: CliLogLevel,

    /// Use the offline demo catalog and an in-memory trending store
    #[arg(long, global = true)]
    demo: bool,

    /// Show trending increments before the store confirms them
    #[arg(long, global = true)]
    optimistic: bool,

    #[command(subcommand)]
    command: commands::Commands,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let log_file = init_tracing(cli.log_level.as_tracing_level(), None)?;
    tracing::debug!(log_file = %log_file.display(), "Tracing initialized");

    let options = commands::ServiceOptions {
        demo: cli.demo,
        optimistic: cli.optimistic,
    };

    if let Err(error) = commands::handle_command(cli.command, options).await {
        tracing::error!(%error, "Command failed");
        eprintln!("{}", error.user_message());
        if let Some(hint) = failure_hint(&error) {
            eprintln!("{hint}");
        }
        std::process::exit(exit_code(&error));
    }

    Ok(())
}

/// Exit status: 2 for problems the user can fix, 1 for everything else.
fn exit_code(error: &CinescopeError) -> i32 {
    if error.is_user_error() { 2 } else { 1 }
}

fn failure_hint(error: &CinescopeError) -> Option<&'static str> {
    match error {
        CinescopeError::Configuration { .. } => {
            Some("Set the missing CINESCOPE_* variables, or pass --demo to run offline.")
        }
        _ if error.is_user_error() => Some("Check your catalog credentials."),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use cinescope_core::FetchError;

    use super::*;

    #[test]
    fn test_configuration_errors_exit_with_hint() {
        let error = CinescopeError::Configuration {
            reason: "missing CINESCOPE_TMDB_TOKEN".to_string(),
        };

        assert_eq!(exit_code(&error), 2);
        assert!(failure_hint(&error).unwrap().contains("--demo"));
    }

    #[test]
    fn test_runtime_errors_exit_with_one() {
        let error = CinescopeError::from(FetchError::transport("connection reset"));
        assert_eq!(exit_code(&error), 1);
        assert_eq!(failure_hint(&error), None);

        assert_eq!(exit_code(&CinescopeError::PipelineShutdown), 1);
    }

    #[test]
    fn test_rejected_credentials_are_user_errors() {
        let error = CinescopeError::from(FetchError::ApiRejected("Invalid API key".into()));
        assert_eq!(exit_code(&error), 2);
        assert!(failure_hint(&error).is_some());
    }
}
