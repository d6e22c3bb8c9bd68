//! CLI module for listwatch.
//!
//! - Argument parsing
//! - Version display
//! - Server and client command runners
//!
//! # Usage
//!
//! ```ignore
//! use listwatch::cli::{parse_args, run_cli_command};
//!
//! let command = parse_args(std::env::args());
//! run_cli_command(command).await?;
//! ```

pub mod args;
pub mod commands;
pub mod version;

pub use args::{parse_args, CliCommand, USAGE};
pub use version::{handle_version_command, VERSION};

use color_eyre::eyre::{eyre, Report};
use color_eyre::{Result, Section};

use crate::error::ClientError;

/// Run a parsed CLI command to completion.
pub async fn run_cli_command(command: CliCommand) -> Result<()> {
    dispatch(command).await.map_err(with_hint)
}

/// Recovery hint for API client failures.
fn recovery_hint(err: &Report) -> Option<&'static str> {
    err.downcast_ref::<ClientError>()
        .map(|client_err| client_err.category().recovery_hint())
}

fn with_hint(err: Report) -> Report {
    match recovery_hint(&err) {
        Some(hint) => err.suggestion(hint),
        None => err,
    }
}

async fn dispatch(command: CliCommand) -> Result<()> {
    match command {
        CliCommand::Version => {
            handle_version_command();
            Ok(())
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Ok(())
        }
        CliCommand::Serve { addr } => commands::serve(addr).await,
        CliCommand::Get { name, namespace } => commands::get(&name, &namespace).await,
        CliCommand::Put {
            name,
            data,
            namespace,
        } => commands::put(&name, &data, &namespace).await,
        CliCommand::Delete { name, namespace } => commands::delete(&name, &namespace).await,
        CliCommand::Watch { namespace } => commands::watch(&namespace).await,
        CliCommand::Invalid(message) => Err(eyre!("{}\n\n{}", message, USAGE)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_command_is_error() {
        let err = run_cli_command(CliCommand::Invalid("unknown command x".to_string()))
            .await
            .unwrap_err();
        assert!(err.to_string().starts_with("unknown command x"));
    }

    #[test]
    fn test_client_error_gets_recovery_hint() {
        let err = Report::new(ClientError::configuration("odd header list"));
        assert_eq!(
            recovery_hint(&err),
            Some("Fix the request arguments; retrying will not help")
        );

        let err = with_hint(err);
        assert!(err.downcast_ref::<ClientError>().is_some());
    }

    #[test]
    fn test_other_errors_have_no_hint() {
        let err = eyre!("bind failed");
        assert_eq!(recovery_hint(&err), None);
        assert_eq!(with_hint(err).to_string(), "bind failed");
    }
}
