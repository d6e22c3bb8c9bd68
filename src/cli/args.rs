//! Command-line argument parsing for the listwatch CLI.

use std::net::SocketAddr;

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Run the HTTP server
    Serve { addr: Option<SocketAddr> },
    /// Fetch one object
    Get { name: String, namespace: Option<String> },
    /// Create or replace one object with JSON data
    Put {
        name: String,
        data: String,
        namespace: Option<String>,
    },
    /// Delete one object
    Delete { name: String, namespace: Option<String> },
    /// Stream the collection and its changes
    Watch { namespace: Option<String> },
    /// Arguments could not be parsed
    Invalid(String),
}

pub const USAGE: &str = "\
Usage: listwatch <command> [options]

Commands:
  serve [--addr <host:port>]              run the HTTP server
  get <name> [-n <namespace>]             print one object
  put <name> <json> [-n <namespace>]      create or replace an object
  delete <name> [-n <namespace>]          delete an object
  watch [-n <namespace>]                  stream the collection and its changes

Options:
  -n, --namespace <namespace>             target namespace (default: default)
  -V, --version                           print version
  -h, --help                              print this help";

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use listwatch::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["listwatch".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut positional = Vec::new();
    let mut namespace = None;
    let mut addr = None;

    // Skip the program name
    let mut args = args.skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--namespace" | "-n" => match args.next() {
                Some(value) => namespace = Some(value),
                None => return CliCommand::Invalid(format!("{} requires a value", arg)),
            },
            "--addr" => match args.next().map(|value| value.parse::<SocketAddr>()) {
                Some(Ok(value)) => addr = Some(value),
                Some(Err(e)) => return CliCommand::Invalid(format!("invalid --addr: {}", e)),
                None => return CliCommand::Invalid("--addr requires a value".to_string()),
            },
            flag if flag.starts_with('-') && flag.len() > 1 => {
                return CliCommand::Invalid(format!("unknown option {}", flag))
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let Some(command) = positional.next() else {
        return CliCommand::Help;
    };
    let rest: Vec<String> = positional.collect();

    match (command.as_str(), rest.as_slice()) {
        ("serve", []) => CliCommand::Serve { addr },
        ("get", [name]) => CliCommand::Get {
            name: name.clone(),
            namespace,
        },
        ("put", [name, data]) => CliCommand::Put {
            name: name.clone(),
            data: data.clone(),
            namespace,
        },
        ("delete", [name]) => CliCommand::Delete {
            name: name.clone(),
            namespace,
        },
        ("watch", []) => CliCommand::Watch { namespace },
        ("serve" | "get" | "put" | "delete" | "watch", _) => {
            CliCommand::Invalid(format!("wrong number of arguments for {}", command))
        }
        _ => CliCommand::Invalid(format!("unknown command {}", command)),
    }
}
