use color_eyre::Result;
use listwatch::cli::{parse_args, run_cli_command};
use tracing_subscriber::EnvFilter;

/// Log filter variable, e.g. `LISTWATCH_LOG=listwatch=debug`.
const LOG_ENV: &str = "LISTWATCH_LOG";

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    run_cli_command(parse_args(std::env::args())).await
}
