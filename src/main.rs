// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, build the API client from the
//   environment and hand it to the menu loop.
// - Any remote failure bubbles up here and ends the run.

use anyhow::Context;
use assistant_files_cli::{api::ApiClient, ui::main_menu};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Credentials come from OPENAI_API_KEY (optionally via a .env file).
    // See `config::Config::from_env`.
    let api = ApiClient::from_env().context("Failed to initialize API client")?;

    // Start the interactive menu. This call blocks until the user exits.
    main_menu(api)?;
    Ok(())
}

/// Logs go to stderr so they never mix with the menu on stdout.
/// Quiet by default; use `RUST_LOG=debug` to see requests.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
