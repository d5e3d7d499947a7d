//! Blog app E2E suite entry point
//!
//! Runs the built-in "Blog app" scenarios against a live frontend/backend.
//! Run with: cargo test --package bloglist-e2e --test blog_app -- [flags]

use tracing_subscriber::EnvFilter;

use bloglist_e2e::cli::{self, Args};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse_from_libtest(std::env::args()).unwrap_or_else(|e| e.exit());

    let rt = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let result = rt.block_on(cli::run(args));

    match result {
        Ok(true) => std::process::exit(0),
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    }
}
