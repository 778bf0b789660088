//! Background Removal Client CLI
//!
//! Submits an image to a remote background removal service, reports the
//! result and saves the processed image.

#[cfg(feature = "cli")]
use bgremove_client::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    eprintln!("CLI feature not enabled. Please rebuild with --features cli");
    std::process::exit(1);
}
