//! IMG.LY Mask Editor CLI Tool
//!
//! Command-line interface for replaying brush strokes against a background-removal
//! cutout and writing the flattened result.

#[cfg(feature = "cli")]
use imgly_mask_editor::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
