#![allow(clippy::too_many_lines)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

//! # IMG.LY Mask Editor
//!
//! Interactive refinement of background-removal results. A session takes an
//! original image and a precomputed cutout, lets the user paint to erase or
//! restore regions, previews every change live and flattens the committed
//! result into a single lossless RGBA image.
//!
//! ## Features
//!
//! - **Persistent alpha mask** seeded from the cutout, changed only when a stroke is released
//! - **Non-destructive preview**: in-progress strokes never touch the committed mask
//! - **Replacement backgrounds**: cover-scaled behind the kept foreground
//! - **Lossless output**: PNG, TIFF or raw RGBA8 delivered to a host-supplied sink
//! - **CLI Integration**: stroke-script replay tool (enable with `cli` feature)
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgly_mask_editor::{open_session_from_readers, EditMode, EditorConfig, FileSink};
//! use tokio::fs::File;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let original = File::open("photo.jpg").await?;
//! let cutout = File::open("photo_cutout.png").await?;
//! let sink = Box::new(FileSink::new("photo_edited.png"));
//!
//! let mut session = open_session_from_readers(original, cutout, EditorConfig::default(), sink).await?;
//!
//! // Erase a stray region with a 20 px brush
//! session.set_brush_diameter(20);
//! session.pointer_down(10.0, 50.0);
//! session.pointer_move(90.0, 50.0);
//! session.pointer_up();
//!
//! // Bring part of it back
//! session.set_mode(EditMode::Restore);
//! session.pointer_down(40.0, 50.0);
//! session.pointer_up();
//!
//! let _frame = session.render();
//! session.accept()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` (default): command-line replay tool and tracing subscriber setup
//! - `webp-support` (default): WebP input decoding
//! - `tracing-json`: JSON log output for the CLI
//!
//! ### Library-Only Usage
//!
//! ```toml
//! [dependencies]
//! imgly-mask-editor = { version = "0.2", default-features = false }
//! ```

pub mod background;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compositor;
pub mod config;
pub mod error;
pub mod flatten;
pub mod mask;
pub mod raster;
pub mod services;
pub mod session;
pub mod stroke;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

use tokio::io::AsyncRead;

// Public API exports
pub use background::BackgroundImage;
pub use compositor::{Compositor, FrameInputs};
pub use config::{
    EditorConfig, EditorConfigBuilder, OutputFormat, ResampleFilter, DEFAULT_BRUSH_DIAMETER,
    MAX_BRUSH_DIAMETER, MIN_BRUSH_DIAMETER, UI_MAX_BRUSH_DIAMETER, UI_MIN_BRUSH_DIAMETER,
};
pub use error::{MaskEditError, Result};
pub use flatten::Flattener;
pub use mask::Mask;
pub use raster::{Compositing, PixelRect};
pub use services::{
    FileSink, ImageIOService, MemorySink, MemorySinkRecord, NoOpSink, OutputFormatHandler,
    ResultSink,
};
pub use session::EditSession;
pub use stroke::{StrokeBuffer, StrokeEngine};
pub use types::{EditMode, EditState, MaskStatistics, Point, SessionState};

#[cfg(feature = "cli")]
pub use tracing_config::{events, init_cli_tracing, spans, TracingConfig, TracingFormat};

/// Open a ready session from two async streams
///
/// Both streams are read to the end and decoded before the session exists,
/// so no pointer input can arrive while loading.
///
/// # Arguments
///
/// * `original` - Encoded original image
/// * `cutout` - Encoded cutout; its alpha seeds the mask and its size fixes the canvas
/// * `config` - Editor configuration, validated here
/// * `sink` - Receiver of the accepted result or the cancellation
///
/// # Examples
///
/// ```rust,no_run
/// use imgly_mask_editor::{open_session_from_readers, EditorConfig, MemorySink};
/// use std::io::Cursor;
///
/// # async fn example(original: Vec<u8>, cutout: Vec<u8>) -> imgly_mask_editor::Result<()> {
/// let sink = MemorySink::new();
/// let mut session = open_session_from_readers(
///     Cursor::new(original),
///     Cursor::new(cutout),
///     EditorConfig::default(),
///     Box::new(sink.clone()),
/// )
/// .await?;
/// session.cancel()?;
/// assert_eq!(sink.cancellation_count(), 1);
/// # Ok(())
/// # }
/// ```
pub async fn open_session_from_readers<R1, R2>(
    original: R1,
    cutout: R2,
    config: EditorConfig,
    sink: Box<dyn ResultSink>,
) -> Result<EditSession>
where
    R1: AsyncRead + Unpin,
    R2: AsyncRead + Unpin,
{
    config.validate()?;
    let original = ImageIOService::load_from_reader(original, "original").await?;
    let cutout = ImageIOService::load_from_reader(cutout, "cutout").await?;

    let mut session = EditSession::new(config, sink);
    session.init_from_images(original, cutout)?;
    Ok(session)
}
