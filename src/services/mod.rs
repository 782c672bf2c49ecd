//! Collaborator services
//!
//! Format handling, raster I/O and result delivery are kept apart from the
//! editing core so hosts can swap them independently.

pub mod format;
pub mod io;
pub mod sink;

pub use format::OutputFormatHandler;
pub use io::ImageIOService;
pub use sink::{FileSink, MemorySink, MemorySinkRecord, NoOpSink, ResultSink};
