//! Editing session: owns every buffer and drives the state machine
//!
//! ```text
//! Uninitialized --init--> Ready <--down/up--> Gesturing
//!                           |                     |
//!                           +--accept / cancel----+--> Accepted | Cancelled
//! ```
//!
//! Pointer events received in a state that cannot use them are ignored and
//! reported as "no redraw needed". Lifecycle calls (`accept`, `cancel`,
//! `flatten`, ...) made in the wrong state return [`MaskEditError::InvalidState`].

use crate::background::BackgroundImage;
use crate::compositor::{Compositor, FrameInputs};
use crate::config::EditorConfig;
use crate::error::{MaskEditError, Result};
use crate::flatten::Flattener;
use crate::mask::Mask;
use crate::services::{ImageIOService, ResultSink};
use crate::stroke::{StrokeBuffer, StrokeEngine};
use crate::types::{EditMode, EditState, MaskStatistics, Point, SessionState};
use image::RgbaImage;
use std::time::Instant;
use tokio::io::AsyncRead;
use tracing::{debug, info, instrument, span, trace, warn, Level};

/// Buffers sharing the canvas dimensions, alive between init and a terminal state
#[derive(Debug)]
struct Canvas {
    image: RgbaImage,
    cutout: RgbaImage,
    mask: Mask,
    engine: StrokeEngine,
    compositor: Compositor,
}

impl Canvas {
    fn dimensions(&self) -> (u32, u32) {
        self.mask.dimensions()
    }
}

/// One interactive mask editing session
///
/// # Examples
/// ```rust
/// use imgly_mask_editor::{EditSession, EditorConfig, MemorySink, OutputFormat};
/// use image::{Rgba, RgbaImage};
///
/// # fn main() -> imgly_mask_editor::Result<()> {
/// let original = RgbaImage::from_pixel(64, 64, Rgba([200, 40, 40, 255]));
/// let cutout = original.clone();
///
/// let sink = MemorySink::new();
/// let mut session = EditSession::new(EditorConfig::default(), Box::new(sink.clone()));
/// session.init_from_images(original, cutout)?;
///
/// session.set_brush_diameter(10);
/// session.pointer_down(5.0, 32.0);
/// session.pointer_move(60.0, 32.0);
/// session.pointer_up();
///
/// session.accept()?;
/// assert_eq!(sink.result_count(), 1);
/// # Ok(())
/// # }
/// ```
pub struct EditSession {
    config: EditorConfig,
    sink: Box<dyn ResultSink>,
    state: SessionState,
    edit: EditState,
    canvas: Option<Canvas>,
    background: Option<BackgroundImage>,
}

impl std::fmt::Debug for EditSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditSession")
            .field("state", &self.state)
            .field("edit", &self.edit)
            .field("dimensions", &self.dimensions())
            .field("has_background", &self.background.is_some())
            .finish_non_exhaustive()
    }
}

impl EditSession {
    /// Create an uninitialized session delivering into `sink`
    #[must_use]
    pub fn new(config: EditorConfig, sink: Box<dyn ResultSink>) -> Self {
        let edit = EditState::new(config.default_brush_diameter);
        Self {
            config,
            sink,
            state: SessionState::Uninitialized,
            edit,
            canvas: None,
            background: None,
        }
    }

    /// Decode the original image and cutout and enter `Ready`
    ///
    /// On a decode failure nothing changes and the error names the input
    /// that failed.
    ///
    /// # Errors
    /// - `Decode` if either input is malformed or empty
    /// - `InvalidState` once the session has been accepted or cancelled
    pub fn init_session(&mut self, original_bytes: &[u8], cutout_bytes: &[u8]) -> Result<()> {
        self.ensure_not_terminal("initialize")?;
        let original = ImageIOService::load_from_bytes(original_bytes, "original")?;
        let cutout = ImageIOService::load_from_bytes(cutout_bytes, "cutout")?;
        self.init_from_images(original, cutout)
    }

    /// Enter `Ready` from already decoded rasters
    ///
    /// Canvas dimensions come from the cutout. An original of another size is
    /// placed at the origin, cropped or padded with transparency.
    #[instrument(skip(self, original, cutout), fields(
        width = cutout.width(),
        height = cutout.height()
    ))]
    pub fn init_from_images(&mut self, original: RgbaImage, cutout: RgbaImage) -> Result<()> {
        self.ensure_not_terminal("initialize")?;
        let (width, height) = cutout.dimensions();
        if width == 0 || height == 0 {
            return Err(MaskEditError::empty_raster("cutout", (width, height)));
        }

        let image = if original.dimensions() == cutout.dimensions() {
            original
        } else {
            warn!(
                original_width = original.width(),
                original_height = original.height(),
                cutout_width = width,
                cutout_height = height,
                "Original and cutout sizes differ, aligning original to the cutout canvas"
            );
            let mut aligned = RgbaImage::new(width, height);
            image::imageops::replace(&mut aligned, &original, 0, 0);
            aligned
        };

        let start = Instant::now();
        let canvas = Canvas {
            mask: Mask::from_cutout(&cutout),
            engine: StrokeEngine::new(width, height),
            compositor: Compositor::new(width, height, &self.config),
            image,
            cutout,
        };
        let previous = self.state;
        self.canvas = Some(canvas);
        self.edit = EditState::new(self.config.default_brush_diameter);
        self.state = SessionState::Ready;

        debug!(
            previous_state = %previous,
            duration_ms = start.elapsed().as_millis() as u64,
            "Session initialized"
        );
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Pointer input
    //
    // Each handler returns whether the frame changed and should be redrawn.
    // ---------------------------------------------------------------------

    /// Begin a gesture at `(x, y)`, painting a dot so a tap edits too
    pub fn pointer_down(&mut self, x: f32, y: f32) -> bool {
        if self.state != SessionState::Ready {
            trace!(state = %self.state, "Ignoring pointer down");
            return false;
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };

        let point = Point::new(x, y);
        canvas.engine.begin(point, self.edit.brush_diameter());
        self.edit.hover = Some(point);
        self.state = SessionState::Gesturing;
        trace!(x, y, mode = %self.edit.mode, diameter = self.edit.brush_diameter(), "Gesture started");
        true
    }

    /// Extend the active gesture, or just move the cursor when idle
    pub fn pointer_move(&mut self, x: f32, y: f32) -> bool {
        let point = Point::new(x, y);
        match self.state {
            SessionState::Ready => {
                self.edit.hover = Some(point);
                true
            },
            SessionState::Gesturing => {
                let Some(canvas) = self.canvas.as_mut() else {
                    return false;
                };
                canvas.engine.extend(point, self.edit.brush_diameter());
                self.edit.hover = Some(point);
                trace!(x, y, "Gesture extended");
                true
            },
            _ => {
                trace!(state = %self.state, "Ignoring pointer move");
                false
            },
        }
    }

    /// Release: commit the stroke into the mask with the current mode
    pub fn pointer_up(&mut self) -> bool {
        self.finish_gesture("pointer up")
    }

    /// Interrupted gesture: committed like a release
    pub fn pointer_cancel(&mut self) -> bool {
        self.finish_gesture("pointer cancel")
    }

    /// Pointer left the canvas: hide the cursor, keep any gesture running
    pub fn pointer_leave(&mut self) -> bool {
        if !self.state.is_active() {
            return false;
        }
        self.edit.hover.take().is_some()
    }

    fn finish_gesture(&mut self, event: &str) -> bool {
        if self.state != SessionState::Gesturing {
            trace!(state = %self.state, event, "Ignoring gesture end");
            return false;
        }
        let Some(canvas) = self.canvas.as_mut() else {
            return false;
        };

        if let Some(stroke) = canvas.engine.end() {
            canvas.mask.commit(stroke, self.edit.mode);
        }
        self.state = SessionState::Ready;
        debug!(event, mode = %self.edit.mode, "Gesture committed");
        true
    }

    // ---------------------------------------------------------------------
    // Brush and mode
    // ---------------------------------------------------------------------

    /// Switch between erase and restore; applies to the preview immediately
    /// and to the commit of the gesture in progress
    pub fn set_mode(&mut self, mode: EditMode) {
        if self.edit.mode != mode {
            debug!(from = %self.edit.mode, to = %mode, "Edit mode changed");
            self.edit.mode = mode;
        }
    }

    /// Store a brush diameter clamped to `[1, 400]`, returning the stored value
    ///
    /// Takes effect on the next stroke segment, including mid-gesture.
    pub fn set_brush_diameter(&mut self, diameter: i64) -> u32 {
        let stored = self.edit.set_brush_diameter(diameter);
        if i64::from(stored) != diameter {
            debug!(requested = diameter, stored, "Brush diameter clamped");
        }
        stored
    }

    /// Adjust the brush diameter by a signed step
    pub fn step_brush_diameter(&mut self, delta: i64) -> u32 {
        let current = i64::from(self.edit.brush_diameter());
        self.set_brush_diameter(current.saturating_add(delta))
    }

    // ---------------------------------------------------------------------
    // Background
    // ---------------------------------------------------------------------

    /// Replace the background with decoded `bytes`, or clear it with `None`
    ///
    /// A decode failure is returned and the previous background stays in effect.
    pub fn set_background_image(&mut self, bytes: Option<&[u8]>) -> Result<()> {
        self.ensure_not_terminal("set background")?;
        match bytes {
            None => {
                self.set_background_raster(None);
                Ok(())
            },
            Some(bytes) => match ImageIOService::load_from_bytes(bytes, "background") {
                Ok(raster) => {
                    self.set_background_raster(Some(raster));
                    Ok(())
                },
                Err(e) => {
                    warn!(error = %e, "Background decode failed, keeping previous background");
                    Err(e)
                },
            },
        }
    }

    /// Load a background from an async stream
    ///
    /// The previous background remains until decoding has finished.
    pub async fn load_background_from_reader<R: AsyncRead + Unpin>(&mut self, reader: R) -> Result<()> {
        self.ensure_not_terminal("set background")?;
        match ImageIOService::load_from_reader(reader, "background").await {
            Ok(raster) => {
                self.set_background_raster(Some(raster));
                Ok(())
            },
            Err(e) => {
                warn!(error = %e, "Background load failed, keeping previous background");
                Err(e)
            },
        }
    }

    /// Swap in an already decoded background, or clear it
    pub fn set_background_raster(&mut self, raster: Option<RgbaImage>) {
        match &raster {
            Some(raster) => debug!(
                width = raster.width(),
                height = raster.height(),
                "Background image set"
            ),
            None => debug!("Background image cleared"),
        }
        self.background = raster.map(BackgroundImage::new);
    }

    #[must_use]
    pub fn has_background(&self) -> bool {
        self.background.is_some()
    }

    // ---------------------------------------------------------------------
    // Mask
    // ---------------------------------------------------------------------

    /// Discard all edits and re-seed the mask from the cutout
    ///
    /// A gesture in progress is dropped without being committed.
    pub fn reset_mask(&mut self) -> Result<()> {
        self.ensure_active("reset mask")?;
        if let Some(canvas) = self.canvas.as_mut() {
            canvas.engine.discard();
            canvas.mask = Mask::from_cutout(&canvas.cutout);
        }
        self.state = SessionState::Ready;
        info!("Mask reset to cutout");
        Ok(())
    }

    /// Coverage statistics of the committed mask
    #[must_use]
    pub fn mask_statistics(&self) -> Option<MaskStatistics> {
        self.canvas.as_ref().map(|canvas| canvas.mask.statistics())
    }

    /// Committed mask coverage as a grayscale PNG
    pub fn export_mask(&self) -> Result<Vec<u8>> {
        let canvas = self.active_canvas("export mask")?;
        ImageIOService::encode_gray_png(&canvas.mask.to_alpha_image())
    }

    // ---------------------------------------------------------------------
    // Rendering and output
    // ---------------------------------------------------------------------

    /// Compose the live preview frame
    ///
    /// Returns `None` before initialization and after a terminal state.
    pub fn render(&mut self) -> Option<&RgbaImage> {
        if !self.state.is_active() {
            return None;
        }
        let canvas = self.canvas.as_mut()?;
        let dimensions = canvas.dimensions();
        let filter = self.config.background_filter;
        let background = self.background.as_mut().map(|bg| &*bg.fit(dimensions, filter));

        let _span = span!(Level::TRACE, "render", gesturing = self.state == SessionState::Gesturing).entered();
        let inputs = FrameInputs {
            image: &canvas.image,
            mask: &canvas.mask,
            stroke: canvas.engine.buffer(),
            background,
            edit: &self.edit,
            gesturing: self.state == SessionState::Gesturing,
        };
        Some(canvas.compositor.render(&inputs))
    }

    /// Final output from committed state, without encoding
    pub fn flatten(&mut self) -> Result<RgbaImage> {
        self.ensure_active("flatten")?;
        let (canvas, background) = self.flatten_inputs()?;
        Ok(Flattener::flatten(&canvas.image, &canvas.mask, background))
    }

    /// Final output encoded in the configured format
    pub fn flatten_to_bytes(&mut self) -> Result<Vec<u8>> {
        self.ensure_active("flatten")?;
        let format = self.config.output_format;
        let (canvas, background) = self.flatten_inputs()?;
        Flattener::flatten_to_bytes(&canvas.image, &canvas.mask, background, format)
    }

    /// Flatten, deliver to the sink and end the session
    ///
    /// An uncommitted gesture is ignored. If the sink rejects the result the
    /// error is returned and the session stays open.
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn accept(&mut self) -> Result<()> {
        self.ensure_active("accept")?;
        let bytes = self.flatten_to_bytes()?;
        let size = bytes.len();
        self.sink.deliver_result(bytes)?;

        self.state = SessionState::Accepted;
        self.release_buffers();
        info!(bytes = size, format = %self.config.output_format, "Session accepted");
        Ok(())
    }

    /// Discard the session without producing output
    #[instrument(skip(self), fields(state = %self.state))]
    pub fn cancel(&mut self) -> Result<()> {
        self.ensure_active("cancel")?;
        self.sink.deliver_cancellation();
        self.state = SessionState::Cancelled;
        self.release_buffers();
        info!("Session cancelled");
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Accessors
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn edit_state(&self) -> &EditState {
        &self.edit
    }

    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    #[must_use]
    pub fn mask(&self) -> Option<&Mask> {
        self.canvas.as_ref().map(|canvas| &canvas.mask)
    }

    #[must_use]
    pub fn stroke_buffer(&self) -> Option<&StrokeBuffer> {
        self.canvas.as_ref().map(|canvas| canvas.engine.buffer())
    }

    /// Canvas dimensions, fixed from the cutout at initialization
    #[must_use]
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        self.canvas.as_ref().map(Canvas::dimensions)
    }

    fn flatten_inputs(&mut self) -> Result<(&Canvas, Option<&RgbaImage>)> {
        let state = self.state;
        let canvas = self
            .canvas
            .as_ref()
            .ok_or_else(|| MaskEditError::invalid_state("flatten", state))?;
        let filter = self.config.background_filter;
        let background = self
            .background
            .as_mut()
            .map(|bg| &*bg.fit(canvas.dimensions(), filter));
        Ok((canvas, background))
    }

    fn active_canvas(&self, operation: &str) -> Result<&Canvas> {
        self.ensure_active(operation)?;
        self.canvas
            .as_ref()
            .ok_or_else(|| MaskEditError::invalid_state(operation, self.state))
    }

    fn ensure_active(&self, operation: &str) -> Result<()> {
        if self.state.is_active() {
            Ok(())
        } else {
            Err(MaskEditError::invalid_state(operation, self.state))
        }
    }

    fn ensure_not_terminal(&self, operation: &str) -> Result<()> {
        if self.state.is_terminal() {
            Err(MaskEditError::invalid_state(operation, self.state))
        } else {
            Ok(())
        }
    }

    fn release_buffers(&mut self) {
        self.canvas = None;
        self.background = None;
        self.edit.hover = None;
    }
}
