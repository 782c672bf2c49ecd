//! Stroke scripts: recorded gestures replayed through the pointer API

use crate::{EditMode, EditSession};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One recorded gesture
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptedStroke {
    #[serde(default)]
    pub mode: EditMode,
    /// Diameter for the whole gesture; keeps the current one when absent
    #[serde(default)]
    pub brush_diameter: Option<i64>,
    /// Pointer samples in canvas pixels; the first is the press position
    pub points: Vec<[f32; 2]>,
}

/// Ordered list of gestures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StrokeScript {
    pub strokes: Vec<ScriptedStroke>,
}

/// What a replay did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub committed: usize,
    pub skipped: usize,
}

impl StrokeScript {
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("Failed to parse stroke script")
    }

    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read stroke script {}", path.display()))?;
        Self::from_json_str(&content)
    }

    /// Drive `session` through every stroke, committing each on release
    pub fn replay(&self, session: &mut EditSession) -> ReplaySummary {
        let mut summary = ReplaySummary::default();

        for (index, stroke) in self.strokes.iter().enumerate() {
            let mode_name = stroke.mode.to_string();
            let _span = crate::tracing_config::spans::stroke_replay(index, &mode_name, stroke.points.len()).entered();

            let Some((first, rest)) = stroke.points.split_first() else {
                tracing::warn!(index, "Skipping stroke without points");
                summary.skipped += 1;
                continue;
            };

            session.set_mode(stroke.mode);
            if let Some(diameter) = stroke.brush_diameter {
                session.set_brush_diameter(diameter);
            }
            if !session.pointer_down(first[0], first[1]) {
                tracing::warn!(index, state = %session.state(), "Session rejected stroke");
                summary.skipped += 1;
                continue;
            }
            for point in rest {
                session.pointer_move(point[0], point[1]);
            }
            session.pointer_up();
            summary.committed += 1;
        }

        summary
    }
}
