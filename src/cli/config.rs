//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliOutputFormat};
use crate::config::{EditorConfig, OutputFormat, MAX_BRUSH_DIAMETER, MIN_BRUSH_DIAMETER};
use crate::services::{ImageIOService, OutputFormatHandler};
use anyhow::{Context, Result};
use std::path::PathBuf;

/// Convert CLI arguments to an `EditorConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Start from `--config` (or defaults) and apply flag overrides
    pub(crate) fn from_cli(cli: &Cli) -> Result<EditorConfig> {
        let mut config = match &cli.config {
            Some(path) => EditorConfig::from_json_file(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?,
            None => EditorConfig::default(),
        };

        if let Some(diameter) = cli.brush_diameter {
            config.default_brush_diameter = diameter;
        }
        if let Some(format) = Self::output_format(cli) {
            config.output_format = format;
        }

        config.validate().context("Invalid editor configuration")?;
        Ok(config)
    }

    /// Explicit `--format`, else the output file extension, else nothing
    pub(crate) fn output_format(cli: &Cli) -> Option<OutputFormat> {
        cli.format
            .map(OutputFormat::from)
            .or_else(|| cli.output.as_ref().and_then(OutputFormatHandler::from_path))
    }

    /// Where the accepted result goes when `--output` is not given
    pub(crate) fn output_path(cli: &Cli, format: OutputFormat) -> PathBuf {
        if let Some(output) = &cli.output {
            return output.clone();
        }
        let stem = cli
            .cutout
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("output");
        let file_name = format!("{}_edited.{}", stem, OutputFormatHandler::get_extension(format));
        cli.cutout.with_file_name(file_name)
    }

    /// Validate CLI arguments
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        for (label, path) in [("original", &cli.original), ("cutout", &cli.cutout)] {
            if !path.exists() {
                anyhow::bail!("{} image not found: {}", label, path.display());
            }
            if !ImageIOService::is_supported_format(path) {
                anyhow::bail!("Unsupported {} image format: {}", label, path.display());
            }
        }

        if let Some(diameter) = cli.brush_diameter {
            if !(MIN_BRUSH_DIAMETER..=MAX_BRUSH_DIAMETER).contains(&diameter) {
                anyhow::bail!(
                    "Brush diameter must be between {} and {}, got {}",
                    MIN_BRUSH_DIAMETER,
                    MAX_BRUSH_DIAMETER,
                    diameter
                );
            }
        }

        if let Some(strokes) = &cli.strokes {
            if !strokes.exists() {
                anyhow::bail!("Stroke script not found: {}", strokes.display());
            }
        }

        Ok(())
    }
}

impl From<CliOutputFormat> for OutputFormat {
    fn from(format: CliOutputFormat) -> Self {
        match format {
            CliOutputFormat::Png => OutputFormat::Png,
            CliOutputFormat::Tiff => OutputFormat::Tiff,
            CliOutputFormat::Rgba8 => OutputFormat::Rgba8,
        }
    }
}
