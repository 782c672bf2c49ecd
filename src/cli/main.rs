//! Mask editing CLI tool
//!
//! Replays recorded brush strokes against a cutout and writes the flattened
//! result, giving scripted access to the same session the interactive editor uses.

use super::config::CliConfigBuilder;
use super::script::StrokeScript;
use crate::{
    open_session_from_readers,
    services::{FileSink, ImageIOService},
    tracing_config::{events, init_cli_tracing, spans},
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Instant;
use tracing::Instrument;

/// Refine a background-removal cutout with scripted brush strokes
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "imgly-mask-edit")]
pub struct Cli {
    /// Original image the cutout was computed from
    #[arg(long, value_name = "IMAGE")]
    pub original: PathBuf,

    /// Cutout whose alpha channel seeds the mask (defines canvas size)
    #[arg(long, value_name = "IMAGE")]
    pub cutout: PathBuf,

    /// Replacement background, cover-scaled to the canvas
    #[arg(long, value_name = "IMAGE")]
    pub background: Option<PathBuf>,

    /// JSON stroke script to replay
    #[arg(long, value_name = "JSON")]
    pub strokes: Option<PathBuf>,

    /// Editor configuration file (JSON)
    #[arg(long, value_name = "JSON")]
    pub config: Option<PathBuf>,

    /// Output file for the accepted result [default: <cutout>_edited.<ext>]
    #[arg(short, long, value_name = "OUTPUT")]
    pub output: Option<PathBuf>,

    /// Output format [default: from the output extension, else the config]
    #[arg(short, long, value_enum)]
    pub format: Option<CliOutputFormat>,

    /// Initial brush diameter in pixels (1-400)
    #[arg(short, long)]
    pub brush_diameter: Option<u32>,

    /// Write the final preview frame (checkerboard, tint, cursor) as PNG
    #[arg(long, value_name = "PNG")]
    pub preview: Option<PathBuf>,

    /// Write the committed mask as grayscale PNG
    #[arg(long, value_name = "PNG")]
    pub export_mask: Option<PathBuf>,

    /// Print mask coverage statistics as JSON
    #[arg(long)]
    pub stats: bool,

    /// Emit JSON log lines (requires the tracing-json feature)
    #[arg(long)]
    pub json_logs: bool,

    /// Enable verbose logging (-v: DEBUG, -vv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Tiff,
    Rgba8,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();
    let session_id = init_cli_tracing(cli.verbose, cli.json_logs).context("Failed to initialize tracing")?;

    if let Err(e) = run(&cli, &session_id).await {
        events::error_with_context(&*e, "mask editing run");
        return Err(e);
    }
    Ok(())
}

/// Execute one editing run described by `cli`
pub async fn run(cli: &Cli, session_id: &str) -> Result<()> {
    let start_time = Instant::now();
    CliConfigBuilder::validate_cli(cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(cli).context("Failed to build configuration")?;
    let output_path = CliConfigBuilder::output_path(cli, config.output_format);

    let original = tokio::fs::File::open(&cli.original)
        .await
        .with_context(|| format!("Failed to open {}", cli.original.display()))?;
    let cutout = tokio::fs::File::open(&cli.cutout)
        .await
        .with_context(|| format!("Failed to open {}", cli.cutout.display()))?;
    let sink = FileSink::new(&output_path);
    let mut session = open_session_from_readers(original, cutout, config, Box::new(sink))
        .instrument(spans::input_loading(&cli.original, &cli.cutout))
        .await
        .context("Failed to initialize editing session")?;

    let dimensions = session.dimensions().unwrap_or_default();
    let session_span = spans::session(session_id, dimensions);

    async {
        if let Some(background) = &cli.background {
            let file = tokio::fs::File::open(background)
                .await
                .with_context(|| format!("Failed to open {}", background.display()))?;
            session
                .load_background_from_reader(file)
                .await
                .with_context(|| format!("Failed to load background {}", background.display()))?;
        }

        if let Some(path) = &cli.strokes {
            let script = StrokeScript::from_file(path).await?;
            let summary = script.replay(&mut session);
            events::progress(&format!(
                "Replayed {} stroke(s), skipped {}",
                summary.committed, summary.skipped
            ));
            if summary.skipped > 0 {
                events::warning_with_recommendation(
                    "Some strokes were skipped",
                    "Give every stroke at least one point",
                );
            }
        }

        if let Some(path) = &cli.preview {
            let _span = spans::output("preview", path).entered();
            let frame = session
                .render()
                .context("Session has no frame to render")?
                .clone();
            ImageIOService::save_image(&frame, path, crate::OutputFormat::Png)
                .with_context(|| format!("Failed to write preview {}", path.display()))?;
        }

        if let Some(path) = &cli.export_mask {
            let _span = spans::output("mask", path).entered();
            let png = session.export_mask()?;
            ImageIOService::save_bytes(&png, path)
                .with_context(|| format!("Failed to write mask {}", path.display()))?;
        }

        if cli.stats {
            if let Some(stats) = session.mask_statistics() {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            }
        }

        session.accept().context("Failed to accept edited result")?;
        Ok::<(), anyhow::Error>(())
    }
    .instrument(session_span)
    .await?;

    events::progress(&format!("Wrote {}", output_path.display()));
    events::performance_metric("mask_edit_run", start_time.elapsed().as_millis() as u64);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn write_png(path: &std::path::Path, image: &RgbaImage) {
        image.save(path).unwrap();
    }

    fn cli_for(dir: &TempDir, extra: &[&str]) -> Cli {
        let original = dir.path().join("original.png");
        let cutout = dir.path().join("cutout.png");
        write_png(&original, &RgbaImage::from_pixel(100, 100, Rgba([40, 90, 160, 255])));
        write_png(&cutout, &RgbaImage::from_pixel(100, 100, Rgba([40, 90, 160, 255])));

        let mut args = vec![
            "imgly-mask-edit".to_string(),
            "--original".to_string(),
            original.display().to_string(),
            "--cutout".to_string(),
            cutout.display().to_string(),
        ];
        args.extend(extra.iter().map(|s| s.to_string()));
        Cli::parse_from(args)
    }

    #[tokio::test]
    async fn test_run_replays_strokes_and_writes_outputs() {
        let dir = TempDir::new().unwrap();
        let strokes = dir.path().join("strokes.json");
        std::fs::write(
            &strokes,
            r#"[{ "mode": "erase", "brush_diameter": 20, "points": [[10, 50], [90, 50]] }]"#,
        )
        .unwrap();
        let output = dir.path().join("out").join("result.png");
        let mask = dir.path().join("mask.png");
        let preview = dir.path().join("preview.png");

        let cli = cli_for(
            &dir,
            &[
                "--strokes",
                strokes.to_str().unwrap(),
                "--output",
                output.to_str().unwrap(),
                "--export-mask",
                mask.to_str().unwrap(),
                "--preview",
                preview.to_str().unwrap(),
            ],
        );
        run(&cli, "test").await.unwrap();

        let result = image::open(&output).unwrap().to_rgba8();
        assert_eq!(result.get_pixel(50, 50)[3], 0);
        assert_eq!(result.get_pixel(50, 10)[3], 255);

        let mask = image::open(&mask).unwrap().to_luma8();
        assert_eq!(mask.get_pixel(50, 50)[0], 0);
        assert_eq!(image::open(&preview).unwrap().width(), 100);
    }

    #[tokio::test]
    async fn test_run_defaults_output_next_to_cutout() {
        let dir = TempDir::new().unwrap();
        let cli = cli_for(&dir, &[]);
        run(&cli, "test").await.unwrap();
        assert!(dir.path().join("cutout_edited.png").exists());
    }

    #[tokio::test]
    async fn test_run_fails_on_bad_background() {
        let dir = TempDir::new().unwrap();
        let background = dir.path().join("background.png");
        std::fs::write(&background, b"not an image").unwrap();
        let output = dir.path().join("result.png");

        let cli = cli_for(
            &dir,
            &["--background", background.to_str().unwrap(), "--output", output.to_str().unwrap()],
        );
        assert!(run(&cli, "test").await.is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_cli_output_format_enum() {
        assert_eq!(crate::OutputFormat::from(CliOutputFormat::Rgba8), crate::OutputFormat::Rgba8);
        assert_ne!(CliOutputFormat::Png, CliOutputFormat::Tiff);
    }
}
