//! Photomark command-line tool.
//!
//! Replays a recorded touch session against a photo and bakes the committed
//! annotations into a new image file.

mod script;

use clap::{Parser, ValueEnum};
use photomark_core::canvas::Canvas;
use photomark_core::config::{ConfigError, EngineConfig, OutputFormat};
use photomark_render::{LiveRenderer, LiveStyle, RenderError, bake_canvas, rgba_from_pixmap};
use script::{ScriptError, SessionScript};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum FormatArg {
    /// JPEG at the configured quality
    Jpeg,
    /// Lossless PNG
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Jpeg => OutputFormat::Jpeg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "photomark")]
#[command(about = "Replay an annotation session and bake it onto a photo")]
struct Args {
    /// Source photo (never modified)
    image: PathBuf,

    /// Session script (JSON)
    script: PathBuf,

    /// Engine configuration (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the baked image (defaults to the photo's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<FormatArg>,

    /// JPEG quality (1-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: Option<u8>,

    /// Also write the final live canvas as PNG
    #[arg(long)]
    preview: Option<PathBuf>,

    /// Also write the committed annotations as JSON
    #[arg(long)]
    dump: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Script(#[from] ScriptError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("Failed to serialize annotations: {0}")]
    Dump(#[from] serde_json::Error),
    #[error("IO error writing {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn load_config(args: &Args) -> Result<EngineConfig, CliError> {
    let mut config = match &args.config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };
    if let Some(format) = args.format {
        config.bake.format = format.into();
    }
    if let Some(quality) = args.quality {
        config.bake.quality = quality;
    }
    if let Some(dir) = &args.output_dir {
        config.bake.output_dir = Some(dir.clone());
    }
    Ok(config)
}

fn write_preview(image: &Path, canvas: &Canvas, path: &Path) -> Result<(), CliError> {
    let mut renderer = LiveRenderer::new(LiveStyle::default());
    renderer.load_source(image)?;
    let frame = renderer.paint(canvas)?;
    rgba_from_pixmap(&frame)
        .save(path)
        .map_err(RenderError::Encode)?;
    log::info!("Preview written to {}", path.display());
    Ok(())
}

fn run(args: &Args) -> Result<PathBuf, CliError> {
    let config = load_config(args)?;
    let script = SessionScript::load(&args.script)?;

    let mut canvas = Canvas::with_config(config);
    script.replay(&mut canvas)?;

    if let Some(path) = &args.dump {
        let json = canvas.document.to_json()?;
        fs::write(path, json).map_err(|source| CliError::Io {
            path: path.clone(),
            source,
        })?;
    }
    if let Some(path) = &args.preview {
        write_preview(&args.image, &canvas, path)?;
    }

    Ok(bake_canvas(&args.image, &canvas, &canvas.config().bake)?)
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    match run(&args) {
        Ok(path) => println!("{}", path.display()),
        Err(err) => {
            log::error!("{err}");
            eprintln!("photomark: {err}");
            std::process::exit(1);
        }
    }
}
