mod presets;
mod script;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sketchpad_core::Document;
use sketchpad_export::RasterOptions;
use sketchpad_session::{EditorConfig, EditorSession};

/// Headless vector drawing engine
#[derive(Parser, Debug)]
#[command(name = "sketchpad")]
#[command(version, about, long_about = None)]
struct Args {
    /// Editor configuration file (JSON)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty document
    New {
        /// Named canvas size (see `presets`)
        #[arg(long, conflicts_with = "size")]
        preset: Option<String>,

        /// Canvas size as WIDTHxHEIGHT
        #[arg(long, value_parser = parse_size)]
        size: Option<(u32, u32)>,

        #[arg(long)]
        background: Option<String>,

        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,
    },
    /// Replay an event script and save the resulting document
    Replay {
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Start from this document instead of a blank one
        #[arg(long, value_name = "DOC")]
        input: Option<PathBuf>,

        #[arg(short, long, value_name = "OUT")]
        output: PathBuf,
    },
    /// Export a document to SVG and/or PNG
    Export {
        #[arg(value_name = "DOC")]
        document: PathBuf,

        #[arg(long, value_name = "OUT")]
        svg: Option<PathBuf>,

        /// PNG at twice the document size
        #[arg(long, value_name = "OUT")]
        png: Option<PathBuf>,
    },
    /// List canvas size presets
    Presets,
}

fn parse_size(s: &str) -> Result<(u32, u32), String> {
    presets::parse_size(s).ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Logs go to stderr so stdout stays clean for listings
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sketchpad=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match args.command {
        Command::Presets => {
            for preset in presets::PRESETS {
                println!("{:<20} {}x{}", preset.name, preset.width, preset.height);
            }
            Ok(())
        }
        Command::New { preset, size, background, output } => {
            let config = EditorConfig::load(args.config.as_deref())?;
            let (width, height) = match (preset, size) {
                (Some(name), _) => {
                    let Some(p) = presets::find(&name) else {
                        bail!("unknown preset {name:?}; run `sketchpad presets` for the list");
                    };
                    (p.width, p.height)
                }
                (None, Some(size)) => size,
                (None, None) => (config.document_width, config.document_height),
            };
            let doc = Document::new(width, height)
                .with_background(background.unwrap_or(config.background));
            sketchpad_export::save_document(&doc, &output)?;
            info!(path = %output.display(), width, height, "created document");
            Ok(())
        }
        Command::Replay { script, input, output } => {
            let config = EditorConfig::load(args.config.as_deref())?;
            let events = script::load_script(&script)?;
            let mut session = match input {
                Some(path) => EditorSession::with_document(sketchpad_export::load_document(&path)?, config)?,
                None => EditorSession::new(config)?,
            };
            let base_dir = parent_dir(&script);
            let summary = script::replay(&mut session, &events, &base_dir)?;
            sketchpad_export::save_document(session.document(), &output)?;
            info!(
                path = %output.display(),
                shapes = session.document().len(),
                events = summary.events,
                ignored = summary.ignored,
                "replay saved"
            );
            Ok(())
        }
        Command::Export { document, svg, png } => {
            if svg.is_none() && png.is_none() {
                bail!("nothing to export; pass --svg and/or --png");
            }
            let doc = sketchpad_export::load_document(&document)
                .with_context(|| format!("cannot export {}", document.display()))?;
            if let Some(path) = svg {
                sketchpad_export::save_svg(&doc, &path)?;
            }
            if let Some(path) = png {
                let options = RasterOptions {
                    image_root: Some(parent_dir(&document)),
                    ..RasterOptions::default()
                };
                sketchpad_export::save_png(&doc, &path, &options)?;
            }
            Ok(())
        }
    }
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
