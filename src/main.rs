use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
use clap::{ArgAction, Parser};

use shotframe::config::{BackgroundSettings, ColorSpec};
use shotframe::draw::{Color, color::name_to_color};
use shotframe::export::{
    ExportDestination, ExportFormat, ExportManager, ExportOutcome, SaveLocation,
};
use shotframe::source::PngFileSource;
use shotframe::{Config, EditorSession};

const VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("SHOTFRAME_GIT_HASH"),
    ")"
);

#[derive(Parser, Debug)]
#[command(name = "shotframe")]
#[command(version = VERSION, about = "Screenshot framing and annotation engine")]
struct Cli {
    /// PNG screenshot to frame
    #[arg(value_name = "INPUT", required_unless_present = "init_config")]
    input: Option<PathBuf>,

    /// Where to write the framed image (default: templated name in the configured directory)
    ///
    /// The format's extension is appended unless the name already carries one.
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// Output format: png, jpeg or webp
    #[arg(long, short = 'f', value_name = "FORMAT")]
    format: Option<String>,

    /// Config file to use instead of ~/.config/shotframe/config.toml
    #[arg(long, short = 'c', value_name = "FILE")]
    config: Option<PathBuf>,

    /// Padding around the screenshot in pixels
    #[arg(long, value_name = "PX")]
    padding: Option<i32>,

    /// Corner radius of the screenshot in pixels
    #[arg(long, value_name = "PX")]
    corner_radius: Option<i32>,

    /// Output aspect ratio such as 16:9, 1.5 or auto
    #[arg(long, value_name = "RATIO")]
    aspect: Option<String>,

    /// Disable the drop shadow
    #[arg(long, action = ArgAction::SetTrue)]
    no_shadow: bool,

    /// Solid background color (name or #rrggbb)
    #[arg(long, value_name = "COLOR", conflicts_with_all = ["preset", "background_image"])]
    background: Option<String>,

    /// Built-in gradient background by index
    #[arg(long, value_name = "INDEX", conflicts_with = "background_image")]
    preset: Option<usize>,

    /// Image file to use as the background, scaled to cover the canvas
    #[arg(long, value_name = "FILE")]
    background_image: Option<PathBuf>,

    /// Write a documented default config file and exit
    #[arg(long, action = ArgAction::SetTrue)]
    init_config: bool,
}

impl Cli {
    fn apply_overrides(&self, config: &mut Config) -> anyhow::Result<()> {
        if let Some(padding) = self.padding {
            config.frame.padding = padding;
        }
        if let Some(radius) = self.corner_radius {
            config.frame.corner_radius = radius;
        }
        if let Some(aspect) = &self.aspect {
            config.frame.aspect_ratio = aspect.clone();
        }
        if self.no_shadow {
            config.frame.shadow = false;
        }
        if let Some(name) = &self.background {
            let color = name_to_color(name)
                .or_else(|| Color::from_hex(name))
                .with_context(|| format!("Unknown background color '{name}'"))?;
            config.background = BackgroundSettings::Solid {
                color: ColorSpec::from(color),
            };
        }
        if let Some(index) = self.preset {
            config.background = BackgroundSettings::Preset { index };
        }
        if let Some(path) = &self.background_image {
            if !path.is_file() {
                bail!("Background image {} does not exist", path.display());
            }
            config.background = BackgroundSettings::Image {
                path: path.to_string_lossy().into_owned(),
            };
        }
        if let Some(name) = &self.format {
            config.export.format = ExportFormat::from_name(name)
                .with_context(|| format!("Unknown output format '{name}' (png, jpeg, webp)"))?;
        }
        config.validate_and_clamp();
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    if cli.init_config {
        let path = Config::create_default_file()?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let Some(input) = cli.input.clone() else {
        bail!("No input image given");
    };

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply_overrides(&mut config)?;

    let manager = ExportManager::new(&tokio::runtime::Handle::current());
    let mut session = EditorSession::from_config(&config).with_export_manager(manager.clone());
    session
        .load_from(&PngFileSource::new(&input))
        .await
        .with_context(|| format!("Failed to load {}", input.display()))?;

    let location = match &cli.output {
        Some(path) => SaveLocation::Exact(path.clone()),
        None => SaveLocation::Template(config.file_save_config()),
    };
    session.request_export(ExportDestination::FileOnly, Some(location))?;

    let outcome = loop {
        if let Some(outcome) = manager.take_result().await {
            break outcome;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    };
    session.close();

    match outcome {
        ExportOutcome::Success(result) => {
            if let Some(path) = result.saved_path {
                println!("{}", path.display());
            }
            log::info!("Framed image is {}x{}", result.width, result.height);
            Ok(())
        }
        ExportOutcome::Failed(message) => bail!("Export failed: {message}"),
        ExportOutcome::Cancelled(reason) => bail!("Export cancelled: {reason}"),
    }
}
