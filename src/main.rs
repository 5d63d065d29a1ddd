use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scrconv::commands::{self, ConvertArgs, DecodeArgs};
use scrconv::config::ConversionSettings;

#[derive(Parser)]
#[command(name = "scrconv")]
#[command(about = "Convert images to and from ZX Spectrum screen formats")]
struct Cli {
    /// Log every conversion stage
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Flags shared by convert and decode. Each overrides the settings file.
#[derive(clap::Args)]
struct SettingsArgs {
    /// YAML settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Palette table: default, pulsar or linear
    #[arg(long)]
    palette: Option<String>,

    /// 53c bitmap pattern: checker, stripe or dd77
    #[arg(long)]
    pattern: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode a PNG into a screen file
    Convert {
        /// Input PNG file
        #[arg(short, long)]
        input: PathBuf,

        /// Output screen file
        #[arg(short, long)]
        output: PathBuf,

        /// Target format (defaults to the output extension)
        #[arg(short, long)]
        format: Option<String>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Dithering algorithm (e.g. floyd-steinberg, atkinson, bayer4, none)
        #[arg(short, long)]
        dither: Option<String>,

        /// Pick block colors before dithering each block
        #[arg(long)]
        per_block: bool,

        /// Dither the whole screen before picking block colors
        #[arg(long, conflicts_with = "per_block")]
        global: bool,

        /// Color distance: lab or weighted-rgb
        #[arg(long)]
        metric: Option<String>,

        /// Scaling: stretch, fit or fill
        #[arg(long)]
        fit: Option<String>,

        /// Solid border color 0-7 for bordered formats
        #[arg(long)]
        border: Option<u8>,

        /// Brightness, -100 to 100
        #[arg(long, allow_hyphen_values = true)]
        brightness: Option<f32>,

        /// Contrast, -100 to 100
        #[arg(long, allow_hyphen_values = true)]
        contrast: Option<f32>,
    },
    /// Render a screen file to PNG
    Decode {
        /// Input screen file
        #[arg(short, long)]
        input: PathBuf,

        /// Output PNG file
        #[arg(short, long)]
        output: PathBuf,

        /// Source format (detected from size and extension if omitted)
        #[arg(short, long)]
        format: Option<String>,

        #[command(flatten)]
        settings: SettingsArgs,

        /// Show flashing cells in their swapped phase
        #[arg(long)]
        flash: bool,

        /// SCA frame index
        #[arg(long, default_value_t = 0)]
        frame: usize,

        /// Gigascreen view: blend, 0 or 1
        #[arg(long)]
        gigascreen: Option<String>,

        /// RGB3 view: union, r, g or b
        #[arg(long)]
        rgb3: Option<String>,

        /// Character set for SPECSCII (768-byte table or 16K ROM)
        #[arg(long)]
        charset: Option<PathBuf>,
    },
    /// Print the detected format of a screen file
    Info {
        /// Screen file
        #[arg(short, long)]
        input: PathBuf,

        /// Format name, if detection is ambiguous
        #[arg(short, long)]
        format: Option<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Pack standard screens into an SCA animation
    Animate {
        /// Output SCA file
        #[arg(short, long)]
        output: PathBuf,

        /// Delay per frame in milliseconds
        #[arg(long, default_value_t = 100)]
        delay: u32,

        /// Border color 0-7
        #[arg(long, default_value_t = 0)]
        border: u8,

        /// 6912-byte screen files, in display order
        frames: Vec<PathBuf>,
    },
}

impl SettingsArgs {
    fn load(&self) -> ConversionSettings {
        let mut settings = ConversionSettings::load(self.config.as_deref());
        if let Some(palette) = &self.palette {
            settings.palette = palette.clone();
            settings.custom_palette = None;
        }
        if let Some(pattern) = &self.pattern {
            settings.pattern = pattern.clone();
        }
        settings
    }
}

fn init_logging(verbose: bool) {
    let default = if verbose {
        "scrconv=debug,zx_screen=debug"
    } else {
        "scrconv=info,zx_screen=warn"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Convert {
            input,
            output,
            format,
            settings,
            dither,
            per_block,
            global,
            metric,
            fit,
            border,
            brightness,
            contrast,
        } => {
            let mut settings = settings.load();
            if let Some(dither) = dither {
                settings.dither = dither;
            }
            if per_block {
                settings.scope = "per-block".to_string();
            }
            if global {
                settings.scope = "global".to_string();
            }
            if let Some(metric) = metric {
                settings.metric = metric;
            }
            if let Some(fit) = fit {
                settings.fit = fit;
            }
            if border.is_some() {
                settings.border = border;
            }
            if let Some(brightness) = brightness {
                settings.adjust.brightness = brightness;
            }
            if let Some(contrast) = contrast {
                settings.adjust.contrast = contrast;
            }
            let format = commands::run_convert(&ConvertArgs {
                input,
                output: output.clone(),
                format,
                settings,
            })?;
            println!("Wrote {} ({format})", output.display());
        }
        Commands::Decode {
            input,
            output,
            format,
            settings,
            flash,
            frame,
            gigascreen,
            rgb3,
            charset,
        } => {
            let mut settings = settings.load();
            if charset.is_some() {
                settings.charset = charset;
            }
            let format = commands::run_decode(&DecodeArgs {
                input,
                output: output.clone(),
                format,
                flash,
                frame,
                gigascreen,
                rgb3,
                settings,
            })?;
            println!("Wrote {} (from {format})", output.display());
        }
        Commands::Info {
            input,
            format,
            json,
        } => {
            println!("{}", commands::run_info(&input, format.as_deref(), json)?);
        }
        Commands::Animate {
            output,
            delay,
            border,
            frames,
        } => {
            let count = commands::run_animate(&frames, &output, delay, border)?;
            println!("Wrote {} ({count} frames)", output.display());
        }
    }
    Ok(())
}
