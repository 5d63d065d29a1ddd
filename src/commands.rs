//! The work behind each subcommand, kept apart from argument parsing so
//! integration tests can call it directly.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use serde::Serialize;
use zx_screen::decode::{CharSet, DecodeOptions, GigascreenMode, Rgb3Mode};
use zx_screen::format::{ScaFile, ScaPayload, ScaWriter, SCR_SIZE};
use zx_screen::{Decoder, ScreenFormat};

use crate::config::ConversionSettings;
use crate::error::CliError;
use crate::image_io;

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
}

pub fn parse_format(name: &str) -> Result<ScreenFormat, CliError> {
    name.parse().map_err(|e| CliError::invalid("format", name, e))
}

/// Target format for `output`: the explicit name, else the first encodable
/// format claiming the file extension.
pub fn target_format(name: Option<&str>, output: &Path) -> Result<ScreenFormat, CliError> {
    if let Some(name) = name {
        return parse_format(name);
    }
    let ext = extension(output).unwrap_or_default();
    ScreenFormat::ALL
        .into_iter()
        .find(|f| f.is_encodable() && f.descriptor().extensions.contains(&ext.as_str()))
        .ok_or_else(|| CliError::invalid("output extension", &ext, "no screen format uses it; pass --format"))
}

#[derive(Debug, Clone)]
pub struct ConvertArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: Option<String>,
    pub settings: ConversionSettings,
}

pub fn run_convert(args: &ConvertArgs) -> anyhow::Result<ScreenFormat> {
    let format = target_format(args.format.as_deref(), &args.output)?;
    let request = args.settings.to_request(format)?;
    let image = image_io::read_png(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let bytes = request.convert(&image)?;
    std::fs::write(&args.output, &bytes)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(
        input = %args.input.display(),
        output = %args.output.display(),
        %format,
        bytes = bytes.len(),
        "Converted image"
    );
    Ok(format)
}

#[derive(Debug, Clone, Default)]
pub struct DecodeArgs {
    pub input: PathBuf,
    pub output: PathBuf,
    pub format: Option<String>,
    pub flash: bool,
    pub frame: usize,
    pub gigascreen: Option<String>,
    pub rgb3: Option<String>,
    pub settings: ConversionSettings,
}

fn detect(bytes: &[u8], path: &Path, name: Option<&str>) -> Result<ScreenFormat, CliError> {
    match name {
        Some(name) => parse_format(name),
        None => ScreenFormat::detect(bytes, extension(path).as_deref()).map_err(|_| {
            CliError::UnknownFormat {
                path: path.to_path_buf(),
                len: bytes.len(),
            }
        }),
    }
}

pub fn decode_options(args: &DecodeArgs) -> Result<DecodeOptions, CliError> {
    let mut options = DecodeOptions::new()
        .palette(args.settings.zx_palette()?)
        .attr53c_pattern(args.settings.attr53c_pattern()?)
        .flash_phase(args.flash)
        .frame(args.frame);
    if let Some(mode) = &args.gigascreen {
        let mode: GigascreenMode = mode
            .parse()
            .map_err(|e| CliError::invalid("gigascreen", mode, e))?;
        options = options.gigascreen(mode);
    }
    if let Some(mode) = &args.rgb3 {
        let mode: Rgb3Mode = mode.parse().map_err(|e| CliError::invalid("rgb3", mode, e))?;
        options = options.rgb3(mode);
    }
    if let Some(path) = &args.settings.charset {
        let bytes = std::fs::read(path)?;
        options = options.charset(CharSet::from_bytes(&bytes)?);
    }
    Ok(options)
}

pub fn run_decode(args: &DecodeArgs) -> anyhow::Result<ScreenFormat> {
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let format = detect(&bytes, &args.input, args.format.as_deref())?;
    let image = Decoder::new(decode_options(args)?)
        .decode(&bytes, format)
        .with_context(|| format!("decoding {} as {format}", args.input.display()))?;
    image_io::write_png(&args.output, &image)
        .with_context(|| format!("writing {}", args.output.display()))?;
    tracing::info!(
        input = %args.input.display(),
        %format,
        width = image.width(),
        height = image.height(),
        "Decoded screen"
    );
    Ok(format)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScaSummary {
    pub frames: usize,
    pub payload: &'static str,
    pub border: u8,
    pub delays_ms: Vec<u32>,
    pub warnings: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenInfo {
    pub format: String,
    pub size: usize,
    pub width: usize,
    pub height: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sca: Option<ScaSummary>,
}

pub fn describe(bytes: &[u8], path: &Path, format: Option<&str>) -> Result<ScreenInfo, CliError> {
    let format = detect(bytes, path, format)?;
    format.check_size(bytes).map_err(zx_screen::ScreenError::from)?;
    let sca = if format == ScreenFormat::Sca {
        let file = ScaFile::parse(bytes).map_err(zx_screen::ScreenError::from)?;
        Some(ScaSummary {
            frames: file.frame_count(),
            payload: match file.payload() {
                ScaPayload::Full => "full",
                ScaPayload::Attributes => "attributes",
            },
            border: file.border(),
            delays_ms: (0..file.frame_count()).map(|i| file.delay_ms(i)).collect(),
            warnings: file.warnings().iter().map(ToString::to_string).collect(),
        })
    } else {
        None
    };
    let (width, height) = format.canvas();
    Ok(ScreenInfo {
        format: format.name().to_string(),
        size: bytes.len(),
        width,
        height,
        sca,
    })
}

pub fn run_info(input: &Path, format: Option<&str>, json: bool) -> anyhow::Result<String> {
    let bytes = std::fs::read(input).with_context(|| format!("reading {}", input.display()))?;
    let info = describe(&bytes, input, format)?;
    if json {
        return Ok(serde_json::to_string_pretty(&info)?);
    }
    let mut text = format!(
        "{}: {} ({} bytes, {}x{})",
        input.display(),
        info.format,
        info.size,
        info.width,
        info.height
    );
    if let Some(sca) = &info.sca {
        text.push_str(&format!(
            "\n  {} frames, {} payload, border {}",
            sca.frames, sca.payload, sca.border
        ));
        for warning in &sca.warnings {
            text.push_str(&format!("\n  warning: {warning}"));
        }
    }
    Ok(text)
}

/// Pack standard screens into an SCA animation, every frame shown for
/// `delay_ms`.
pub fn run_animate(frames: &[PathBuf], output: &Path, delay_ms: u32, border: u8) -> anyhow::Result<usize> {
    if frames.is_empty() {
        bail!("no frames given");
    }
    let mut writer = ScaWriter::new().border(border);
    for path in frames {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        if bytes.len() != SCR_SIZE {
            bail!("{} is {} bytes, expected a {SCR_SIZE}-byte screen", path.display(), bytes.len());
        }
        writer.add_frame(&bytes, delay_ms)?;
    }
    let count = writer.frame_count();
    let bytes = writer.finish()?;
    std::fs::write(output, bytes).with_context(|| format!("writing {}", output.display()))?;
    tracing::info!(output = %output.display(), frames = count, "Wrote animation");
    Ok(count)
}
