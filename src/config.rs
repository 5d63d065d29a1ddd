//! Conversion settings loaded from YAML.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use zx_screen::adjust::{AdjustOptions, FitMode};
use zx_screen::format::{Attr53cPattern, BorderSource};
use zx_screen::{
    ConversionRequest, DistanceMetric, DitherAlgorithm, DitherScope, PaletteName, Rgb,
    ScreenFormat, ZxPalette,
};

use crate::error::CliError;

/// Everything a conversion can be tuned with. Names and values match the
/// command-line flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionSettings {
    /// Built-in table name: default, pulsar or linear.
    pub palette: String,
    /// Sixteen `#RRGGBB` colors replacing the named table.
    pub custom_palette: Option<Vec<String>>,
    pub metric: String,
    pub dither: String,
    /// global or per_block
    pub scope: String,
    pub fit: String,
    pub pattern: String,
    /// Solid border color 0-7 instead of sampling the image.
    pub border: Option<u8>,
    /// Letterbox and transparency fill.
    pub background: String,
    pub adjust: AdjustSettings,
    /// Character set for SPECSCII decoding (768-byte table or 16K ROM).
    pub charset: Option<PathBuf>,
}

impl Default for ConversionSettings {
    fn default() -> Self {
        Self {
            palette: "default".to_string(),
            custom_palette: None,
            metric: DistanceMetric::default().to_string(),
            dither: DitherAlgorithm::default().name().to_string(),
            scope: DitherScope::default().name().to_string(),
            fit: FitMode::default().name().to_string(),
            pattern: Attr53cPattern::default().name().to_string(),
            border: None,
            background: "#000000".to_string(),
            adjust: AdjustSettings::default(),
            charset: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdjustSettings {
    pub grayscale: bool,
    pub saturation: f32,
    pub balance: [f32; 3],
    pub gamma: f32,
    pub black_point: u8,
    pub white_point: u8,
    pub brightness: f32,
    pub contrast: f32,
    pub smoothing: u8,
    pub sharpening: u8,
}

impl Default for AdjustSettings {
    fn default() -> Self {
        let neutral = AdjustOptions::default();
        Self {
            grayscale: neutral.grayscale,
            saturation: neutral.saturation,
            balance: neutral.balance,
            gamma: neutral.gamma,
            black_point: neutral.black_point,
            white_point: neutral.white_point,
            brightness: neutral.brightness,
            contrast: neutral.contrast,
            smoothing: neutral.smoothing,
            sharpening: neutral.sharpening,
        }
    }
}

impl AdjustSettings {
    pub fn to_options(&self) -> AdjustOptions {
        let [r, g, b] = self.balance;
        AdjustOptions::new()
            .grayscale(self.grayscale)
            .saturation(self.saturation)
            .balance(r, g, b)
            .gamma(self.gamma)
            .levels(self.black_point, self.white_point)
            .brightness(self.brightness)
            .contrast(self.contrast)
            .smoothing(self.smoothing)
            .sharpening(self.sharpening)
    }
}

impl ConversionSettings {
    /// Load settings from `path`. A missing or unreadable file yields the
    /// defaults, as does a file that fails to parse.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };
        match std::fs::read_to_string(path) {
            Ok(content) => match serde_yaml::from_str::<Self>(&content) {
                Ok(settings) => {
                    tracing::info!(path = %path.display(), "Loaded conversion settings");
                    settings
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse settings, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, path = %path.display(), "Failed to read settings, using defaults");
                Self::default()
            }
        }
    }

    pub fn zx_palette(&self) -> Result<ZxPalette, CliError> {
        if let Some(hex) = &self.custom_palette {
            let refs: Vec<&str> = hex.iter().map(String::as_str).collect();
            return ZxPalette::from_hex(&refs)
                .map_err(|e| CliError::invalid("custom_palette", &hex.join(","), e));
        }
        let name: PaletteName = self
            .palette
            .parse()
            .map_err(|e| CliError::invalid("palette", &self.palette, e))?;
        Ok(ZxPalette::named(name))
    }

    pub fn distance_metric(&self) -> Result<DistanceMetric, CliError> {
        self.metric
            .parse()
            .map_err(|e| CliError::invalid("metric", &self.metric, e))
    }

    pub fn attr53c_pattern(&self) -> Result<Attr53cPattern, CliError> {
        self.pattern
            .parse()
            .map_err(|e| CliError::invalid("pattern", &self.pattern, e))
    }

    /// Build the engine request for `format`.
    pub fn to_request(&self, format: ScreenFormat) -> Result<ConversionRequest, CliError> {
        let algorithm: DitherAlgorithm = self
            .dither
            .parse()
            .map_err(|e| CliError::invalid("dither", &self.dither, e))?;
        let scope: DitherScope = self
            .scope
            .parse()
            .map_err(|e| CliError::invalid("scope", &self.scope, e))?;
        let fit: FitMode = self
            .fit
            .parse()
            .map_err(|e| CliError::invalid("fit", &self.fit, e))?;
        let background: Rgb = self
            .background
            .parse()
            .map_err(|e| CliError::invalid("background", &self.background, e))?;
        let border = match self.border {
            Some(color @ 0..=7) => BorderSource::Solid(color),
            Some(other) => {
                return Err(CliError::invalid("border", &other.to_string(), "expected 0-7"))
            }
            None => BorderSource::Image,
        };

        Ok(ConversionRequest::new(format)?
            .palette(self.zx_palette()?)
            .metric(self.distance_metric()?)
            .dither(algorithm)
            .scope(scope)
            .pattern(self.attr53c_pattern()?)
            .border(border)
            .fit(fit)
            .background(background)
            .adjustments(self.adjust.to_options()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = "dither: atkinson\nadjust:\n  contrast: 25\n";
        let settings: ConversionSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.dither, "atkinson");
        assert_eq!(settings.adjust.contrast, 25.0);
        assert_eq!(settings.adjust.gamma, 1.0);
        assert_eq!(settings.palette, "default");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = ConversionSettings::load(Some(Path::new("/nonexistent/settings.yaml")));
        assert_eq!(settings, ConversionSettings::default());
    }

    #[test]
    fn test_broken_file_gives_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "dither: [unclosed").unwrap();
        let settings = ConversionSettings::load(Some(file.path()));
        assert_eq!(settings, ConversionSettings::default());
    }

    #[test]
    fn test_defaults_build_a_request() {
        let settings = ConversionSettings::default();
        for format in ScreenFormat::ALL.into_iter().filter(|f| f.is_encodable()) {
            assert!(settings.to_request(format).is_ok(), "{format}");
        }
    }

    #[test]
    fn test_bad_values_are_reported() {
        let settings = ConversionSettings {
            dither: "wobble".to_string(),
            ..Default::default()
        };
        let err = settings.to_request(ScreenFormat::Scr).err().unwrap();
        assert!(matches!(err, CliError::InvalidOption { name: "dither", .. }));

        let settings = ConversionSettings {
            border: Some(9),
            ..Default::default()
        };
        assert!(settings.to_request(ScreenFormat::Bsc).is_err());
    }

    #[test]
    fn test_custom_palette() {
        let mut colors: Vec<String> = (0..16).map(|i| format!("#{:02X}0000", i * 16)).collect();
        let settings = ConversionSettings {
            custom_palette: Some(colors.clone()),
            ..Default::default()
        };
        assert_eq!(settings.zx_palette().unwrap().color(1, false), [0x10, 0, 0]);

        colors.pop();
        let settings = ConversionSettings {
            custom_palette: Some(colors),
            ..Default::default()
        };
        assert!(settings.zx_palette().is_err());
    }
}
