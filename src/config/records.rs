//! Typed configuration records, validated once at load time.

use std::path::{Path, PathBuf};

use crate::audio::envelope::DEFAULT_INERTIA;
use crate::config::document::{ConfigDocument, Properties};
use crate::foundation::core::Fps;
use crate::foundation::error::{ZvisError, ZvisResult};

/// Name of the section holding global settings.
pub const GENERAL_SECTION: &str = "general";

/// Global settings from the `[general]` section.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneralConfig {
    /// Background image, resolved against the config directory.
    pub background: PathBuf,
    /// Output frame rate.
    pub fps: Fps,
}

impl GeneralConfig {
    /// Read `bg` and `fps` from `[general]`.
    pub fn from_document(doc: &ConfigDocument, base_dir: &Path) -> ZvisResult<Self> {
        let props = doc.require_section(GENERAL_SECTION)?;
        let background = base_dir.join(require(GENERAL_SECTION, props, "bg")?);
        let fps = parse_positive(GENERAL_SECTION, "fps", require(GENERAL_SECTION, props, "fps")?)?;
        Ok(Self {
            background,
            fps: Fps::new(fps)?,
        })
    }
}

/// Settings of a volume-driven still image layer.
#[derive(Clone, Debug, PartialEq)]
pub struct ImageLayerConfig {
    /// Audio driving the opacity.
    pub audio: PathBuf,
    /// Still image composited over the canvas.
    pub image: PathBuf,
    /// Envelope leak time constant in seconds.
    pub inertia: f32,
}

impl ImageLayerConfig {
    /// Validate the properties of `section`.
    pub fn from_properties(section: &str, props: &Properties, base_dir: &Path) -> ZvisResult<Self> {
        let audio = base_dir.join(require(section, props, "audio")?);
        let image = base_dir.join(require(section, props, "image")?);
        let inertia = match props.get("inertia") {
            Some(raw) => {
                let v: f32 = raw.trim().parse().map_err(|_| {
                    invalid(section, "inertia", raw, "expected a positive number")
                })?;
                if !v.is_finite() || v <= 0.0 {
                    return Err(invalid(section, "inertia", raw, "expected a positive number"));
                }
                v
            }
            None => DEFAULT_INERTIA,
        };
        Ok(Self {
            audio,
            image,
            inertia,
        })
    }
}

/// Settings of a scrolling spectrogram layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpectroLayerConfig {
    /// Audio to analyse.
    pub audio: PathBuf,
    /// Paint colour as `[r, g, b]`.
    pub colour: [u8; 3],
    /// Spectral slices (and scrolled pixels) per video frame.
    pub rate: u32,
    /// Vertical pixels per frequency bin.
    pub yscale: u32,
}

impl SpectroLayerConfig {
    /// Validate the properties of `section`.
    pub fn from_properties(section: &str, props: &Properties, base_dir: &Path) -> ZvisResult<Self> {
        let audio = base_dir.join(require(section, props, "audio")?);
        let colour = parse_colour(section, require(section, props, "colour")?)?;
        let rate = optional_positive(section, props, "rate", 1)?;
        let yscale = optional_positive(section, props, "yscale", 1)?;
        Ok(Self {
            audio,
            colour,
            rate,
            yscale,
        })
    }
}

/// Look up a required key, failing with an error naming the section.
pub(crate) fn require<'a>(section: &str, props: &'a Properties, key: &str) -> ZvisResult<&'a str> {
    props
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ZvisError::config(format!("section [{section}]: missing key '{key}'")))
}

fn parse_positive(section: &str, key: &str, raw: &str) -> ZvisResult<u32> {
    match raw.trim().parse::<u32>() {
        Ok(v) if v > 0 => Ok(v),
        _ => Err(invalid(section, key, raw, "expected a positive integer")),
    }
}

fn optional_positive(section: &str, props: &Properties, key: &str, default: u32) -> ZvisResult<u32> {
    props
        .get(key)
        .map_or(Ok(default), |raw| parse_positive(section, key, raw))
}

/// Parse an `r,g,b` integer triple.
pub(crate) fn parse_colour(section: &str, raw: &str) -> ZvisResult<[u8; 3]> {
    let parts = raw
        .split(',')
        .map(|p| p.trim().parse::<u8>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|_| invalid(section, "colour", raw, "expected integers in 0..=255"))?;
    match parts.as_slice() {
        &[r, g, b] => Ok([r, g, b]),
        _ => Err(invalid(section, "colour", raw, "expected three values 'r,g,b'")),
    }
}

fn invalid(section: &str, key: &str, raw: &str, why: &str) -> ZvisError {
    ZvisError::config(format!(
        "section [{section}]: invalid {key} '{raw}': {why}"
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/config/records.rs"]
mod tests;
