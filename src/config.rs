//! Cropping configuration
//!
//! Defaults live in `roiloc.toml`, embedded at build time. A user file
//! passed on the command line overrides individual keys.

use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use log::debug;

use crate::location::{Margin, UpperBound};
use crate::volume::{VolumeError, VolumeResult};

lazy_static! {
    // Parse the embedded defaults once
    static ref DEFAULT_CONFIG: CropConfig = {
        let content = include_str!("../roiloc.toml");
        CropConfig::builtin().merge(content).unwrap_or_else(|e| {
            eprintln!("Warning: Failed to parse built-in configuration: {}", e);
            CropConfig::builtin()
        })
    };
}

/// Settings shared by the locate and crop operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropConfig {
    /// Padding around the ROI bounding box
    pub margin: Margin,
    /// How max coordinates are read when slicing
    pub upper_bound: UpperBound,
    /// Whether to write a coordinate sidecar next to each crop
    pub log_coords: bool,
}

impl Default for CropConfig {
    fn default() -> Self {
        *DEFAULT_CONFIG
    }
}

impl CropConfig {
    fn builtin() -> Self {
        CropConfig {
            margin: Margin::default(),
            upper_bound: UpperBound::Exclusive,
            log_coords: true,
        }
    }

    /// Parse a configuration from a TOML string, starting from the defaults
    pub fn from_str(content: &str) -> VolumeResult<Self> {
        Self::default().merge(content)
    }

    /// Load a configuration from a TOML file, starting from the defaults
    pub fn from_file<P: AsRef<Path>>(path: P) -> VolumeResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let contents = fs::read_to_string(path)?;
        Self::from_str(&contents)
    }

    /// Override the fields present in `content`
    fn merge(mut self, content: &str) -> VolumeResult<Self> {
        let toml_value: toml::Table = content
            .parse()
            .map_err(|e| VolumeError::Config(format!("Failed to parse TOML: {}", e)))?;

        if let Some(coords) = toml_value.get("coords") {
            if let Some(margin) = coords.get("margin") {
                self.margin = parse_margin(margin)?;
            }
        }

        if let Some(crop) = toml_value.get("crop") {
            if let Some(bound) = crop.get("upper_bound") {
                let name = bound
                    .as_str()
                    .ok_or_else(|| VolumeError::Config("crop.upper_bound must be a string".to_string()))?;
                self.upper_bound = UpperBound::from_name(name)?;
            }
            if let Some(log_coords) = crop.get("log_coords") {
                self.log_coords = log_coords
                    .as_bool()
                    .ok_or_else(|| VolumeError::Config("crop.log_coords must be a boolean".to_string()))?;
            }
        }

        Ok(self)
    }
}

fn parse_margin(value: &toml::Value) -> VolumeResult<Margin> {
    let invalid = || VolumeError::Config("coords.margin must be 3 non-negative integers".to_string());

    let items = value.as_array().ok_or_else(invalid)?;
    if items.len() != 3 {
        return Err(invalid());
    }

    let mut margin = [0usize; 3];
    for (axis, item) in items.iter().enumerate() {
        let v = item.as_integer().ok_or_else(invalid)?;
        margin[axis] = usize::try_from(v).map_err(|_| invalid())?;
    }

    Ok(Margin(margin))
}
