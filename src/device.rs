//! Device collaborators: the raw profile provider and the device description.
//!
//! The engine only talks to the [`DeviceInfo`] and [`EncoderProfilesProvider`]
//! traits. [`DeviceDescription`] is a data-driven implementation of both, loaded
//! from a TOML file, which the CLI and the tests use in place of a live camera.

use crate::dynamic_range::DynamicRange;
use crate::profiles::{EncoderProfiles, Size};
use crate::quality::Quality;
use crate::quirks::DeviceQuirks;
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::Path;

/// Raw encoder profiles as the platform enumerates them, before any correction.
pub trait EncoderProfilesProvider {
    fn get(&self, quality: Quality) -> Option<EncoderProfiles>;

    fn has_profile(&self, quality: Quality) -> bool {
        self.get(quality).is_some()
    }
}

pub trait DeviceInfo {
    fn name(&self) -> &str {
        "camera"
    }

    fn supported_dynamic_ranges(&self) -> BTreeSet<DynamicRange>;

    fn is_stabilization_supported(&self) -> bool;

    /// `None` when the device exposes no profile information at all.
    fn encoder_profiles_provider(&self) -> Option<&dyn EncoderProfilesProvider>;

    fn quirks(&self) -> &DeviceQuirks;

    /// Output sizes the camera can stream. Empty means unrestricted.
    fn output_sizes(&self) -> &[Size] {
        &[]
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct QualityProfiles {
    pub quality: Quality,
    #[serde(flatten)]
    pub profiles: EncoderProfiles,
}

fn default_device_name() -> String {
    "camera".to_string()
}

/// A device described declaratively, typically from a TOML file.
///
/// ```toml
/// name = "back camera"
/// supported_dynamic_ranges = ["sdr/8", "hlg/10"]
/// stabilization_supported = true
///
/// [[profiles]]
/// quality = "fhd"
/// [[profiles.video_profiles]]
/// codec = "h264"
/// bitrate = 17000000
/// width = 1920
/// height = 1080
/// ```
#[derive(Clone, Debug, Deserialize)]
pub struct DeviceDescription {
    #[serde(default = "default_device_name")]
    pub name: String,
    #[serde(default)]
    pub supported_dynamic_ranges: Vec<DynamicRange>,
    #[serde(default)]
    pub stabilization_supported: bool,
    #[serde(default)]
    pub output_sizes: Vec<Size>,
    #[serde(default)]
    pub profiles: Vec<QualityProfiles>,
    #[serde(default)]
    pub quirks: DeviceQuirks,
}

impl DeviceDescription {
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read device description at {}", path.display()))?;
        let device = Self::from_toml_str(&contents)
            .with_context(|| format!("Invalid device description in {}", path.display()))?;
        debug!(
            "Loaded device '{}' from {} ({} quality entries)",
            device.name,
            path.display(),
            device.profiles.len()
        );
        Ok(device)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let device: DeviceDescription =
            toml::from_str(contents).context("Failed to parse device description")?;
        device.warn_on_duplicates();
        Ok(device)
    }

    fn warn_on_duplicates(&self) {
        let mut seen = HashSet::new();
        for entry in &self.profiles {
            if !seen.insert(entry.quality) {
                warn!(
                    "Duplicate profiles for quality '{}' in device '{}'; using last entry",
                    entry.quality, self.name
                );
            }
        }

        for range in &self.supported_dynamic_ranges {
            if !range.is_fully_specified() {
                warn!(
                    "Device '{}' reports non fully specified dynamic range {}; it will be ignored",
                    self.name, range
                );
            }
        }
    }
}

impl EncoderProfilesProvider for DeviceDescription {
    fn get(&self, quality: Quality) -> Option<EncoderProfiles> {
        self.profiles
            .iter()
            .rev()
            .find(|entry| entry.quality == quality)
            .map(|entry| entry.profiles.clone())
    }
}

impl DeviceInfo for DeviceDescription {
    fn name(&self) -> &str {
        &self.name
    }

    fn supported_dynamic_ranges(&self) -> BTreeSet<DynamicRange> {
        self.supported_dynamic_ranges.iter().copied().collect()
    }

    fn is_stabilization_supported(&self) -> bool {
        self.stabilization_supported
    }

    fn encoder_profiles_provider(&self) -> Option<&dyn EncoderProfilesProvider> {
        if self.profiles.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    fn quirks(&self) -> &DeviceQuirks {
        &self.quirks
    }

    fn output_sizes(&self) -> &[Size] {
        &self.output_sizes
    }
}
