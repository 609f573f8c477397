//! Device workarounds consumed by the provider chain.

use crate::profiles::Size;
use crate::quality::Quality;
use serde::Deserialize;

/// Rebinds a quality tier to the resolution the camera actually produces for it.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ResolutionOverride {
    pub quality: Quality,
    pub width: u32,
    pub height: u32,
}

impl ResolutionOverride {
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeviceQuirks {
    pub resolution_overrides: Vec<ResolutionOverride>,
    pub unsupported_resolutions: Vec<Size>,
    pub invalid_qualities: Vec<Quality>,
}

impl DeviceQuirks {
    pub fn resolution_override(&self, quality: Quality) -> Option<Size> {
        self.resolution_overrides
            .iter()
            .find(|entry| entry.quality == quality)
            .map(ResolutionOverride::size)
    }

    pub fn is_resolution_unsupported(&self, size: &Size) -> bool {
        self.unsupported_resolutions.contains(size)
    }

    pub fn is_quality_invalid(&self, quality: Quality) -> bool {
        self.invalid_qualities.contains(&quality)
    }
}
