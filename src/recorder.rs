//! The query surface over a device's recording capabilities.

use crate::cache::ResolutionCache;
use crate::capabilities::CapabilitiesByQuality;
use crate::device::DeviceInfo;
use crate::dynamic_range::{can_resolve, DynamicRange};
use crate::error::CapabilityInfoUnavailable;
use crate::profiles::{Size, ValidatedEncoderProfiles};
use crate::provider::{default_backup_validator, BackupProfileValidator, ProviderChain};
use crate::quality::Quality;
use log::{debug, info, warn};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

/// Recording capabilities of one device, grouped by dynamic range.
///
/// Fully specified ranges are indexed eagerly at construction, one entry per
/// range the device reports with at least one supported quality. Ranges with
/// wildcards are resolved on first query and memoized, including the outcome
/// that they cannot be resolved. The two key spaces never overlap.
///
/// Queries for unsupported ranges or qualities never fail: they answer with an
/// empty list, `false`, `None` or [`Quality::None`].
pub struct RecorderVideoCapabilities {
    device_name: String,
    chain: ProviderChain,
    fully_specified: BTreeMap<DynamicRange, Arc<CapabilitiesByQuality>>,
    non_fully_specified: ResolutionCache,
    stabilization_supported: bool,
}

impl RecorderVideoCapabilities {
    /// Builds capabilities with the default backup HDR profile validator.
    pub fn from_device(device: &dyn DeviceInfo) -> Result<Self, CapabilityInfoUnavailable> {
        Self::new(device, default_backup_validator())
    }

    /// Builds capabilities, vetting derived HDR profiles with `validator`.
    ///
    /// This scans every dynamic range the device reports and is meant to run
    /// once per device session.
    pub fn new(
        device: &dyn DeviceInfo,
        validator: BackupProfileValidator,
    ) -> Result<Self, CapabilityInfoUnavailable> {
        let provider = device.encoder_profiles_provider().ok_or_else(|| {
            CapabilityInfoUnavailable::new(device.name(), "no encoder profiles provider")
        })?;

        let chain = ProviderChain::build(device, provider, &validator);

        let mut fully_specified = BTreeMap::new();
        for dynamic_range in device.supported_dynamic_ranges() {
            if !dynamic_range.is_fully_specified() {
                warn!(
                    "Ignoring non fully specified dynamic range {} reported by '{}'",
                    dynamic_range,
                    device.name()
                );
                continue;
            }
            let narrowed = chain.narrow(&dynamic_range);
            let capabilities = CapabilitiesByQuality::new(&narrowed);
            if capabilities.is_empty() {
                debug!(
                    "No supported quality for {} on '{}'; leaving it out",
                    dynamic_range,
                    device.name()
                );
                continue;
            }
            fully_specified.insert(dynamic_range, Arc::new(capabilities));
        }

        let stabilization_supported = device.is_stabilization_supported();
        info!(
            "Video capabilities for '{}': {} dynamic range(s), stabilization {}",
            device.name(),
            fully_specified.len(),
            if stabilization_supported {
                "supported"
            } else {
                "unsupported"
            }
        );

        Ok(Self {
            device_name: device.name().to_string(),
            chain,
            fully_specified,
            non_fully_specified: ResolutionCache::new(),
            stabilization_supported,
        })
    }

    pub fn device_name(&self) -> &str {
        &self.device_name
    }

    pub fn supported_dynamic_ranges(&self) -> BTreeSet<DynamicRange> {
        self.fully_specified.keys().copied().collect()
    }

    pub fn supported_qualities(&self, dynamic_range: &DynamicRange) -> Vec<Quality> {
        self.capabilities(dynamic_range)
            .map(|capabilities| capabilities.supported_qualities())
            .unwrap_or_default()
    }

    pub fn is_quality_supported(&self, quality: Quality, dynamic_range: &DynamicRange) -> bool {
        self.capabilities(dynamic_range)
            .is_some_and(|capabilities| capabilities.is_quality_supported(quality))
    }

    pub fn is_stabilization_supported(&self) -> bool {
        self.stabilization_supported
    }

    pub fn profiles(
        &self,
        quality: Quality,
        dynamic_range: &DynamicRange,
    ) -> Option<ValidatedEncoderProfiles> {
        self.capabilities(dynamic_range)
            .and_then(|capabilities| capabilities.profiles(quality).cloned())
    }

    pub fn find_nearest_higher_supported_profiles_for(
        &self,
        size: Size,
        dynamic_range: &DynamicRange,
    ) -> Option<ValidatedEncoderProfiles> {
        self.capabilities(dynamic_range).and_then(|capabilities| {
            capabilities
                .find_nearest_higher_supported_profiles_for(size)
                .cloned()
        })
    }

    pub fn find_nearest_higher_supported_quality_for(
        &self,
        size: Size,
        dynamic_range: &DynamicRange,
    ) -> Quality {
        self.capabilities(dynamic_range)
            .map(|capabilities| capabilities.find_nearest_higher_supported_quality_for(size))
            .unwrap_or(Quality::None)
    }

    /// Serializable view of every supported range and its qualities.
    pub fn summary(&self) -> CapabilitiesSummary {
        let dynamic_ranges = self
            .fully_specified
            .iter()
            .map(|(dynamic_range, capabilities)| RangeSummary {
                dynamic_range: *dynamic_range,
                qualities: capabilities
                    .supported_qualities()
                    .into_iter()
                    .filter_map(|quality| {
                        capabilities.profiles(quality).map(|profiles| QualitySummary {
                            quality,
                            resolution: profiles.resolution(),
                            profiles: profiles.clone(),
                        })
                    })
                    .collect(),
            })
            .collect();
        CapabilitiesSummary {
            device: self.device_name.clone(),
            stabilization_supported: self.stabilization_supported,
            dynamic_ranges,
        }
    }

    fn capabilities(&self, dynamic_range: &DynamicRange) -> Option<Arc<CapabilitiesByQuality>> {
        if dynamic_range.is_fully_specified() {
            return self.fully_specified.get(dynamic_range).cloned();
        }

        self.non_fully_specified.get_or_build(dynamic_range, || {
            if !can_resolve(dynamic_range, self.fully_specified.keys()) {
                return None;
            }
            let narrowed = self.chain.narrow(dynamic_range);
            Some(CapabilitiesByQuality::new(&narrowed))
        })
    }
}

impl std::fmt::Debug for RecorderVideoCapabilities {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderVideoCapabilities")
            .field("device_name", &self.device_name)
            .field("supported_dynamic_ranges", &self.supported_dynamic_ranges())
            .field("cached_ranges", &self.non_fully_specified.len())
            .field("stabilization_supported", &self.stabilization_supported)
            .finish()
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct CapabilitiesSummary {
    pub device: String,
    pub stabilization_supported: bool,
    pub dynamic_ranges: Vec<RangeSummary>,
}

#[derive(Clone, Debug, Serialize)]
pub struct RangeSummary {
    pub dynamic_range: DynamicRange,
    pub qualities: Vec<QualitySummary>,
}

#[derive(Clone, Debug, Serialize)]
pub struct QualitySummary {
    pub quality: Quality,
    pub resolution: Size,
    pub profiles: ValidatedEncoderProfiles,
}
