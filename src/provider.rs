//! The provider chain: raw device profiles corrected, backfilled and filtered.
//!
//! The raw provider is read once into a [`ProfileTable`]. Each stage is a plain
//! function from table to table, applied in the fixed order of [`STAGES`]:
//!
//! 1. resolution correction, so later stages see the real geometry;
//! 2. HLG 10-bit backfill, so derived profiles are validated like native ones;
//! 3. resolution validity filter;
//! 4. quality validity filter.
//!
//! Narrowing to one dynamic range happens per query on top of the final table.

use crate::device::{DeviceInfo, EncoderProfilesProvider};
use crate::dynamic_range::{can_match, DynamicRange};
use crate::profiles::{EncoderProfiles, HdrFormat, Size, VideoCodec, VideoProfile};
use crate::quality::Quality;
use crate::quirks::DeviceQuirks;
use log::{debug, trace};
use std::collections::BTreeMap;

/// Vets a derived HDR profile. Returning `None` rejects it.
pub type BackupProfileValidator = Box<dyn Fn(VideoProfile) -> Option<VideoProfile> + Send + Sync>;

/// Accepts derived profiles with positive geometry and bitrate.
pub fn default_backup_validator() -> BackupProfileValidator {
    Box::new(|profile: VideoProfile| {
        if profile.width > 0 && profile.height > 0 && profile.bitrate > 0 {
            Some(profile)
        } else {
            None
        }
    })
}

/// Quality tier to encoder profiles, ordered by tier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProfileTable {
    entries: BTreeMap<Quality, EncoderProfiles>,
}

impl ProfileTable {
    /// Reads every real tier from `provider`.
    pub fn snapshot(provider: &dyn EncoderProfilesProvider) -> Self {
        let entries = Quality::SORTED
            .iter()
            .filter_map(|quality| provider.get(*quality).map(|profiles| (*quality, profiles)))
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn qualities(&self) -> impl Iterator<Item = Quality> + '_ {
        self.entries.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Quality, &EncoderProfiles)> + '_ {
        self.entries.iter().map(|(quality, profiles)| (*quality, profiles))
    }

    /// Keeps only the video profiles `dynamic_range` can match; tiers left with
    /// no video profile are dropped.
    pub fn matching(&self, dynamic_range: &DynamicRange) -> ProfileTable {
        let entries = self
            .entries
            .iter()
            .filter_map(|(quality, profiles)| {
                let video_profiles: Vec<VideoProfile> = profiles
                    .video_profiles
                    .iter()
                    .filter(|video| {
                        video
                            .dynamic_range()
                            .is_some_and(|range| can_match(dynamic_range, &range))
                    })
                    .cloned()
                    .collect();
                if video_profiles.is_empty() {
                    return None;
                }
                Some((
                    *quality,
                    EncoderProfiles {
                        video_profiles,
                        ..profiles.clone()
                    },
                ))
            })
            .collect();
        Self { entries }
    }
}

impl FromIterator<(Quality, EncoderProfiles)> for ProfileTable {
    fn from_iter<T: IntoIterator<Item = (Quality, EncoderProfiles)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl EncoderProfilesProvider for ProfileTable {
    fn get(&self, quality: Quality) -> Option<EncoderProfiles> {
        self.entries.get(&quality).cloned()
    }
}

/// Everything the stages read besides the table itself.
pub struct StageContext<'a> {
    pub quirks: &'a DeviceQuirks,
    pub output_sizes: &'a [Size],
    pub hlg10_supported: bool,
    pub validator: &'a BackupProfileValidator,
}

pub type Stage = fn(ProfileTable, &StageContext<'_>) -> ProfileTable;

pub const STAGES: [(&str, Stage); 4] = [
    ("resolution correction", correct_resolutions),
    ("hlg10 backfill", backfill_hlg10),
    ("resolution validation", validate_resolutions),
    ("quality validation", validate_qualities),
];

fn correct_resolutions(table: ProfileTable, ctx: &StageContext<'_>) -> ProfileTable {
    table
        .entries
        .into_iter()
        .map(|(quality, mut profiles)| {
            if let Some(size) = ctx.quirks.resolution_override(quality) {
                debug!("Rebinding quality {} to {}", quality, size);
                for video in profiles.video_profiles.iter_mut() {
                    video.width = size.width;
                    video.height = size.height;
                }
            }
            (quality, profiles)
        })
        .collect()
}

fn backfill_hlg10(table: ProfileTable, ctx: &StageContext<'_>) -> ProfileTable {
    if !ctx.hlg10_supported {
        return table;
    }

    table
        .entries
        .into_iter()
        .map(|(quality, mut profiles)| {
            if let Some(derived) = derive_hlg10_profile(&profiles.video_profiles) {
                match (ctx.validator)(derived) {
                    Some(validated) => {
                        debug!(
                            "Added backup HLG 10-bit profile {} for quality {}",
                            validated.resolution(),
                            quality
                        );
                        profiles.video_profiles.push(validated);
                    }
                    None => debug!("Backup HLG 10-bit profile rejected for quality {}", quality),
                }
            }
            (quality, profiles)
        })
        .collect()
}

/// Derives an HLG 10-bit profile from the first SDR profile, unless one exists already.
fn derive_hlg10_profile(video_profiles: &[VideoProfile]) -> Option<VideoProfile> {
    let has_hlg10 = video_profiles
        .iter()
        .any(|video| video.dynamic_range() == Some(DynamicRange::HLG_10_BIT));
    if has_hlg10 {
        return None;
    }

    let base = video_profiles
        .iter()
        .find(|video| video.dynamic_range() == Some(DynamicRange::SDR))?;
    Some(VideoProfile {
        codec: VideoCodec::Hevc,
        bitrate: scale_bitrate(base.bitrate, base.bit_depth, 10),
        frame_rate: base.frame_rate,
        width: base.width,
        height: base.height,
        bit_depth: 10,
        hdr_format: HdrFormat::Hlg,
    })
}

fn scale_bitrate(bitrate: u32, from_bit_depth: u32, to_bit_depth: u32) -> u32 {
    if from_bit_depth == 0 {
        return bitrate;
    }
    let scaled = (bitrate as u64) * (to_bit_depth as u64) / (from_bit_depth as u64);
    u32::try_from(scaled).unwrap_or(u32::MAX)
}

fn validate_resolutions(table: ProfileTable, ctx: &StageContext<'_>) -> ProfileTable {
    table
        .entries
        .into_iter()
        .filter(|(quality, profiles)| {
            let Some(video) = profiles.video_profiles.first() else {
                return true;
            };
            let size = video.resolution();
            let supported = !ctx.quirks.is_resolution_unsupported(&size)
                && (ctx.output_sizes.is_empty() || ctx.output_sizes.contains(&size));
            if !supported {
                debug!("Dropping quality {}: resolution {} unsupported", quality, size);
            }
            supported
        })
        .collect()
}

fn validate_qualities(table: ProfileTable, ctx: &StageContext<'_>) -> ProfileTable {
    table
        .entries
        .into_iter()
        .filter(|(quality, _)| {
            let invalid = ctx.quirks.is_quality_invalid(*quality);
            if invalid {
                debug!("Dropping quality {}: marked invalid by device quirks", quality);
            }
            !invalid
        })
        .collect()
}

/// True when the device itself declares HLG 10-bit support.
pub fn is_hlg10_supported_by_device(device: &dyn DeviceInfo) -> bool {
    device
        .supported_dynamic_ranges()
        .contains(&DynamicRange::HLG_10_BIT)
}

/// The corrected and validated view of a device's encoder profiles.
#[derive(Clone, Debug)]
pub struct ProviderChain {
    table: ProfileTable,
}

impl ProviderChain {
    pub fn build(
        device: &dyn DeviceInfo,
        provider: &dyn EncoderProfilesProvider,
        validator: &BackupProfileValidator,
    ) -> Self {
        let ctx = StageContext {
            quirks: device.quirks(),
            output_sizes: device.output_sizes(),
            hlg10_supported: is_hlg10_supported_by_device(device),
            validator,
        };
        Self::from_table(ProfileTable::snapshot(provider), &ctx)
    }

    pub fn from_table(raw: ProfileTable, ctx: &StageContext<'_>) -> Self {
        let table = STAGES.iter().fold(raw, |table, (name, stage)| {
            let before = table.len();
            let table = stage(table, ctx);
            trace!("Stage '{}': {} -> {} qualities", name, before, table.len());
            table
        });
        Self { table }
    }

    pub fn table(&self) -> &ProfileTable {
        &self.table
    }

    /// The per-query view restricted to `dynamic_range`.
    pub fn narrow(&self, dynamic_range: &DynamicRange) -> ProfileTable {
        self.table.matching(dynamic_range)
    }
}
