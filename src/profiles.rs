//! Encoder profile records reported by a device.

use crate::dynamic_range::{BitDepth, DynamicRange, Encoding};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumString};

/// Frame dimensions in pixels.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        (self.width as u64) * (self.height as u64)
    }

    /// True when this size is at least `other` in both dimensions.
    pub fn dominates(&self, other: &Size) -> bool {
        self.width >= other.width && self.height >= other.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let lower = input.trim().to_ascii_lowercase();
        let (width, height) = lower
            .split_once(['x', '*'])
            .ok_or_else(|| format!("Failed to parse size '{}': expected WIDTHxHEIGHT", input))?;
        let width: u32 = width
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse size '{}': invalid width", input))?;
        let height: u32 = height
            .trim()
            .parse()
            .map_err(|_| format!("Failed to parse size '{}': invalid height", input))?;
        if width == 0 || height == 0 {
            return Err(format!(
                "Failed to parse size '{}': dimensions must be positive",
                input
            ));
        }
        Ok(Size::new(width, height))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize)]
#[strum(ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    #[strum(to_string = "h264", serialize = "avc")]
    #[serde(alias = "avc")]
    H264,
    #[strum(to_string = "hevc", serialize = "h265")]
    #[serde(alias = "h265")]
    Hevc,
    #[strum(to_string = "vp9")]
    Vp9,
    #[strum(to_string = "av1")]
    Av1,
}

/// HDR transfer/metadata format carried by a video profile. `None` means SDR.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HdrFormat {
    #[default]
    None,
    Hlg,
    Hdr10,
    Hdr10Plus,
    DolbyVision,
}

impl HdrFormat {
    pub fn encoding(self) -> Encoding {
        match self {
            HdrFormat::None => Encoding::Sdr,
            HdrFormat::Hlg => Encoding::Hlg,
            HdrFormat::Hdr10 => Encoding::Hdr10,
            HdrFormat::Hdr10Plus => Encoding::Hdr10Plus,
            HdrFormat::DolbyVision => Encoding::DolbyVision,
        }
    }
}

fn default_bit_depth() -> u32 {
    8
}

fn default_frame_rate() -> u32 {
    30
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoProfile {
    pub codec: VideoCodec,
    /// Target bitrate in bits per second.
    pub bitrate: u32,
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
    pub width: u32,
    pub height: u32,
    #[serde(default = "default_bit_depth")]
    pub bit_depth: u32,
    #[serde(default)]
    pub hdr_format: HdrFormat,
}

impl VideoProfile {
    pub fn resolution(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// The fully specified range this profile records, if its bit depth is one we model.
    pub fn dynamic_range(&self) -> Option<DynamicRange> {
        let bit_depth = BitDepth::from_bits(self.bit_depth)?;
        Some(DynamicRange::new(self.hdr_format.encoding(), bit_depth))
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AudioCodec {
    Aac,
    HeAac,
    Opus,
    AmrNb,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioProfile {
    pub codec: AudioCodec,
    pub bitrate: u32,
    pub sample_rate: u32,
    pub channels: u32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    #[default]
    Mp4,
    Webm,
    ThreeGpp,
}

fn default_duration_seconds() -> u32 {
    30
}

/// All encoder configurations a device advertises for one quality tier.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncoderProfiles {
    #[serde(default = "default_duration_seconds")]
    pub default_duration_seconds: u32,
    #[serde(default)]
    pub recommended_file_format: FileFormat,
    #[serde(default)]
    pub audio_profiles: Vec<AudioProfile>,
    #[serde(default)]
    pub video_profiles: Vec<VideoProfile>,
}

impl EncoderProfiles {
    pub fn new(video_profiles: Vec<VideoProfile>) -> Self {
        Self {
            default_duration_seconds: default_duration_seconds(),
            recommended_file_format: FileFormat::default(),
            audio_profiles: Vec::new(),
            video_profiles,
        }
    }
}

/// Encoder profiles guaranteed to carry at least one video profile.
///
/// The first video profile is the default one and defines the resolution used
/// for size comparisons.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidatedEncoderProfiles {
    default_duration_seconds: u32,
    recommended_file_format: FileFormat,
    audio_profiles: Vec<AudioProfile>,
    video_profiles: Vec<VideoProfile>,
}

impl ValidatedEncoderProfiles {
    /// Returns `None` when `profiles` holds no video profile.
    pub fn from_profiles(profiles: EncoderProfiles) -> Option<Self> {
        if profiles.video_profiles.is_empty() {
            return None;
        }
        Some(Self {
            default_duration_seconds: profiles.default_duration_seconds,
            recommended_file_format: profiles.recommended_file_format,
            audio_profiles: profiles.audio_profiles,
            video_profiles: profiles.video_profiles,
        })
    }

    pub fn default_video_profile(&self) -> &VideoProfile {
        &self.video_profiles[0]
    }

    pub fn default_audio_profile(&self) -> Option<&AudioProfile> {
        self.audio_profiles.first()
    }

    pub fn video_profiles(&self) -> &[VideoProfile] {
        &self.video_profiles
    }

    pub fn audio_profiles(&self) -> &[AudioProfile] {
        &self.audio_profiles
    }

    pub fn default_duration_seconds(&self) -> u32 {
        self.default_duration_seconds
    }

    pub fn recommended_file_format(&self) -> FileFormat {
        self.recommended_file_format
    }

    pub fn resolution(&self) -> Size {
        self.default_video_profile().resolution()
    }
}
