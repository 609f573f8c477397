//! Per dynamic range index from quality tier to validated encoder profiles.

use crate::device::EncoderProfilesProvider;
use crate::profiles::{Size, ValidatedEncoderProfiles};
use crate::quality::Quality;
use log::trace;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CapabilitiesByQuality {
    // Highest tier first.
    entries: Vec<(Quality, ValidatedEncoderProfiles)>,
}

impl CapabilitiesByQuality {
    /// Indexes every real tier `provider` has usable profiles for.
    pub fn new(provider: &dyn EncoderProfilesProvider) -> Self {
        let entries = Quality::SORTED
            .iter()
            .filter_map(|quality| {
                let profiles = provider.get(*quality)?;
                match ValidatedEncoderProfiles::from_profiles(profiles) {
                    Some(validated) => Some((*quality, validated)),
                    None => {
                        trace!("Quality {} has no video profile; skipping", quality);
                        None
                    }
                }
            })
            .collect();
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn supported_qualities(&self) -> Vec<Quality> {
        self.entries.iter().map(|(quality, _)| *quality).collect()
    }

    pub fn is_quality_supported(&self, quality: Quality) -> bool {
        self.profiles(quality).is_some()
    }

    pub fn profiles(&self, quality: Quality) -> Option<&ValidatedEncoderProfiles> {
        self.entries
            .iter()
            .find(|(candidate, _)| *candidate == quality)
            .map(|(_, profiles)| profiles)
    }

    /// Finds the supported profiles with the smallest resolution that is at least
    /// `size` in both dimensions. Equal areas resolve to the lower quality tier.
    pub fn find_nearest_higher_supported_profiles_for(
        &self,
        size: Size,
    ) -> Option<&ValidatedEncoderProfiles> {
        self.nearest_higher_entry(size).map(|(_, profiles)| profiles)
    }

    /// Like [`Self::find_nearest_higher_supported_profiles_for`], but returns
    /// [`Quality::None`] when no tier is large enough.
    pub fn find_nearest_higher_supported_quality_for(&self, size: Size) -> Quality {
        self.nearest_higher_entry(size)
            .map(|(quality, _)| *quality)
            .unwrap_or(Quality::None)
    }

    fn nearest_higher_entry(&self, size: Size) -> Option<&(Quality, ValidatedEncoderProfiles)> {
        self.entries
            .iter()
            .filter(|(_, profiles)| profiles.resolution().dominates(&size))
            .min_by_key(|(quality, profiles)| (profiles.resolution().area(), *quality))
    }
}

#[cfg(test)]
mod capabilities_tests {
    use super::*;
    use crate::profiles::{EncoderProfiles, HdrFormat, VideoCodec, VideoProfile};
    use crate::provider::ProfileTable;

    fn profiles(width: u32, height: u32) -> EncoderProfiles {
        EncoderProfiles::new(vec![VideoProfile {
            codec: VideoCodec::H264,
            bitrate: 5_000_000,
            frame_rate: 30,
            width,
            height,
            bit_depth: 8,
            hdr_format: HdrFormat::None,
        }])
    }

    fn index(entries: Vec<(Quality, EncoderProfiles)>) -> CapabilitiesByQuality {
        let table: ProfileTable = entries.into_iter().collect();
        CapabilitiesByQuality::new(&table)
    }

    fn fhd_hd() -> CapabilitiesByQuality {
        index(vec![
            (Quality::Hd, profiles(1280, 720)),
            (Quality::Fhd, profiles(1920, 1080)),
        ])
    }

    #[test]
    fn supported_qualities_highest_first() {
        let caps = fhd_hd();
        assert_eq!(caps.supported_qualities(), vec![Quality::Fhd, Quality::Hd]);
        assert!(caps.is_quality_supported(Quality::Hd));
        assert!(!caps.is_quality_supported(Quality::Uhd));
        assert!(!caps.is_quality_supported(Quality::None));
        assert_eq!(
            caps.profiles(Quality::Fhd).map(|p| p.resolution()),
            Some(Size::new(1920, 1080))
        );
    }

    #[test]
    fn tiers_without_video_are_skipped() {
        let caps = index(vec![(Quality::Sd, EncoderProfiles::new(vec![]))]);
        assert!(caps.is_empty());
    }

    #[test]
    fn nearest_higher_picks_smallest_dominating_resolution() {
        let caps = fhd_hd();
        let cases = [
            (Size::new(640, 480), Quality::Hd),
            (Size::new(1280, 720), Quality::Hd),
            (Size::new(1281, 720), Quality::Fhd),
            (Size::new(1920, 1080), Quality::Fhd),
            (Size::new(1920, 1081), Quality::None),
            (Size::new(4000, 10), Quality::None),
        ];
        for (size, expected) in cases {
            assert_eq!(
                caps.find_nearest_higher_supported_quality_for(size),
                expected,
                "size {}",
                size
            );
            let profiles = caps.find_nearest_higher_supported_profiles_for(size);
            assert_eq!(profiles.is_none(), expected == Quality::None, "size {}", size);
            if let Some(profiles) = profiles {
                assert!(profiles.resolution().dominates(&size));
            }
        }
    }

    #[test]
    fn equal_area_resolves_to_lower_tier() {
        let caps = index(vec![
            (Quality::Hd, profiles(1920, 1080)),
            (Quality::Fhd, profiles(1920, 1080)),
        ]);
        assert_eq!(
            caps.find_nearest_higher_supported_quality_for(Size::new(1280, 720)),
            Quality::Hd
        );
    }

    #[test]
    fn dominance_beats_area() {
        // A wide tier with smaller area must not win when it is too short.
        let caps = index(vec![
            (Quality::Hd, profiles(2560, 600)),
            (Quality::Fhd, profiles(1920, 1080)),
        ]);
        assert_eq!(
            caps.find_nearest_higher_supported_quality_for(Size::new(1280, 720)),
            Quality::Fhd
        );
    }

    #[test]
    fn empty_index_answers_queries() {
        let caps = CapabilitiesByQuality::default();
        assert!(caps.supported_qualities().is_empty());
        assert!(caps
            .find_nearest_higher_supported_profiles_for(Size::new(1, 1))
            .is_none());
        assert_eq!(
            caps.find_nearest_higher_supported_quality_for(Size::new(1, 1)),
            Quality::None
        );
    }
}
