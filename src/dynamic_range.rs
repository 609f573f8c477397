//! Dynamic range descriptors and the wildcard matching rules used to resolve them.
//!
//! A [`DynamicRange`] pairs an [`Encoding`] with a [`BitDepth`]. Either field may
//! be a wildcard (`Unspecified`, or `HdrUnspecified` for the encoding), in which
//! case the descriptor is only meaningful once it is resolved against the fully
//! specified ranges a device actually reports.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum_macros::{Display, EnumIter, EnumString};

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum Encoding {
    #[strum(to_string = "unspecified", serialize = "any")]
    Unspecified,
    #[strum(to_string = "hdr-unspecified", serialize = "hdr")]
    HdrUnspecified,
    #[strum(to_string = "sdr")]
    Sdr,
    #[strum(to_string = "hlg")]
    Hlg,
    #[strum(to_string = "hdr10")]
    Hdr10,
    #[strum(to_string = "hdr10-plus", serialize = "hdr10+")]
    Hdr10Plus,
    #[strum(to_string = "dolby-vision", serialize = "dv")]
    DolbyVision,
}

impl Encoding {
    /// Bit depth assumed when a descriptor names only the encoding, e.g. `"hlg"`.
    fn implied_bit_depth(self) -> BitDepth {
        match self {
            Encoding::Unspecified | Encoding::HdrUnspecified => BitDepth::Unspecified,
            Encoding::Sdr => BitDepth::Bit8,
            Encoding::Hlg | Encoding::Hdr10 | Encoding::Hdr10Plus | Encoding::DolbyVision => {
                BitDepth::Bit10
            }
        }
    }
}

#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumString, EnumIter,
)]
#[strum(ascii_case_insensitive)]
pub enum BitDepth {
    #[strum(to_string = "unspecified", serialize = "any")]
    Unspecified,
    #[strum(to_string = "8", serialize = "8-bit", serialize = "8bit")]
    Bit8,
    #[strum(to_string = "10", serialize = "10-bit", serialize = "10bit")]
    Bit10,
}

impl BitDepth {
    /// Maps a raw per-component bit count onto a concrete depth.
    pub fn from_bits(bits: u32) -> Option<BitDepth> {
        match bits {
            8 => Some(BitDepth::Bit8),
            10 => Some(BitDepth::Bit10),
            _ => None,
        }
    }
}

/// Encoding plus bit depth of a video signal.
///
/// Equality, hashing and ordering are structural. The text form is
/// `"<encoding>/<bit depth>"`, e.g. `"hlg/10"` or `"hdr-unspecified/unspecified"`;
/// a bare encoding such as `"sdr"` takes the bit depth that encoding implies.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DynamicRange {
    pub encoding: Encoding,
    pub bit_depth: BitDepth,
}

impl DynamicRange {
    pub const UNSPECIFIED: DynamicRange =
        DynamicRange::new(Encoding::Unspecified, BitDepth::Unspecified);
    pub const SDR: DynamicRange = DynamicRange::new(Encoding::Sdr, BitDepth::Bit8);
    pub const HDR_UNSPECIFIED_10_BIT: DynamicRange =
        DynamicRange::new(Encoding::HdrUnspecified, BitDepth::Bit10);
    pub const HLG_10_BIT: DynamicRange = DynamicRange::new(Encoding::Hlg, BitDepth::Bit10);
    pub const HDR10_10_BIT: DynamicRange = DynamicRange::new(Encoding::Hdr10, BitDepth::Bit10);
    pub const HDR10_PLUS_10_BIT: DynamicRange =
        DynamicRange::new(Encoding::Hdr10Plus, BitDepth::Bit10);
    pub const DOLBY_VISION_8_BIT: DynamicRange =
        DynamicRange::new(Encoding::DolbyVision, BitDepth::Bit8);
    pub const DOLBY_VISION_10_BIT: DynamicRange =
        DynamicRange::new(Encoding::DolbyVision, BitDepth::Bit10);

    pub const fn new(encoding: Encoding, bit_depth: BitDepth) -> Self {
        Self {
            encoding,
            bit_depth,
        }
    }

    /// True when neither field is a wildcard. `HdrUnspecified` counts as a wildcard.
    pub fn is_fully_specified(&self) -> bool {
        is_fully_specified(self)
    }
}

impl fmt::Display for DynamicRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.encoding, self.bit_depth)
    }
}

impl FromStr for DynamicRange {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let normalized = input.trim();
        if normalized.is_empty() {
            return Err("Dynamic range value cannot be empty".to_string());
        }

        let (encoding_part, depth_part) = match normalized.split_once('/') {
            Some((encoding, depth)) => (encoding.trim(), Some(depth.trim())),
            None => (normalized, None),
        };

        let encoding = Encoding::from_str(encoding_part).map_err(|_| {
            format!(
                "Failed to parse dynamic range '{}': unknown encoding '{}'",
                input, encoding_part
            )
        })?;
        let bit_depth = match depth_part {
            Some(depth) => BitDepth::from_str(depth).map_err(|_| {
                format!(
                    "Failed to parse dynamic range '{}': unknown bit depth '{}'",
                    input, depth
                )
            })?,
            None => encoding.implied_bit_depth(),
        };

        Ok(DynamicRange::new(encoding, bit_depth))
    }
}

impl TryFrom<String> for DynamicRange {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DynamicRange> for String {
    fn from(value: DynamicRange) -> Self {
        value.to_string()
    }
}

pub fn is_fully_specified(dynamic_range: &DynamicRange) -> bool {
    dynamic_range.encoding != Encoding::Unspecified
        && dynamic_range.encoding != Encoding::HdrUnspecified
        && dynamic_range.bit_depth != BitDepth::Unspecified
}

/// Returns true if `to_test` resolves to at least one of `fully_specified`.
///
/// A fully specified `to_test` must appear literally in the set. Otherwise each
/// wildcard field matches the corresponding field of some candidate, with
/// `HdrUnspecified` matching any encoding except SDR.
///
/// # Panics
///
/// Panics if a candidate consulted for wildcard matching is not fully specified.
pub fn can_resolve<'a, I>(to_test: &DynamicRange, fully_specified: I) -> bool
where
    I: IntoIterator<Item = &'a DynamicRange>,
{
    if is_fully_specified(to_test) {
        fully_specified
            .into_iter()
            .any(|candidate| candidate == to_test)
    } else {
        fully_specified
            .into_iter()
            .any(|candidate| can_match(to_test, candidate))
    }
}

/// Field-wise wildcard match of `to_test` against one fully specified range.
pub(crate) fn can_match(to_test: &DynamicRange, fully_specified: &DynamicRange) -> bool {
    can_match_bit_depth(to_test, fully_specified) && can_match_encoding(to_test, fully_specified)
}

fn can_match_bit_depth(to_test: &DynamicRange, fully_specified: &DynamicRange) -> bool {
    assert!(
        is_fully_specified(fully_specified),
        "Fully specified range {} is not actually fully specified.",
        fully_specified
    );
    if to_test.bit_depth == BitDepth::Unspecified {
        return true;
    }

    to_test.bit_depth == fully_specified.bit_depth
}

fn can_match_encoding(to_test: &DynamicRange, fully_specified: &DynamicRange) -> bool {
    assert!(
        is_fully_specified(fully_specified),
        "Fully specified range {} is not actually fully specified.",
        fully_specified
    );
    match to_test.encoding {
        Encoding::Unspecified => true,
        Encoding::HdrUnspecified if fully_specified.encoding != Encoding::Sdr => true,
        encoding => encoding == fully_specified.encoding,
    }
}
