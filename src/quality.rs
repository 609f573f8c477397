//! Discrete recording quality tiers.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Ordered resolution tier. `None` is the sentinel for "no matching tier" and
/// sorts below every real tier.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ValueEnum, Serialize, Deserialize,
)]
pub enum Quality {
    /// No supported tier.
    #[value(name = "none")]
    #[serde(rename = "none")]
    None,
    /// Standard definition, 480p class.
    #[value(name = "sd", alias = "480p")]
    #[serde(rename = "sd", alias = "480p")]
    Sd,
    /// High definition, 720p.
    #[value(name = "hd", alias = "720p")]
    #[serde(rename = "hd", alias = "720p")]
    Hd,
    /// Full HD, 1080p.
    #[value(name = "fhd", alias = "1080p", alias = "full-hd")]
    #[serde(rename = "fhd", alias = "1080p", alias = "full-hd")]
    Fhd,
    /// Ultra HD / 4K, 2160p.
    #[value(name = "uhd", alias = "2160p", alias = "4k")]
    #[serde(rename = "uhd", alias = "2160p", alias = "4k")]
    Uhd,
}

impl Quality {
    /// Real tiers, highest first. This is the order capability indexes are populated in.
    pub const SORTED: [Quality; 4] = [Quality::Uhd, Quality::Fhd, Quality::Hd, Quality::Sd];

    pub fn label(self) -> &'static str {
        match self {
            Quality::None => "none",
            Quality::Sd => "sd",
            Quality::Hd => "hd",
            Quality::Fhd => "fhd",
            Quality::Uhd => "uhd",
        }
    }
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
