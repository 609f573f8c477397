pub mod cache;
pub mod capabilities;
pub mod device;
pub mod dynamic_range;
pub mod error;
pub mod profiles;
pub mod provider;
pub mod quality;
pub mod quirks;
pub mod recorder;

pub use capabilities::CapabilitiesByQuality;
pub use device::{DeviceDescription, DeviceInfo, EncoderProfilesProvider};
pub use dynamic_range::{can_resolve, is_fully_specified, BitDepth, DynamicRange, Encoding};
pub use error::CapabilityInfoUnavailable;
pub use profiles::{Size, ValidatedEncoderProfiles, VideoProfile};
pub use provider::{default_backup_validator, BackupProfileValidator};
pub use quality::Quality;
pub use recorder::RecorderVideoCapabilities;
