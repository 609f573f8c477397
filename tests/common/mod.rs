#![allow(dead_code)]

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;
use video_capabilities::DeviceDescription;

/// SDR 8-bit only, FHD and HD.
pub const SDR_DEVICE: &str = r#"
name = "sdr camera"
supported_dynamic_ranges = ["sdr/8"]
stabilization_supported = false

[[profiles]]
quality = "fhd"
[[profiles.video_profiles]]
codec = "h264"
bitrate = 17000000
width = 1920
height = 1080

[[profiles]]
quality = "hd"
[[profiles.audio_profiles]]
codec = "aac"
bitrate = 128000
sample_rate = 48000
channels = 2
[[profiles.video_profiles]]
codec = "h264"
bitrate = 12000000
width = 1280
height = 720
"#;

/// SDR at FHD and HD, plus a native HLG 10-bit profile at FHD only.
pub const HLG_DEVICE: &str = r#"
name = "hlg camera"
supported_dynamic_ranges = ["sdr/8", "hlg/10"]
stabilization_supported = true

[[profiles]]
quality = "fhd"
[[profiles.video_profiles]]
codec = "h264"
bitrate = 17000000
width = 1920
height = 1080
[[profiles.video_profiles]]
codec = "hevc"
bitrate = 20000000
width = 1920
height = 1080
bit_depth = 10
hdr_format = "hlg"

[[profiles]]
quality = "hd"
[[profiles.video_profiles]]
codec = "h264"
bitrate = 12000000
width = 1280
height = 720
"#;

/// Every tier, with quirks that rebind FHD and invalidate UHD.
pub const QUIRKY_DEVICE: &str = r#"
name = "quirky camera"
supported_dynamic_ranges = ["sdr/8", "hdr10/10"]

[quirks]
invalid_qualities = ["uhd"]
unsupported_resolutions = [{ width = 720, height = 480 }]
resolution_overrides = [{ quality = "fhd", width = 1920, height = 1088 }]

[[profiles]]
quality = "uhd"
[[profiles.video_profiles]]
codec = "hevc"
bitrate = 40000000
width = 3840
height = 2160

[[profiles]]
quality = "fhd"
[[profiles.video_profiles]]
codec = "h264"
bitrate = 17000000
width = 1920
height = 1080
[[profiles.video_profiles]]
codec = "hevc"
bitrate = 20000000
width = 1920
height = 1080
bit_depth = 10
hdr_format = "hdr10"

[[profiles]]
quality = "sd"
[[profiles.video_profiles]]
codec = "h264"
bitrate = 3000000
width = 720
height = 480
"#;

pub fn device(body: &str) -> DeviceDescription {
    DeviceDescription::from_toml_str(body).expect("fixture device parses")
}

pub fn write_device(tmp: &TempDir, name: &str, body: &str) -> PathBuf {
    let path = tmp.path().join(name);
    let mut f = File::create(&path).expect("create device file");
    f.write_all(body.as_bytes()).expect("write device file");
    path
}
