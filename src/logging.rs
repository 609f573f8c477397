use log::{debug, info};
use std::env;
use video_capabilities::RecorderVideoCapabilities;

pub fn init() {
    if env::var_os("RUST_LOG").is_none() {
        env::set_var("RUST_LOG", "info");
    }
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}

pub fn log_capabilities(capabilities: &RecorderVideoCapabilities) {
    let summary = capabilities.summary();
    info!(
        "Device '{}' supports {} dynamic range(s):",
        summary.device,
        summary.dynamic_ranges.len()
    );
    for range in &summary.dynamic_ranges {
        let qualities = range
            .qualities
            .iter()
            .map(|entry| format!("{}={}", entry.quality, entry.resolution))
            .collect::<Vec<_>>()
            .join(", ");
        info!("  {:<22} {}", range.dynamic_range.to_string(), qualities);
        for entry in &range.qualities {
            let video = entry.profiles.default_video_profile();
            debug!(
                "    {} {} {}bps @{}fps",
                entry.quality, video.codec, video.bitrate, video.frame_rate
            );
        }
    }
}
