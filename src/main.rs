use anyhow::{bail, Context, Result};
use clap::parser::ValueSource;
use clap::{value_parser, ArgGroup, ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use video_capabilities::{
    DeviceDescription, DynamicRange, Quality, RecorderVideoCapabilities, Size,
    ValidatedEncoderProfiles,
};

mod config;
mod logging;

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Parser, Clone)]
#[command(author, version, about, long_about = None)]
#[command(group(
    ArgGroup::new("query")
        .args(["list_ranges", "list_qualities", "quality", "nearest"])
        .multiple(false)
))]
struct Args {
    /// Device description (TOML) to resolve capabilities for
    #[arg(value_parser = value_parser!(PathBuf))]
    device_file: Option<PathBuf>,

    /// Path to the configuration file
    #[arg(short, long, value_parser = value_parser!(PathBuf))]
    config_file: Option<PathBuf>,

    /// Dynamic range to query, e.g. sdr, hlg/10, hdr-unspecified/10 (defaults to sdr/8)
    #[arg(
        short,
        long = "dynamic-range",
        value_parser = Args::parse_dynamic_range,
        id = "dynamic_range"
    )]
    dynamic_range: Option<DynamicRange>,

    /// Print the fully specified dynamic ranges the device supports and exit
    #[arg(long = "list-ranges", default_value_t = false, id = "list_ranges")]
    list_ranges: bool,

    /// Print the supported qualities for the dynamic range and exit
    #[arg(long = "list-qualities", default_value_t = false, id = "list_qualities")]
    list_qualities: bool,

    /// Print the encoder profiles for a quality (sd, hd, fhd, uhd)
    #[arg(short, long, value_enum, id = "quality")]
    quality: Option<Quality>,

    /// Find the smallest supported profile at least WIDTHxHEIGHT in size
    #[arg(long, value_parser = Args::parse_size, value_name = "WIDTHxHEIGHT", id = "nearest")]
    nearest: Option<Size>,

    /// Output format: text|json
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, id = "output")]
    output: OutputFormat,
}

impl Args {
    fn parse_dynamic_range(input: &str) -> Result<DynamicRange, String> {
        input.parse()
    }

    fn parse_size(input: &str) -> Result<Size, String> {
        input.parse()
    }
}

fn cli_value_provided(matches: &ArgMatches, id: &str) -> bool {
    matches
        .value_source(id)
        .is_some_and(|src| matches!(src, ValueSource::CommandLine))
}

fn apply_config_overrides(args: &mut Args, cfg: &config::Config, matches: &ArgMatches) {
    if args.device_file.is_none() {
        if let Some(device_file) = cfg.device_file.as_ref() {
            args.device_file = Some(device_file.clone());
        }
    }

    if args.dynamic_range.is_none() {
        if let Some(dynamic_range) = cfg.dynamic_range {
            args.dynamic_range = Some(dynamic_range);
        }
    }

    if !cli_value_provided(matches, "output") {
        if let Some(output) = cfg.output {
            args.output = output;
        }
    }
}

#[derive(Serialize)]
struct JsonRanges {
    device: String,
    stabilization_supported: bool,
    dynamic_ranges: Vec<DynamicRange>,
}

#[derive(Serialize)]
struct JsonQualities {
    dynamic_range: DynamicRange,
    qualities: Vec<Quality>,
}

#[derive(Serialize)]
struct JsonProfiles {
    dynamic_range: DynamicRange,
    quality: Quality,
    supported: bool,
    profiles: Option<ValidatedEncoderProfiles>,
}

#[derive(Serialize)]
struct JsonNearest {
    dynamic_range: DynamicRange,
    requested: Size,
    quality: Quality,
    profiles: Option<ValidatedEncoderProfiles>,
}

fn describe_profiles(profiles: &ValidatedEncoderProfiles) -> String {
    let video = profiles.default_video_profile();
    let container = format!("{:?}", profiles.recommended_file_format()).to_ascii_lowercase();
    let mut line = format!(
        "{} {} {} {}bps @{}fps, {}-bit {:?}",
        profiles.resolution(),
        video.codec,
        container,
        video.bitrate,
        video.frame_rate,
        video.bit_depth,
        video.hdr_format
    );
    if let Some(audio) = profiles.default_audio_profile() {
        line.push_str(&format!(
            ", audio {:?} {}bps {}Hz x{}",
            audio.codec, audio.bitrate, audio.sample_rate, audio.channels
        ));
    }
    line
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("Failed to render JSON output")?;
    println!("{}", rendered);
    Ok(())
}

fn main() -> Result<()> {
    logging::init();

    let matches = Args::command().get_matches();
    let mut args = Args::from_arg_matches(&matches)?;

    let loaded_config = config::load(args.config_file.as_deref())?;
    if let Some((cfg, source)) = &loaded_config {
        match source {
            config::ConfigSource::Env(path) => {
                info!(
                    "Loaded configuration from '{}' (via {}).",
                    path.display(),
                    config::CONFIG_ENV_VAR
                );
            }
            other => {
                info!("Loaded configuration from '{}'.", other.path().display());
            }
        }
        apply_config_overrides(&mut args, cfg, &matches);
    }

    let Some(device_file) = args.device_file.as_ref() else {
        bail!("<DEVICE_FILE> is required (pass it directly or set device_file in the config)");
    };

    let device = DeviceDescription::load(device_file)?;
    let capabilities = RecorderVideoCapabilities::from_device(&device).with_context(|| {
        format!(
            "Failed to build video capabilities from '{}'",
            device_file.display()
        )
    })?;
    logging::log_capabilities(&capabilities);

    let dynamic_range = args.dynamic_range.unwrap_or(DynamicRange::SDR);
    debug!("Querying dynamic range {}", dynamic_range);

    run_query(&args, &capabilities, dynamic_range)
}

fn run_query(
    args: &Args,
    capabilities: &RecorderVideoCapabilities,
    dynamic_range: DynamicRange,
) -> Result<()> {
    let json = matches!(args.output, OutputFormat::Json);

    if args.list_ranges {
        let dynamic_ranges: Vec<DynamicRange> =
            capabilities.supported_dynamic_ranges().into_iter().collect();
        if json {
            return print_json(&JsonRanges {
                device: capabilities.device_name().to_string(),
                stabilization_supported: capabilities.is_stabilization_supported(),
                dynamic_ranges,
            });
        }
        for range in dynamic_ranges {
            println!("{}", range);
        }
        return Ok(());
    }

    if args.list_qualities {
        let qualities = capabilities.supported_qualities(&dynamic_range);
        if json {
            return print_json(&JsonQualities {
                dynamic_range,
                qualities,
            });
        }
        for quality in qualities {
            println!("{}", quality);
        }
        return Ok(());
    }

    if let Some(quality) = args.quality {
        let profiles = capabilities.profiles(quality, &dynamic_range);
        if json {
            return print_json(&JsonProfiles {
                dynamic_range,
                quality,
                supported: profiles.is_some(),
                profiles,
            });
        }
        match profiles {
            Some(profiles) => {
                println!("{} {}: {}", dynamic_range, quality, describe_profiles(&profiles))
            }
            None => println!("{} {}: unsupported", dynamic_range, quality),
        }
        return Ok(());
    }

    if let Some(size) = args.nearest {
        let quality = capabilities.find_nearest_higher_supported_quality_for(size, &dynamic_range);
        let profiles =
            capabilities.find_nearest_higher_supported_profiles_for(size, &dynamic_range);
        if json {
            return print_json(&JsonNearest {
                dynamic_range,
                requested: size,
                quality,
                profiles,
            });
        }
        match profiles {
            Some(profiles) => {
                println!("{} -> {}: {}", size, quality, describe_profiles(&profiles))
            }
            None => println!("{} -> {}", size, quality),
        }
        return Ok(());
    }

    if json {
        return print_json(&capabilities.summary());
    }

    let summary = capabilities.summary();
    println!("Device: {}", summary.device);
    println!(
        "Stabilization: {}",
        if summary.stabilization_supported {
            "supported"
        } else {
            "unsupported"
        }
    );
    for range in &summary.dynamic_ranges {
        println!("{}:", range.dynamic_range);
        for entry in &range.qualities {
            println!("  {:<4} {}", entry.quality, describe_profiles(&entry.profiles));
        }
    }
    Ok(())
}
