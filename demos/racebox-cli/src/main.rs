use std::fs;
use std::io::{self, IsTerminal, Read, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use log::{debug, info, warn};
use racebox::{
    constants::{CONFIG_MSG_ID, RACEBOX_CLASS, TELEMETRY_MSG_ID, TELEMETRY_PAYLOAD_LEN},
    validate_frame, ConfigurationRequest, Decoder, DeviceKind, PlatformModel, TelemetryRecord,
};
use rand::{rngs::StdRng, SeedableRng};

mod report;

use report::Report;

#[derive(Parser, Debug)]
#[command(name = "racebox-cli")]
#[command(version)]
#[command(
    about = "Decode RaceBox telemetry captures and build configuration frames.",
    long_about = None,
    after_help = "Examples:\n  racebox-cli decode capture.bin --device \"RaceBox Mini S 1221405020\"\n  racebox-cli simulate --count 10 --seed 7 | racebox-cli decode - --format json\n  racebox-cli config --platform pedestrian --speed-3d"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Decode a raw byte capture of the device's notification stream
    Decode {
        /// Capture file, `-` for stdin
        #[arg(default_value = "-")]
        input: PathBuf,

        /// Feed the decoder this many bytes at a time, like BLE notifications would
        #[arg(long, default_value_t = 20, value_parser = clap::value_parser!(u16).range(1..))]
        chunk_size: u16,

        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Advertised device name, used to interpret the battery byte
        #[arg(long)]
        device: Option<String>,
    },
    /// Print the configuration frame for the given settings
    Config {
        /// Dynamic platform model, by name or number
        #[arg(long, default_value = "automotive", value_parser = parse_platform)]
        platform: PlatformModel,

        /// Report 3D speed instead of ground speed
        #[arg(long)]
        speed_3d: bool,

        /// Minimum horizontal accuracy, m. 0 disables the check
        #[arg(long, default_value_t = 0)]
        min_accuracy: u8,
    },
    /// Write simulated telemetry frames
    Simulate {
        #[arg(long, default_value_t = 1)]
        count: u32,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,

        /// One hex frame per line instead of raw bytes
        #[arg(long)]
        hex: bool,
    },
    /// Validate a single frame given as hex
    Check {
        /// Frame bytes; whitespace, `-` and `:` separators are ignored
        frame: String,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
    Text,
    /// One JSON object per line
    Json,
}

fn main() -> ExitCode {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_env("RUST_LOG")
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Decode {
            input,
            chunk_size,
            format,
            device,
        } => cmd_decode(&input, usize::from(chunk_size), format, device.as_deref()),
        Commands::Config {
            platform,
            speed_3d,
            min_accuracy,
        } => cmd_config(ConfigurationRequest {
            platform,
            enable_3d_speed: speed_3d,
            min_horizontal_accuracy: min_accuracy,
        }),
        Commands::Simulate { count, seed, hex } => cmd_simulate(count, seed, hex),
        Commands::Check { frame } => cmd_check(&frame),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        },
    }
}

fn parse_platform(value: &str) -> Result<PlatformModel, String> {
    if let Ok(raw) = value.parse::<u8>() {
        return PlatformModel::try_from(raw).map_err(|raw| format!("unknown platform model {raw}"));
    }
    PlatformModel::ALL
        .into_iter()
        .find(|model| model.to_string().eq_ignore_ascii_case(value))
        .ok_or_else(|| {
            let names: Vec<String> = PlatformModel::ALL.iter().map(|m| m.to_string()).collect();
            format!("unknown platform model '{value}', expected one of: {}", names.join(", "))
        })
}

fn read_input(input: &Path) -> Result<Vec<u8>> {
    if input.as_os_str() == "-" {
        let mut data = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut data)
            .context("failed to read stdin")?;
        Ok(data)
    } else {
        fs::read(input).with_context(|| format!("failed to read {}", input.display()))
    }
}

fn cmd_decode(input: &Path, chunk_size: usize, format: Format, device: Option<&str>) -> Result<()> {
    let data = read_input(input)?;
    let kind = device.map_or(DeviceKind::Unrecognized, DeviceKind::from_name);
    if let (Some(name), DeviceKind::Unrecognized) = (device, kind) {
        warn!("'{name}' is not a known RaceBox name, battery byte left uninterpreted");
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let mut decoder = Decoder::default();
    for chunk in data.chunks(chunk_size) {
        for frame in decoder.feed(chunk) {
            let report = Report::new(device, kind, &frame.decode());
            match format {
                Format::Text => writeln!(out, "{report}")?,
                Format::Json => {
                    serde_json::to_writer(&mut out, &report)?;
                    writeln!(out)?;
                },
            }
        }
    }
    out.flush()?;

    let stats = decoder.stats();
    info!(
        "{} frames from {} bytes, {} checksum errors, {} rejected headers, {} bytes skipped",
        stats.frames,
        data.len(),
        stats.checksum_errors,
        stats.rejected_headers,
        stats.skipped_bytes
    );
    if !decoder.is_buffer_empty() {
        warn!("{} trailing bytes do not form a complete frame", decoder.buffer_len());
    }
    Ok(())
}

fn cmd_config(request: ConfigurationRequest) -> Result<()> {
    debug!("{request:?}");
    println!("{}", to_hex(&request.into_packet_bytes()));
    Ok(())
}

fn cmd_simulate(count: u32, seed: Option<u64>, hex: bool) -> Result<()> {
    let stdout = io::stdout();
    ensure!(
        hex || !stdout.is_terminal(),
        "refusing to write binary frames to a terminal, pipe the output or pass --hex"
    );
    let mut rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut out = stdout.lock();
    for _ in 0..count {
        let packet = TelemetryRecord::simulated(&mut rng).to_packet_bytes();
        if hex {
            writeln!(out, "{}", to_hex(&packet))?;
        } else {
            out.write_all(&packet)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn cmd_check(frame: &str) -> Result<()> {
    let bytes = parse_hex(frame)?;
    let frame = validate_frame(&bytes).context("invalid frame")?;
    println!(
        "class {:#04x}, id {:#04x}, {} payload bytes, checksum ok",
        frame.class(),
        frame.msg_id(),
        frame.payload().len()
    );
    if frame.wire_len() < bytes.len() {
        warn!("{} bytes after the frame ignored", bytes.len() - frame.wire_len());
    }

    match (frame.class(), frame.msg_id()) {
        (RACEBOX_CLASS, TELEMETRY_MSG_ID) => {
            let payload: &[u8; TELEMETRY_PAYLOAD_LEN] = frame.payload().try_into().map_err(|_| {
                anyhow::anyhow!(
                    "telemetry payload is {} bytes, expected {TELEMETRY_PAYLOAD_LEN}",
                    frame.payload().len()
                )
            })?;
            let record = TelemetryRecord::from_payload(payload);
            println!("{}", Report::new(None, DeviceKind::Unrecognized, &record));
        },
        (RACEBOX_CLASS, CONFIG_MSG_ID) => {
            let request = ConfigurationRequest::try_from(frame).context("invalid configuration")?;
            println!(
                "configuration: platform {}, 3D speed {}, min accuracy {} m",
                request.platform,
                if request.enable_3d_speed { "on" } else { "off" },
                request.min_horizontal_accuracy
            );
        },
        _ => info!("not a RaceBox message"),
    }
    Ok(())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    let digits: Vec<u8> = text
        .bytes()
        .filter(|c| !c.is_ascii_whitespace() && *c != b'-' && *c != b':')
        .collect();
    if digits.len() % 2 != 0 {
        bail!("odd number of hex digits");
    }
    digits
        .chunks(2)
        .map(|pair| {
            let pair = std::str::from_utf8(pair).context("not a hex string")?;
            u8::from_str_radix(pair, 16).with_context(|| format!("'{pair}' is not a hex byte"))
        })
        .collect()
}
