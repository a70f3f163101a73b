//! `geobridge locate`: run one `getCurrentPosition` request.
//!
//! The request goes through the full plugin path against the simulated
//! permission platform and location SDK. Every envelope is printed to stdout
//! as one JSON line.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use clap::{Args, ValueEnum};
use tracing::{info, warn};

use geobridge::channel::{CallbackChannel, EnvelopeStatus};
use geobridge::permission::{Capability, PermissionPlatform};
use geobridge::plugin::{Command, LocationPlugin};
use geobridge::sdk::{FixCommon, LocationSource, PoiEntry, RawLocationEvent, SourceReading};
use geobridge::simulation::{Delivery, SimulatedClientFactory, SimulatedPlatform};

use crate::error::CliError;
use crate::runner::CliRunner;

/// Source of the scripted fix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// Satellite fix
    Gps,
    /// Cell/Wi-Fi fix
    Network,
    /// Cached offline fix
    Offline,
    /// Provider-side failure
    ServerError,
    /// Device had no connectivity
    NetworkException,
    /// No positioning source available
    CriteriaException,
}

impl From<SourceArg> for LocationSource {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Gps => LocationSource::Gps,
            SourceArg::Network => LocationSource::Network,
            SourceArg::Offline => LocationSource::Offline,
            SourceArg::ServerError => LocationSource::ServerError,
            SourceArg::NetworkException => LocationSource::NetworkException,
            SourceArg::CriteriaException => LocationSource::CriteriaException,
        }
    }
}

/// Arguments for `geobridge locate`.
#[derive(Debug, Args)]
pub struct LocateArgs {
    /// Refuse a capability in the grant dialog (repeatable)
    #[arg(long = "deny", value_name = "CAPABILITY")]
    deny: Vec<Capability>,

    /// Source type of the scripted fix
    #[arg(long, value_enum, default_value = "gps")]
    source: SourceArg,

    /// Latitude of the scripted fix in decimal degrees
    #[arg(long, default_value_t = 39.9, allow_negative_numbers = true)]
    latitude: f64,

    /// Longitude of the scripted fix in decimal degrees
    #[arg(long, default_value_t = 116.4, allow_negative_numbers = true)]
    longitude: f64,

    /// Accuracy radius in meters
    #[arg(long, default_value_t = 10.0)]
    radius: f64,

    /// Nearby point of interest as ID:NAME:RANK (repeatable, order kept)
    #[arg(long = "poi", value_name = "ID:NAME:RANK", value_parser = parse_poi)]
    pois: Vec<PoiEntry>,

    /// Read the raw event from a JSON file instead of the flags above
    #[arg(long, value_name = "FILE", conflicts_with_all = ["source", "latitude", "longitude", "radius", "pois"])]
    event: Option<PathBuf>,

    /// The SDK never answers; the request ends at its deadline
    #[arg(long)]
    silent: bool,

    /// Override the request deadline in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,
}

/// Parse `ID:NAME:RANK`. The name may itself contain colons.
pub fn parse_poi(value: &str) -> Result<PoiEntry, String> {
    let (id, rest) = value
        .split_once(':')
        .ok_or_else(|| format!("expected ID:NAME:RANK, got '{}'", value))?;
    let (name, rank) = rest
        .rsplit_once(':')
        .ok_or_else(|| format!("expected ID:NAME:RANK, got '{}'", value))?;
    let rank: f64 = rank
        .trim()
        .parse()
        .map_err(|_| format!("rank '{}' is not a number", rank))?;
    Ok(PoiEntry::new(id, name, rank))
}

/// Run the locate command.
pub fn run(args: LocateArgs, verbose: bool) -> Result<(), CliError> {
    let runner = CliRunner::new(verbose)?;
    runner.log_startup("locate");

    if args.timeout == Some(0) {
        return Err(CliError::InvalidArgument(
            "--timeout must be at least 1 second".to_string(),
        ));
    }

    let mut config = runner.config().to_plugin_config();
    if let Some(secs) = args.timeout {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }

    let event = match &args.event {
        Some(path) => load_event(path)?,
        None => scripted_event(&args),
    };
    let delivery = if args.silent {
        Delivery::Never
    } else {
        Delivery::After(Duration::from_millis(20))
    };
    let factory = Arc::new(SimulatedClientFactory::new(delivery));
    factory.push_event(event);

    let platform: Arc<dyn PermissionPlatform> = Arc::new(platform_denying(&args.deny));

    let runtime = runner.runtime()?;
    let status = runtime.block_on(async move {
        let plugin = LocationPlugin::new(config, platform, factory)?;

        let on_interrupt = Arc::clone(&plugin);
        ctrlc::set_handler(move || on_interrupt.shutdown())
            .map_err(|e| CliError::Signal(e.to_string()))?;

        let (channel, mut envelopes) = CallbackChannel::unbounded();
        if !plugin.execute(Command::GET_CURRENT_POSITION, channel) {
            return Err(CliError::InvalidArgument(format!(
                "command '{}' not handled",
                Command::GET_CURRENT_POSITION
            )));
        }

        while let Some(envelope) = envelopes.recv().await {
            println!("{}", serde_json::to_string(&envelope)?);
            if envelope.is_terminal() {
                return Ok(envelope.status);
            }
        }

        warn!("Result channel closed without a terminal envelope");
        Ok::<_, CliError>(EnvelopeStatus::Error)
    })?;

    info!(status = ?status, "Locate finished");
    match status {
        EnvelopeStatus::Ok => Ok(()),
        other => Err(CliError::RequestFailed(other)),
    }
}

/// Platform where every capability is granted except those in `denied`,
/// which are refused when the dialog is shown.
fn platform_denying(denied: &[Capability]) -> SimulatedPlatform {
    if denied.is_empty() {
        return SimulatedPlatform::granting_all();
    }

    let platform = denied
        .iter()
        .fold(SimulatedPlatform::new(), |platform, &capability| {
            platform.deny_on_request(capability)
        });
    for capability in Capability::ALL {
        if !denied.contains(&capability) {
            platform.grant(capability);
        }
    }
    platform
}

fn scripted_event(args: &LocateArgs) -> RawLocationEvent {
    let mut fix = FixCommon::captured_now(args.latitude, args.longitude, args.radius);
    if !args.pois.is_empty() {
        fix.poi_list = Some(args.pois.clone());
    }
    RawLocationEvent::new(fix, SourceReading::bare(args.source.into()))
}

fn load_event(path: &Path) -> Result<RawLocationEvent, CliError> {
    let event_error = |reason: String| CliError::EventFile {
        path: path.display().to_string(),
        reason,
    };
    let text = std::fs::read_to_string(path).map_err(|e| event_error(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| event_error(e.to_string()))
}
