//! Command implementations for btctl

pub mod config;
pub mod device;
pub mod effect;
pub mod feed;
pub mod legacy;
pub mod motion;

use std::net::Ipv4Addr;
use std::path::{Path, PathBuf};

use bluetiger::config::{DEFAULT_CONFIG_FILE, PlatformConfig};
use bluetiger::{
    BtApi, LegacyConfiguration, MacAddress, MockPlatform, MotionPlatform, Session, Vector3,
};
use clap::{Args, Subcommand, ValueEnum};

use crate::error::CliError;

/// Everything the CLI needs from a platform backend.
pub trait Backend: MotionPlatform + LegacyConfiguration {}

impl<T: MotionPlatform + LegacyConfiguration> Backend for T {}

/// Where commands send their driver calls.
#[derive(Debug, Clone)]
pub enum Target {
    Driver(PathBuf),
    Mock,
}

/// Settings shared by every command.
pub struct Context {
    pub config: PlatformConfig,
    pub target: Target,
    pub json: bool,
}

impl Context {
    /// Load `--config`, or the default file when present.
    pub fn new(
        config_path: Option<&Path>,
        library: Option<PathBuf>,
        mock: bool,
        json: bool,
    ) -> Result<Self, CliError> {
        let config = match config_path {
            Some(path) => PlatformConfig::load(path).map_err(|e| {
                CliError::Config(format!("{}: {e}", path.display()))
            })?,
            None => PlatformConfig::load_or_default(DEFAULT_CONFIG_FILE)
                .map_err(CliError::config)?,
        };
        config.validate().map_err(CliError::config)?;

        let target = if mock {
            Target::Mock
        } else {
            Target::Driver(library.unwrap_or_else(|| config.resolved_library_path()))
        };
        Ok(Self {
            config,
            target,
            json,
        })
    }

    /// Load the backend selected on the command line.
    pub fn backend(&self) -> Result<Box<dyn Backend>, CliError> {
        match &self.target {
            Target::Mock => {
                tracing::info!("using in-memory mock platform");
                Ok(Box::new(MockPlatform::new()))
            }
            Target::Driver(path) => {
                let api = BtApi::load(path)
                    .map_err(|e| CliError::Library(format!("{}: {e}", path.display())))?;
                Ok(Box::new(api))
            }
        }
    }
}

/// `BTInit` with the configured identity, then a version check.
pub fn open_session<'a>(
    backend: &'a dyn Backend,
    config: &PlatformConfig,
) -> Result<Session<&'a dyn Backend>, CliError> {
    let session = Session::open(backend, &config.identity)?;
    session.check_version();
    Ok(session)
}

/// Read a YAML or JSON document, choosing the parser by extension.
pub fn read_document<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::InvalidInput(format!("{}: {e}", path.display())))?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        Ok(serde_yaml::from_str(&text)?)
    }
}

#[derive(Subcommand)]
pub enum EffectCommands {
    /// Upload an effect script into a slot
    Define {
        #[arg(long)]
        slot: u8,
        /// YAML or JSON effect script
        #[arg(long)]
        file: PathBuf,
    },

    /// Play an effect a fixed number of times
    Play {
        #[arg(long)]
        slot: u8,
        #[arg(long, default_value_t = u8::MAX)]
        amplitude: u8,
        #[arg(long, default_value_t = 1)]
        repetitions: u8,
        /// Upload this script into the slot first
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Play an effect until stopped
    Start {
        #[arg(long)]
        slot: u8,
        #[arg(long, default_value_t = u8::MAX)]
        amplitude: u8,
        /// Upload this script into the slot first
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Stop a running effect
    Stop {
        #[arg(long)]
        slot: u8,
    },
}

#[derive(Args, Debug, Clone)]
pub struct PoseArgs {
    /// Position offset as x,y,z
    #[arg(long, allow_hyphen_values = true, default_value = "0,0,0")]
    pub position: Vector3,
    /// Rotation axis as x,y,z
    #[arg(long, allow_hyphen_values = true, default_value = "0,0,0")]
    pub axis: Vector3,
    /// Rotation angle in radians
    #[arg(long, allow_hyphen_values = true, default_value_t = 0.0)]
    pub angle: f32,
}

#[derive(Subcommand)]
pub enum MoveCommands {
    /// Move to an absolute pose
    Absolute(PoseArgs),
    /// Move relative to the current pose
    Relative(PoseArgs),
}

#[derive(Subcommand)]
pub enum LegacyCommands {
    /// Network address of the controller
    #[command(subcommand)]
    Address(AddressCommands),

    /// Calibration parameters
    #[command(subcommand)]
    Tuning(TuningCommands),

    /// Built-in diagnostics
    #[command(subcommand)]
    Diag(DiagCommands),
}

#[derive(Subcommand)]
pub enum AddressCommands {
    Show,
    Set {
        #[arg(long)]
        mac: MacAddress,
        #[arg(long)]
        ip: Ipv4Addr,
        #[arg(long)]
        netmask: Ipv4Addr,
        #[arg(long)]
        router: Ipv4Addr,
        /// Use dynamic (DHCP) addressing
        #[arg(long)]
        dhcp: bool,
    },
}

#[derive(Subcommand)]
pub enum TuningCommands {
    Show,
    /// Write only the parameters given
    Set(TuningArgs),
}

#[derive(Args, Debug, Default, Clone)]
pub struct TuningArgs {
    #[arg(long)]
    pub motion_limit_range: Option<u8>,
    #[arg(long, allow_hyphen_values = true)]
    pub acceleration_pitch: Option<i16>,
    #[arg(long, allow_hyphen_values = true)]
    pub acceleration_roll: Option<i16>,
    #[arg(long, allow_hyphen_values = true)]
    pub acceleration_heave: Option<i16>,
    #[arg(long, allow_hyphen_values = true)]
    pub position_pitch: Option<i16>,
    #[arg(long, allow_hyphen_values = true)]
    pub position_roll: Option<i16>,
    #[arg(long, allow_hyphen_values = true)]
    pub position_heave: Option<i16>,
    #[arg(long, allow_hyphen_values = true)]
    pub effect_scaling: Option<i16>,
    #[arg(long)]
    pub tip_rounding: Option<u8>,
}

#[derive(Subcommand)]
pub enum DiagCommands {
    Start {
        #[arg(long)]
        id: u16,
    },
    Status,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print the configuration after sanitizing
    Check,
    /// Write a default configuration file
    Init {
        #[arg(long, default_value = bluetiger::config::DEFAULT_CONFIG_FILE)]
        path: PathBuf,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedModeArg {
    Acceleration,
    PitchRoll,
    RotationVector,
}

impl From<FeedModeArg> for bluetiger::FeedMode {
    fn from(mode: FeedModeArg) -> Self {
        match mode {
            FeedModeArg::Acceleration => bluetiger::FeedMode::Acceleration,
            FeedModeArg::PitchRoll => bluetiger::FeedMode::PitchRoll,
            FeedModeArg::RotationVector => bluetiger::FeedMode::RotationVector,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct FeedArgs {
    /// JSON-lines file of simulator frames
    #[arg(long)]
    pub frames: PathBuf,
    /// Override the configured feed mode
    #[arg(long, value_enum)]
    pub mode: Option<FeedModeArg>,
    /// Override the configured update rate
    #[arg(long)]
    pub rate: Option<f32>,
    /// Use frame timestamps as the clock instead of waiting in real time
    #[arg(long)]
    pub fast: bool,
}
