use crate::sync;
use agency_sync::error::AppError;
use agency_sync::workflows::delivery::ProxyMode;
use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "agency-sync",
    about = "Extract employee profiles and deliver them to a travel agency",
    version
)]
pub(crate) struct Cli {
    /// Target agency
    #[arg(long, value_enum)]
    pub(crate) agency: Agency,
    /// Egress proxy mode: zscaler (discovery document), system (fixed proxy) or none
    #[arg(long, default_value = "zscaler")]
    pub(crate) proxy: ProxyMode,
    /// Settings file, overrides SYNC_SETTINGS_PATH
    #[arg(long)]
    pub(crate) settings: Option<PathBuf>,
    /// Ignore minimum limits, send one record per company and mask personal data
    #[arg(long)]
    pub(crate) debug_limit_off: bool,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Agency {
    /// CBTC Travel-Click (JSON)
    Cbtc,
    /// AeroClub (XML)
    Aero,
}

impl fmt::Display for Agency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Agency::Cbtc => f.write_str("cbtc"),
            Agency::Aero => f.write_str("aero"),
        }
    }
}

pub(crate) fn run() -> Result<(), AppError> {
    sync::run(Cli::parse())
}
