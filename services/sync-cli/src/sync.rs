use crate::cli::{Agency, Cli};
use agency_sync::config::{AppConfig, SyncSettings};
use agency_sync::error::AppError;
use agency_sync::telemetry;
use agency_sync::workflows::aero::AeroAgent;
use agency_sync::workflows::delivery::{Delivery, ReqwestTransport};
use agency_sync::workflows::source::CsvExportSource;
use agency_sync::workflows::travel::TravelAgent;
use agency_sync::workflows::RunSummary;
use tracing::info;

enum Agent<'a> {
    Travel(TravelAgent<'a>),
    Aero(AeroAgent<'a>),
}

pub(crate) fn run(cli: Cli) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;
    if let Some(path) = cli.settings {
        config.settings_path = path;
    }
    if cli.debug_limit_off {
        config.debug_limit_off = Some(true);
    }

    telemetry::init(&config.telemetry)?;

    let mut settings = SyncSettings::from_path(&config.settings_path)?;
    settings.apply_overrides(&config);
    let debug_limit_off = settings.settings.debug_limit_off;

    let agent = match cli.agency {
        Agency::Cbtc => Agent::Travel(TravelAgent::new(settings.travel_click()?, debug_limit_off)),
        Agency::Aero => Agent::Aero(AeroAgent::new(settings.aero_club()?, debug_limit_off)),
    };

    info!(
        ?config.environment,
        agency = %cli.agency,
        proxy = %cli.proxy,
        debug_limit_off,
        "agency sync started"
    );

    let transport = ReqwestTransport::new()?;
    let delivery = Delivery::for_mode(Box::new(transport), cli.proxy, &settings.settings)?;
    let mut source = CsvExportSource::new(settings.data_source.export_dir.clone());

    let summary: RunSummary = match agent {
        Agent::Travel(agent) => agent.run(&mut source, &delivery),
        Agent::Aero(agent) => agent.run(&mut source, &delivery),
    };

    info!(
        agency = %cli.agency,
        companies = summary.companies.len(),
        delivered = summary.delivered(),
        aborted = summary.aborted,
        "agency sync finished"
    );
    Ok(())
}
