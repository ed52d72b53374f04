// RouterLens - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Analysis session over one log file
// 4. Optional device profile load/save, exports, and inventory payload
// 5. Text report on stdout

use clap::Parser;
use routerlens::app::analysis::{AnalysisOptions, AnalysisSession};
use routerlens::app::inventory::{self, InventoryConfig};
use routerlens::app::{device_store, report};
use routerlens::core::export;
use routerlens::core::filter::{self, FilterCriteria};
use routerlens::platform;
use routerlens::util;
use routerlens::util::error::{ExportError, Result, RouterLensError};
use std::path::{Path, PathBuf};

/// RouterLens: RouterOS log analyser.
#[derive(Parser, Debug)]
#[command(name = "routerlens", version, about)]
struct Cli {
    /// Exported RouterOS log file to analyse.
    log_file: PathBuf,

    /// Topic filter (Firewall, DHCP, Wireless, System, Authentication, Other, All).
    #[arg(short = 't', long)]
    topic: Option<String>,

    /// Severity filter (error, warning, notice, info, All).
    #[arg(short = 's', long)]
    severity: Option<String>,

    /// Exact interface name filter ("All" = no filter).
    #[arg(short = 'i', long)]
    interface: Option<String>,

    /// Case-insensitive keyword searched in the raw line and message.
    #[arg(short = 'k', long)]
    keyword: Option<String>,

    /// IP address substring filter.
    #[arg(long)]
    ip: Option<String>,

    /// MAC address substring filter.
    #[arg(long)]
    mac: Option<String>,

    /// Inclusive lower time bound, e.g. "2024-01-05 10:00:00".
    #[arg(long)]
    from: Option<String>,

    /// Inclusive upper time bound.
    #[arg(long)]
    to: Option<String>,

    /// Device profile JSON to adopt on top of the inferred profile.
    #[arg(long = "device-file")]
    device_file: Option<PathBuf>,

    /// Save the resulting device profile to this path.
    #[arg(long = "save-device")]
    save_device: Option<PathBuf>,

    /// Export the filtered records as CSV.
    #[arg(long = "export-csv")]
    export_csv: Option<PathBuf>,

    /// Export the filtered records as JSON.
    #[arg(long = "export-json")]
    export_json: Option<PathBuf>,

    /// Write the inventory creation payload for the device as JSON.
    #[arg(long = "inventory-payload")]
    inventory_payload: Option<PathBuf>,

    /// Alternative config.toml location.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() {
    let cli = Cli::parse();

    let platform_paths = platform::config::PlatformPaths::resolve();

    // Config is read before the subscriber exists so its [logging] section
    // can take part in initialisation; warnings are replayed afterwards.
    // A file named with --config must load; the platform default may be absent.
    let loaded: Result<_> = match cli.config {
        Some(ref path) => platform::config::load_explicit_config(path).map_err(Into::into),
        None => Ok(platform::config::load_config(&platform_paths.config_file())),
    };
    let (config, config_warnings) = match loaded {
        Ok(loaded) => loaded,
        Err(e) => {
            util::logging::init(cli.debug, None, None);
            tracing::error!(error = %e, "Cannot load config");
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    };
    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        "RouterLens starting"
    );
    for warning in &config_warnings {
        tracing::warn!("{}", warning);
        eprintln!("Warning: {warning}");
    }

    if let Err(e) = run(&cli, &config, &platform_paths) {
        tracing::error!(error = %e, "Analysis failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn run(
    cli: &Cli,
    config: &platform::config::AppConfig,
    platform_paths: &platform::config::PlatformPaths,
) -> Result<()> {
    let criteria = build_criteria(cli)?;

    let text = platform::fs::read_file_lossy(&cli.log_file).map_err(|e| RouterLensError::Io {
        path: cli.log_file.clone(),
        operation: "read log file",
        source: e,
    })?;

    let mut session = AnalysisSession::from_text(&text, AnalysisOptions::from_app_config(config));

    // Without --device-file, a profile previously saved to the data
    // directory is picked up if present.
    let device_file = cli.device_file.clone().or_else(|| {
        let default = device_store::device_path(&platform_paths.data_dir);
        default.exists().then_some(default)
    });

    if let Some(ref path) = device_file {
        // A missing or broken profile document is not fatal; the inferred
        // profile stays in effect.
        match device_store::load_profile(path) {
            Ok(external) => session.adopt_profile(external),
            Err(e) => {
                tracing::warn!(error = %e, "Device profile not loaded; using inferred profile");
                eprintln!("Warning: {e}");
            }
        }
    }

    let matched = session.filter(&criteria);

    if let Some(ref path) = cli.export_csv {
        let file = create_export_file(path)?;
        export::export_csv(matched.iter().copied(), file, path)?;
    }
    if let Some(ref path) = cli.export_json {
        let file = create_export_file(path)?;
        export::export_json(matched.iter().copied(), file, path)?;
    }

    if let Some(ref path) = cli.save_device {
        device_store::save_profile(session.device_profile(), path)?;
    }

    if let Some(ref path) = cli.inventory_payload {
        write_inventory_payload(&session, config, path)?;
    }

    let stats = session.stats(&criteria);
    let classification = session.classification();
    print!(
        "{}",
        report::render_report(
            session.records().len(),
            &stats,
            session.device_profile(),
            &classification,
        )
    );
    Ok(())
}

/// Translate CLI filter flags into criteria. Unknown selections and
/// unparseable time bounds are user errors reported before any work.
fn build_criteria(cli: &Cli) -> Result<FilterCriteria> {
    let mut criteria = FilterCriteria::default();

    if let Some(ref topic) = cli.topic {
        criteria.topic = filter::parse_topic(topic)?;
    }
    if let Some(ref severity) = cli.severity {
        criteria.severity = filter::parse_severity(severity)?;
    }
    criteria.interface = cli.interface.clone();
    criteria.keyword = cli.keyword.clone().unwrap_or_default();
    criteria.ip_address = cli.ip.clone().unwrap_or_default();
    criteria.mac_address = cli.mac.clone().unwrap_or_default();

    if let Some(ref from) = cli.from {
        criteria.time_start = Some(filter::parse_time_bound(from)?);
    }
    if let Some(ref to) = cli.to {
        criteria.time_end = Some(filter::parse_time_bound(to)?);
    }

    tracing::debug!(?criteria, "Filter criteria built");
    Ok(criteria)
}

fn create_export_file(
    path: &Path,
) -> std::result::Result<std::io::BufWriter<std::fs::File>, ExportError> {
    let file = std::fs::File::create(path).map_err(|e| ExportError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    Ok(std::io::BufWriter::new(file))
}

fn write_inventory_payload(
    session: &AnalysisSession,
    config: &platform::config::AppConfig,
    path: &Path,
) -> Result<()> {
    let profile = session.device_profile();

    match inventory::sync_targets(&InventoryConfig::from_app_config(config), profile) {
        Some(targets) => tracing::info!(
            lookup = %targets.lookup_url,
            create = %targets.collection_url,
            timeout_secs = targets.timeout.as_secs(),
            "Inventory sync targets"
        ),
        None => tracing::debug!("No inventory endpoint configured"),
    }

    let file = create_export_file(path)?;
    inventory::write_creation_payload(profile, file, path)?;
    Ok(())
}
