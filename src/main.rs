//! CLI Entry Point for the ELL14 rotation stage
//!
//! Provides command-line access to:
//! - Homing and status queries
//! - Reading and setting the angle (wrapped or unwrapped)
//! - Relative moves
//! - Angle sweeps configured in `config/ell14.toml`
//!
//! # Usage
//!
//! ```bash
//! ell14 --port /dev/ttyUSB0 home
//! ell14 angle --set 45
//! ell14 --simulate scan
//! ELL14_SCAN__STEP_DEG=10 ell14 show-config
//! ```

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use ell14_stage::config::StageConfig;
use ell14_stage::logging::{self, LoggingConfig};
use ell14_stage::scan;
use ell14_stage::{Address, Ell14Driver, SimulatedStage, Transport};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ell14")]
#[command(about = "Control a Thorlabs Elliptec ELL14 rotation stage", long_about = None)]
struct Cli {
    /// Configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Serial port, overrides the configuration
    #[arg(long, global = true)]
    port: Option<String>,

    /// Device address (0-9), overrides the configuration
    #[arg(long, global = true)]
    address: Option<Address>,

    /// Talk to an in-memory simulated stage instead of a serial port
    #[arg(long, global = true)]
    simulate: bool,

    /// Log level (trace, debug, info, warn, error), overrides the configuration
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Home, tare and sweep through the configured angles
    Scan,

    /// Move to the mechanical home position
    Home,

    /// Print the device status and raw position
    Status,

    /// Print the current angle, or move to a new one
    Angle {
        /// Target angle in degrees
        #[arg(long, allow_hyphen_values = true)]
        set: Option<f64>,

        /// Use the accumulated angle instead of [0, 360)
        #[arg(long)]
        unwrapped: bool,
    },

    /// Rotate by a relative angle in degrees
    MoveBy {
        /// Relative angle in degrees
        #[arg(allow_hyphen_values = true)]
        delta: f64,
    },

    /// Print the effective configuration as TOML
    ShowConfig,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    logging::init(
        LoggingConfig::from_level_name(&config.log_level).context("Invalid log level")?,
    )?;

    if let Commands::ShowConfig = cli.command {
        let rendered =
            toml::to_string_pretty(&config).context("Failed to render configuration")?;
        println!("{}", rendered);
        return Ok(());
    }

    let transport = open_transport(&cli, &config)?;
    let mut driver = Ell14Driver::with_settings(
        transport,
        config.address,
        config.offset,
        config.driver_settings(),
    );

    let outcome = run_command(&mut driver, &cli.command, &config).await;
    let closed = driver.close().await;
    outcome?;
    closed.context("Failed to close ELL14 driver")?;
    Ok(())
}

fn load_config(cli: &Cli) -> Result<StageConfig> {
    let mut config = match &cli.config {
        Some(path) => StageConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => StageConfig::load().context("Failed to load config")?,
    };

    if let Some(port) = &cli.port {
        config.port = port.clone();
    }
    if let Some(address) = cli.address {
        config.address = address;
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn open_transport(cli: &Cli, config: &StageConfig) -> Result<Box<dyn Transport>> {
    if cli.simulate {
        tracing::info!(address = %config.address, "Using simulated ELL14 stage");
        return Ok(Box::new(SimulatedStage::new(config.address)));
    }

    #[cfg(feature = "serial")]
    {
        let port = ell14_stage::transport::open_serial_port(&config.port, config.read_timeout)
            .with_context(|| format!("Failed to open serial port {}", config.port))?;
        return Ok(Box::new(port));
    }

    #[cfg(not(feature = "serial"))]
    {
        bail!(
            "Built without the `serial` feature; cannot open {}. Use --simulate.",
            config.port
        )
    }
}

async fn run_command(
    driver: &mut Ell14Driver<Box<dyn Transport>>,
    command: &Commands,
    config: &StageConfig,
) -> Result<()> {
    match command {
        Commands::Scan => {
            let points = scan::run_scan(driver, &config.scan)
                .await
                .context("Scan failed")?;
            println!("target_deg,measured_deg");
            for point in points {
                println!("{:.3},{:.3}", point.target_deg, point.measured_deg);
            }
        }
        Commands::Home => {
            driver.home().await.context("Homing failed")?;
            println!("Homed");
        }
        Commands::Status => {
            let status = driver.status().await?;
            let raw = driver.raw_position().await?;
            println!("Address:  {}", driver.address());
            println!("Status:   {} ({:02X})", status, status.code());
            println!("Position: {} counts", raw);
        }
        Commands::Angle { set, unwrapped } => {
            match (set, unwrapped) {
                (Some(target), true) => driver.set_angle_unwrapped(*target).await?,
                (Some(target), false) => driver.set_angle(*target).await?,
                (None, _) => {}
            }
            let angle = if *unwrapped {
                driver.angle_unwrapped().await?
            } else {
                driver.angle().await?
            };
            println!("{:.3}", angle);
        }
        Commands::MoveBy { delta } => {
            if !delta.is_finite() {
                bail!("Move distance must be finite, got {}", delta);
            }
            driver.move_by(*delta).await?;
            println!("{:.3}", driver.angle().await?);
        }
        Commands::ShowConfig => {}
    }
    Ok(())
}
