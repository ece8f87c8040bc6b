//! Angle sweep built on top of the driver.
//!
//! A scan homes the stage, tares the home position as zero, visits each angle
//! of the configured sweep with [`Ell14Driver::set_angle`], waits for the dwell
//! time, reads the angle back, and finally returns to zero. The driver is left
//! open; closing it is up to the caller.

use crate::config::ScanConfig;
use crate::driver::Ell14Driver;
use crate::error::Result;
use crate::transport::Transport;

/// One visited angle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanPoint {
    /// Requested wrapped angle in degrees
    pub target_deg: f64,
    /// Angle read back after the dwell time
    pub measured_deg: f64,
}

/// Angles from `start_deg` towards `stop_deg` in steps of `step_deg`, stop included
/// when reached within a micro-degree.
pub fn scan_angles(config: &ScanConfig) -> Vec<f64> {
    if config.validate().is_err() {
        return Vec::new();
    }

    let span = (config.stop_deg - config.start_deg) / config.step_deg;
    let count = (span + 1e-9).floor() as usize + 1;
    (0..count)
        .map(|i| config.start_deg + i as f64 * config.step_deg)
        .collect()
}

/// Run a full sweep and return the measured points.
pub async fn run_scan<T: Transport>(
    driver: &mut Ell14Driver<T>,
    config: &ScanConfig,
) -> Result<Vec<ScanPoint>> {
    config.validate()?;
    let angles = scan_angles(config);

    driver.home().await?;
    driver.tare().await?;
    tracing::info!(points = angles.len(), "Starting angle scan");

    let mut points = Vec::with_capacity(angles.len());
    for target_deg in angles {
        driver.set_angle(target_deg).await?;
        tokio::time::sleep(config.dwell).await;
        let measured_deg = driver.angle().await?;
        tracing::info!(target_deg, measured_deg, "Angle reached");
        points.push(ScanPoint {
            target_deg,
            measured_deg,
        });
    }

    driver.set_angle(0.0).await?;
    tracing::info!("Scan finished");
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sweep_angles() {
        let angles = scan_angles(&ScanConfig::default());
        assert_eq!(angles.len(), 37);
        assert_eq!(angles[0], 0.0);
        assert_eq!(angles[36], 180.0);
    }

    #[test]
    fn test_stop_not_on_grid() {
        let config = ScanConfig {
            start_deg: 0.0,
            stop_deg: 10.0,
            step_deg: 4.0,
            ..ScanConfig::default()
        };
        assert_eq!(scan_angles(&config), vec![0.0, 4.0, 8.0]);
    }

    #[test]
    fn test_descending_and_invalid() {
        let config = ScanConfig {
            start_deg: 90.0,
            stop_deg: 0.0,
            step_deg: -45.0,
            ..ScanConfig::default()
        };
        assert_eq!(scan_angles(&config), vec![90.0, 45.0, 0.0]);

        let config = ScanConfig {
            step_deg: 0.0,
            ..ScanConfig::default()
        };
        assert!(scan_angles(&config).is_empty());
    }
}
