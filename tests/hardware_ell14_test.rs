//! Hardware integration tests for the Elliptec ELL14 rotation mount
//!
//! These tests require a real stage connected to the system.
//! Run with: ELL14_TEST_PORT=/dev/ttyUSB0 cargo test --test hardware_ell14_test -- --ignored --nocapture
//!
//! Hardware Setup:
//! - One ELL14 rotation mount, address 0 unless ELL14_TEST_ADDRESS is set
//! - Baud rate: 9600, 8N1, no flow control
//! - Nothing mounted that could collide during a full turn

#![cfg(feature = "serial")]

use ell14_stage::transport::open_serial_port;
use ell14_stage::{Address, Ell14Driver, Ell14Status};
use std::time::Duration;

fn test_port() -> String {
    std::env::var("ELL14_TEST_PORT").unwrap_or_else(|_| "/dev/ttyUSB0".to_string())
}

fn test_address() -> Address {
    std::env::var("ELL14_TEST_ADDRESS")
        .ok()
        .and_then(|a| a.parse().ok())
        .unwrap_or_default()
}

#[tokio::test]
#[ignore] // Hardware-only test
async fn test_status_and_position() {
    let port = open_serial_port(&test_port(), Duration::from_millis(50)).unwrap();
    let mut driver = Ell14Driver::new(port, test_address());

    let status = driver.status().await.unwrap();
    println!("Status: {} ({:02X})", status, status.code());
    assert!(matches!(status, Ell14Status::Ok | Ell14Status::Busy));

    let raw = driver.raw_position().await.unwrap();
    println!("Raw position: {} counts", raw);

    driver.close().await.unwrap();
}

#[tokio::test]
#[ignore] // Hardware-only test
async fn test_home_tare_and_quarter_turns() {
    let port = open_serial_port(&test_port(), Duration::from_millis(50)).unwrap();
    let mut driver = Ell14Driver::new(port, test_address());

    driver.home().await.unwrap();
    driver.tare().await.unwrap();
    println!("Tared at offset {}", driver.offset());

    for target in [90.0, 180.0, 270.0, 0.0] {
        driver.set_angle(target).await.unwrap();
        let angle = driver.angle().await.unwrap();
        println!("Target {:>6.2}°  measured {:>8.3}°", target, angle);
        let error = (angle - target).abs().min(360.0 - (angle - target).abs());
        assert!(error < 0.1, "angle error {:.3}° too large", error);
    }

    driver.close().await.unwrap();
}
