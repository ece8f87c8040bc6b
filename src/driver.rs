//! Thorlabs Elliptec ELL14 Rotation Mount Driver
//!
//! Protocol: RS-485 multidrop bus, 9600 baud, ASCII encoded
//! Reference: ELLx modules protocol manual
//!
//! The driver owns its [`Transport`] exclusively and performs one
//! request/response exchange at a time. Every motion command starts and ends
//! with [`Ell14Driver::wait_until_ready`], so callers always observe a settled
//! device.
//!
//! Angles are derived from the raw encoder position and a software offset set by
//! [`Ell14Driver::tare`]:
//!
//! ```text
//! unwrapped = -360 * (raw + offset) / COUNTS_PER_REV
//! wrapped   = unwrapped mod 360
//! ```
//!
//! # Usage
//!
//! ```rust,no_run
//! use ell14_stage::{Address, Ell14Driver};
//! use ell14_stage::transport::open_serial_port;
//! use std::time::Duration;
//!
//! # async fn run() -> ell14_stage::Result<()> {
//! let port = open_serial_port("/dev/ttyUSB0", Duration::from_millis(50))?;
//! let mut driver = Ell14Driver::new(port, Address::new(0)?);
//!
//! driver.home().await?;
//! driver.tare().await?;
//! driver.set_angle(45.0).await?;
//! println!("Angle: {:.2}°", driver.angle().await?);
//! driver.close().await?;
//! # Ok(())
//! # }
//! ```

use crate::address::Address;
use crate::error::{Ell14Error, Result};
use crate::protocol::{self, command, Response, RESPONSE_TERMINATOR};
use crate::status::Ell14Status;
use crate::transport::Transport;
use std::time::Duration;
use tokio::time::Instant;
use tracing::instrument;

/// Timing settings for a driver instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverSettings {
    /// Budget for receiving one complete response frame.
    pub timeout: Duration,
    /// Sleep between status polls while the device reports busy.
    pub poll_interval: Duration,
    /// Cumulative limit on busy polling; `None` waits forever.
    pub ready_timeout: Option<Duration>,
}

impl Default for DriverSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(1),
            poll_interval: Duration::from_millis(50),
            ready_timeout: Some(Duration::from_secs(30)),
        }
    }
}

/// Device controller for one ELL14 rotation mount.
pub struct Ell14Driver<T: Transport> {
    transport: Option<T>,
    address: Address,
    offset: i64,
    settings: DriverSettings,
}

impl<T: Transport> Ell14Driver<T> {
    /// Create a driver with zero offset and default settings.
    pub fn new(transport: T, address: Address) -> Self {
        Self::with_settings(transport, address, 0, DriverSettings::default())
    }

    /// Create a driver with an initial offset (in counts) and custom settings.
    pub fn with_settings(
        transport: T,
        address: Address,
        offset: i64,
        settings: DriverSettings,
    ) -> Self {
        Self {
            transport: Some(transport),
            address,
            offset,
            settings,
        }
    }

    /// Get the device address.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Current software offset in counts.
    pub fn offset(&self) -> i64 {
        self.offset
    }

    /// Timing settings.
    pub fn settings(&self) -> &DriverSettings {
        &self.settings
    }

    /// Whether [`close`](Self::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.transport.is_none()
    }

    /// Borrow the transport, `None` after close.
    pub fn transport(&self) -> Option<&T> {
        self.transport.as_ref()
    }

    /// Send a command and read back one validated response.
    #[instrument(skip(self, data), fields(address = %self.address))]
    async fn query(&mut self, command: &'static str, data: &[u8]) -> Result<Response> {
        let address = self.address;
        let timeout = self.settings.timeout;
        let transport = self.transport.as_mut().ok_or(Ell14Error::ClosedDevice)?;

        let request = protocol::encode_command(address, command, data);
        transport.write(&request).await?;

        let raw = read_frame(transport, timeout).await?;
        tracing::debug!(
            request = %String::from_utf8_lossy(&request).trim_end(),
            response = %String::from_utf8_lossy(&raw).trim_end(),
            "ELL14 transaction"
        );

        // a reply from another module is rejected before its payload is parsed
        let actual = protocol::response_address(&raw)?;
        if actual != address.as_char() {
            return Err(Ell14Error::AddressMismatch {
                expected: address.as_char(),
                actual,
            });
        }
        protocol::decode_response(&raw)
    }

    /// Query the device status (`gs`).
    pub async fn status(&mut self) -> Result<Ell14Status> {
        let response = self.query(command::GET_STATUS, &[]).await?;
        if !response.is_status() {
            return Err(Ell14Error::UnexpectedHeader {
                command: command::GET_STATUS,
                header: response.header,
            });
        }
        Ell14Status::from_code(response.payload)
    }

    /// Query the raw encoder position in counts (`gp`).
    pub async fn raw_position(&mut self) -> Result<i64> {
        let response = self.query(command::GET_POSITION, &[]).await?;
        if !response.is_position() {
            return Err(Ell14Error::UnexpectedHeader {
                command: command::GET_POSITION,
                header: response.header,
            });
        }
        Ok(protocol::to_signed32(response.payload as u64))
    }

    /// Poll status until the device reports ok.
    ///
    /// Busy replies are retried every `poll_interval`; any other status fails
    /// with [`Ell14Error::DeviceFault`]. When `ready_timeout` is set, busy
    /// polling past it fails with [`Ell14Error::ReadyTimeout`].
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn wait_until_ready(&mut self) -> Result<()> {
        let start = Instant::now();
        let mut polls = 0u32;

        loop {
            let status = self.status().await?;
            polls += 1;

            match status {
                Ell14Status::Ok => {
                    tracing::trace!(polls, "ELL14 ready");
                    return Ok(());
                }
                Ell14Status::Busy => {
                    let elapsed = start.elapsed();
                    if let Some(limit) = self.settings.ready_timeout {
                        if elapsed >= limit {
                            tracing::warn!(polls, ?elapsed, "ELL14 still busy, giving up");
                            return Err(Ell14Error::ReadyTimeout { elapsed, polls });
                        }
                    }
                    tracing::trace!(polls, "ELL14 busy, polling again");
                    tokio::time::sleep(self.settings.poll_interval).await;
                }
                fault => {
                    tracing::warn!(status = %fault, "ELL14 reported fault while waiting");
                    return Err(Ell14Error::DeviceFault(fault));
                }
            }
        }
    }

    /// Home the device to its mechanical reference. The offset is left untouched.
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn home(&mut self) -> Result<()> {
        self.wait_until_ready().await?;
        let response = self.query(command::HOME, &[]).await?;
        check_home_ack(&response)?;
        self.wait_until_ready().await?;
        tracing::info!("ELL14 homed");
        Ok(())
    }

    /// Make the current position the zero of all angle readings.
    ///
    /// Reads the raw position and stores its negation as the offset. No motion
    /// command is sent.
    pub async fn tare(&mut self) -> Result<()> {
        let raw = self.raw_position().await?;
        self.offset = -raw;
        tracing::info!(address = %self.address, offset = self.offset, "ELL14 tared");
        Ok(())
    }

    /// Rotate by `delta_deg` degrees relative to the current position.
    #[instrument(skip(self), fields(address = %self.address))]
    pub async fn move_by(&mut self, delta_deg: f64) -> Result<()> {
        if !delta_deg.is_finite() {
            return Err(Ell14Error::InvalidAngle(delta_deg));
        }
        let counts = protocol::move_counts(delta_deg);
        let payload = protocol::encode_move_payload(counts)?;

        self.wait_until_ready().await?;
        let response = self.query(command::MOVE_RELATIVE, &payload).await?;
        check_move_ack(&response)?;
        self.wait_until_ready().await?;

        tracing::debug!(counts, "ELL14 relative move complete");
        Ok(())
    }

    /// Accumulated angle in degrees, not reduced into a single turn.
    pub async fn angle_unwrapped(&mut self) -> Result<f64> {
        let raw = self.raw_position().await?;
        let counts = raw
            .checked_add(self.offset)
            .ok_or(Ell14Error::PositionOverflow(self.offset))?;
        Ok(protocol::counts_to_degrees(counts))
    }

    /// Move so that [`angle_unwrapped`](Self::angle_unwrapped) reads `target`.
    pub async fn set_angle_unwrapped(&mut self, target: f64) -> Result<()> {
        if !target.is_finite() {
            return Err(Ell14Error::InvalidAngle(target));
        }
        let current = self.angle_unwrapped().await?;
        self.move_by(target - current).await
    }

    /// Angle in degrees within `[0, 360)`.
    pub async fn angle(&mut self) -> Result<f64> {
        Ok(protocol::wrap_degrees(self.angle_unwrapped().await?))
    }

    /// Move to the wrapped angle `target` along the shorter way round.
    ///
    /// `target` is first reduced into `[0, 360)`, so `set_angle(-90.0)` and
    /// `set_angle(270.0)` behave the same. The issued relative move never
    /// exceeds half a revolution.
    pub async fn set_angle(&mut self, target: f64) -> Result<()> {
        if !target.is_finite() {
            return Err(Ell14Error::InvalidAngle(target));
        }
        let current = self.angle().await?;
        let delta = protocol::shortest_delta(current, target);
        tracing::debug!(address = %self.address, current, target_deg = target, delta, "ELL14 set_angle");
        self.move_by(delta).await
    }

    /// Release the transport. Every later operation fails with `ClosedDevice`.
    pub async fn close(&mut self) -> Result<()> {
        let mut transport = self.transport.take().ok_or(Ell14Error::ClosedDevice)?;
        transport.close().await?;
        tracing::info!(address = %self.address, "ELL14 driver closed");
        Ok(())
    }
}

/// Accept any reply to `ho` except a `GS` carrying a fault.
fn check_home_ack(response: &Response) -> Result<()> {
    if response.is_status() {
        let status = Ell14Status::from_code(response.payload)?;
        if !status.is_ok() {
            tracing::warn!(status = %status, "ELL14 rejected home command");
            return Err(Ell14Error::DeviceFault(status));
        }
    }
    Ok(())
}

/// A `GS` reply to `mr` means the move was not accepted, whatever the code.
fn check_move_ack(response: &Response) -> Result<()> {
    if response.is_status() {
        let status = Ell14Status::from_code(response.payload)?;
        tracing::warn!(status = %status, "ELL14 answered relative move with a status report");
        return Err(Ell14Error::DeviceFault(status));
    }
    Ok(())
}

/// Accumulate bytes until the first `CR LF` or until `timeout` elapses.
async fn read_frame<T: Transport>(transport: &mut T, timeout: Duration) -> Result<Vec<u8>> {
    let deadline = Instant::now() + timeout;
    let mut frame = Vec::with_capacity(32);
    let mut buf = [0u8; 64];

    loop {
        let n = transport.read_available(&mut buf).await?;
        frame.extend_from_slice(&buf[..n]);

        if let Some(end) = frame
            .windows(RESPONSE_TERMINATOR.len())
            .position(|w| w == RESPONSE_TERMINATOR)
            .map(|idx| idx + RESPONSE_TERMINATOR.len())
        {
            if end < frame.len() {
                tracing::debug!(
                    discarded = frame.len() - end,
                    "Discarding bytes after ELL14 response terminator"
                );
                frame.truncate(end);
            }
            return Ok(frame);
        }

        if Instant::now() >= deadline {
            return Err(Ell14Error::FrameTimeout {
                timeout,
                received: frame.len(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockTransport;
    use crate::protocol::to_unsigned32;
    use tracing_test::traced_test;

    fn fast_settings() -> DriverSettings {
        DriverSettings {
            timeout: Duration::from_millis(100),
            poll_interval: Duration::from_millis(1),
            ready_timeout: Some(Duration::from_secs(1)),
        }
    }

    fn driver(mock: &MockTransport) -> Ell14Driver<MockTransport> {
        Ell14Driver::with_settings(mock.clone(), Address::new(0).unwrap(), 0, fast_settings())
    }

    fn position_reply(raw: i64) -> Vec<u8> {
        format!("0PO{:08X}\r\n", to_unsigned32(raw)).into_bytes()
    }

    #[tokio::test]
    async fn test_angle_at_origin_is_zero() {
        let mock = MockTransport::new();
        mock.expect(b"0gp\n", b"0PO00000000\r\n");
        let mut driver = driver(&mock);

        assert_eq!(driver.angle().await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_move_by_ninety_encodes_negated_counts() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0mrFFFF7400\n", b"0POFFFF7400\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let mut driver = driver(&mock);

        driver.move_by(90.0).await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
        assert_eq!(mock.sent_frames()[1], b"0mrFFFF7400\n".to_vec());
    }

    #[tokio::test]
    async fn test_wait_retries_while_busy() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS09\r\n");
        mock.expect(b"0gs\n", b"0GS09\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let mut driver = driver(&mock);

        driver.wait_until_ready().await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[tokio::test]
    async fn test_command_error_reply_to_move_is_fault() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0mr00008C00\n", b"0GS03\r\n");
        let mut driver = driver(&mock);

        let err = driver.move_by(-90.0).await.unwrap_err();
        assert!(matches!(
            err,
            Ell14Error::DeviceFault(Ell14Status::CommandError)
        ));
    }

    #[tokio::test]
    async fn test_address_mismatch() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"1GS00\r\n");
        mock.expect(b"0gp\n", b"3PO00000000\r\n");
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.status().await,
            Err(Ell14Error::AddressMismatch {
                expected: '0',
                actual: '1'
            })
        ));
        assert!(matches!(
            driver.raw_position().await,
            Err(Ell14Error::AddressMismatch { actual: '3', .. })
        ));
    }

    #[tokio::test]
    async fn test_unexpected_headers() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0PO00000000\r\n");
        mock.expect(b"0gp\n", b"0GS00\r\n");
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.status().await,
            Err(Ell14Error::UnexpectedHeader { command: "gs", .. })
        ));
        assert!(matches!(
            driver.tare().await,
            Err(Ell14Error::UnexpectedHeader { command: "gp", .. })
        ));
        assert_eq!(driver.offset(), 0);
    }

    #[tokio::test]
    async fn test_tare_zeroes_unwrapped_angle() {
        let mock = MockTransport::new();
        mock.expect(b"0gp\n", &position_reply(4096));
        mock.expect(b"0gp\n", &position_reply(4096));
        let mut driver = driver(&mock);

        driver.tare().await.unwrap();
        assert_eq!(driver.offset(), -4096);
        assert!(driver.angle_unwrapped().await.unwrap().abs() < 360.0 / COUNTS_PER_REV_F64);
    }

    const COUNTS_PER_REV_F64: f64 = protocol::COUNTS_PER_REV as f64;

    #[tokio::test]
    async fn test_fault_while_waiting() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS09\r\n");
        mock.expect(b"0gs\n", b"0GS0B\r\n");
        let mut driver = driver(&mock);

        let err = driver.wait_until_ready().await.unwrap_err();
        assert_eq!(err.device_status(), Some(Ell14Status::MotorError));
    }

    #[tokio::test]
    async fn test_unknown_status_code() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS0E\r\n");
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.status().await,
            Err(Ell14Error::UnknownStatus(14))
        ));
    }

    #[tokio::test]
    async fn test_ready_timeout() {
        let mock = MockTransport::new();
        for _ in 0..200 {
            mock.expect(b"0gs\n", b"0GS09\r\n");
        }
        let mut driver = Ell14Driver::with_settings(
            mock.clone(),
            Address::new(0).unwrap(),
            0,
            DriverSettings {
                timeout: Duration::from_millis(100),
                poll_interval: Duration::from_millis(5),
                ready_timeout: Some(Duration::from_millis(20)),
            },
        );

        assert!(matches!(
            driver.wait_until_ready().await,
            Err(Ell14Error::ReadyTimeout { .. })
        ));
        assert!(mock.remaining_expectations() > 0);
    }

    #[tokio::test]
    async fn test_frame_timeout_on_silence() {
        let mock = MockTransport::new();
        mock.expect_silence(b"0gs\n");
        let mut driver = Ell14Driver::with_settings(
            mock.clone(),
            Address::new(0).unwrap(),
            0,
            DriverSettings {
                timeout: Duration::from_millis(20),
                ..fast_settings()
            },
        );

        assert!(matches!(
            driver.status().await,
            Err(Ell14Error::FrameTimeout { received: 0, .. })
        ));
    }

    #[tokio::test]
    async fn test_partial_frame_times_out() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00");
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.status().await,
            Err(Ell14Error::FrameTimeout { received: 5, .. })
        ));
    }

    #[tokio::test]
    async fn test_reply_split_across_reads() {
        let mock = MockTransport::new();
        mock.expect_chunked(b"0gp\n", &[b"0P", b"OFFFF", b"7400\r", b"\n"]);
        let mut driver = driver(&mock);

        assert_eq!(driver.raw_position().await.unwrap(), -35840);
    }

    #[tokio::test]
    async fn test_bytes_after_terminator_are_dropped() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00\r\n0GS09\r\n");
        let mut driver = driver(&mock);

        assert_eq!(driver.status().await.unwrap(), Ell14Status::Ok);
    }

    #[tokio::test]
    async fn test_home_sequence() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0ho\n", b"0PO00000000\r\n");
        mock.expect(b"0gs\n", b"0GS09\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let mut driver = Ell14Driver::with_settings(
            mock.clone(),
            Address::new(0).unwrap(),
            1234,
            fast_settings(),
        );

        driver.home().await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
        assert_eq!(driver.offset(), 1234);
    }

    #[tokio::test]
    async fn test_home_fault_and_ok_status_ack() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0ho\n", b"0GS02\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0ho\n", b"0GS00\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.home().await,
            Err(Ell14Error::DeviceFault(Ell14Status::MechanicalTimeout))
        ));
        driver.home().await.unwrap();
    }

    #[tokio::test]
    async fn test_any_status_reply_to_move_is_fault() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0mrFFFF7400\n", b"0GS00\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0mrFFFF7400\n", b"0GS0F\r\n");
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.move_by(90.0).await,
            Err(Ell14Error::DeviceFault(Ell14Status::Ok))
        ));
        assert!(matches!(
            driver.move_by(90.0).await,
            Err(Ell14Error::UnknownStatus(15))
        ));
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[tokio::test]
    async fn test_address_checked_before_payload() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"1GSzz\r\n");
        mock.expect(b"0gp\n", b"3PO123456789\r\n");
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.status().await,
            Err(Ell14Error::AddressMismatch {
                expected: '0',
                actual: '1'
            })
        ));
        assert!(matches!(
            driver.raw_position().await,
            Err(Ell14Error::AddressMismatch { actual: '3', .. })
        ));
    }

    #[tokio::test]
    async fn test_offset_overflow_is_an_error() {
        let mock = MockTransport::new();
        mock.expect(b"0gp\n", &position_reply(1));
        let mut driver = Ell14Driver::with_settings(
            mock.clone(),
            Address::new(0).unwrap(),
            i64::MAX,
            fast_settings(),
        );

        assert!(matches!(
            driver.angle_unwrapped().await,
            Err(Ell14Error::PositionOverflow(i64::MAX))
        ));
    }

    #[tokio::test]
    async fn test_set_angle_takes_short_way() {
        let mock = MockTransport::new();
        // 315 degrees -> 45 degrees is +90, not -270
        mock.expect(b"0gp\n", &position_reply(-125440));
        mock.expect(b"0gs\n", b"0GS00\r\n");
        mock.expect(b"0mrFFFF7400\n", b"0PO00000000\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let mut driver = driver(&mock);

        driver.set_angle(45.0).await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[tokio::test]
    async fn test_set_angle_unwrapped_goes_the_long_way() {
        let mock = MockTransport::new();
        // unwrapped 315 -> 405 is +90; 315 -> 45 unwrapped is -270
        mock.expect(b"0gp\n", &position_reply(-125440));
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let expected = protocol::encode_command(
            Address::new(0).unwrap(),
            command::MOVE_RELATIVE,
            &protocol::encode_move_payload(protocol::move_counts(-270.0)).unwrap(),
        );
        mock.expect(&expected, b"0PO00000000\r\n");
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let mut driver = driver(&mock);

        driver.set_angle_unwrapped(45.0).await.unwrap();
        assert_eq!(mock.remaining_expectations(), 0);
    }

    #[tokio::test]
    async fn test_non_finite_angles_rejected_without_io() {
        let mock = MockTransport::new();
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.move_by(f64::NAN).await,
            Err(Ell14Error::InvalidAngle(_))
        ));
        assert!(driver.set_angle(f64::INFINITY).await.is_err());
        assert!(mock.sent_frames().is_empty());
    }

    #[tokio::test]
    async fn test_overflowing_move_rejected_without_io() {
        let mock = MockTransport::new();
        let mut driver = driver(&mock);

        assert!(matches!(
            driver.move_by(1.0e7).await,
            Err(Ell14Error::PositionOverflow(_))
        ));
        assert!(mock.sent_frames().is_empty());
    }

    #[tokio::test]
    async fn test_closed_device() {
        let mock = MockTransport::new();
        let mut driver = driver(&mock);

        driver.close().await.unwrap();
        assert!(driver.is_closed());
        assert!(mock.is_closed());
        assert!(matches!(driver.status().await, Err(Ell14Error::ClosedDevice)));
        assert!(matches!(driver.tare().await, Err(Ell14Error::ClosedDevice)));
        assert!(matches!(driver.close().await, Err(Ell14Error::ClosedDevice)));
    }

    #[tokio::test]
    #[traced_test]
    async fn test_transactions_are_logged() {
        let mock = MockTransport::new();
        mock.expect(b"0gs\n", b"0GS00\r\n");
        let mut driver = driver(&mock);

        driver.status().await.unwrap();
        assert!(logs_contain("ELL14 transaction"));
        assert!(logs_contain("0GS00"));
    }
}
