//! Byte-stream transport consumed by the driver.
//!
//! The driver only needs three operations from the link to the device: write a
//! frame, read whatever bytes are available within a short timeout, and close.
//! [`Transport`] captures exactly that, so the controller runs unchanged against
//! a real serial port, the scripted [`MockTransport`](crate::mock::MockTransport)
//! or the [`SimulatedStage`](crate::sim::SimulatedStage).

use crate::error::Result;
use async_trait::async_trait;
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Minimal byte-level link to one device.
#[async_trait]
pub trait Transport: Send {
    /// Write all of `data` and flush it to the device.
    async fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Read the bytes that arrive within the transport's short read timeout.
    ///
    /// Returns `Ok(0)` when nothing arrived. Callers accumulate across calls.
    async fn read_available(&mut self, buf: &mut [u8]) -> Result<usize>;

    /// Release the underlying link. Further writes and reads fail.
    async fn close(&mut self) -> Result<()>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        (**self).write(data).await
    }

    async fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        (**self).read_available(buf).await
    }

    async fn close(&mut self) -> Result<()> {
        (**self).close().await
    }
}

/// Trait for types that can be used as async serial ports.
pub trait SerialPortIO: AsyncRead + AsyncWrite + Unpin + Send {}
impl<T: AsyncRead + AsyncWrite + Unpin + Send> SerialPortIO for T {}

/// Dynamic serial port type.
pub type DynSerial = Box<dyn SerialPortIO>;

/// [`Transport`] over any tokio byte stream, typically a `tokio_serial::SerialStream`.
pub struct SerialTransport<S = DynSerial> {
    port: Option<S>,
    read_timeout: Duration,
}

impl<S: SerialPortIO> SerialTransport<S> {
    /// Per-call read timeout, matching the 50 ms the device needs to start replying.
    pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(50);

    /// Wrap an open stream with the default read timeout.
    pub fn new(port: S) -> Self {
        Self::with_read_timeout(port, Self::DEFAULT_READ_TIMEOUT)
    }

    /// Wrap an open stream with a custom per-call read timeout.
    pub fn with_read_timeout(port: S, read_timeout: Duration) -> Self {
        Self {
            port: Some(port),
            read_timeout,
        }
    }

    /// Per-call read timeout.
    pub fn read_timeout(&self) -> Duration {
        self.read_timeout
    }

    /// Whether [`Transport::close`] has been called.
    pub fn is_closed(&self) -> bool {
        self.port.is_none()
    }

    fn port_mut(&mut self) -> std::io::Result<&mut S> {
        self.port
            .as_mut()
            .ok_or_else(|| std::io::Error::new(std::io::ErrorKind::NotConnected, "transport closed"))
    }
}

#[async_trait]
impl<S: SerialPortIO> Transport for SerialTransport<S> {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let port = self.port_mut()?;
        port.write_all(data).await?;
        port.flush().await?;
        Ok(())
    }

    async fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        let read_timeout = self.read_timeout;
        let port = self.port_mut()?;
        match tokio::time::timeout(read_timeout, port.read(buf)).await {
            Err(_) => Ok(0),
            Ok(Ok(0)) => Err(std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "serial stream closed by peer",
            )
            .into()),
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e))
                if matches!(
                    e.kind(),
                    std::io::ErrorKind::WouldBlock | std::io::ErrorKind::TimedOut
                ) =>
            {
                Ok(0)
            }
            Ok(Err(e)) => Err(e.into()),
        }
    }

    async fn close(&mut self) -> Result<()> {
        if let Some(mut port) = self.port.take() {
            port.shutdown().await?;
            tracing::debug!("Serial transport closed");
        }
        Ok(())
    }
}

/// Open a serial port with ELL14 default settings (9600 baud, 8N1, no flow control).
///
/// Must be called from within a tokio runtime.
#[cfg(feature = "serial")]
pub fn open_serial_port(
    port_path: &str,
    read_timeout: Duration,
) -> Result<SerialTransport<tokio_serial::SerialStream>> {
    use tokio_serial::SerialPortBuilderExt;

    let port = tokio_serial::new(port_path, 9600)
        .data_bits(tokio_serial::DataBits::Eight)
        .parity(tokio_serial::Parity::None)
        .stop_bits(tokio_serial::StopBits::One)
        .flow_control(tokio_serial::FlowControl::None)
        .timeout(read_timeout)
        .open_native_async()
        .map_err(std::io::Error::from)?;

    tracing::info!(port = port_path, timeout_ms = ?read_timeout.as_millis(), "Opened ELL14 serial port");
    Ok(SerialTransport::with_read_timeout(port, read_timeout))
}
