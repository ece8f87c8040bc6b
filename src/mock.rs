//! Scripted transport for deterministic testing of the driver.
//!
//! [`MockTransport`] is pre-loaded with request/response pairs. Each `write`
//! must match the next expected request; the paired reply is then handed out by
//! subsequent `read_available` calls, one chunk per call. This reproduces busy
//! polls, fault replies, split frames and silent devices without hardware.
//!
//! The transport is a cheap handle: clones share the same script and sent log,
//! so a test can keep one clone after moving the other into the driver.
//!
//! # Example
//!
//! ```
//! use ell14_stage::mock::MockTransport;
//!
//! let mock = MockTransport::new();
//! mock.expect(b"0gs\n", b"0GS09\r\n"); // busy
//! mock.expect(b"0gs\n", b"0GS00\r\n"); // ready
//! assert_eq!(mock.remaining_expectations(), 2);
//! ```

use crate::error::Result;
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct Expectation {
    request: Vec<u8>,
    chunks: Vec<Vec<u8>>,
}

#[derive(Debug, Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    pending: VecDeque<Vec<u8>>,
    sent: Vec<Vec<u8>>,
    closed: bool,
}

/// A scripted [`Transport`] with a shared sent-frame log.
#[derive(Debug, Clone)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
    idle_read_delay: Duration,
}

impl MockTransport {
    /// Create an empty, open mock transport.
    pub fn new() -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            idle_read_delay: Duration::from_millis(2),
        }
    }

    /// Time a `read_available` call waits when no reply bytes are pending.
    pub fn with_idle_read_delay(mut self, delay: Duration) -> Self {
        self.idle_read_delay = delay;
        self
    }

    /// Expect `request` and answer it with `response` in one read.
    pub fn expect(&self, request: &[u8], response: &[u8]) {
        self.expect_chunked(request, &[response]);
    }

    /// Expect `request` and answer it with `chunks`, one chunk per read.
    pub fn expect_chunked(&self, request: &[u8], chunks: &[&[u8]]) {
        self.state.lock().expectations.push_back(Expectation {
            request: request.to_vec(),
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        });
    }

    /// Expect `request` and never answer it.
    pub fn expect_silence(&self, request: &[u8]) {
        self.expect_chunked(request, &[]);
    }

    /// Every frame written so far, in order.
    pub fn sent_frames(&self) -> Vec<Vec<u8>> {
        self.state.lock().sent.clone()
    }

    /// Number of scripted exchanges not yet consumed.
    pub fn remaining_expectations(&self) -> usize {
        self.state.lock().expectations.len()
    }

    /// Whether the transport has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

fn closed_error() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotConnected, "mock transport closed")
}

#[async_trait]
impl Transport for MockTransport {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(closed_error().into());
        }
        state.sent.push(data.to_vec());

        let expectation = state.expectations.pop_front().ok_or_else(|| {
            std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "no more expectations in mock transport, got {:?}",
                    String::from_utf8_lossy(data)
                ),
            )
        })?;

        if expectation.request != data {
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!(
                    "unexpected request: expected {:?}, got {:?}",
                    String::from_utf8_lossy(&expectation.request),
                    String::from_utf8_lossy(data)
                ),
            )
            .into());
        }

        state.pending = expectation.chunks.into();
        Ok(())
    }

    async fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(closed_error().into());
            }
            if let Some(mut chunk) = state.pending.pop_front() {
                let n = chunk.len().min(buf.len());
                buf[..n].copy_from_slice(&chunk[..n]);
                if n < chunk.len() {
                    state.pending.push_front(chunk.split_off(n));
                }
                return Ok(n);
            }
        }

        tokio::time::sleep(self.idle_read_delay).await;
        Ok(0)
    }

    async fn close(&mut self) -> Result<()> {
        self.state.lock().closed = true;
        Ok(())
    }
}
