//! Simulated ELL14 rotation stage.
//!
//! [`SimulatedStage`] implements [`Transport`] by decoding each request frame
//! and answering the way the hardware does. It keeps a raw position register in
//! encoder counts and reports `busy` for a configurable number of status polls
//! after every motion. Faults can be injected to exercise error paths.
//!
//! # Behaviour
//!
//! - `gs`: `GS` with the injected fault, `busy` while settling, else `ok`
//! - `gp`: `PO` with the position as 32-bit two's complement
//! - `ho`: position register returns to 0, answered with `PO`
//! - `mr`: signed 32-bit delta added to the register, answered with `PO`
//! - anything else: `GS` command error
//!
//! Requests addressed to another module get no reply, as on a shared bus.

use crate::address::Address;
use crate::error::Result;
use crate::protocol::{self, command, header};
use crate::status::Ell14Status;
use crate::transport::Transport;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug)]
struct StageState {
    address: Address,
    position: i64,
    busy_polls_per_move: u32,
    busy_polls_remaining: u32,
    next_motion_fault: Option<Ell14Status>,
    status_fault: Option<Ell14Status>,
    moves: Vec<i64>,
    homes: u32,
    outbox: VecDeque<u8>,
    closed: bool,
}

impl StageState {
    fn reply(&mut self, header: &str, payload: String) {
        let frame = format!("{}{}{}\r\n", self.address.as_char(), header, payload);
        self.outbox.extend(frame.bytes());
    }

    fn reply_status(&mut self, status: Ell14Status) {
        self.reply(header::STATUS, format!("{:02X}", status.code()));
    }

    fn reply_position(&mut self) {
        let raw = protocol::to_unsigned32(self.position);
        self.reply(header::POSITION, format!("{:08X}", raw));
    }

    fn start_motion(&mut self) {
        self.busy_polls_remaining = self.busy_polls_per_move;
    }

    fn handle(&mut self, frame: &[u8]) {
        let request = match protocol::decode_command(frame) {
            Ok(request) => request,
            Err(e) => {
                tracing::debug!(error = %e, "Simulated ELL14 received malformed request");
                self.reply_status(Ell14Status::CommandError);
                return;
            }
        };

        if request.address != self.address.as_char() {
            tracing::trace!(to = %request.address, "Simulated ELL14 ignoring request for another address");
            return;
        }

        match request.command.as_str() {
            command::GET_STATUS => {
                let status = if let Some(fault) = self.status_fault {
                    fault
                } else if self.busy_polls_remaining > 0 {
                    self.busy_polls_remaining -= 1;
                    Ell14Status::Busy
                } else {
                    Ell14Status::Ok
                };
                self.reply_status(status);
            }
            command::GET_POSITION => self.reply_position(),
            command::HOME => {
                if let Some(fault) = self.next_motion_fault.take() {
                    self.reply_status(fault);
                    return;
                }
                self.position = 0;
                self.homes += 1;
                self.start_motion();
                self.reply_position();
            }
            command::MOVE_RELATIVE => {
                let Ok(bytes) = <[u8; 4]>::try_from(request.data.as_slice()) else {
                    self.reply_status(Ell14Status::CommandError);
                    return;
                };
                if let Some(fault) = self.next_motion_fault.take() {
                    self.reply_status(fault);
                    return;
                }
                let delta = protocol::to_signed32(u32::from_be_bytes(bytes) as u64);
                // the register wraps like the device's 32-bit counter
                self.position = protocol::to_signed32((self.position + delta) as u64);
                self.moves.push(delta);
                self.start_motion();
                self.reply_position();
            }
            _ => self.reply_status(Ell14Status::CommandError),
        }
    }
}

/// In-memory ELL14 device model. Clones share the same device.
#[derive(Debug, Clone)]
pub struct SimulatedStage {
    state: Arc<Mutex<StageState>>,
    idle_read_delay: Duration,
}

impl SimulatedStage {
    /// Create a stage at position 0 that reports busy twice after each motion.
    pub fn new(address: Address) -> Self {
        Self::with_position(address, 0)
    }

    /// Create a stage at the given raw position in counts.
    pub fn with_position(address: Address, position: i64) -> Self {
        Self {
            state: Arc::new(Mutex::new(StageState {
                address,
                position,
                busy_polls_per_move: 2,
                busy_polls_remaining: 0,
                next_motion_fault: None,
                status_fault: None,
                moves: Vec::new(),
                homes: 0,
                outbox: VecDeque::new(),
                closed: false,
            })),
            idle_read_delay: Duration::from_millis(2),
        }
    }

    /// Number of `busy` status replies after each motion.
    pub fn with_busy_polls(self, polls: u32) -> Self {
        self.state.lock().busy_polls_per_move = polls;
        self
    }

    /// Answer the next `ho` or `mr` with `GS` + `status` instead of moving.
    pub fn fail_next_motion(&self, status: Ell14Status) {
        self.state.lock().next_motion_fault = Some(status);
    }

    /// Report `status` on every `gs` until cleared with `None`.
    pub fn set_status_fault(&self, status: Option<Ell14Status>) {
        self.state.lock().status_fault = status;
    }

    /// Raw position register in counts.
    pub fn position(&self) -> i64 {
        self.state.lock().position
    }

    /// Every relative move applied so far, in counts.
    pub fn moves(&self) -> Vec<i64> {
        self.state.lock().moves.clone()
    }

    /// Number of completed home commands.
    pub fn homes(&self) -> u32 {
        self.state.lock().homes
    }

    /// Whether the transport has been closed.
    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }
}

fn closed_error() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::NotConnected, "simulated stage closed")
}

#[async_trait]
impl Transport for SimulatedStage {
    async fn write(&mut self, data: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        if state.closed {
            return Err(closed_error().into());
        }
        state.handle(data);
        Ok(())
    }

    async fn read_available(&mut self, buf: &mut [u8]) -> Result<usize> {
        {
            let mut state = self.state.lock();
            if state.closed {
                return Err(closed_error().into());
            }
            if !state.outbox.is_empty() {
                let n = state.outbox.len().min(buf.len());
                for (slot, byte) in buf.iter_mut().zip(state.outbox.drain(..n)) {
                    *slot = byte;
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

#[cfg(test)]
mod tests {
    use super::*;

    async fn exchange(stage: &mut SimulatedStage, request: &[u8]) -> Vec<u8> {
        stage.write(request).await.unwrap();
        let mut buf = [0u8; 64];
        let n = stage.read_available(&mut buf).await.unwrap();
        buf[..n].to_vec()
    }

    #[tokio::test]
    async fn test_position_and_status() {
        let mut stage = SimulatedStage::with_position(Address::new(0).unwrap(), -35840);
        assert_eq!(exchange(&mut stage, b"0gp\n").await, b"0POFFFF7400\r\n");
        assert_eq!(exchange(&mut stage, b"0gs\n").await, b"0GS00\r\n");
    }

    #[tokio::test]
    async fn test_move_reports_busy_then_ok() {
        let mut stage = SimulatedStage::new(Address::new(1).unwrap()).with_busy_polls(1);
        assert_eq!(exchange(&mut stage, b"1mr00008C00\n").await, b"1PO00008C00\r\n");
        assert_eq!(exchange(&mut stage, b"1gs\n").await, b"1GS09\r\n");
        assert_eq!(exchange(&mut stage, b"1gs\n").await, b"1GS00\r\n");
        assert_eq!(stage.moves(), vec![35840]);
    }

    #[tokio::test]
    async fn test_injected_fault_and_other_address() {
        let mut stage = SimulatedStage::new(Address::new(0).unwrap());
        stage.fail_next_motion(Ell14Status::MotorError);
        assert_eq!(exchange(&mut stage, b"0ho\n").await, b"0GS0B\r\n");
        assert_eq!(stage.homes(), 0);

        assert!(exchange(&mut stage, b"5gs\n").await.is_empty());
        assert_eq!(exchange(&mut stage, b"0xx\n").await, b"0GS03\r\n");
    }
}
