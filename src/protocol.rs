//! ELLx ASCII frame codec.
//!
//! Protocol overview:
//! - Request: `[address][command][data as uppercase hex]\n`
//! - Response: `[address][header][payload as hex]\r\n`
//! - Address: a single ASCII digit, echoed in every reply
//! - Positions: 32-bit two's-complement integers in encoder counts
//! - Timing: half-duplex request/response, one outstanding request at a time
//!
//! The codec is pure: it never touches a transport. Accumulating bytes until
//! the terminator shows up is the controller's job.

use crate::address::Address;
use crate::error::{Ell14Error, Result};
use std::fmt::Write as _;

/// Encoder counts in one full mechanical revolution.
pub const COUNTS_PER_REV: i64 = 143_360;

/// Terminator closing every response frame.
pub const RESPONSE_TERMINATOR: &[u8] = b"\r\n";

/// Terminator closing every request frame.
pub const REQUEST_TERMINATOR: u8 = b'\n';

/// Width of the device position field in bits.
pub const POSITION_BITS: u32 = 32;

/// Host-to-device command codes.
pub mod command {
    /// Get status, answered with `GS`.
    pub const GET_STATUS: &str = "gs";
    /// Get position, answered with `PO`.
    pub const GET_POSITION: &str = "gp";
    /// Home to the mechanical reference.
    pub const HOME: &str = "ho";
    /// Move relative by a signed 32-bit count.
    pub const MOVE_RELATIVE: &str = "mr";
}

/// Device-to-host header codes.
pub mod header {
    /// Status report, payload is a status code.
    pub const STATUS: &str = "GS";
    /// Position report, payload is a 32-bit two's-complement position.
    pub const POSITION: &str = "PO";
}

/// A decoded device reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// Address digit echoed by the device.
    pub address: char,
    /// Two-character header code.
    pub header: String,
    /// Hex payload as an unsigned integer. An empty payload decodes as 0.
    pub payload: u32,
}

impl Response {
    /// True when the header is `GS`.
    pub fn is_status(&self) -> bool {
        self.header == header::STATUS
    }

    /// True when the header is `PO`.
    pub fn is_position(&self) -> bool {
        self.header == header::POSITION
    }
}

/// A decoded host request. Only the simulator needs to read requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// Target address digit.
    pub address: char,
    /// Two-character command code.
    pub command: String,
    /// Binary argument, decoded from hex.
    pub data: Vec<u8>,
}

/// Build a request frame: address digit, command, uppercase hex data, `\n`.
pub fn encode_command(address: Address, command: &str, data: &[u8]) -> Vec<u8> {
    let mut frame = String::with_capacity(3 + data.len() * 2 + 1);
    frame.push(address.as_char());
    frame.push_str(command);
    for byte in data {
        // Writing into a String cannot fail
        let _ = write!(frame, "{:02X}", byte);
    }
    frame.push(char::from(REQUEST_TERMINATOR));
    frame.into_bytes()
}

/// Parse a complete response frame.
///
/// The frame must end with `CR LF`, hold at least the address and a two
/// character header, and carry a payload of hex digits only.
pub fn decode_response(raw: &[u8]) -> Result<Response> {
    let body = raw
        .strip_suffix(RESPONSE_TERMINATOR)
        .ok_or_else(|| malformed("missing CR LF terminator", raw))?;

    if body.len() < 3 {
        return Err(malformed("frame shorter than address + header", raw));
    }
    if !body.is_ascii() {
        return Err(malformed("non-ASCII bytes in frame", raw));
    }

    let address = char::from(body[0]);
    let header = String::from_utf8_lossy(&body[1..3]).into_owned();
    let payload = parse_hex_u32(&body[3..]).ok_or_else(|| malformed("invalid hex payload", raw))?;

    Ok(Response {
        address,
        header,
        payload,
    })
}

/// Address digit of a complete response frame, read without parsing the payload.
pub fn response_address(raw: &[u8]) -> Result<char> {
    let body = raw
        .strip_suffix(RESPONSE_TERMINATOR)
        .ok_or_else(|| malformed("missing CR LF terminator", raw))?;
    match body.first() {
        Some(&digit) if body.len() >= 3 => Ok(char::from(digit)),
        _ => Err(malformed("frame shorter than address + header", raw)),
    }
}

/// Parse a request frame produced by [`encode_command`].
pub fn decode_command(raw: &[u8]) -> Result<Request> {
    let body = raw
        .strip_suffix(&[REQUEST_TERMINATOR])
        .ok_or_else(|| malformed("missing LF terminator", raw))?;

    if body.len() < 3 || !body.is_ascii() {
        return Err(malformed("request shorter than address + command", raw));
    }

    let hex = &body[3..];
    if hex.len() % 2 != 0 {
        return Err(malformed("odd-length hex data", raw));
    }
    let data = hex
        .chunks(2)
        .map(|pair| {
            std::str::from_utf8(pair)
                .ok()
                .and_then(|s| u8::from_str_radix(s, 16).ok())
        })
        .collect::<Option<Vec<u8>>>()
        .ok_or_else(|| malformed("invalid hex data", raw))?;

    Ok(Request {
        address: char::from(body[0]),
        command: String::from_utf8_lossy(&body[1..3]).into_owned(),
        data,
    })
}

fn parse_hex_u32(digits: &[u8]) -> Option<u32> {
    if digits.is_empty() {
        return Some(0);
    }
    if !digits.iter().all(u8::is_ascii_hexdigit) {
        return None;
    }
    let s = std::str::from_utf8(digits).ok()?;
    u32::from_str_radix(s, 16).ok()
}

fn malformed(reason: &str, raw: &[u8]) -> Ell14Error {
    Ell14Error::MalformedFrame(format!("{}: {:?}", reason, String::from_utf8_lossy(raw)))
}

// =============================================================================
// Two's complement
// =============================================================================

/// Interpret the low `bits` bits of `value` as a two's-complement integer.
pub fn to_signed(value: u64, bits: u32) -> i64 {
    debug_assert!((1..=63).contains(&bits));
    let modulus = 1i64 << bits;
    let value = (value & (modulus as u64 - 1)) as i64;
    if value < modulus / 2 {
        value
    } else {
        value - modulus
    }
}

/// Encode `value` as a `bits`-wide two's-complement integer.
///
/// Negative values are offset by `2^bits`; non-negative values pass through.
pub fn to_unsigned(value: i64, bits: u32) -> u64 {
    debug_assert!((1..=63).contains(&bits));
    if value < 0 {
        ((1i64 << bits) + value) as u64
    } else {
        value as u64
    }
}

/// [`to_signed`] for the 32-bit position field.
pub fn to_signed32(value: u64) -> i64 {
    to_signed(value, POSITION_BITS)
}

/// [`to_unsigned`] for the 32-bit position field.
pub fn to_unsigned32(value: i64) -> u64 {
    to_unsigned(value, POSITION_BITS)
}

// =============================================================================
// Angle math
// =============================================================================

/// Encoder counts to send with `mr` for a move of `delta_deg`.
///
/// Positive counts turn the stage the opposite way to increasing angle, so the
/// result is negated. Halves round to even.
pub fn move_counts(delta_deg: f64) -> i64 {
    -((delta_deg * COUNTS_PER_REV as f64 / 360.0).round_ties_even() as i64)
}

/// Angle in degrees for an offset-corrected position in counts.
pub fn counts_to_degrees(counts: i64) -> f64 {
    -360.0 * counts as f64 / COUNTS_PER_REV as f64
}

/// 4-byte big-endian `mr` payload for a signed count.
pub fn encode_move_payload(counts: i64) -> Result<[u8; 4]> {
    if i32::try_from(counts).is_err() {
        return Err(Ell14Error::PositionOverflow(counts));
    }
    let raw = u32::try_from(to_unsigned32(counts)).map_err(|_| Ell14Error::PositionOverflow(counts))?;
    Ok(raw.to_be_bytes())
}

/// Reduce an angle into `[0, 360)`.
pub fn wrap_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid rounds tiny negative inputs up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed delta from `current` to `target` taking the short way round.
///
/// Both angles are in degrees; the result lies in `[-180, 180]`.
pub fn shortest_delta(current: f64, target: f64) -> f64 {
    let mut delta = wrap_degrees(target) - current;
    if delta > 180.0 {
        delta -= 360.0;
    }
    if delta < -180.0 {
        delta += 360.0;
    }
    delta
}
