//! # ELL14 Rotation Stage Library
//!
//! Host-side driver for the Thorlabs Elliptec ELL14 rotation mount, spoken to
//! over its ASCII serial protocol. The library covers the wire codec, the
//! device status table and an async controller that issues one
//! request/response exchange at a time.
//!
//! ## Crate Structure
//!
//! - **`address`**: Bus address of a module (`0`-`9`).
//! - **`protocol`**: Frame encoding/decoding, count/degree conversion and
//!   two's-complement helpers.
//! - **`status`**: The `GS` status code table.
//! - **`transport`**: The byte-level [`Transport`] trait and its serial implementation.
//! - **`driver`**: [`Ell14Driver`], the device controller.
//! - **`mock`**: Scripted transport for tests.
//! - **`sim`**: [`SimulatedStage`], a transport that behaves like a real stage.
//! - **`scan`**: Angle sweeps built on the driver.
//! - **`config`**: Figment-based configuration loading.
//! - **`logging`**: `tracing` subscriber setup.
//! - **`error`**: The crate-wide [`Ell14Error`] type.

pub mod address;
pub mod config;
pub mod driver;
pub mod error;
pub mod logging;
pub mod mock;
pub mod protocol;
pub mod scan;
pub mod sim;
pub mod status;
pub mod transport;

pub use address::Address;
pub use driver::{DriverSettings, Ell14Driver};
pub use error::{Ell14Error, Result};
pub use mock::MockTransport;
pub use protocol::COUNTS_PER_REV;
pub use sim::SimulatedStage;
pub use status::Ell14Status;
pub use transport::{SerialTransport, Transport};
