//! HD44780 Character LCD Driver
//!
//! A write-only, delay-synchronized driver for HD44780-compatible character
//! LCD controllers on a 4-bit parallel bus.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - Power-on reset sequence that recovers the controller from any state
//! - No busy-flag reads: RW can be tied to ground
//! - Parameter masking on every instruction
//! - Custom CGRAM glyphs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use hd44780::{Builder, Geometry, Hd44780, LineCount, ParallelInterface};
//!
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let (rs, rw, en) = (MockPin, MockPin, MockPin);
//! # let data = [MockPin, MockPin, MockPin, MockPin];
//! # let delay = MockDelay;
//! let interface = ParallelInterface::new(rs, Some(rw), en, data, delay);
//! let geometry = match Geometry::new(16, 2) {
//!     Ok(geometry) => geometry,
//!     Err(_) => return,
//! };
//! let config = match Builder::new().geometry(geometry).lines(LineCount::Two).build() {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut lcd = Hd44780::new(interface, config);
//! let _ = lcd.initialize();
//! let _ = lcd.set_display(true, false, false);
//! let _ = lcd.write_bytes(b"Hello");
//! ```

#![no_std]

#[cfg(test)]
extern crate alloc;

/// HD44780 instruction set and encoders
pub mod command;
/// Controller configuration types and builder
pub mod config;
/// Protocol engine
pub mod driver;
/// Error types for the driver
pub mod error;
/// Bus line abstraction
pub mod interface;
/// Delay table
pub mod timing;

pub use command::{EntryDirection, ShiftDirection, ShiftTarget};
pub use config::{Builder, BusWidth, Config, Font, Geometry, LineCount};
pub use driver::{DriverState, Hd44780, RegisterSelect};
pub use error::{BuilderError, DDRAM_CAPACITY, Error, MAX_COLUMNS, MAX_ROWS, Ram};
pub use interface::{BusInterface, InterfaceError, Line, ParallelInterface};
