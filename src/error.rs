//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and controller operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Invalid configuration, rejected before a driver exists
//! - [`Error`] - Runtime errors during controller operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level GPIO errors
//!
//! There is no hardware fault variant. The bus is write-only, so a controller
//! that is missing or miswired looks exactly like a working one.
//!
//! ## Example
//!
//! ```
//! use hd44780::{Builder, BuilderError, Font, Geometry, LineCount};
//!
//! // Missing geometry
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingGeometry)));
//!
//! // The 5x10 font needs one-line mode
//! let geometry = Geometry::new(16, 1).unwrap();
//! let result = Builder::new()
//!     .geometry(geometry)
//!     .lines(LineCount::Two)
//!     .font(Font::Font5x10)
//!     .build();
//! assert!(matches!(result, Err(BuilderError::IncompatibleFont { .. })));
//! ```

use crate::config::{Font, LineCount};
use crate::driver::DriverState;
use crate::interface::BusInterface;

/// Maximum rows addressable by a single HD44780
pub const MAX_ROWS: u8 = 4;

/// Maximum columns per row addressable by a single HD44780
pub const MAX_COLUMNS: u8 = 40;

/// Number of character cells held in DDRAM
pub const DDRAM_CAPACITY: u8 = 80;

/// Which controller RAM an address refers to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Ram {
    /// Character generator RAM, 6-bit address
    Cgram,
    /// Display data RAM, 7-bit address
    Ddram,
}

/// Errors that can occur when driving the controller
///
/// Generic over the interface type to preserve the specific error type.
#[derive(Debug)]
pub enum Error<I: BusInterface> {
    /// Bus interface error (GPIO)
    ///
    /// Wraps the underlying hardware error from the [`BusInterface`] implementation.
    Interface(I::Error),
    /// A byte transfer was requested before initialization completed
    ///
    /// No bus activity takes place.
    NotInitialized {
        /// State the driver was in
        state: DriverState,
    },
    /// Address outside the range of the addressed RAM
    InvalidAddress {
        /// RAM being addressed
        ram: Ram,
        /// Requested address
        address: u8,
        /// Largest valid address
        max: u8,
    },
    /// Line count and font cannot be combined
    IncompatibleFont {
        /// Requested line count
        lines: LineCount,
        /// Requested font
        font: Font,
    },
    /// Only 4-bit bus mode is supported
    UnsupportedBusWidth,
    /// Custom glyph slot or bitmap does not fit the configured font
    InvalidGlyph {
        /// Requested slot
        slot: u8,
        /// Number of rows provided
        rows: usize,
    },
}

impl<I: BusInterface> core::fmt::Display for Error<I> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Interface(_) => write!(f, "Interface error"),
            Self::NotInitialized { state } => {
                write!(f, "Controller not initialized (state: {state:?})")
            }
            Self::InvalidAddress { ram, address, max } => {
                write!(f, "Invalid {ram:?} address {address} (max {max})")
            }
            Self::IncompatibleFont { lines, font } => {
                write!(f, "Font {font:?} is not available with {lines:?} line(s)")
            }
            Self::UnsupportedBusWidth => write!(f, "Only the 4-bit bus is supported"),
            Self::InvalidGlyph { slot, rows } => {
                write!(f, "Invalid glyph: slot {slot}, {rows} rows")
            }
        }
    }
}

impl<I: BusInterface + core::fmt::Debug> core::error::Error for Error<I> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the driver is created.
#[derive(Debug, PartialEq)]
pub enum BuilderError {
    /// Geometry was not specified
    ///
    /// [`Builder::geometry()`](crate::config::Builder::geometry) must be called before building.
    MissingGeometry,
    /// Invalid geometry provided
    ///
    /// See [`Geometry::new()`](crate::config::Geometry::new) for constraints.
    InvalidGeometry {
        /// Columns requested
        columns: u8,
        /// Rows requested
        rows: u8,
    },
    /// Line count and font cannot be combined
    IncompatibleFont {
        /// Requested line count
        lines: LineCount,
        /// Requested font
        font: Font,
    },
    /// Panel has more rows than one-line mode can drive
    TooFewLines {
        /// Rows on the panel
        rows: u8,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingGeometry => write!(f, "Geometry must be specified"),
            Self::InvalidGeometry { columns, rows } => write!(
                f,
                "Invalid geometry {columns}x{rows} (max {MAX_COLUMNS} columns, {MAX_ROWS} rows, {DDRAM_CAPACITY} cells)"
            ),
            Self::IncompatibleFont { lines, font } => {
                write!(f, "Font {font:?} is not available with {lines:?} line(s)")
            }
            Self::TooFewLines { rows } => {
                write!(f, "A {rows}-row panel needs two-line mode")
            }
        }
    }
}

impl core::error::Error for BuilderError {}
