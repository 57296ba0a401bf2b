//! Hardware interface abstraction
//!
//! This module provides the [`BusInterface`] trait and the [`ParallelInterface`]
//! struct for driving the HD44780 bus lines.
//!
//! ## Hardware Requirements
//!
//! The driver only writes to the controller. It needs:
//! - **RS**: Register select (output, low=instruction, high=data)
//! - **RW**: Read/write (output, optional, may be tied to ground)
//! - **EN**: Enable strobe (output)
//! - **D4-D7**: Upper half of the data bus (outputs). D0-D3 stay unconnected.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_hal::digital::{OutputPin, PinState};
//! use hd44780::{BusInterface, Line, ParallelInterface};
//! # use core::convert::Infallible;
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl embedded_hal::delay::DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! // RW tied to ground
//! let mut interface = ParallelInterface::new(
//!     MockPin,
//!     None,
//!     MockPin,
//!     [MockPin, MockPin, MockPin, MockPin],
//!     MockDelay,
//! );
//!
//! let _ = interface.set_line(Line::Rs, PinState::High);
//! interface.delay_us(40);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};

type InterfaceResult<T, E> = core::result::Result<T, E>;

/// A single line of the HD44780 bus
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Line {
    /// Register select
    Rs,
    /// Read/write
    Rw,
    /// Enable
    En,
    /// Data bit 4
    D4,
    /// Data bit 5
    D5,
    /// Data bit 6
    D6,
    /// Data bit 7
    D7,
}

impl Line {
    /// Data lines in nibble bit order (D4 carries bit 0)
    pub const DATA: [Line; 4] = [Line::D4, Line::D5, Line::D6, Line::D7];
}

/// Trait for the bus line driver underneath the protocol engine
///
/// Implementations set one line at a time and provide a blocking delay. They
/// carry no protocol knowledge; sequencing and timing belong to
/// [`Hd44780`](crate::driver::Hd44780).
///
/// ## Implementing
///
/// For most cases, use the provided [`ParallelInterface`]. Implement this
/// trait yourself to route the lines through a port expander or to record the
/// bus in tests.
pub trait BusInterface {
    /// Error type for line operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Drive a line to the given level
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying GPIO fails.
    fn set_line(&mut self, line: Line, level: PinState) -> InterfaceResult<(), Self::Error>;

    /// Block for at least `us` microseconds
    ///
    /// May overshoot, must never undershoot.
    fn delay_us(&mut self, us: u32);
}

impl<T: BusInterface + ?Sized> BusInterface for &mut T {
    type Error = T::Error;

    fn set_line(&mut self, line: Line, level: PinState) -> InterfaceResult<(), Self::Error> {
        (**self).set_line(line, level)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us);
    }
}

/// Errors that can occur at the interface level
///
/// Generic over control and data pin error types.
#[derive(Debug)]
pub enum InterfaceError<CtrlErr, DataErr> {
    /// RS, RW or EN pin error
    Control(CtrlErr),
    /// D4-D7 pin error
    Data(DataErr),
}

impl<CtrlErr: Debug, DataErr: Debug> core::fmt::Display for InterfaceError<CtrlErr, DataErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Control(e) => write!(f, "Control pin error: {e:?}"),
            Self::Data(e) => write!(f, "Data pin error: {e:?}"),
        }
    }
}

impl<CtrlErr: Debug, DataErr: Debug> core::error::Error for InterfaceError<CtrlErr, DataErr> {}

/// GPIO implementation of [`BusInterface`]
///
/// Binds the bus lines to embedded-hal v1.0 output pins and the delay to a
/// [`DelayNs`] provider.
///
/// ## Type Parameters
///
/// * `CTRL` - RS, RW and EN pins implementing [`OutputPin`]
/// * `DATA` - D4-D7 pins implementing [`OutputPin`]
/// * `D` - Delay provider implementing [`DelayNs`]
pub struct ParallelInterface<CTRL, DATA, D> {
    /// Register select pin
    rs: CTRL,
    /// Read/write pin, `None` when tied to ground
    rw: Option<CTRL>,
    /// Enable pin
    en: CTRL,
    /// D4, D5, D6, D7
    data: [DATA; 4],
    /// Delay provider
    delay: D,
}

impl<CTRL, DATA, D> ParallelInterface<CTRL, DATA, D>
where
    CTRL: OutputPin,
    DATA: OutputPin,
    D: DelayNs,
{
    /// Create a new ParallelInterface
    ///
    /// # Arguments
    ///
    /// * `rs` - Register select pin
    /// * `rw` - Read/write pin, or `None` if RW is wired to ground
    /// * `en` - Enable pin
    /// * `data` - D4, D5, D6, D7 in that order
    /// * `delay` - Delay provider
    pub fn new(rs: CTRL, rw: Option<CTRL>, en: CTRL, data: [DATA; 4], delay: D) -> Self {
        Self {
            rs,
            rw,
            en,
            data,
            delay,
        }
    }

    /// Whether an RW pin is attached
    pub fn has_rw(&self) -> bool {
        self.rw.is_some()
    }

    /// Give back the pins and the delay provider
    #[allow(clippy::type_complexity)]
    pub fn release(self) -> (CTRL, Option<CTRL>, CTRL, [DATA; 4], D) {
        (self.rs, self.rw, self.en, self.data, self.delay)
    }
}

impl<CTRL, DATA, D> BusInterface for ParallelInterface<CTRL, DATA, D>
where
    CTRL: OutputPin,
    CTRL::Error: Debug,
    DATA: OutputPin,
    DATA::Error: Debug,
    D: DelayNs,
{
    type Error = InterfaceError<CTRL::Error, DATA::Error>;

    fn set_line(&mut self, line: Line, level: PinState) -> InterfaceResult<(), Self::Error> {
        let control = match line {
            Line::Rs => &mut self.rs,
            Line::En => &mut self.en,
            Line::Rw => match self.rw.as_mut() {
                Some(rw) => rw,
                // Tied to ground, already low
                None => return Ok(()),
            },
            Line::D4 | Line::D5 | Line::D6 | Line::D7 => {
                let index = match line {
                    Line::D4 => 0,
                    Line::D5 => 1,
                    Line::D6 => 2,
                    _ => 3,
                };
                return self.data[index]
                    .set_state(level)
                    .map_err(InterfaceError::Data);
            }
        };
        control.set_state(level).map_err(InterfaceError::Control)
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }
}
