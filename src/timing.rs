//! Bus timing
//!
//! The driver never reads the busy flag, so every delay here has to cover the
//! worst case on its own. The values sit well above the datasheet minimums
//! (which assume a 270 kHz oscillator) to tolerate slow clones and cold
//! panels. Do not shorten them: a missed instruction only shows up as garbage
//! on the glass.
//!
//! All values are in microseconds.

use crate::command::{CLEAR, RETURN_HOME};

/// Wait after power-up before the first reset nibble (datasheet: 15ms)
pub const POWER_ON_US: u32 = 16_000;

/// Wait after the first reset nibble (datasheet: 4.1ms)
pub const RESET_FIRST_US: u32 = 5_000;

/// Wait after the second reset nibble (datasheet: 100us)
pub const RESET_SECOND_US: u32 = 1_000;

/// Wait after the third reset nibble
pub const RESET_THIRD_US: u32 = 1_000;

/// Wait after the nibble that selects 4-bit mode
pub const FOUR_BIT_SWITCH_US: u32 = 1_000;

/// EN high time (datasheet: 450ns)
pub const ENABLE_PULSE_US: u32 = 250;

/// Wait after EN falls before the lines may change again
pub const NIBBLE_SETTLE_US: u32 = 50;

/// Execution time of ordinary instructions (datasheet: 37us)
pub const COMMAND_US: u32 = 50;

/// Execution time of CLEAR and RETURN_HOME (datasheet: 1.52ms)
pub const CLEAR_HOME_US: u32 = 2_000;

/// Execution time of a data write (datasheet: 37us + 4us)
pub const DATA_WRITE_US: u32 = 50;

/// Execution time of an instruction byte
///
/// CLEAR and RETURN_HOME also walk the address counter back to 0, which
/// takes far longer than anything else in the instruction set.
pub fn command_execution_us(command: u8) -> u32 {
    // RETURN_HOME ignores bit 0, so 0x03 is also a return home
    if command == CLEAR || command & !0x01 == RETURN_HOME {
        CLEAR_HOME_US
    } else {
        COMMAND_US
    }
}
