//! HD44780 instruction set
//!
//! Every instruction is a single byte sent with RS low. The highest set bit is
//! the opcode; the bits below it are parameters. Each encoder masks its
//! parameters to the width below the opcode, so an over-wide parameter can
//! never turn into a different instruction.
//!
//! ## Example
//!
//! ```
//! use hd44780::command;
//!
//! // DDRAM addresses are 7 bits wide
//! assert_eq!(command::ddram_address(200), command::DDRAM_ADDR | 72);
//!
//! // Display on, cursor off, blink off
//! assert_eq!(command::display_control(true, false, false), 0x0C);
//! ```

use crate::config::{BusWidth, Font, LineCount};

// Opcodes

/// Clear display (0x01)
///
/// Writes spaces to all of DDRAM and resets the address counter to 0.
/// Long execution time.
pub const CLEAR: u8 = 0x01;

/// Return home (0x02)
///
/// Resets the address counter to 0 and undoes any display shift.
/// Long execution time.
pub const RETURN_HOME: u8 = 0x02;

/// Entry mode set (0x04)
///
/// Selects the address counter direction and whether writes shift the display.
pub const ENTRY_MODE: u8 = 0x04;

/// Display on/off control (0x08)
pub const DISPLAY: u8 = 0x08;

/// Cursor or display shift (0x10)
pub const SHIFT: u8 = 0x10;

/// Function set (0x20)
///
/// Selects bus width, line count and font.
pub const FUNCTION: u8 = 0x20;

/// Set CGRAM address (0x40)
pub const CGRAM_ADDR: u8 = 0x40;

/// Set DDRAM address (0x80)
pub const DDRAM_ADDR: u8 = 0x80;

// Parameter masks

/// Parameter bits of ENTRY_MODE (byte width 3 bits)
pub const ENTRY_MODE_PARAMS: u8 = 0x03;
/// Parameter bits of DISPLAY (byte width 4 bits)
pub const DISPLAY_PARAMS: u8 = 0x07;
/// Parameter bits of SHIFT (byte width 5 bits)
pub const SHIFT_PARAMS: u8 = 0x0F;
/// Parameter bits of FUNCTION (byte width 6 bits)
pub const FUNCTION_PARAMS: u8 = 0x1F;
/// Parameter bits of CGRAM_ADDR (6-bit address)
pub const CGRAM_ADDR_PARAMS: u8 = 0x3F;
/// Parameter bits of DDRAM_ADDR (7-bit address)
pub const DDRAM_ADDR_PARAMS: u8 = 0x7F;

// ENTRY_MODE flags

/// Shift the display on every write
pub const ENTRY_SHIFT_DISPLAY: u8 = 0x01;
/// Increment the address counter (cursor moves right)
pub const ENTRY_ADDR_INC: u8 = 0x02;

// DISPLAY flags

/// Display on
pub const DISPLAY_ON: u8 = 0x04;
/// Cursor underline on
pub const DISPLAY_CURSOR_ON: u8 = 0x02;
/// Cursor blink on
pub const DISPLAY_BLINK_ON: u8 = 0x01;

// SHIFT flags

/// Shift the display instead of moving the cursor
pub const SHIFT_DISPLAY: u8 = 0x08;
/// Shift to the right
pub const SHIFT_RIGHT: u8 = 0x04;

// FUNCTION flags

/// 8-bit bus
pub const FUNCTION_BUS_8BIT: u8 = 0x10;
/// Two-line mode
pub const FUNCTION_LINES_2: u8 = 0x08;
/// 5x10 font
pub const FUNCTION_FONT_5X10: u8 = 0x04;

/// Nibble sent three times during initialization to resynchronize the bus
///
/// This is the high nibble of FUNCTION with the 8-bit flag set.
pub const RESET_NIBBLE: u8 = (FUNCTION | FUNCTION_BUS_8BIT) >> 4;

/// Nibble that switches the controller into 4-bit mode
pub const FOUR_BIT_NIBBLE: u8 = FUNCTION >> 4;

/// Address counter direction after a RAM access
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum EntryDirection {
    /// Address counter increments, cursor moves right
    #[default]
    Increment,
    /// Address counter decrements, cursor moves left
    Decrement,
}

/// What a SHIFT instruction moves
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShiftTarget {
    /// Move the cursor (address counter)
    Cursor,
    /// Shift the whole display window
    Display,
}

/// Direction of a SHIFT instruction
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ShiftDirection {
    /// Left
    Left,
    /// Right
    Right,
}

/// Combine an opcode with its parameter bits
///
/// Bits of `params` outside `mask` are discarded.
pub const fn compose(opcode: u8, mask: u8, params: u8) -> u8 {
    opcode | (params & mask)
}

/// ENTRY_MODE instruction
pub fn entry_mode(direction: EntryDirection, shift_display: bool) -> u8 {
    let mut params = 0;
    if direction == EntryDirection::Increment {
        params |= ENTRY_ADDR_INC;
    }
    if shift_display {
        params |= ENTRY_SHIFT_DISPLAY;
    }
    compose(ENTRY_MODE, ENTRY_MODE_PARAMS, params)
}

/// DISPLAY instruction
pub fn display_control(display_on: bool, cursor_on: bool, blink_on: bool) -> u8 {
    let mut params = 0;
    if display_on {
        params |= DISPLAY_ON;
    }
    if cursor_on {
        params |= DISPLAY_CURSOR_ON;
    }
    if blink_on {
        params |= DISPLAY_BLINK_ON;
    }
    compose(DISPLAY, DISPLAY_PARAMS, params)
}

/// SHIFT instruction
pub fn shift(target: ShiftTarget, direction: ShiftDirection) -> u8 {
    let mut params = 0;
    if target == ShiftTarget::Display {
        params |= SHIFT_DISPLAY;
    }
    if direction == ShiftDirection::Right {
        params |= SHIFT_RIGHT;
    }
    compose(SHIFT, SHIFT_PARAMS, params)
}

/// FUNCTION instruction
pub fn function_set(bus_width: BusWidth, lines: LineCount, font: Font) -> u8 {
    let mut params = 0;
    if bus_width == BusWidth::EightBit {
        params |= FUNCTION_BUS_8BIT;
    }
    if lines == LineCount::Two {
        params |= FUNCTION_LINES_2;
    }
    if font == Font::Font5x10 {
        params |= FUNCTION_FONT_5X10;
    }
    compose(FUNCTION, FUNCTION_PARAMS, params)
}

/// CGRAM_ADDR instruction, address masked to 6 bits
pub const fn cgram_address(address: u8) -> u8 {
    compose(CGRAM_ADDR, CGRAM_ADDR_PARAMS, address)
}

/// DDRAM_ADDR instruction, address masked to 7 bits
pub const fn ddram_address(address: u8) -> u8 {
    compose(DDRAM_ADDR, DDRAM_ADDR_PARAMS, address)
}
