//! Protocol engine
//!
//! [`Hd44780`] turns instructions and characters into 4-bit bus transactions
//! and owns the power-on initialization sequence. Every operation blocks
//! until its execution delay has elapsed.

use embedded_hal::digital::PinState;
use log::{debug, trace, warn};

use crate::command::{
    self, EntryDirection, FOUR_BIT_NIBBLE, RESET_NIBBLE, ShiftDirection, ShiftTarget,
};
use crate::config::{BusWidth, Config, Font, LineCount, check_font};
use crate::error::{Error, Ram};
use crate::interface::{BusInterface, Line};
use crate::timing::{
    DATA_WRITE_US, ENABLE_PULSE_US, FOUR_BIT_SWITCH_US, NIBBLE_SETTLE_US, POWER_ON_US,
    RESET_FIRST_US, RESET_SECOND_US, RESET_THIRD_US, command_execution_us,
};

type DriverResult<I> = core::result::Result<(), Error<I>>;

/// Largest CGRAM address
pub const MAX_CGRAM_ADDRESS: u8 = 0x3F;

/// Largest DDRAM address in one-line mode
pub const MAX_DDRAM_ADDRESS_ONE_LINE: u8 = 0x4F;

/// Last DDRAM address of the first line in two-line mode
pub const LINE1_END_TWO_LINE: u8 = 0x27;

/// First DDRAM address of the second line in two-line mode
pub const LINE2_START_TWO_LINE: u8 = 0x40;

/// Largest DDRAM address in two-line mode
pub const MAX_DDRAM_ADDRESS_TWO_LINE: u8 = 0x67;

/// Controller register addressed by a transfer
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum RegisterSelect {
    /// Instruction register (RS low)
    Command,
    /// Data register (RS high)
    Data,
}

impl RegisterSelect {
    fn level(self) -> PinState {
        match self {
            RegisterSelect::Command => PinState::Low,
            RegisterSelect::Data => PinState::High,
        }
    }
}

/// Initialization progress of the driver
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DriverState {
    /// Created, nothing sent yet
    #[default]
    Uninitialized,
    /// Reset nibbles in flight; only single nibbles may be sent
    Initializing,
    /// Controller is in 4-bit mode and accepts byte transfers
    Ready,
}

/// HD44780 driver
///
/// Owns the bus interface and tracks initialization. Pass `&mut interface`
/// instead of the interface itself to keep ownership outside the driver.
pub struct Hd44780<I>
where
    I: BusInterface,
{
    /// Bus line driver
    interface: I,
    /// Controller configuration
    config: Config,
    /// Initialization progress
    state: DriverState,
}

impl<I> Hd44780<I>
where
    I: BusInterface,
{
    /// Create a new driver; nothing is sent until [`initialize`](Self::initialize)
    pub fn new(interface: I, config: Config) -> Self {
        Self {
            interface,
            config,
            state: DriverState::Uninitialized,
        }
    }

    /// Current initialization state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Configuration the driver was created with
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Give back the bus interface
    pub fn release(self) -> I {
        self.interface
    }

    /// Bring the controller from an unknown state into 4-bit mode
    ///
    /// Sends the reset nibble three times followed by the 4-bit nibble, then
    /// FUNCTION, DISPLAY (all off), CLEAR and ENTRY_MODE (increment, no
    /// shift). The display stays off; call [`set_display`](Self::set_display)
    /// to turn it on.
    ///
    /// The controller cannot acknowledge anything, so this always succeeds
    /// unless a GPIO fails. Calling it again repeats the whole sequence.
    pub fn initialize(&mut self) -> DriverResult<I> {
        self.state = DriverState::Initializing;
        debug!("hd44780: initializing {:?}", self.config);

        self.set_line(Line::En, PinState::Low)?;
        self.set_line(Line::Rs, PinState::Low)?;
        self.set_line(Line::Rw, PinState::Low)?;
        self.interface.delay_us(POWER_ON_US);

        // Three resets bring the controller into 8-bit mode from any of its
        // possible states, including halfway through a 4-bit byte
        for wait_us in [RESET_FIRST_US, RESET_SECOND_US, RESET_THIRD_US] {
            self.send_nibble(RESET_NIBBLE, RegisterSelect::Command)?;
            self.interface.delay_us(wait_us);
        }

        self.send_nibble(FOUR_BIT_NIBBLE, RegisterSelect::Command)?;
        self.interface.delay_us(FOUR_BIT_SWITCH_US);
        self.state = DriverState::Ready;
        debug!("hd44780: 4-bit mode selected");

        self.send_command(command::function_set(
            BusWidth::FourBit,
            self.config.lines,
            self.config.font,
        ))?;
        self.set_display(false, false, false)?;
        self.clear()?;
        self.set_entry_mode(EntryDirection::Increment, false)?;

        debug!("hd44780: ready");
        Ok(())
    }

    /// Send a byte as two nibbles, high nibble first
    ///
    /// Waits for the execution time of the instruction afterwards.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotInitialized` without touching the bus unless the
    /// driver is [`DriverState::Ready`].
    pub fn send_byte(&mut self, value: u8, register: RegisterSelect) -> DriverResult<I> {
        if self.state != DriverState::Ready {
            return Err(Error::NotInitialized { state: self.state });
        }
        trace!("hd44780: {:?} {:#04x}", register, value);

        self.send_nibble(value >> 4, register)?;
        self.send_nibble(value & 0x0F, register)?;

        let execution_us = match register {
            RegisterSelect::Command => command_execution_us(value),
            RegisterSelect::Data => DATA_WRITE_US,
        };
        self.interface.delay_us(execution_us);
        Ok(())
    }

    /// Send an instruction byte
    pub fn send_command(&mut self, command: u8) -> DriverResult<I> {
        self.send_byte(command, RegisterSelect::Command)
    }

    /// Clear the display and reset the address counter
    pub fn clear(&mut self) -> DriverResult<I> {
        self.send_command(command::CLEAR)
    }

    /// Reset the address counter and undo display shifts
    pub fn return_home(&mut self) -> DriverResult<I> {
        self.send_command(command::RETURN_HOME)
    }

    /// Set the address counter direction and display shift on write
    pub fn set_entry_mode(
        &mut self,
        direction: EntryDirection,
        shift_display: bool,
    ) -> DriverResult<I> {
        self.send_command(command::entry_mode(direction, shift_display))
    }

    /// Set display, cursor and blink on/off
    pub fn set_display(
        &mut self,
        display_on: bool,
        cursor_on: bool,
        blink_on: bool,
    ) -> DriverResult<I> {
        self.send_command(command::display_control(display_on, cursor_on, blink_on))
    }

    /// Move the cursor or shift the display by one position
    pub fn shift(&mut self, target: ShiftTarget, direction: ShiftDirection) -> DriverResult<I> {
        self.send_command(command::shift(target, direction))
    }

    /// Send FUNCTION
    ///
    /// Initialization already sends FUNCTION from the configuration. This is
    /// for self-tests and does not change the stored configuration.
    ///
    /// # Errors
    ///
    /// - `Error::UnsupportedBusWidth` for [`BusWidth::EightBit`]
    /// - `Error::IncompatibleFont` for two lines with the 5x10 font
    pub fn set_function(
        &mut self,
        bus_width: BusWidth,
        lines: LineCount,
        font: Font,
    ) -> DriverResult<I> {
        if bus_width != BusWidth::FourBit {
            return Err(Error::UnsupportedBusWidth);
        }
        check_font(lines, font).map_err(|_| Error::IncompatibleFont { lines, font })?;
        if lines != self.config.lines || font != self.config.font {
            warn!(
                "hd44780: function set {:?}/{:?} differs from configured {:?}/{:?}",
                lines, font, self.config.lines, self.config.font
            );
        }
        self.send_command(command::function_set(bus_width, lines, font))
    }

    /// Point the address counter into CGRAM
    ///
    /// The address is masked to 6 bits.
    pub fn set_cgram_address(&mut self, address: u8) -> DriverResult<I> {
        if address > MAX_CGRAM_ADDRESS {
            warn!(
                "hd44780: CGRAM address {} masked to {}",
                address,
                address & MAX_CGRAM_ADDRESS
            );
        }
        self.send_command(command::cgram_address(address))
    }

    /// Point the address counter into CGRAM, rejecting out-of-range addresses
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAddress` for addresses above 63.
    pub fn try_set_cgram_address(&mut self, address: u8) -> DriverResult<I> {
        if address > MAX_CGRAM_ADDRESS {
            return Err(Error::InvalidAddress {
                ram: Ram::Cgram,
                address,
                max: MAX_CGRAM_ADDRESS,
            });
        }
        self.set_cgram_address(address)
    }

    /// Point the address counter into DDRAM
    ///
    /// The address is masked to 7 bits.
    pub fn set_ddram_address(&mut self, address: u8) -> DriverResult<I> {
        if address > command::DDRAM_ADDR_PARAMS {
            warn!(
                "hd44780: DDRAM address {} masked to {}",
                address,
                address & command::DDRAM_ADDR_PARAMS
            );
        }
        self.send_command(command::ddram_address(address))
    }

    /// Point the address counter into DDRAM, rejecting addresses that do not
    /// exist in the configured line mode
    ///
    /// One-line mode uses 0x00-0x4F. Two-line mode uses 0x00-0x27 and
    /// 0x40-0x67.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidAddress` for addresses outside those ranges.
    pub fn try_set_ddram_address(&mut self, address: u8) -> DriverResult<I> {
        let (valid, max) = match self.config.lines {
            LineCount::One => (
                address <= MAX_DDRAM_ADDRESS_ONE_LINE,
                MAX_DDRAM_ADDRESS_ONE_LINE,
            ),
            LineCount::Two => (
                address <= LINE1_END_TWO_LINE
                    || (LINE2_START_TWO_LINE..=MAX_DDRAM_ADDRESS_TWO_LINE).contains(&address),
                MAX_DDRAM_ADDRESS_TWO_LINE,
            ),
        };
        if !valid {
            return Err(Error::InvalidAddress {
                ram: Ram::Ddram,
                address,
                max,
            });
        }
        self.send_command(command::ddram_address(address))
    }

    /// Write one byte to the RAM selected by the last address instruction
    pub fn write_char(&mut self, byte: u8) -> DriverResult<I> {
        self.send_byte(byte, RegisterSelect::Data)
    }

    /// Write consecutive bytes, advancing the address counter after each
    pub fn write_bytes(&mut self, bytes: &[u8]) -> DriverResult<I> {
        for &byte in bytes {
            self.write_char(byte)?;
        }
        Ok(())
    }

    /// Program a custom glyph into CGRAM
    ///
    /// `rows` holds one byte per pixel row, low 5 bits used. The 5x8 font has
    /// 8 slots of 8 rows; the 5x10 font has 4 slots of 11 rows. Glyph `slot`
    /// is then displayed by writing character code `slot`.
    ///
    /// Leaves the address counter in CGRAM; set a DDRAM address before
    /// writing text again.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidGlyph` before any bus activity if the slot or
    /// row count does not match the configured font.
    pub fn define_glyph(&mut self, slot: u8, rows: &[u8]) -> DriverResult<I> {
        let font = self.config.font;
        if slot >= font.glyph_slots() || rows.len() != font.glyph_rows() {
            return Err(Error::InvalidGlyph {
                slot,
                rows: rows.len(),
            });
        }
        self.set_cgram_address(slot * font.glyph_stride())?;
        for &row in rows {
            self.write_char(row & 0x1F)?;
        }
        Ok(())
    }

    /// Put one nibble on D4-D7 and strobe EN
    ///
    /// Callers guarantee `nibble` fits in 4 bits.
    fn send_nibble(&mut self, nibble: u8, register: RegisterSelect) -> DriverResult<I> {
        debug_assert!(nibble <= 0x0F, "nibble out of range: {nibble:#x}");
        trace!("hd44780: nibble {:04b}", nibble);

        self.set_line(Line::Rs, register.level())?;
        self.set_line(Line::Rw, PinState::Low)?;
        for (bit, line) in Line::DATA.into_iter().enumerate() {
            self.set_line(line, PinState::from(nibble & (1 << bit) != 0))?;
        }

        self.set_line(Line::En, PinState::High)?;
        self.interface.delay_us(ENABLE_PULSE_US);
        self.set_line(Line::En, PinState::Low)?;
        self.interface.delay_us(NIBBLE_SETTLE_US);
        Ok(())
    }

    fn set_line(&mut self, line: Line, level: PinState) -> DriverResult<I> {
        self.interface.set_line(line, level).map_err(Error::Interface)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Builder, Geometry};
    use crate::timing::{CLEAR_HOME_US, COMMAND_US};
    use alloc::vec::Vec;
    use core::convert::Infallible;

    #[derive(Clone, Copy, Debug, PartialEq)]
    enum Event {
        Line(Line, PinState),
        Delay(u32),
    }

    /// Records every line change and delay
    #[derive(Debug, Default)]
    struct MockInterface {
        events: Vec<Event>,
    }

    /// One EN strobe as seen by the controller
    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Nibble {
        rs: PinState,
        rw: PinState,
        value: u8,
    }

    impl Nibble {
        fn command(value: u8) -> Self {
            Self {
                rs: PinState::Low,
                rw: PinState::Low,
                value,
            }
        }

        fn data(value: u8) -> Self {
            Self {
                rs: PinState::High,
                rw: PinState::Low,
                value,
            }
        }
    }

    fn bytes(register: fn(u8) -> Nibble, values: &[u8]) -> Vec<Nibble> {
        values
            .iter()
            .flat_map(|&value| [register(value >> 4), register(value & 0x0F)])
            .collect()
    }

    impl MockInterface {
        fn new() -> Self {
            Self::default()
        }

        /// Decode nibbles latched on each falling edge of EN
        ///
        /// Also checks that RS, RW and data are stable while EN is high.
        fn nibbles(&self) -> Vec<Nibble> {
            let mut rs = PinState::Low;
            let mut rw = PinState::Low;
            let mut data = [PinState::Low; 4];
            let mut en = PinState::Low;
            let mut latched = Vec::new();

            for event in &self.events {
                let Event::Line(line, level) = *event else {
                    continue;
                };
                match line {
                    Line::En => {
                        if en == PinState::High && level == PinState::Low {
                            let value = data
                                .iter()
                                .enumerate()
                                .filter(|(_, state)| **state == PinState::High)
                                .fold(0u8, |acc, (bit, _)| acc | (1 << bit));
                            latched.push(Nibble { rs, rw, value });
                        }
                        en = level;
                    }
                    _ => {
                        assert_eq!(en, PinState::Low, "{line:?} changed while EN high");
                        match line {
                            Line::Rs => rs = level,
                            Line::Rw => rw = level,
                            Line::D4 => data[0] = level,
                            Line::D5 => data[1] = level,
                            Line::D6 => data[2] = level,
                            Line::D7 => data[3] = level,
                            Line::En => {}
                        }
                    }
                }
            }
            latched
        }

        /// Total delay between consecutive strobes, plus the wait before the
        /// first one and after the last one
        fn waits(&self) -> Vec<u32> {
            let mut waits = Vec::new();
            let mut current = 0;
            for event in &self.events {
                match *event {
                    Event::Delay(us) => current += us,
                    Event::Line(Line::En, PinState::High) => {
                        waits.push(current);
                        current = 0;
                    }
                    Event::Line(..) => {}
                }
            }
            waits.push(current);
            waits
        }

        /// Shortest time EN was held high
        fn min_enable_pulse(&self) -> Option<u32> {
            let mut high = false;
            let mut held = 0;
            let mut min = None;
            for event in &self.events {
                match *event {
                    Event::Line(Line::En, PinState::High) => {
                        high = true;
                        held = 0;
                    }
                    Event::Line(Line::En, PinState::Low) if high => {
                        high = false;
                        min = Some(min.map_or(held, |m: u32| m.min(held)));
                    }
                    Event::Delay(us) if high => held += us,
                    _ => {}
                }
            }
            min
        }
    }

    impl BusInterface for MockInterface {
        type Error = Infallible;

        fn set_line(&mut self, line: Line, level: PinState) -> Result<(), Self::Error> {
            self.events.push(Event::Line(line, level));
            Ok(())
        }

        fn delay_us(&mut self, us: u32) {
            self.events.push(Event::Delay(us));
        }
    }

    /// Fails every line operation
    #[derive(Debug)]
    struct BrokenInterface;

    #[derive(Debug, PartialEq)]
    struct PinFault;

    impl BusInterface for BrokenInterface {
        type Error = PinFault;

        fn set_line(&mut self, _line: Line, _level: PinState) -> Result<(), Self::Error> {
            Err(PinFault)
        }

        fn delay_us(&mut self, _us: u32) {}
    }

    fn config(lines: LineCount, font: Font) -> Config {
        let rows = if lines == LineCount::Two { 2 } else { 1 };
        Builder::new()
            .geometry(Geometry::new(16, rows).unwrap())
            .lines(lines)
            .font(font)
            .build()
            .unwrap()
    }

    fn test_driver() -> Hd44780<MockInterface> {
        Hd44780::new(MockInterface::new(), config(LineCount::Two, Font::Font5x8))
    }

    fn ready_driver() -> Hd44780<MockInterface> {
        let mut driver = test_driver();
        driver.initialize().unwrap();
        driver.interface.events.clear();
        driver
    }

    #[test]
    fn test_new_driver_is_uninitialized_and_silent() {
        let driver = test_driver();
        assert_eq!(driver.state(), DriverState::Uninitialized);
        assert!(driver.interface.events.is_empty());
    }

    #[test]
    fn test_initialize_trace_two_lines_5x8() {
        let mut driver = test_driver();
        driver.initialize().unwrap();
        assert_eq!(driver.state(), DriverState::Ready);

        let mut expected = alloc::vec![
            Nibble::command(0x3),
            Nibble::command(0x3),
            Nibble::command(0x3),
            Nibble::command(0x2),
        ];
        // FUNCTION(4-bit, 2 lines, 5x8), DISPLAY(off), CLEAR, ENTRY_MODE(inc)
        expected.extend(bytes(Nibble::command, &[0x28, 0x08, 0x01, 0x06]));
        assert_eq!(driver.interface.nibbles(), expected);
    }

    #[test]
    fn test_initialize_trace_one_line_5x10() {
        let mut driver =
            Hd44780::new(MockInterface::new(), config(LineCount::One, Font::Font5x10));
        driver.initialize().unwrap();

        let nibbles = driver.interface.nibbles();
        assert_eq!(&nibbles[4..6], &bytes(Nibble::command, &[0x24])[..]);
    }

    #[test]
    fn test_initialize_resets_three_times_before_four_bit_switch() {
        let mut driver = test_driver();
        driver.initialize().unwrap();

        let nibbles = driver.interface.nibbles();
        let switch = nibbles
            .iter()
            .position(|n| *n == Nibble::command(0x2))
            .unwrap();
        assert_eq!(switch, 3);
        assert!(nibbles[..switch].iter().all(|n| *n == Nibble::command(0x3)));
    }

    #[test]
    fn test_initialize_waits() {
        let mut driver = test_driver();
        driver.initialize().unwrap();

        let waits = driver.interface.waits();
        assert!(waits[0] >= 15_000, "power-on wait {}", waits[0]);
        assert!(waits[1] >= 4_100, "after first reset {}", waits[1]);
        assert!(waits[2] >= 100, "after second reset {}", waits[2]);
        assert!(waits[3] >= 100, "after third reset {}", waits[3]);
        assert!(waits[4] >= 100, "after 4-bit switch {}", waits[4]);
        // CLEAR occupies strobes 8 and 9
        assert!(waits[10] >= 1_520, "after clear {}", waits[10]);
    }

    #[test]
    fn test_initialize_leaves_enable_low_first() {
        let mut driver = test_driver();
        driver.initialize().unwrap();
        assert_eq!(
            driver.interface.events.first(),
            Some(&Event::Line(Line::En, PinState::Low))
        );
    }

    #[test]
    fn test_enable_pulse_width() {
        let mut driver = test_driver();
        driver.initialize().unwrap();
        assert_eq!(driver.interface.min_enable_pulse(), Some(ENABLE_PULSE_US));
    }

    #[test]
    fn test_initialize_twice_repeats_sequence() {
        let mut driver = test_driver();
        driver.initialize().unwrap();
        let first = driver.interface.nibbles();
        driver.interface.events.clear();

        driver.initialize().unwrap();
        assert_eq!(driver.interface.nibbles(), first);
        assert_eq!(driver.state(), DriverState::Ready);
    }

    #[test]
    fn test_send_byte_before_initialize_is_rejected() {
        let mut driver = test_driver();
        let result = driver.send_byte(0x41, RegisterSelect::Data);
        assert!(matches!(
            result,
            Err(Error::NotInitialized {
                state: DriverState::Uninitialized
            })
        ));
        assert!(driver.interface.events.is_empty());
    }

    #[test]
    fn test_commands_before_initialize_are_rejected() {
        let mut driver = test_driver();
        assert!(matches!(driver.clear(), Err(Error::NotInitialized { .. })));
        assert!(matches!(
            driver.write_char(b'A'),
            Err(Error::NotInitialized { .. })
        ));
        assert!(driver.interface.events.is_empty());
    }

    #[test]
    fn test_send_byte_emits_two_nibbles_with_same_rs() {
        let mut driver = ready_driver();
        for register in [RegisterSelect::Command, RegisterSelect::Data] {
            for value in [0x00, 0x5A, 0xA5, 0xFF] {
                driver.interface.events.clear();
                driver.send_byte(value, register).unwrap();
                let nibbles = driver.interface.nibbles();
                assert_eq!(nibbles.len(), 2);
                assert_eq!(nibbles[0].rs, register.level());
                assert_eq!(nibbles[1].rs, register.level());
                assert_eq!(nibbles[0].value, value >> 4);
                assert_eq!(nibbles[1].value, value & 0x0F);
            }
        }
    }

    #[test]
    fn test_write_char_sends_data_nibbles() {
        let mut driver = ready_driver();
        driver.write_char(b'A').unwrap();
        assert_eq!(
            driver.interface.nibbles(),
            alloc::vec![Nibble::data(0x4), Nibble::data(0x1)]
        );
    }

    #[test]
    fn test_rw_held_low() {
        let mut driver = ready_driver();
        driver.write_bytes(b"rw").unwrap();
        assert!(
            driver
                .interface
                .nibbles()
                .iter()
                .all(|n| n.rw == PinState::Low)
        );
    }

    #[test]
    fn test_clear_twice_issues_two_long_clears() {
        let mut driver = ready_driver();
        driver.clear().unwrap();
        driver.clear().unwrap();

        assert_eq!(
            driver.interface.nibbles(),
            bytes(Nibble::command, &[0x01, 0x01])
        );
        let waits = driver.interface.waits();
        assert!(waits[2] >= CLEAR_HOME_US);
        assert!(waits[4] >= CLEAR_HOME_US);
    }

    #[test]
    fn test_return_home_waits_long() {
        let mut driver = ready_driver();
        driver.return_home().unwrap();
        assert_eq!(driver.interface.nibbles(), bytes(Nibble::command, &[0x02]));
        assert!(driver.interface.waits()[2] >= CLEAR_HOME_US);
    }

    #[test]
    fn test_ordinary_command_waits_short() {
        let mut driver = ready_driver();
        driver.set_display(true, true, false).unwrap();
        assert_eq!(driver.interface.nibbles(), bytes(Nibble::command, &[0x0E]));
        let wait = driver.interface.waits()[2];
        assert!(wait >= COMMAND_US);
        assert!(wait < CLEAR_HOME_US);
    }

    #[test]
    fn test_entry_mode_and_shift() {
        let mut driver = ready_driver();
        driver
            .set_entry_mode(EntryDirection::Decrement, true)
            .unwrap();
        driver
            .shift(ShiftTarget::Display, ShiftDirection::Left)
            .unwrap();
        assert_eq!(
            driver.interface.nibbles(),
            bytes(Nibble::command, &[0x05, 0x18])
        );
    }

    #[test]
    fn test_cgram_address_is_masked() {
        let mut driver = ready_driver();
        driver.set_cgram_address(70).unwrap();
        assert_eq!(
            driver.interface.nibbles(),
            bytes(Nibble::command, &[0x40 | 6])
        );
    }

    #[test]
    fn test_ddram_address_is_masked() {
        let mut driver = ready_driver();
        driver.set_ddram_address(200).unwrap();
        assert_eq!(
            driver.interface.nibbles(),
            bytes(Nibble::command, &[0x80 | 72])
        );
    }

    #[test]
    fn test_try_set_cgram_address_rejects_out_of_range() {
        let mut driver = ready_driver();
        let result = driver.try_set_cgram_address(64);
        assert!(matches!(
            result,
            Err(Error::InvalidAddress {
                ram: Ram::Cgram,
                address: 64,
                max: 63
            })
        ));
        assert!(driver.interface.events.is_empty());
        assert!(driver.try_set_cgram_address(63).is_ok());
    }

    #[test]
    fn test_try_set_ddram_address_two_lines() {
        let mut driver = ready_driver();
        assert!(driver.try_set_ddram_address(0x27).is_ok());
        assert!(driver.try_set_ddram_address(0x40).is_ok());
        assert!(driver.try_set_ddram_address(0x67).is_ok());
        driver.interface.events.clear();

        for address in [0x28, 0x3F, 0x68, 0x80, 0xFF] {
            assert!(matches!(
                driver.try_set_ddram_address(address),
                Err(Error::InvalidAddress { ram: Ram::Ddram, .. })
            ));
        }
        assert!(driver.interface.events.is_empty());
    }

    #[test]
    fn test_try_set_ddram_address_one_line() {
        let mut driver =
            Hd44780::new(MockInterface::new(), config(LineCount::One, Font::Font5x8));
        driver.initialize().unwrap();
        assert!(driver.try_set_ddram_address(0x4F).is_ok());
        assert!(matches!(
            driver.try_set_ddram_address(0x50),
            Err(Error::InvalidAddress { max: 0x4F, .. })
        ));
    }

    #[test]
    fn test_set_function_rejects_eight_bit() {
        let mut driver = ready_driver();
        let result = driver.set_function(BusWidth::EightBit, LineCount::Two, Font::Font5x8);
        assert!(matches!(result, Err(Error::UnsupportedBusWidth)));
        assert!(driver.interface.events.is_empty());
    }

    #[test]
    fn test_set_function_rejects_incompatible_font() {
        let mut driver = ready_driver();
        let result = driver.set_function(BusWidth::FourBit, LineCount::Two, Font::Font5x10);
        assert!(matches!(result, Err(Error::IncompatibleFont { .. })));
        assert!(driver.interface.events.is_empty());
    }

    #[test]
    fn test_set_function_sends_four_bit_function() {
        let mut driver = ready_driver();
        driver
            .set_function(BusWidth::FourBit, LineCount::One, Font::Font5x8)
            .unwrap();
        assert_eq!(driver.interface.nibbles(), bytes(Nibble::command, &[0x20]));
        assert_eq!(driver.config().lines, LineCount::Two);
    }

    #[test]
    fn test_write_bytes() {
        let mut driver = ready_driver();
        driver.write_bytes(b"Hi").unwrap();
        assert_eq!(driver.interface.nibbles(), bytes(Nibble::data, b"Hi"));
    }

    #[test]
    fn test_define_glyph_5x8() {
        let mut driver = ready_driver();
        let rows = [0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00, 0xFF];
        driver.define_glyph(2, &rows).unwrap();

        let mut expected = bytes(Nibble::command, &[0x40 | 16]);
        expected.extend(bytes(
            Nibble::data,
            &[0x00, 0x0A, 0x1F, 0x1F, 0x0E, 0x04, 0x00, 0x1F],
        ));
        assert_eq!(driver.interface.nibbles(), expected);
    }

    #[test]
    fn test_define_glyph_5x10_uses_sixteen_byte_slots() {
        let mut driver =
            Hd44780::new(MockInterface::new(), config(LineCount::One, Font::Font5x10));
        driver.initialize().unwrap();
        driver.interface.events.clear();

        driver.define_glyph(3, &[0x1F; 11]).unwrap();
        let nibbles = driver.interface.nibbles();
        assert_eq!(&nibbles[..2], &bytes(Nibble::command, &[0x40 | 48])[..]);
        assert_eq!(nibbles.len(), 2 + 11 * 2);
    }

    #[test]
    fn test_define_glyph_rejects_bad_input() {
        let mut driver = ready_driver();
        assert!(matches!(
            driver.define_glyph(8, &[0; 8]),
            Err(Error::InvalidGlyph { slot: 8, rows: 8 })
        ));
        assert!(matches!(
            driver.define_glyph(0, &[0; 7]),
            Err(Error::InvalidGlyph { slot: 0, rows: 7 })
        ));
        assert!(driver.interface.events.is_empty());
    }

    #[test]
    fn test_borrowed_interface() {
        let mut interface = MockInterface::new();
        {
            let mut driver = Hd44780::new(&mut interface, config(LineCount::Two, Font::Font5x8));
            driver.initialize().unwrap();
            driver.write_char(b'A').unwrap();
        }
        let nibbles = interface.nibbles();
        assert_eq!(nibbles.len(), 4 + 8 + 2);
        assert_eq!(&nibbles[12..], &[Nibble::data(0x4), Nibble::data(0x1)]);
    }

    #[test]
    fn test_release_returns_interface() {
        let mut driver = test_driver();
        driver.initialize().unwrap();
        let interface = driver.release();
        assert!(!interface.events.is_empty());
    }

    #[test]
    fn test_interface_error_during_initialize() {
        let mut driver = Hd44780::new(BrokenInterface, config(LineCount::Two, Font::Font5x8));
        let result = driver.initialize();
        assert!(matches!(result, Err(Error::Interface(PinFault))));
        assert_eq!(driver.state(), DriverState::Initializing);
        assert!(matches!(
            driver.write_char(b'A'),
            Err(Error::NotInitialized {
                state: DriverState::Initializing
            })
        ));
    }

    #[test]
    fn test_driver_state_default_is_uninitialized() {
        assert_eq!(DriverState::default(), DriverState::Uninitialized);
    }
}
