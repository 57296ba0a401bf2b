//! Controller configuration types and builder

pub use crate::error::{BuilderError, DDRAM_CAPACITY, MAX_COLUMNS, MAX_ROWS};

/// Display geometry in character cells
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Geometry {
    /// Number of character columns per row
    pub columns: u8,
    /// Number of character rows
    pub rows: u8,
}

impl Geometry {
    /// Create a new geometry with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidGeometry` if:
    /// - rows is 0 or greater than MAX_ROWS
    /// - columns is 0 or greater than MAX_COLUMNS
    /// - columns * rows exceeds DDRAM_CAPACITY
    pub fn new(columns: u8, rows: u8) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_ROWS {
            return Err(BuilderError::InvalidGeometry { columns, rows });
        }
        if columns == 0 || columns > MAX_COLUMNS {
            return Err(BuilderError::InvalidGeometry { columns, rows });
        }
        if columns as u16 * rows as u16 > DDRAM_CAPACITY as u16 {
            return Err(BuilderError::InvalidGeometry { columns, rows });
        }
        Ok(Self { columns, rows })
    }

    /// Number of character cells on the panel
    pub fn cells(&self) -> u16 {
        self.columns as u16 * self.rows as u16
    }
}

/// Width of the controller data bus
///
/// The driver only ever runs the bus in 4-bit mode. The 8-bit variant exists so
/// that a FUNCTION command can be encoded faithfully.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum BusWidth {
    /// D4-D7 only, bytes sent as two nibbles
    #[default]
    FourBit,
    /// D0-D7
    EightBit,
}

/// Number of display lines the controller drives
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LineCount {
    /// One-line mode (1/8 or 1/11 duty)
    One,
    /// Two-line mode (1/16 duty), also used by four-row panels
    #[default]
    Two,
}

/// Character font
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Font {
    /// 5x8 dots
    #[default]
    Font5x8,
    /// 5x10 dots, only available in one-line mode
    Font5x10,
}

impl Font {
    /// Number of CGRAM rows that make up one custom glyph
    pub fn glyph_rows(self) -> usize {
        match self {
            Font::Font5x8 => 8,
            Font::Font5x10 => 11,
        }
    }

    /// Number of custom glyph slots available in CGRAM
    pub fn glyph_slots(self) -> u8 {
        match self {
            Font::Font5x8 => 8,
            Font::Font5x10 => 4,
        }
    }

    /// Distance in CGRAM bytes between two consecutive glyph slots
    pub fn glyph_stride(self) -> u8 {
        match self {
            Font::Font5x8 => 8,
            Font::Font5x10 => 16,
        }
    }
}

/// Check that a line count and font can be used together
///
/// The controller only renders the 5x10 font in one-line mode.
pub(crate) fn check_font(lines: LineCount, font: Font) -> Result<(), BuilderError> {
    if lines == LineCount::Two && font == Font::Font5x10 {
        return Err(BuilderError::IncompatibleFont { lines, font });
    }
    Ok(())
}

/// Controller configuration
///
/// Fixed at construction and never changed by the driver.
/// Use `Builder` to create a Config.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Panel geometry
    pub geometry: Geometry,
    /// Line mode sent in FUNCTION during initialization
    pub lines: LineCount,
    /// Font sent in FUNCTION during initialization
    pub font: Font,
}

impl Config {
    /// Bus width used on the wire, always 4-bit
    pub fn bus_width(&self) -> BusWidth {
        BusWidth::FourBit
    }
}

/// Builder for constructing controller configuration
///
/// # Example
///
/// ```
/// use hd44780::{Builder, Font, Geometry, LineCount};
///
/// let geometry = match Geometry::new(20, 4) {
///     Ok(geometry) => geometry,
///     Err(_) => return,
/// };
/// let config = Builder::new()
///     .geometry(geometry)
///     .lines(LineCount::Two)
///     .font(Font::Font5x8)
///     .build();
/// assert!(config.is_ok());
/// ```
#[must_use]
#[derive(Default)]
pub struct Builder {
    /// Panel geometry (required)
    geometry: Option<Geometry>,
    /// Line mode
    lines: LineCount,
    /// Character font
    font: Font,
}

impl Builder {
    /// Create a new Builder with default values (two lines, 5x8 font)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set panel geometry (required)
    pub fn geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }

    /// Set line mode
    pub fn lines(mut self, lines: LineCount) -> Self {
        self.lines = lines;
        self
    }

    /// Set character font
    pub fn font(mut self, font: Font) -> Self {
        self.font = font;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// - `BuilderError::MissingGeometry` if geometry was not set
    /// - `BuilderError::IncompatibleFont` for two lines with the 5x10 font
    /// - `BuilderError::TooFewLines` for a multi-row panel in one-line mode
    pub fn build(self) -> Result<Config, BuilderError> {
        let geometry = self.geometry.ok_or(BuilderError::MissingGeometry)?;
        check_font(self.lines, self.font)?;
        if geometry.rows > 1 && self.lines == LineCount::One {
            return Err(BuilderError::TooFewLines {
                rows: geometry.rows,
            });
        }
        Ok(Config {
            geometry,
            lines: self.lines,
            font: self.font,
        })
    }
}
