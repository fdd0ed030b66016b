//! Integer arguments in C `strtol(s, NULL, 0)` form
//!
//! `0x`/`0X` selects hex, a leading `0` octal, anything else decimal.
//! Values are bounded to a 32-bit `long`.

use core::fmt;

#[cfg_attr(feature = "nrf9160", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// No digits at all
    NoDigits,
    /// Digits followed by something else
    TrailingCharacters,
    /// Too large for an i32, value saturated
    Overflow,
}

#[cfg_attr(feature = "nrf9160", derive(defmt::Format))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    kind: ParseErrorKind,
    lenient: i32,
}

impl ParseError {
    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    /// What `strtol` would have returned for the same input
    pub fn lenient_value(&self) -> i32 {
        self.lenient
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            ParseErrorKind::NoDigits => f.write_str("no digits"),
            ParseErrorKind::TrailingCharacters => f.write_str("trailing characters"),
            ParseErrorKind::Overflow => f.write_str("out of range"),
        }
    }
}

fn is_c_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | 0x0b | 0x0c | b'\r')
}

pub fn parse_long(s: &str) -> Result<i32, ParseError> {
    let bytes = s.as_bytes();
    let mut i = 0;

    while i < bytes.len() && is_c_space(bytes[i]) {
        i += 1;
    }

    let negative = match bytes.get(i) {
        Some(b'-') => {
            i += 1;
            true
        }
        Some(b'+') => {
            i += 1;
            false
        }
        _ => false,
    };

    let radix = match (bytes.get(i), bytes.get(i + 1), bytes.get(i + 2)) {
        (Some(b'0'), Some(b'x' | b'X'), Some(c)) if c.is_ascii_hexdigit() => {
            i += 2;
            16
        }
        (Some(b'0'), _, _) => 8,
        _ => 10,
    };

    // magnitude limit: 2^31 - 1 for positive, 2^31 for negative
    let limit: u64 = if negative { 1 << 31 } else { (1 << 31) - 1 };
    let mut magnitude: u64 = 0;
    let mut overflow = false;
    let start = i;

    while let Some(digit) = bytes.get(i).and_then(|b| (*b as char).to_digit(radix)) {
        if !overflow {
            magnitude = magnitude * radix as u64 + digit as u64;
            if magnitude > limit {
                overflow = true;
            }
        }
        i += 1;
    }

    if i == start {
        return Err(ParseError {
            kind: ParseErrorKind::NoDigits,
            lenient: 0,
        });
    }

    if overflow {
        let lenient = if negative { i32::MIN } else { i32::MAX };
        return Err(ParseError {
            kind: ParseErrorKind::Overflow,
            lenient,
        });
    }

    let value = if negative {
        (-(magnitude as i64)) as i32
    } else {
        magnitude as i32
    };

    if i < bytes.len() {
        return Err(ParseError {
            kind: ParseErrorKind::TrailingCharacters,
            lenient: value,
        });
    }

    Ok(value)
}
