// SPDX-License-Identifier: MIT OR Apache-2.0

//! Scalar conversions layered over string-typed entries.
//!
//! Values are always stored as strings. Integers are written as minimal decimal
//! and read back with a base-prefix-aware parse: `0x`/`0X` selects hexadecimal,
//! a leading `0` selects octal, anything else is decimal. The whole string must
//! be consumed, otherwise the conversion fails and callers fall back to their
//! default. Booleans use the literal tokens `true` and `false` only.

/// A scalar type that can be stored in a configuration entry.
///
/// # Examples
///
/// ```
/// use atomcfg::domain::ConfigScalar;
///
/// assert_eq!(i32::from_config_str("0x1f"), Some(31));
/// assert_eq!(u16::from_config_str("70000"), Some(4464));
/// assert_eq!(bool::from_config_str("yes"), None);
/// assert_eq!(42u64.to_config_string(), "42");
/// ```
pub trait ConfigScalar: Sized {
    /// Parses a stored string, returning `None` if it is not a valid encoding.
    fn from_config_str(s: &str) -> Option<Self>;

    /// Renders the canonical stored form.
    fn to_config_string(&self) -> String;
}

impl ConfigScalar for bool {
    fn from_config_str(s: &str) -> Option<Self> {
        match s {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        }
    }

    fn to_config_string(&self) -> String {
        if *self { "true" } else { "false" }.to_string()
    }
}

impl ConfigScalar for i32 {
    fn from_config_str(s: &str) -> Option<Self> {
        parse_signed(s).and_then(|n| i32::try_from(n).ok())
    }

    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl ConfigScalar for u16 {
    // Wider values keep their low 16 bits.
    fn from_config_str(s: &str) -> Option<Self> {
        parse_unsigned(s).map(|n| n as u16)
    }

    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl ConfigScalar for u64 {
    fn from_config_str(s: &str) -> Option<Self> {
        parse_unsigned(s)
    }

    fn to_config_string(&self) -> String {
        self.to_string()
    }
}

impl ConfigScalar for String {
    fn from_config_str(s: &str) -> Option<Self> {
        Some(s.to_string())
    }

    fn to_config_string(&self) -> String {
        self.clone()
    }
}

/// Parses a signed integer with C-style base prefixes.
///
/// Returns `None` for empty input, trailing garbage or values outside `i64`.
pub fn parse_signed(s: &str) -> Option<i64> {
    let (negative, digits) = split_sign(s);
    let magnitude = parse_magnitude(digits)?;
    if negative {
        0i64.checked_sub_unsigned(magnitude)
    } else {
        i64::try_from(magnitude).ok()
    }
}

/// Parses an unsigned integer with C-style base prefixes.
///
/// A leading `-` is rejected rather than wrapped.
pub fn parse_unsigned(s: &str) -> Option<u64> {
    match split_sign(s) {
        (false, digits) => parse_magnitude(digits),
        (true, _) => None,
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

fn parse_magnitude(digits: &str) -> Option<u64> {
    let (radix, body) = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        (16, hex)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits)
    };

    // from_str_radix would accept another sign here.
    if body.is_empty() || !body.chars().all(|c| c.is_digit(radix)) {
        return None;
    }
    u64::from_str_radix(body, radix).ok()
}
