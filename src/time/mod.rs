//! Exact time arithmetic for timestamps and frame-rate conversions.
//!
//! All cut-point math runs on rational numbers. Binary floating point is not
//! used anywhere a time value feeds back into trim boundaries or frame
//! indices; repeated NTSC rate conversions through `f64` accumulate visible
//! frame-level drift over a two-hour tape.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use crate::error::{TapecutError, TapecutResult};

pub mod timecode;

pub use timecode::{format_hmsff, reconcile_timecode, timecode_to_seconds, timestamp_to_seconds};

/// A rational number represented as a numerator and positive denominator.
///
/// Stored reduced, so equality and hashing behave structurally.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rational {
    /// Numerator
    pub num: i128,
    /// Denominator (always positive)
    pub den: i128,
}

impl Rational {
    /// Create a new rational number.
    ///
    /// # Panics
    ///
    /// Panics if denominator is zero.
    pub fn new(num: i128, den: i128) -> Self {
        assert!(den != 0, "denominator cannot be zero");
        let (num, den) = if den < 0 { (-num, -den) } else { (num, den) };
        Self { num, den }.reduce()
    }

    /// Create a rational from an integer.
    pub const fn from_int(n: i128) -> Self {
        Self { num: n, den: 1 }
    }

    /// Create a zero rational.
    pub const fn zero() -> Self {
        Self { num: 0, den: 1 }
    }

    /// Check if this rational is zero.
    pub fn is_zero(&self) -> bool {
        self.num == 0
    }

    /// Check if this rational is strictly positive.
    pub fn is_positive(&self) -> bool {
        self.num > 0
    }

    /// Check if this rational is strictly negative.
    pub fn is_negative(&self) -> bool {
        self.num < 0
    }

    /// Reduce the rational to its simplest form.
    fn reduce(self) -> Self {
        if self.num == 0 {
            return Self { num: 0, den: 1 };
        }
        let g = gcd(self.num.unsigned_abs(), self.den.unsigned_abs());
        Self {
            num: self.num / g as i128,
            den: self.den / g as i128,
        }
    }

    /// Convert to f64. Only for observability output (progress percentages);
    /// never feeds back into time arithmetic.
    pub fn to_f64(&self) -> f64 {
        self.num as f64 / self.den as f64
    }

    /// Round to the nearest integer, ties to even.
    ///
    /// This is the rounding rule the cut-frame derivation pins: a timestamp
    /// landing exactly between two frames resolves to the even frame index.
    pub fn round_ties_even(&self) -> i128 {
        let q = self.num.div_euclid(self.den);
        let r = self.num.rem_euclid(self.den);
        match (2 * r).cmp(&self.den) {
            Ordering::Less => q,
            Ordering::Greater => q + 1,
            Ordering::Equal => {
                if q % 2 == 0 {
                    q
                } else {
                    q + 1
                }
            }
        }
    }

    /// Render as a decimal string with up to `max_frac_digits` fractional
    /// digits, computed by integer long division. Trailing zeros are trimmed.
    ///
    /// Values whose expansion terminates within the digit budget render
    /// exactly; longer expansions are truncated (the budget used for encoder
    /// seek arguments is well below one nanosecond of error).
    pub fn to_decimal_string(&self, max_frac_digits: usize) -> String {
        let sign = if self.num < 0 { "-" } else { "" };
        let num = self.num.unsigned_abs();
        let den = self.den.unsigned_abs();
        let whole = num / den;
        let mut rem = num % den;

        let mut out = format!("{}{}", sign, whole);
        if rem == 0 || max_frac_digits == 0 {
            return out;
        }

        let mut frac = String::with_capacity(max_frac_digits);
        for _ in 0..max_frac_digits {
            rem *= 10;
            frac.push(char::from(b'0' + (rem / den) as u8));
            rem %= den;
            if rem == 0 {
                break;
            }
        }
        while frac.ends_with('0') {
            frac.pop();
        }
        if !frac.is_empty() {
            out.push('.');
            out.push_str(&frac);
        }
        out
    }
}

impl Default for Rational {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Debug for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rational({}/{})", self.num, self.den)
    }
}

impl fmt::Display for Rational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.den == 1 {
            write!(f, "{}", self.num)
        } else {
            write!(f, "{}/{}", self.num, self.den)
        }
    }
}

impl PartialOrd for Rational {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Rational {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.num * other.den;
        let rhs = other.num * self.den;
        lhs.cmp(&rhs)
    }
}

impl Add for Rational {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.num * rhs.den + rhs.num * self.den, self.den * rhs.den)
    }
}

impl Sub for Rational {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.num * rhs.den - rhs.num * self.den, self.den * rhs.den)
    }
}

impl Mul for Rational {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Self::new(self.num * rhs.num, self.den * rhs.den)
    }
}

impl Div for Rational {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        assert!(rhs.num != 0, "division by zero rational");
        Self::new(self.num * rhs.den, self.den * rhs.num)
    }
}

/// Calculate the greatest common divisor using the Euclidean algorithm.
fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let t = b;
        b = a % b;
        a = t;
    }
    a
}

/// The two frame-rate conventions the pipeline deals in.
///
/// A timecode string is meaningless without one of these attached: the editor
/// labels frames out of an exact nominal 60, while the capture media actually
/// runs at 60000/1001.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRate {
    /// Exact 60 fps, the editor's non-drop-frame nominal rate
    Nominal60,
    /// 60000/1001 fps, the NTSC drop-frame rate of the source capture
    NtscDrop,
}

impl FrameRate {
    /// The rate as an exact rational, frames per second.
    pub fn as_rational(self) -> Rational {
        match self {
            FrameRate::Nominal60 => Rational::from_int(60),
            FrameRate::NtscDrop => Rational::new(60000, 1001),
        }
    }
}

/// An exact, non-negative number of elapsed seconds.
///
/// Immutable once constructed; every constructor rejects negative values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(Rational);

impl Timestamp {
    /// Wrap an already-computed rational seconds value.
    ///
    /// # Panics
    ///
    /// Panics if the value is negative; callers only reach this from
    /// arithmetic on values that are non-negative by construction.
    pub fn from_rational(seconds: Rational) -> Self {
        assert!(!seconds.is_negative(), "timestamp cannot be negative");
        Self(seconds)
    }

    /// A timestamp of zero seconds.
    pub const fn zero() -> Self {
        Self(Rational::zero())
    }

    /// Build a timestamp from whole hour/minute/second fields plus a
    /// fractional field given as its decimal digit string.
    ///
    /// The fraction is converted as digits/10^len, never through a float.
    pub fn from_parts(hours: u32, minutes: u32, seconds: u32, frac_digits: &str) -> TapecutResult<Self> {
        let whole = hours as i128 * 3600 + minutes as i128 * 60 + seconds as i128;
        let frac = if frac_digits.is_empty() {
            Rational::zero()
        } else {
            let digits: i128 =
                frac_digits
                    .parse()
                    .map_err(|_| TapecutError::InvalidDecimal {
                        value: frac_digits.to_string(),
                    })?;
            Rational::new(digits, 10i128.pow(frac_digits.len() as u32))
        };
        Ok(Self(Rational::from_int(whole) + frac))
    }

    /// Parse a raw decimal seconds string such as `123.456700`.
    ///
    /// This is how the scene-detection filter reports cut positions; it emits
    /// seconds directly rather than an HH:MM:SS timestamp.
    pub fn parse_decimal(value: &str) -> TapecutResult<Self> {
        let invalid = || TapecutError::InvalidDecimal {
            value: value.to_string(),
        };
        let (whole_str, frac_str) = match value.split_once('.') {
            Some((w, f)) => (w, f),
            None => (value, ""),
        };
        if whole_str.is_empty() || !whole_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let whole: i128 = whole_str.parse().map_err(|_| invalid())?;
        let frac = if frac_str.is_empty() {
            Rational::zero()
        } else {
            let digits: i128 = frac_str.parse().map_err(|_| invalid())?;
            Rational::new(digits, 10i128.pow(frac_str.len() as u32))
        };
        Ok(Self(Rational::from_int(whole) + frac))
    }

    /// The underlying rational seconds value.
    pub fn as_rational(&self) -> Rational {
        self.0
    }

    /// Render for an encoder `-ss`/`-t` argument.
    pub fn to_decimal_string(&self) -> String {
        self.0.to_decimal_string(9)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rational_new_reduces() {
        let r = Rational::new(4, 8);
        assert_eq!(r.num, 1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_negative_den() {
        let r = Rational::new(1, -2);
        assert_eq!(r.num, -1);
        assert_eq!(r.den, 2);
    }

    #[test]
    fn test_rational_arithmetic() {
        let a = Rational::new(1, 2);
        let b = Rational::new(1, 3);
        assert_eq!(a + b, Rational::new(5, 6));
        assert_eq!(a - b, Rational::new(1, 6));
        assert_eq!(a * b, Rational::new(1, 6));
        assert_eq!(a / b, Rational::new(3, 2));
    }

    #[test]
    fn test_rational_ord() {
        assert!(Rational::new(1, 2) > Rational::new(1, 3));
        assert!(Rational::new(-1, 2) < Rational::zero());
    }

    #[test]
    fn test_round_ties_even() {
        assert_eq!(Rational::new(3, 2).round_ties_even(), 2);
        assert_eq!(Rational::new(5, 2).round_ties_even(), 2);
        assert_eq!(Rational::new(7, 2).round_ties_even(), 4);
        assert_eq!(Rational::new(7, 4).round_ties_even(), 2);
        assert_eq!(Rational::new(1, 4).round_ties_even(), 0);
        assert_eq!(Rational::from_int(9).round_ties_even(), 9);
    }

    #[test]
    fn test_decimal_string_terminating() {
        assert_eq!(Rational::new(1001, 1000).to_decimal_string(9), "1.001");
        assert_eq!(Rational::new(5, 4).to_decimal_string(9), "1.25");
        assert_eq!(Rational::from_int(7).to_decimal_string(9), "7");
        assert_eq!(Rational::new(11, 10).to_decimal_string(9), "1.1");
    }

    #[test]
    fn test_decimal_string_truncates_repeating() {
        // 1/3 truncated at the digit budget
        assert_eq!(Rational::new(1, 3).to_decimal_string(9), "0.333333333");
    }

    #[test]
    fn test_frame_rate_values() {
        assert_eq!(FrameRate::Nominal60.as_rational(), Rational::from_int(60));
        assert_eq!(FrameRate::NtscDrop.as_rational(), Rational::new(60000, 1001));
    }

    #[test]
    fn test_timestamp_parse_decimal() {
        let t = Timestamp::parse_decimal("12.25").unwrap();
        assert_eq!(t.as_rational(), Rational::new(49, 4));
        let t = Timestamp::parse_decimal("3").unwrap();
        assert_eq!(t.as_rational(), Rational::from_int(3));
    }

    #[test]
    fn test_timestamp_parse_decimal_rejects_junk() {
        assert!(Timestamp::parse_decimal("").is_err());
        assert!(Timestamp::parse_decimal("-1.0").is_err());
        assert!(Timestamp::parse_decimal("1.2.3").is_err());
        assert!(Timestamp::parse_decimal("abc").is_err());
    }

    #[test]
    fn test_timestamp_from_parts() {
        let t = Timestamp::from_parts(1, 2, 3, "50").unwrap();
        let expected = Rational::from_int(3723) + Rational::new(50, 100);
        assert_eq!(t.as_rational(), expected);
    }
}
