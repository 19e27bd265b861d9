// Copyright 2023 Christian Jaeger <ch@christianjaeger.ch>. See the
// COPYRIGHT file at the top-level directory of this distribution.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Numbers appearing as tokens.

//! A token only becomes a [Number](Number) if rendering the parsed
//! value gives back exactly the token text. Integers are
//! `-?[0-9]+` without leading zeros, of any size; reals are
//! `-?[0-9]+.[0-9]+` in the shortest form that reads back as the
//! same `f64`. Everything else (`+1`, `007`, `1e3`, `1.50`, `inf`)
//! stays a symbol, which keeps serializing and re-reading a tree
//! lossless.

use num::BigInt;

#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    Integer(BigInt),
    Real(f64),
}

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>)
           -> Result<(), std::fmt::Error> {
        match self {
            Number::Integer(n) => f.write_fmt(format_args!("{}", n)),
            Number::Real(x) => f.write_fmt(format_args!("{}", x)),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Number {
        Number::Integer(BigInt::from(n))
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Number {
        Number::Integer(BigInt::from(n))
    }
}

impl From<f64> for Number {
    /// Integral values become `Integer`, so that the result prints
    /// the way it would be read back.
    fn from(x: f64) -> Number {
        if x.is_finite() && x.fract() == 0.0 {
            if let Some(n) = num::FromPrimitive::from_f64(x) {
                return Number::Integer(n)
            }
        }
        Number::Real(x)
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Returns `None` if `s` is not a number in canonical spelling.
pub fn read_number(s: &str) -> Option<Number> {
    let unsigned = s.strip_prefix('-').unwrap_or(s);
    let number = if is_digits(unsigned) {
        Number::Integer(s.parse::<BigInt>().ok()?)
    } else {
        let (int, frac) = unsigned.split_once('.')?;
        if !(is_digits(int) && is_digits(frac)) {
            return None
        }
        Number::Real(s.parse::<f64>().ok()?)
    };
    if number.to_string() == s {
        Some(number)
    } else {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_integers() {
        assert_eq!(read_number("0"), Some(Number::from(0)));
        assert_eq!(read_number("-42"), Some(Number::from(-42)));
        let big = "123456789012345678901234567890";
        assert_eq!(read_number(big).map(|n| n.to_string()),
                   Some(big.to_string()));
        assert_eq!(read_number("007"), None);
        assert_eq!(read_number("+1"), None);
        assert_eq!(read_number("-0"), None);
        assert_eq!(read_number("-"), None);
    }

    #[test]
    fn canonical_reals() {
        assert_eq!(read_number("1.5"), Some(Number::Real(1.5)));
        assert_eq!(read_number("-0.25"), Some(Number::Real(-0.25)));
        assert_eq!(read_number("1.50"), None);
        assert_eq!(read_number("1.0"), None);
        assert_eq!(read_number("1e3"), None);
        assert_eq!(read_number(".5"), None);
        assert_eq!(read_number("inf"), None);
        assert_eq!(read_number("NaN"), None);
    }

    #[test]
    fn from_f64_prefers_integers() {
        assert_eq!(Number::from(3.0), Number::from(3));
        assert_eq!(Number::from(0.5), Number::Real(0.5));
    }
}
