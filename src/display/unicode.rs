//! Number formatting and Unicode scripts for equation labels
use std::ops::Range;

use crate::value::Value;

/// Formats `n` with `precision` decimals, in scientific notation unless it falls in `fixed_range`.
pub fn float<T: Value>(n: T, fixed_range: Option<Range<T>>, precision: usize) -> String {
    match fixed_range {
        Some(range) if range.contains(&n) => format!("{n:.precision$}"),
        _ => format!("{n:.precision$e}"),
    }
}

/// Format a number in scientific notation with exactly `digits` significant digits.
///
/// The output is a plain float literal (`-3.0020250e-2`) accepted verbatim by
/// Rust, Go and C compilers, and by `str::parse::<f64>`.
///
/// A `digits` of zero is treated as one.
pub fn significant<T: Value>(n: T, digits: usize) -> String {
    let precision = digits.max(1) - 1;
    format!("{n:.precision$e}")
}

const SUPERSCRIPT_DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
const SUBSCRIPT_DIGITS: [char; 10] = ['₀', '₁', '₂', '₃', '₄', '₅', '₆', '₇', '₈', '₉'];

/// Superscript form of a string of digits and signs. Other characters are dropped.
pub fn superscript(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            '-' => Some('⁻'),
            '+' => Some('⁺'),
            c => digit(c).map(|d| SUPERSCRIPT_DIGITS[d]),
        })
        .collect()
}

/// Subscript form of a string of digits and the letters used in variable names.
/// Other characters are dropped.
pub fn subscript(s: &str) -> String {
    s.chars()
        .filter_map(|c| match c {
            's' => Some('ₛ'),
            'k' => Some('ₖ'),
            'n' => Some('ₙ'),
            'x' => Some('ₓ'),
            c => digit(c).map(|d| SUBSCRIPT_DIGITS[d]),
        })
        .collect()
}

fn digit(c: char) -> Option<usize> {
    c.to_digit(10).and_then(|d| usize::try_from(d).ok())
}
