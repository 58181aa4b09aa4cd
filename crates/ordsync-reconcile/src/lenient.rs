//! Loose integer coercion for export tokens.
//!
//! The fulfillment export and the mapping text were historically produced
//! and consumed with "leading numeric prefix or zero" semantics. Every token
//! the engine reads goes through [`parse_i64`] so that this one odd rule lives
//! in a single, tested place.
//!
//! | input       | result |
//! |-------------|--------|
//! | `"1001"`    | 1001   |
//! | `"  42 "`   | 42     |
//! | `"-7"`      | -7     |
//! | `"12abc"`   | 12     |
//! | `"1.9"`     | 1      |
//! | `"abc"`     | 0      |
//! | `""`        | 0      |

/// Value returned when a token has no leading numeric prefix.
pub const LENIENT_FALLBACK: i64 = 0;

/// Coerce `raw` to an integer, never failing.
///
/// Leading ASCII whitespace is skipped, an optional `+`/`-` sign is honoured,
/// then the longest run of ASCII digits is taken. Anything after that run is
/// ignored. No digits at all yields [`LENIENT_FALLBACK`]. Values outside the
/// `i64` range saturate at `i64::MIN` / `i64::MAX`.
pub fn parse_i64(raw: &str) -> i64 {
    let s = raw.trim_start_matches(|c: char| c.is_ascii_whitespace() || c == '\x0B');

    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen_digit = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen_digit = true;
        let d = i64::from(b - b'0');
        // Accumulate toward the sign so i64::MIN stays representable.
        value = if negative {
            value.saturating_mul(10).saturating_sub(d)
        } else {
            value.saturating_mul(10).saturating_add(d)
        };
    }

    if seen_digit {
        value
    } else {
        LENIENT_FALLBACK
    }
}
