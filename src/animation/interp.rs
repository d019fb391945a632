use crate::foundation::error::{LiltError, LiltResult};
use crate::foundation::math::{fmt3, wrap};

/// A run of an attribute value, either a number or the text between numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Token<'a> {
    Text(&'a str),
    Number(&'a str, f64),
}

/// Split `s` into alternating text and number runs.
///
/// The result always starts and ends with a (possibly empty) text run, so two values
/// with the same number count have the same layout. A number is an optional sign,
/// digits, and an optional fraction (`-1`, `2.5`, `.5`); `1.2.3` reads as `1.2`, `.3`.
pub(crate) fn tokenize(s: &str) -> Vec<Token<'_>> {
    let bytes = s.as_bytes();
    let mut out = Vec::new();
    let mut text_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match match_number(bytes, i) {
            Some(end) => {
                out.push(Token::Text(&s[text_start..i]));
                let lexeme = &s[i..end];
                // The lexeme is a valid float literal by construction.
                let v = lexeme.parse::<f64>().unwrap_or(0.0);
                out.push(Token::Number(lexeme, v));
                i = end;
                text_start = end;
            }
            None => i += 1,
        }
    }
    out.push(Token::Text(&s[text_start..]));
    out
}

fn match_number(b: &[u8], start: usize) -> Option<usize> {
    let mut i = start;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let has_int = i > int_start;

    if i + 1 < b.len() && b[i] == b'.' && b[i + 1].is_ascii_digit() {
        i += 1;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        return Some(i);
    }
    has_int.then_some(i)
}

/// Interpolate between two attribute values.
///
/// Numbers are paired by position and blended linearly, formatted with three decimals;
/// the surrounding text must match exactly. `modulus[i] > 0` makes the `i`-th number
/// circular (angles): both ends are reduced into `[0, modulus)` and the shorter way
/// around is taken. Identical number lexemes pass through untouched, so
/// `interpolate(s, s, f, ..) == s`.
///
/// Values that are not token-compatible but are both colours blend channel-wise.
pub fn interpolate(s1: &str, s2: &str, fraction: f64, modulus: &[f64]) -> LiltResult<String> {
    // Hex digits would otherwise pair up as decimal numbers.
    if s1 != s2
        && (s1.trim_start().starts_with('#') || s2.trim_start().starts_with('#'))
        && let (Some(c1), Some(c2)) = (parse_color(s1), parse_color(s2))
    {
        return Ok(lerp_color(c1, c2, fraction));
    }

    let a = tokenize(s1);
    let b = tokenize(s2);

    if !same_layout(&a, &b) {
        if let (Some(c1), Some(c2)) = (parse_color(s1), parse_color(s2)) {
            return Ok(lerp_color(c1, c2, fraction));
        }
        return Err(LiltError::incompatible(s1, s2));
    }

    let mut out = String::with_capacity(s1.len() + 8);
    let mut number_idx = 0;
    for (t1, t2) in a.iter().zip(b.iter()) {
        match (t1, t2) {
            (Token::Text(x), Token::Text(_)) => out.push_str(x),
            (Token::Number(l1, v1), Token::Number(l2, v2)) => {
                if l1 == l2 {
                    out.push_str(l1);
                } else {
                    let m = modulus.get(number_idx).copied().unwrap_or(0.0);
                    out.push_str(&fmt3(lerp_number(*v1, *v2, fraction, m)));
                }
                number_idx += 1;
            }
            _ => return Err(LiltError::incompatible(s1, s2)),
        }
    }
    Ok(out)
}

fn same_layout(a: &[Token<'_>], b: &[Token<'_>]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|pair| match pair {
            (Token::Text(x), Token::Text(y)) => x == y,
            (Token::Number(..), Token::Number(..)) => true,
            _ => false,
        })
}

fn lerp_number(v1: f64, v2: f64, fraction: f64, modulus: f64) -> f64 {
    if modulus <= 0.0 || !modulus.is_finite() {
        return v1 + fraction * (v2 - v1);
    }
    let mut a = wrap(v1, modulus);
    let mut b = wrap(v2, modulus);
    if (b - a).abs() > modulus / 2.0 {
        if a < b {
            a += modulus;
        } else {
            b += modulus;
        }
    }
    wrap(a + fraction * (b - a), modulus)
}

/// Parse the three RGB channels of a colour value.
pub(crate) fn parse_color(s: &str) -> Option<[f64; 3]> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        let digits: Vec<u8> = hex
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<_>>()?;
        return match digits.len() {
            3 => Some([
                f64::from(digits[0] * 17),
                f64::from(digits[1] * 17),
                f64::from(digits[2] * 17),
            ]),
            6 => Some([
                f64::from(digits[0] * 16 + digits[1]),
                f64::from(digits[2] * 16 + digits[3]),
                f64::from(digits[4] * 16 + digits[5]),
            ]),
            _ => None,
        };
    }

    if let Some(body) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
        let channels: Vec<f64> = body
            .split(',')
            .map(|c| c.trim().parse::<f64>().ok())
            .collect::<Option<_>>()?;
        return match channels.as_slice() {
            [r, g, b] => Some([*r, *g, *b]),
            _ => None,
        };
    }

    let rgb = match s.to_ascii_lowercase().as_str() {
        "black" => [0, 0, 0],
        "white" => [255, 255, 255],
        "red" => [255, 0, 0],
        "lime" => [0, 255, 0],
        "green" => [0, 128, 0],
        "blue" => [0, 0, 255],
        "yellow" => [255, 255, 0],
        "cyan" | "aqua" => [0, 255, 255],
        "magenta" | "fuchsia" => [255, 0, 255],
        "gray" | "grey" => [128, 128, 128],
        "silver" => [192, 192, 192],
        "maroon" => [128, 0, 0],
        "olive" => [128, 128, 0],
        "navy" => [0, 0, 128],
        "purple" => [128, 0, 128],
        "teal" => [0, 128, 128],
        "orange" => [255, 165, 0],
        _ => return None,
    };
    Some(rgb.map(f64::from))
}

fn lerp_color(a: [f64; 3], b: [f64; 3], fraction: f64) -> String {
    let c: Vec<String> = a
        .iter()
        .zip(b.iter())
        .map(|(x, y)| fmt3(x + fraction * (y - x)))
        .collect();
    format!("rgb({})", c.join(", "))
}

#[cfg(test)]
#[path = "../../tests/unit/animation/interp.rs"]
mod tests;
