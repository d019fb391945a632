/// Fixed three-decimal formatting used for every generated numeric value.
pub(crate) fn fmt3(v: f64) -> String {
    // Avoid "-0.000".
    let v = if v == 0.0 { 0.0 } else { v };
    let s = format!("{v:.3}");
    if s == "-0.000" { "0.000".to_string() } else { s }
}

/// Reduce `v` into `[0, modulus)`.
pub(crate) fn wrap(v: f64, modulus: f64) -> f64 {
    let r = v.rem_euclid(modulus);
    // rem_euclid can round up to exactly `modulus` for tiny negative inputs.
    if r >= modulus { 0.0 } else { r }
}

/// Python-style float modulo (result carries the sign of the divisor).
pub(crate) fn py_mod(a: f64, b: f64) -> f64 {
    let r = a % b;
    if r != 0.0 && (r < 0.0) != (b < 0.0) {
        r + b
    } else {
        r
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
