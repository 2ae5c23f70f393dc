/// Round a euro amount to cents, half away from zero on the scaled value.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Euro amount with two decimals, e.g. `2400.00 €`.
pub fn format_euro(value: f64) -> String {
    format!("{value:.2} €")
}
