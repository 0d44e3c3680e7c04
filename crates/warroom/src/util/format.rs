/// Group the integer part of a non-negative amount in thousands
fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Format a rupee amount rounded to the whole rupee, grouped in thousands
/// (e.g. ₹930,000)
pub fn format_currency(value: f64) -> String {
    let whole = value.abs().round() as u64;
    let sign = if value < 0.0 && whole > 0 { "-" } else { "" };
    format!("{sign}₹{}", group_thousands(whole))
}

/// Format a rupee amount in compact form (e.g. ₹1.2M, ₹450K, ₹50)
pub fn format_compact_currency(value: f64) -> String {
    let abs_value = value.abs();
    let sign = if value < 0.0 { "-" } else { "" };

    if abs_value >= 1_000_000.0 {
        format!("{sign}₹{:.2}M", abs_value / 1_000_000.0)
    } else if abs_value >= 1_000.0 {
        format!("{sign}₹{:.0}K", abs_value / 1_000.0)
    } else {
        format!("{sign}₹{abs_value:.0}")
    }
}

/// Format a fraction as a percentage (0.07 -> "7.00%")
pub fn format_percentage(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Format a fraction as a signed percentage (0.07 -> "+7.00%")
pub fn format_signed_percentage(value: f64) -> String {
    format!("{:+.2}%", value * 100.0)
}
