//! Shared helpers for command output

/// Truncate string to max characters with ellipsis
pub fn truncate(s: &str, max_chars: usize) -> String {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() <= max_chars {
        s.to_string()
    } else {
        let truncated: String = chars[..max_chars.saturating_sub(3)].iter().collect();
        format!("{}...", truncated)
    }
}

/// Mask a secret for display; empty stays empty
pub fn mask(value: &str) -> String {
    if value.is_empty() {
        String::new()
    } else {
        koli_core::utils::MASK.to_string()
    }
}

/// Quantity without a trailing `.0` for whole numbers
pub fn format_quantity(quantity: f64) -> String {
    if quantity.fract() == 0.0 {
        format!("{:.0}", quantity)
    } else {
        format!("{:.2}", quantity)
    }
}
