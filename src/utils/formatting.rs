/// Utility functions for formatting display values in bot replies

/// Format market cap for display
pub fn format_market_cap(mc: f64) -> String {
    if mc >= 1_000_000_000.0 {
        format!("${:.2}B", mc / 1_000_000_000.0)
    } else if mc >= 1_000_000.0 {
        format!("${:.2}M", mc / 1_000_000.0)
    } else if mc >= 1_000.0 {
        format!("${:.1}K", mc / 1_000.0)
    } else {
        format!("${:.0}", mc)
    }
}

/// Format USD amount for display; sub-cent prices keep significant digits
pub fn format_usd(amount: f64) -> String {
    if amount >= 1_000_000.0 {
        format!("${:.2}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("${:.2}K", amount / 1_000.0)
    } else if amount >= 1.0 || amount == 0.0 {
        format!("${:.2}", amount)
    } else if amount >= 0.0001 {
        format!("${:.6}", amount)
    } else {
        format!("${:.10}", amount)
    }
}

/// Format native CRO amount
pub fn format_cro(amount: f64, symbol: &str) -> String {
    if amount >= 1_000.0 {
        format!("{:.2} {}", amount, symbol)
    } else {
        format!("{:.4} {}", amount, symbol)
    }
}

/// Format percentage for display
pub fn format_percentage(pct: f64) -> String {
    if pct > 0.0 {
        format!("+{:.2}%", pct)
    } else {
        format!("{:.2}%", pct)
    }
}

/// Format token amount with appropriate precision
pub fn format_token_amount(amount: f64) -> String {
    if amount >= 1_000_000_000.0 {
        format!("{:.2}B", amount / 1_000_000_000.0)
    } else if amount >= 1_000_000.0 {
        format!("{:.2}M", amount / 1_000_000.0)
    } else if amount >= 1_000.0 {
        format!("{:.1}K", amount / 1_000.0)
    } else if amount >= 1.0 {
        format!("{:.2}", amount)
    } else {
        format!("{:.6}", amount)
    }
}

/// Colored marker for a signed change
pub fn trend_marker(pct: f64) -> &'static str {
    if pct >= 0.0 {
        "🟢"
    } else {
        "🔴"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_market_cap() {
        assert_eq!(format_market_cap(1_500_000_000.0), "$1.50B");
        assert_eq!(format_market_cap(2_340_000.0), "$2.34M");
        assert_eq!(format_market_cap(500_000.0), "$500.0K");
        assert_eq!(format_market_cap(50.0), "$50");
    }

    #[test]
    fn test_format_usd_small_prices() {
        assert_eq!(format_usd(0.0), "$0.00");
        assert_eq!(format_usd(12.345), "$12.35");
        assert_eq!(format_usd(0.0123), "$0.012300");
    }

    #[test]
    fn test_format_percentage() {
        assert_eq!(format_percentage(10.5), "+10.50%");
        assert_eq!(format_percentage(-5.25), "-5.25%");
        assert_eq!(format_percentage(0.0), "0.00%");
    }
}
