//! Numeric formatting helpers shared by the CLI and report writers.

/// Convert a count to f64 with an explicit precision-loss allowance
#[inline]
#[must_use]
pub fn count_to_f64(count: usize) -> f64 {
    #[allow(clippy::cast_precision_loss)]
    {
        count as f64
    }
}

/// `part / whole`, or 0.0 when `whole` is zero
#[must_use]
pub fn ratio(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        count_to_f64(part) / count_to_f64(whole)
    }
}

/// `part / whole * 100`, or 0.0 when `whole` is zero
#[must_use]
pub fn percentage(part: usize, whole: usize) -> f64 {
    ratio(part, whole) * 100.0
}

/// Format an e-value for display
#[must_use]
pub fn format_evalue(evalue: f64) -> String {
    if evalue == 0.0 {
        "0".to_string()
    } else if evalue < 1e-100 {
        "< 1e-100".to_string()
    } else if evalue < 1e-10 {
        format!("{evalue:.0e}")
    } else if evalue < 0.01 {
        format!("{evalue:.1e}")
    } else {
        format!("{evalue:.3}")
    }
}
