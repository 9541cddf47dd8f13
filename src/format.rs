//! Display formatting for metric values and column labels.

use heck::ToTitleCase;

pub const PERCENT_SUFFIX: &str = "_pct";

/// Columns whose canonical key ends in `_pct` hold percentages.
pub fn is_percentage(column: &str) -> bool {
    column.ends_with(PERCENT_SUFFIX)
}

/// Formats a finite metric value for display.
///
/// Percentage columns render with two decimals and a trailing `%`; every other
/// column renders its integer part (truncated toward zero) with `,` thousands
/// separators. Callers must not pass non-finite values; rows carrying them never
/// qualify as metric rows in the first place.
pub fn format_display(column: &str, value: f64) -> String {
    debug_assert!(value.is_finite(), "format_display called with {value}");
    if is_percentage(column) {
        format!("{value:.2}%")
    } else {
        group_thousands(value.trunc() as i128)
    }
}

fn group_thousands(value: i128) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if value < 0 {
        grouped.push('-');
    }
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Human label for a canonical key, e.g. `urban_pct` becomes `Urban Pct`.
pub fn metric_label(column: &str) -> String {
    column.replace('_', " ").to_title_case()
}
