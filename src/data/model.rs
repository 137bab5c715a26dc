use std::collections::HashSet;
use std::fmt;

// ---------------------------------------------------------------------------
// Lenient cell parsing
// ---------------------------------------------------------------------------

/// Parse a numeric cell. Empty, malformed and non-finite values become `0.0`.
pub fn parse_number(s: &str) -> f64 {
    match s.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => 0.0,
    }
}

/// Parse a percentage cell such as `"87.5%"` or `"87.5"`.
pub fn parse_percent(s: &str) -> f64 {
    parse_number(&s.replace('%', ""))
}

/// Parse a rupee amount such as `"Rs. 1,250.50"`.
pub fn parse_currency(s: &str) -> f64 {
    let cleaned = s.trim().trim_start_matches("Rs.").replace(',', "");
    parse_number(&cleaned)
}

/// Like [`parse_number`] but keeps "not a number" distinct from zero.
pub fn parse_optional_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

// ---------------------------------------------------------------------------
// Calendar helpers
// ---------------------------------------------------------------------------

pub const MONTH_NAMES: [&str; 12] = [
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December",
];

/// Full month name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    MONTH_NAMES.get(month.checked_sub(1)? as usize).copied()
}

/// 1-based month number for a full month name.
pub fn month_number(name: &str) -> Option<u32> {
    MONTH_NAMES
        .iter()
        .position(|m| *m == name)
        .map(|i| i as u32 + 1)
}

/// Calendar month and year of a row, parsed from `MM-DD-YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    // Field order matters: derived `Ord` is chronological.
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// `None` unless the text has exactly three `-` separated parts with a
    /// month in `1..=12` first and an integer year last.
    pub fn parse(s: &str) -> Option<Period> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != 3 {
            return None;
        }
        let month: u32 = parts[0].trim().parse().ok()?;
        let year: i32 = parts[2].trim().parse().ok()?;
        if !(1..=12).contains(&month) {
            return None;
        }
        Some(Period { year, month })
    }

    /// Calendar quarter, 1 to 4.
    pub fn quarter(&self) -> u32 {
        (self.month - 1) / 3 + 1
    }

    pub fn month_name(&self) -> &'static str {
        month_name(self.month).unwrap_or("")
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.month_name(), self.year)
    }
}

// ---------------------------------------------------------------------------
// Rows, one type per dataset
// ---------------------------------------------------------------------------

/// One row of the demand forecast dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastRow {
    pub product: String,
    pub sku: String,
    pub depot: String,
    /// Raw `Month` cell, kept for display.
    pub month: String,
    pub period: Option<Period>,
    pub actual: f64,
    pub fitted: f64,
    pub forecast: f64,
    /// Accuracy percentage as exported by the forecasting model.
    pub accuracy: f64,
    /// Whether the `Accuracy` cell was present at all.
    pub has_accuracy: bool,
}

/// One row of the customer sales lifecycle dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct LifecycleRow {
    pub customer: String,
    pub financial_year: String,
    pub product: String,
    /// Full month name, e.g. `"April"`.
    pub month: String,
    pub sales: f64,
}

/// One row of the revenue shortfall dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortfallRow {
    pub fy: String,
    pub category: String,
    /// Raw `Months` cell, `MM-...`.
    pub months: String,
    pub shortfall_in_revenue: f64,
    pub impactful: bool,
    pub pending_so: f64,
    pub closing_stock: f64,
    pub per_unit: f64,
}

impl ShortfallRow {
    /// Month name derived from the leading `MM` of the `Months` cell.
    pub fn month_name(&self) -> Option<&'static str> {
        let num: u32 = self.months.split('-').next()?.trim().parse().ok()?;
        month_name(num)
    }

    /// Units that could not be served from stock.
    pub fn unit_loss(&self) -> f64 {
        (self.pending_so - self.closing_stock).max(0.0)
    }
}

/// One order line of the fulfillment dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct FulfillmentRow {
    pub order: String,
    pub sku: String,
    pub required: f64,
    pub fulfilled: f64,
    pub pending: f64,
    pub short_sales: f64,
    /// Fulfillment ratio in percent; `None` when the cell is not a number.
    pub ratio: Option<f64>,
}

// ---------------------------------------------------------------------------
// Distinct values
// ---------------------------------------------------------------------------

/// Distinct non-empty values in first-seen order.
pub fn distinct<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.is_empty())
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}
