use std::fmt;

use super::model::{distinct, ForecastRow, MONTH_NAMES};

/// Label of the catch-all dropdown entry.
pub const ALL: &str = "All";

// ---------------------------------------------------------------------------
// Choice: one dropdown value
// ---------------------------------------------------------------------------

/// A dropdown selection: either everything or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    /// Build from a dropdown label; `"All"` and the empty string mean no filter.
    pub fn from_label(label: &str) -> Self {
        if label.is_empty() || label == ALL {
            Choice::All
        } else {
            Choice::Only(label.to_string())
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }

    pub fn label(&self) -> &str {
        match self {
            Choice::All => ALL,
            Choice::Only(v) => v,
        }
    }

    /// Equality predicate; `All` matches anything.
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(v) => v == value,
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// ---------------------------------------------------------------------------
// Selection across the forecast dropdowns
// ---------------------------------------------------------------------------

/// Active forecast filters. `month` holds a full month name, `year` a
/// four-digit year.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub product: Choice,
    pub sku: Choice,
    pub depot: Choice,
    pub month: Choice,
    pub year: Choice,
}

impl Selection {
    /// Change the product; SKU and depot fall back to `All`.
    pub fn set_product(&mut self, product: Choice) {
        self.product = product;
        self.sku = Choice::All;
        self.depot = Choice::All;
    }

    /// Change the SKU; depot falls back to `All`.
    pub fn set_sku(&mut self, sku: Choice) {
        self.sku = sku;
        self.depot = Choice::All;
    }

    pub fn reset(&mut self) {
        *self = Selection::default();
    }

    /// Whether any field narrows the data.
    pub fn is_filtered(&self) -> bool {
        *self != Selection::default()
    }

    /// Whether `row` passes every non-`All` predicate.
    ///
    /// Rows without a parseable period fail an active month or year filter.
    pub fn matches(&self, row: &ForecastRow) -> bool {
        if !(self.product.matches(&row.product)
            && self.sku.matches(&row.sku)
            && self.depot.matches(&row.depot))
        {
            return false;
        }
        if self.month.is_all() && self.year.is_all() {
            return true;
        }
        let Some(period) = row.period else {
            return false;
        };
        self.month.matches(period.month_name()) && self.year.matches(&period.year.to_string())
    }
}

/// Rows passing `selection`, in input order.
pub fn filter_rows(rows: &[ForecastRow], selection: &Selection) -> Vec<ForecastRow> {
    rows.iter()
        .filter(|row| selection.matches(row))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Cascading dropdown options
// ---------------------------------------------------------------------------

fn with_all(values: Vec<String>) -> Vec<String> {
    std::iter::once(ALL.to_string()).chain(values).collect()
}

pub fn product_options(rows: &[ForecastRow]) -> Vec<String> {
    with_all(distinct(rows.iter().map(|r| r.product.as_str())))
}

/// SKUs sold under `product` (every SKU for `All`).
pub fn sku_options(rows: &[ForecastRow], product: &Choice) -> Vec<String> {
    with_all(distinct(
        rows.iter()
            .filter(|r| product.matches(&r.product))
            .map(|r| r.sku.as_str()),
    ))
}

/// Depots stocking `sku` (every depot for `All`).
pub fn depot_options(rows: &[ForecastRow], sku: &Choice) -> Vec<String> {
    with_all(distinct(
        rows.iter()
            .filter(|r| sku.matches(&r.sku))
            .map(|r| r.depot.as_str()),
    ))
}

pub fn month_options() -> Vec<String> {
    with_all(MONTH_NAMES.iter().map(|m| m.to_string()).collect())
}

/// Years present in the data, ascending.
pub fn year_options(rows: &[ForecastRow]) -> Vec<String> {
    let mut years: Vec<i32> = rows.iter().filter_map(|r| r.period.map(|p| p.year)).collect();
    years.sort_unstable();
    years.dedup();
    with_all(years.into_iter().map(|y| y.to_string()).collect())
}
