use std::collections::BTreeMap;

use super::model::{distinct, LifecycleRow};

pub const ALL_CUSTOMERS: &str = "All Customers";
pub const ALL_YEARS: &str = "All Years";

/// Financial-year position of a month name: April is 1, March is 12,
/// anything unrecognised sorts last.
pub fn financial_month_order(month: &str) -> u32 {
    match month {
        "April" => 1,
        "May" => 2,
        "June" => 3,
        "July" => 4,
        "August" => 5,
        "September" => 6,
        "October" => 7,
        "November" => 8,
        "December" => 9,
        "January" => 10,
        "February" => 11,
        "March" => 12,
        _ => 13,
    }
}

// ---------------------------------------------------------------------------
// Filter state
// ---------------------------------------------------------------------------

/// Multi-select over customers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CustomerSelection {
    #[default]
    All,
    Only(Vec<String>),
}

impl CustomerSelection {
    /// Toggle one entry of the customer dropdown.
    ///
    /// Picking [`ALL_CUSTOMERS`] selects everyone. Picking a customer
    /// toggles it, and an emptied list falls back to everyone.
    pub fn toggle(&mut self, customer: &str) {
        if customer == ALL_CUSTOMERS {
            *self = CustomerSelection::All;
            return;
        }
        let mut picked = match std::mem::take(self) {
            CustomerSelection::All => Vec::new(),
            CustomerSelection::Only(list) => list,
        };
        if let Some(pos) = picked.iter().position(|c| c == customer) {
            picked.remove(pos);
        } else {
            picked.push(customer.to_string());
        }
        *self = if picked.is_empty() {
            CustomerSelection::All
        } else {
            CustomerSelection::Only(picked)
        };
    }

    pub fn contains(&self, customer: &str) -> bool {
        match self {
            CustomerSelection::All => true,
            CustomerSelection::Only(list) => list.iter().any(|c| c == customer),
        }
    }

    pub fn is_selected(&self, entry: &str) -> bool {
        match self {
            CustomerSelection::All => entry == ALL_CUSTOMERS,
            CustomerSelection::Only(list) => list.iter().any(|c| c == entry),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            CustomerSelection::All => ALL_CUSTOMERS.to_string(),
            CustomerSelection::Only(list) => list.join(", "),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LifecycleFilter {
    pub customers: CustomerSelection,
    /// `None` shows every financial year.
    pub financial_year: Option<String>,
    /// Product picked by clicking a pie slice.
    pub product: Option<String>,
}

impl LifecycleFilter {
    pub fn matches(&self, row: &LifecycleRow) -> bool {
        self.financial_year
            .as_deref()
            .map_or(true, |fy| row.financial_year == fy)
            && self.customers.contains(&row.customer)
            && self.product.as_deref().map_or(true, |p| row.product == p)
    }

    /// Pie click: the active product is cleared when clicked again.
    pub fn toggle_product(&mut self, product: &str) {
        if self.product.as_deref() == Some(product) {
            self.product = None;
        } else {
            self.product = Some(product.to_string());
        }
    }

    pub fn year_label(&self) -> &str {
        self.financial_year.as_deref().unwrap_or(ALL_YEARS)
    }
}

pub fn customer_options(rows: &[LifecycleRow]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.customer.as_str()))
}

/// Financial years in first-seen order; that order defines "previous year".
pub fn financial_year_options(rows: &[LifecycleRow]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.financial_year.as_str()))
}

// ---------------------------------------------------------------------------
// Aggregates
// ---------------------------------------------------------------------------

pub fn total_sales(rows: &[LifecycleRow], filter: &LifecycleFilter) -> f64 {
    rows.iter()
        .filter(|r| filter.matches(r))
        .map(|r| r.sales)
        .sum()
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesBucket {
    pub name: String,
    pub sales: f64,
}

fn sum_by<F>(rows: &[LifecycleRow], filter: &LifecycleFilter, key: F) -> BTreeMap<String, f64>
where
    F: Fn(&LifecycleRow) -> &str,
{
    let mut out: BTreeMap<String, f64> = BTreeMap::new();
    for row in rows.iter().filter(|r| filter.matches(r)) {
        let k = key(row);
        if k.is_empty() {
            continue;
        }
        *out.entry(k.to_string()).or_default() += row.sales;
    }
    out
}

/// Sales per customer, alphabetical.
pub fn sales_by_customer(rows: &[LifecycleRow], filter: &LifecycleFilter) -> Vec<SalesBucket> {
    sum_by(rows, filter, |r| r.customer.as_str())
        .into_iter()
        .map(|(name, sales)| SalesBucket { name, sales })
        .collect()
}

/// Sales per month in financial-year order (April first).
pub fn monthly_sales(rows: &[LifecycleRow], filter: &LifecycleFilter) -> Vec<SalesBucket> {
    let mut months: Vec<SalesBucket> = sum_by(rows, filter, |r| r.month.as_str())
        .into_iter()
        .map(|(name, sales)| SalesBucket { name, sales })
        .collect();
    months.sort_by_key(|m| financial_month_order(&m.name));
    months
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProductShare {
    pub product: String,
    pub sales: f64,
    /// Share of the filtered total, in percent.
    pub percentage: f64,
}

/// Sales per product, largest first. Shares are 0 when the total is 0.
pub fn product_shares(rows: &[LifecycleRow], filter: &LifecycleFilter) -> Vec<ProductShare> {
    let total = total_sales(rows, filter);
    let mut shares: Vec<ProductShare> = sum_by(rows, filter, |r| r.product.as_str())
        .into_iter()
        .map(|(product, sales)| ProductShare {
            percentage: if total != 0.0 { sales * 100.0 / total } else { 0.0 },
            product,
            sales,
        })
        .collect();
    shares.sort_by(|a, b| b.sales.total_cmp(&a.sales));
    shares
}

#[derive(Debug, Clone, PartialEq)]
pub struct YearOverYear {
    pub previous_year: Option<String>,
    pub previous_sales: f64,
    /// Percent change against the previous year; 0 without a usable baseline.
    pub growth: f64,
}

/// Compare the selected financial year with the one listed before it.
pub fn year_over_year(
    rows: &[LifecycleRow],
    filter: &LifecycleFilter,
    years: &[String],
) -> YearOverYear {
    let none = YearOverYear {
        previous_year: None,
        previous_sales: 0.0,
        growth: 0.0,
    };
    let Some(selected) = filter.financial_year.as_deref() else {
        return none;
    };
    let Some(pos) = years.iter().position(|y| y == selected) else {
        return none;
    };
    if pos == 0 {
        return none;
    }
    let previous = years[pos - 1].clone();
    let previous_filter = LifecycleFilter {
        financial_year: Some(previous.clone()),
        ..filter.clone()
    };
    let current_sales = total_sales(rows, filter);
    let previous_sales = total_sales(rows, &previous_filter);
    let growth = if previous_sales > 0.0 {
        (current_sales - previous_sales) / previous_sales * 100.0
    } else {
        0.0
    };
    YearOverYear {
        previous_year: Some(previous),
        previous_sales,
        growth,
    }
}

/// Everything the lifecycle view draws, recomputed on each filter change.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LifecycleReport {
    pub total_sales: f64,
    pub by_customer: Vec<SalesBucket>,
    pub by_month: Vec<SalesBucket>,
    pub by_product: Vec<ProductShare>,
    pub previous_year: Option<String>,
    pub previous_sales: f64,
    pub growth: f64,
}

impl LifecycleReport {
    pub fn compute(rows: &[LifecycleRow], filter: &LifecycleFilter, years: &[String]) -> Self {
        let yoy = year_over_year(rows, filter, years);
        LifecycleReport {
            total_sales: total_sales(rows, filter),
            by_customer: sales_by_customer(rows, filter),
            by_month: monthly_sales(rows, filter),
            by_product: product_shares(rows, filter),
            previous_year: yoy.previous_year,
            previous_sales: yoy.previous_sales,
            growth: yoy.growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(customer: &str, fy: &str, product: &str, month: &str, sales: f64) -> LifecycleRow {
        LifecycleRow {
            customer: customer.into(),
            financial_year: fy.into(),
            product: product.into(),
            month: month.into(),
            sales,
        }
    }

    fn sample() -> Vec<LifecycleRow> {
        vec![
            row("Acme", "FY22", "Cable", "April", 100.0),
            row("Acme", "FY23", "Cable", "January", 150.0),
            row("Bolt", "FY23", "Lamp", "April", 50.0),
            row("Bolt", "FY23", "Cable", "Smarch", 0.0),
            row("Core", "FY23", "Lamp", "May", 50.0),
        ]
    }

    #[test]
    fn customer_toggle_rules() {
        let mut sel = CustomerSelection::All;
        sel.toggle("Acme");
        assert_eq!(sel, CustomerSelection::Only(vec!["Acme".into()]));
        sel.toggle("Bolt");
        assert!(sel.contains("Bolt") && !sel.contains("Core"));
        assert_eq!(sel.describe(), "Acme, Bolt");
        sel.toggle("Acme");
        sel.toggle("Bolt");
        assert_eq!(sel, CustomerSelection::All);
        sel.toggle("Core");
        sel.toggle(ALL_CUSTOMERS);
        assert_eq!(sel, CustomerSelection::All);
        assert!(sel.is_selected(ALL_CUSTOMERS));
    }

    #[test]
    fn report_under_filters() {
        let rows = sample();
        let years = financial_year_options(&rows);
        assert_eq!(years, vec!["FY22", "FY23"]);

        let filter = LifecycleFilter {
            financial_year: Some("FY23".into()),
            ..Default::default()
        };
        let report = LifecycleReport::compute(&rows, &filter, &years);
        assert_eq!(report.total_sales, 250.0);

        let months: Vec<&str> = report.by_month.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(months, vec!["April", "May", "January", "Smarch"]);

        assert_eq!(report.by_product[0].product, "Cable");
        assert_eq!(report.by_product[0].percentage, 60.0);
        assert_eq!(report.by_customer.len(), 3);

        assert_eq!(report.previous_year.as_deref(), Some("FY22"));
        assert_eq!(report.previous_sales, 100.0);
        assert_eq!(report.growth, 150.0);
    }

    #[test]
    fn active_product_narrows_everything() {
        let rows = sample();
        let mut filter = LifecycleFilter::default();
        filter.toggle_product("Lamp");
        assert_eq!(total_sales(&rows, &filter), 100.0);
        filter.toggle_product("Lamp");
        assert_eq!(filter.product, None);
        assert_eq!(total_sales(&rows, &filter), 350.0);
    }

    #[test]
    fn no_growth_without_a_baseline() {
        let rows = sample();
        let years = financial_year_options(&rows);

        let all = year_over_year(&rows, &LifecycleFilter::default(), &years);
        assert_eq!(all.previous_year, None);
        assert_eq!(all.growth, 0.0);

        let first = LifecycleFilter {
            financial_year: Some("FY22".into()),
            ..Default::default()
        };
        assert_eq!(year_over_year(&rows, &first, &years).growth, 0.0);

        let only_bolt = LifecycleFilter {
            financial_year: Some("FY23".into()),
            customers: CustomerSelection::Only(vec!["Bolt".into()]),
            product: None,
        };
        let yoy = year_over_year(&rows, &only_bolt, &years);
        assert_eq!(yoy.previous_sales, 0.0);
        assert_eq!(yoy.growth, 0.0);
    }

    #[test]
    fn shares_are_zero_when_nothing_sold() {
        let rows = vec![row("Acme", "FY23", "Cable", "April", 0.0)];
        let shares = product_shares(&rows, &LifecycleFilter::default());
        assert_eq!(shares[0].percentage, 0.0);
    }
}
