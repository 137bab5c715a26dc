use std::collections::HashMap;

use super::model::{distinct, month_number, ShortfallRow};

/// Bucket for rows without a parseable month or with an empty category.
pub const UNKNOWN: &str = "Unknown";

/// Dropdown state of the shortfall view; `None` means no filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShortfallFilter {
    /// Full month name.
    pub month: Option<String>,
    pub fy: Option<String>,
    pub category: Option<String>,
}

impl ShortfallFilter {
    pub fn matches(&self, row: &ShortfallRow) -> bool {
        self.month
            .as_deref()
            .map_or(true, |m| row.month_name() == Some(m))
            && self.fy.as_deref().map_or(true, |fy| row.fy == fy)
            && self.category.as_deref().map_or(true, |c| row.category == c)
    }
}

/// Month names present in the data, first-seen order.
pub fn month_options(rows: &[ShortfallRow]) -> Vec<String> {
    distinct(rows.iter().filter_map(|r| r.month_name()))
}

pub fn fy_options(rows: &[ShortfallRow]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.fy.as_str()))
}

pub fn category_options(rows: &[ShortfallRow]) -> Vec<String> {
    distinct(rows.iter().map(|r| r.category.as_str()))
}

/// Every slice name the category chart can draw, `Unknown` last when present.
pub fn chart_categories(rows: &[ShortfallRow]) -> Vec<String> {
    let mut names = category_options(rows);
    if rows.iter().any(|r| r.category.is_empty()) && !names.iter().any(|n| n == UNKNOWN) {
        names.push(UNKNOWN.to_string());
    }
    names
}

/// Headline cards. Only impactful rows contribute.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ShortfallSummary {
    pub total_shortfall: f64,
    /// Units of pending sales orders not covered by closing stock.
    pub revenue_loss_units: f64,
    pub revenue_loss_value: f64,
    pub impactful_rows: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MonthShortfall {
    pub month: String,
    pub shortfall: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryShortfall {
    pub name: String,
    pub value: f64,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShortfallReport {
    pub summary: ShortfallSummary,
    /// Calendar order, `Unknown` last.
    pub by_month: Vec<MonthShortfall>,
    /// Largest first.
    pub by_category: Vec<CategoryShortfall>,
}

impl ShortfallReport {
    pub fn compute(rows: &[ShortfallRow], filter: &ShortfallFilter) -> Self {
        let impactful: Vec<&ShortfallRow> = rows
            .iter()
            .filter(|r| filter.matches(r) && r.impactful)
            .collect();

        let mut summary = ShortfallSummary {
            impactful_rows: impactful.len(),
            ..Default::default()
        };
        for row in &impactful {
            let units = row.unit_loss();
            summary.total_shortfall += row.shortfall_in_revenue;
            summary.revenue_loss_units += units;
            summary.revenue_loss_value += units * row.per_unit;
        }

        ShortfallReport {
            summary,
            by_month: monthly_shortfall(&impactful),
            by_category: category_shortfall(&impactful),
        }
    }
}

/// Impactful shortfall per month name.
pub fn monthly_shortfall(rows: &[&ShortfallRow]) -> Vec<MonthShortfall> {
    let mut buckets: HashMap<&str, MonthShortfall> = HashMap::new();
    for row in rows {
        let month = row.month_name().unwrap_or(UNKNOWN);
        let entry = buckets.entry(month).or_insert_with(|| MonthShortfall {
            month: month.to_string(),
            shortfall: 0.0,
            count: 0,
        });
        entry.shortfall += row.shortfall_in_revenue;
        entry.count += 1;
    }
    let mut months: Vec<MonthShortfall> = buckets.into_values().collect();
    months.sort_by_key(|m| month_number(&m.month).unwrap_or(13));
    months
}

pub fn category_shortfall(rows: &[&ShortfallRow]) -> Vec<CategoryShortfall> {
    let mut buckets: HashMap<&str, CategoryShortfall> = HashMap::new();
    for row in rows {
        let name = if row.category.is_empty() { UNKNOWN } else { row.category.as_str() };
        let entry = buckets.entry(name).or_insert_with(|| CategoryShortfall {
            name: name.to_string(),
            value: 0.0,
            count: 0,
            percent: 0.0,
        });
        entry.value += row.shortfall_in_revenue;
        entry.count += 1;
    }
    let total: f64 = buckets.values().map(|c| c.value).sum();
    let mut categories: Vec<CategoryShortfall> = buckets
        .into_values()
        .map(|mut c| {
            c.percent = if total > 0.0 { c.value * 100.0 / total } else { 0.0 };
            c
        })
        .collect();
    categories.sort_by(|a, b| b.value.total_cmp(&a.value).then_with(|| a.name.cmp(&b.name)));
    categories
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fy: &str, cat: &str, months: &str, shortfall: f64, impactful: bool, pend: f64, stock: f64, per_unit: f64) -> ShortfallRow {
        ShortfallRow {
            fy: fy.into(),
            category: cat.into(),
            months: months.into(),
            shortfall_in_revenue: shortfall,
            impactful,
            pending_so: pend,
            closing_stock: stock,
            per_unit,
        }
    }

    fn sample() -> Vec<ShortfallRow> {
        vec![
            row("FY24", "Wires", "05-2023", 1000.0, true, 40.0, 10.0, 2.0),
            row("FY24", "Lamps", "04-2023", 500.0, true, 5.0, 20.0, 9.0),
            row("FY24", "Wires", "04-2023", 250.0, false, 100.0, 0.0, 1.0),
            row("FY25", "Wires", "xx-2024", 250.0, true, 10.0, 0.0, 1.0),
        ]
    }

    #[test]
    fn only_impactful_rows_count() {
        let report = ShortfallReport::compute(&sample(), &ShortfallFilter::default());
        let s = report.summary;
        assert_eq!(s.impactful_rows, 3);
        assert_eq!(s.total_shortfall, 1750.0);
        // 30 + 0 (stock covers) + 10
        assert_eq!(s.revenue_loss_units, 40.0);
        assert_eq!(s.revenue_loss_value, 70.0);
    }

    #[test]
    fn months_in_calendar_order_unknown_last() {
        let report = ShortfallReport::compute(&sample(), &ShortfallFilter::default());
        let months: Vec<&str> = report.by_month.iter().map(|m| m.month.as_str()).collect();
        assert_eq!(months, vec!["April", "May", "Unknown"]);
    }

    #[test]
    fn categories_carry_share_of_total() {
        let report = ShortfallReport::compute(&sample(), &ShortfallFilter::default());
        assert_eq!(report.by_category[0].name, "Wires");
        assert_eq!(report.by_category[0].value, 1250.0);
        assert_eq!(report.by_category[0].count, 2);
        let total: f64 = report.by_category.iter().map(|c| c.percent).sum();
        assert!((total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn blank_categories_get_a_chart_slot() {
        let mut rows = sample();
        assert_eq!(chart_categories(&rows), vec!["Wires", "Lamps"]);

        rows.push(row("FY24", "", "06-2023", 300.0, true, 0.0, 0.0, 1.0));
        assert_eq!(category_options(&rows), vec!["Wires", "Lamps"]);
        assert_eq!(chart_categories(&rows), vec!["Wires", "Lamps", UNKNOWN]);

        let report = ShortfallReport::compute(&rows, &ShortfallFilter::default());
        assert!(report.by_category.iter().any(|c| c.name == UNKNOWN && c.value == 300.0));
    }

    #[test]
    fn filters_and_options() {
        let rows = sample();
        assert_eq!(month_options(&rows), vec!["May", "April"]);
        assert_eq!(fy_options(&rows), vec!["FY24", "FY25"]);
        assert_eq!(category_options(&rows), vec!["Wires", "Lamps"]);

        let filter = ShortfallFilter {
            month: Some("April".into()),
            ..Default::default()
        };
        let report = ShortfallReport::compute(&rows, &filter);
        assert_eq!(report.summary.total_shortfall, 500.0);

        let filter = ShortfallFilter {
            category: Some("Pipes".into()),
            ..Default::default()
        };
        let report = ShortfallReport::compute(&rows, &filter);
        assert_eq!(report.summary, ShortfallSummary::default());
        assert!(report.by_month.is_empty());
    }
}
