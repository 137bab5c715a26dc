use std::collections::HashMap;

use super::model::FulfillmentRow;

/// Highlight colour of a ratio range card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeTone {
    Red,
    Blue,
    Green,
}

/// An inclusive band of fulfillment ratios, in percent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatioRange {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub tone: RangeTone,
}

impl RatioRange {
    /// Lines whose ratio did not parse never match.
    pub fn contains(&self, row: &FulfillmentRow) -> bool {
        row.ratio
            .is_some_and(|r| r >= self.min && r <= self.max)
    }
}

pub const RATIO_RANGES: [RatioRange; 3] = [
    RatioRange {
        label: "85% - 90%",
        min: 85.0,
        max: 90.0,
        tone: RangeTone::Red,
    },
    RatioRange {
        label: "90% - 95%",
        min: 90.0,
        max: 95.0,
        tone: RangeTone::Blue,
    },
    RatioRange {
        label: "98% - 100%",
        min: 98.0,
        max: 100.0,
        tone: RangeTone::Green,
    },
];

/// Quantities of one order, summed over its lines inside a range.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderTotals {
    pub order: String,
    pub required: f64,
    pub fulfilled: f64,
    pub pending: f64,
    pub sku_count: usize,
}

/// Orders with at least one line in `range`, first-seen order.
pub fn aggregate_orders(rows: &[FulfillmentRow], range: &RatioRange) -> Vec<OrderTotals> {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut orders: Vec<OrderTotals> = Vec::new();
    for row in rows.iter().filter(|r| range.contains(r)) {
        let i = *index.entry(row.order.as_str()).or_insert_with(|| {
            orders.push(OrderTotals {
                order: row.order.clone(),
                required: 0.0,
                fulfilled: 0.0,
                pending: 0.0,
                sku_count: 0,
            });
            orders.len() - 1
        });
        let totals = &mut orders[i];
        totals.required += row.required;
        totals.fulfilled += row.fulfilled;
        totals.pending += row.pending;
        totals.sku_count += 1;
    }
    orders
}

/// Lines of `order` inside `range`.
pub fn order_details<'a>(
    rows: &'a [FulfillmentRow],
    range: &RatioRange,
    order: &str,
) -> Vec<&'a FulfillmentRow> {
    rows.iter()
        .filter(|r| r.order == order && range.contains(r))
        .collect()
}

/// Headline cards of the fulfillment view.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FulfillmentTotals {
    pub orders: usize,
    pub required: f64,
    pub fulfilled: f64,
}

impl FulfillmentTotals {
    pub fn from_orders(orders: &[OrderTotals]) -> Self {
        FulfillmentTotals {
            orders: orders.len(),
            required: orders.iter().map(|o| o.required).sum(),
            fulfilled: orders.iter().map(|o| o.fulfilled).sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(order: &str, sku: &str, required: f64, fulfilled: f64, ratio: Option<f64>) -> FulfillmentRow {
        FulfillmentRow {
            order: order.into(),
            sku: sku.into(),
            required,
            fulfilled,
            pending: required - fulfilled,
            short_sales: required - fulfilled,
            ratio,
        }
    }

    fn sample() -> Vec<FulfillmentRow> {
        vec![
            line("SO-2", "A", 100.0, 88.0, Some(88.0)),
            line("SO-1", "B", 100.0, 90.0, Some(90.0)),
            line("SO-2", "C", 50.0, 45.0, Some(90.0)),
            line("SO-1", "D", 10.0, 10.0, Some(100.0)),
            line("SO-3", "E", 10.0, 0.0, None),
        ]
    }

    #[test]
    fn range_bounds_are_inclusive() {
        let rows = sample();
        let red = &RATIO_RANGES[0];
        let blue = &RATIO_RANGES[1];
        assert!(red.contains(&rows[1]));
        assert!(blue.contains(&rows[1]));
        assert!(!red.contains(&rows[4]));
    }

    #[test]
    fn orders_aggregate_in_first_seen_order() {
        let rows = sample();
        let orders = aggregate_orders(&rows, &RATIO_RANGES[0]);
        let names: Vec<&str> = orders.iter().map(|o| o.order.as_str()).collect();
        assert_eq!(names, vec!["SO-2", "SO-1"]);
        assert_eq!(orders[0].required, 150.0);
        assert_eq!(orders[0].pending, 17.0);
        assert_eq!(orders[0].sku_count, 2);

        let totals = FulfillmentTotals::from_orders(&orders);
        assert_eq!(totals.orders, 2);
        assert_eq!(totals.required, 250.0);
        assert_eq!(totals.fulfilled, 223.0);
    }

    #[test]
    fn details_respect_the_range() {
        let rows = sample();
        let details = order_details(&rows, &RATIO_RANGES[2], "SO-1");
        assert_eq!(details.len(), 1);
        assert_eq!(details[0].sku, "D");
        assert!(order_details(&rows, &RATIO_RANGES[2], "SO-3").is_empty());
    }
}
