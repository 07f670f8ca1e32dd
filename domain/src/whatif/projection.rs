//! Linear projections for what-if scenarios.

use crate::util::round2;
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Revenue and gross profit over a sales table.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SalesTotals {
    pub revenue: f64,
    pub profit: f64,
}

/// Unit economics and historical volume for a single item.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemFigures {
    pub name: String,
    pub price: f64,
    pub cost: f64,
    pub units_sold: f64,
}

/// A named figure in a projection.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub label: &'static str,
    pub value: f64,
}

/// Result of projecting a scenario.
///
/// Serializes as a flat JSON object with the scenario label first, then
/// the figures in insertion order, then the period and notes.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub scenario: String,
    pub period: Option<String>,
    pub figures: Vec<Figure>,
    pub assumption: Option<String>,
    pub note: Option<String>,
}

impl Projection {
    fn new(scenario: impl Into<String>) -> Self {
        Self {
            scenario: scenario.into(),
            period: None,
            figures: Vec::new(),
            assumption: None,
            note: None,
        }
    }

    /// Add a figure, rounded to cents.
    fn figure(mut self, label: &'static str, value: f64) -> Self {
        self.figures.push(Figure {
            label,
            value: round2(value),
        });
        self
    }

    fn with_period(mut self, period: impl Into<String>) -> Self {
        self.period = Some(period.into());
        self
    }

    fn with_assumption(mut self, assumption: impl Into<String>) -> Self {
        self.assumption = Some(assumption.into());
        self
    }

    fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Look up a figure by label.
    pub fn get(&self, label: &str) -> Option<f64> {
        self.figures.iter().find(|f| f.label == label).map(|f| f.value)
    }
}

impl Serialize for Projection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("scenario", &self.scenario)?;
        if let Some(period) = &self.period {
            map.serialize_entry("period", period)?;
        }
        for figure in &self.figures {
            map.serialize_entry(figure.label, &figure.value)?;
        }
        if let Some(note) = &self.note {
            map.serialize_entry("note", note)?;
        }
        if let Some(assumption) = &self.assumption {
            map.serialize_entry("assumption", assumption)?;
        }
        map.end()
    }
}

fn multiplier(change_percent: f64) -> f64 {
    1.0 + change_percent / 100.0
}

fn direction(change: f64) -> &'static str {
    if change > 0.0 { "increased" } else { "decreased" }
}

/// Render a number without a trailing `.0` for whole values.
fn plain(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Price change across a whole category (games or food & beverage).
///
/// Costs stay fixed, so every extra unit of revenue is extra profit.
pub fn project_category_price(label: &str, totals: SalesTotals, change_percent: f64) -> Projection {
    let m = multiplier(change_percent);
    let new_revenue = totals.revenue * m;
    let new_profit = totals.profit + totals.revenue * (m - 1.0);
    Projection::new(format!(
        "{label} prices {} by {}%",
        direction(change_percent),
        plain(change_percent.abs())
    ))
    .figure("current_revenue", totals.revenue)
    .figure("projected_revenue", new_revenue)
    .figure("revenue_change", new_revenue - totals.revenue)
    .figure("current_profit", totals.profit)
    .figure("projected_profit", new_profit)
    .figure("profit_change", new_profit - totals.profit)
    .with_assumption("Assumes same volume sold at new prices")
}

/// Rental rate change; rentals have no direct cost.
pub fn project_rental_price(current_revenue: f64, change_percent: f64) -> Projection {
    let new_revenue = current_revenue * multiplier(change_percent);
    Projection::new(format!(
        "Table rental rates {} by {}%",
        direction(change_percent),
        plain(change_percent.abs())
    ))
    .figure("current_revenue", current_revenue)
    .figure("projected_revenue", new_revenue)
    .figure("revenue_change", new_revenue - current_revenue)
    .with_note("Table rentals are pure profit (no direct costs)")
    .with_assumption("Assumes same booking volume at new rates")
}

/// Price change for a single item at its historical volume.
pub fn project_item_price(item: &ItemFigures, current_revenue: f64, change_percent: f64) -> Projection {
    let new_price = item.price * multiplier(change_percent);
    let current_profit = item.units_sold * (item.price - item.cost);
    let new_revenue = item.units_sold * new_price;
    let new_profit = item.units_sold * (new_price - item.cost);
    Projection::new(format!(
        "{} price changed from ${:.2} to ${:.2} ({:+.0}%)",
        item.name, item.price, new_price, change_percent
    ))
    .figure("units_sold", item.units_sold)
    .figure("current_revenue", current_revenue)
    .figure("projected_revenue", new_revenue)
    .figure("revenue_change", new_revenue - current_revenue)
    .figure("current_profit", current_profit)
    .figure("projected_profit", new_profit)
    .figure("profit_change", new_profit - current_profit)
    .with_assumption("Assumes same units sold at new price")
}

/// Selling more (or fewer) units of an item at its current price.
pub fn project_volume_change(item: &ItemFigures, quantity_change: f64) -> Projection {
    let profit_per_unit = item.price - item.cost;
    let (verb, qualifier) = if quantity_change > 0.0 {
        ("Sell", "more")
    } else {
        ("Sold", "fewer")
    };
    Projection::new(format!(
        "{verb} {} {qualifier} units of {}",
        plain(quantity_change.abs()),
        item.name
    ))
    .figure("price_per_unit", item.price)
    .figure("cost_per_unit", item.cost)
    .figure("profit_per_unit", profit_per_unit)
    .figure("revenue_impact", quantity_change * item.price)
    .figure("profit_impact", quantity_change * profit_per_unit)
}

/// Operating expense change; profit moves opposite to expenses.
pub fn project_expense_change(
    label: &str,
    period: &str,
    current_expenses: f64,
    change_percent: f64,
) -> Projection {
    let new_total = current_expenses * multiplier(change_percent);
    let delta = new_total - current_expenses;
    Projection::new(format!(
        "{label} expenses {} by {}%",
        direction(change_percent),
        plain(change_percent.abs())
    ))
    .with_period(period)
    .figure("current_expenses", current_expenses)
    .figure("projected_expenses", new_total)
    .figure("expense_change", delta)
    .figure("net_profit_impact", -delta)
    .with_note("Negative impact means reduced profit")
}

/// More (or fewer) table rental hours at a given hourly rate.
pub fn project_hours_change(hours_change: f64, hourly_rate: f64) -> Projection {
    let revenue_impact = hours_change * hourly_rate;
    let verb = if hours_change > 0.0 { "Add" } else { "Reduce" };
    Projection::new(format!(
        "{verb} {} rental hours at ${hourly_rate:.2}/hour",
        plain(hours_change.abs())
    ))
    .figure("hourly_rate", hourly_rate)
    .figure("hours_change", hours_change)
    .figure("revenue_impact", revenue_impact)
    .figure("profit_impact", revenue_impact)
    .with_note("Table rentals are 100% margin (no direct costs)")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catan() -> ItemFigures {
        ItemFigures {
            name: "Catan".to_string(),
            price: 49.99,
            cost: 27.50,
            units_sold: 4.0,
        }
    }

    #[test]
    fn test_category_price_increase() {
        let totals = SalesTotals {
            revenue: 1000.0,
            profit: 400.0,
        };
        let p = project_category_price("Game", totals, 10.0);
        assert_eq!(p.scenario, "Game prices increased by 10%");
        assert_eq!(p.get("projected_revenue"), Some(1100.0));
        assert_eq!(p.get("projected_profit"), Some(500.0));
        assert_eq!(p.get("profit_change"), Some(100.0));
    }

    #[test]
    fn test_category_price_decrease() {
        let totals = SalesTotals {
            revenue: 200.0,
            profit: 80.0,
        };
        let p = project_category_price("Food & beverage", totals, -5.0);
        assert_eq!(p.scenario, "Food & beverage prices decreased by 5%");
        assert_eq!(p.get("revenue_change"), Some(-10.0));
        assert_eq!(p.get("projected_profit"), Some(70.0));
    }

    #[test]
    fn test_rental_price() {
        let p = project_rental_price(500.0, 20.0);
        assert_eq!(p.get("projected_revenue"), Some(600.0));
        assert!(p.note.is_some());
    }

    #[test]
    fn test_item_price() {
        let item = catan();
        let p = project_item_price(&item, 199.96, 10.0);
        assert_eq!(p.scenario, "Catan price changed from $49.99 to $54.99 (+10%)");
        assert_eq!(p.get("units_sold"), Some(4.0));
        // 4 * 49.99 * 1.1 = 219.956
        assert_eq!(p.get("projected_revenue"), Some(219.96));
        // 4 * (49.99 - 27.50) = 89.96
        assert_eq!(p.get("current_profit"), Some(89.96));
    }

    #[test]
    fn test_volume_change() {
        let p = project_volume_change(&catan(), 10.0);
        assert_eq!(p.scenario, "Sell 10 more units of Catan");
        assert_eq!(p.get("profit_per_unit"), Some(22.49));
        assert_eq!(p.get("revenue_impact"), Some(499.9));
        assert_eq!(p.get("profit_impact"), Some(224.9));

        let p = project_volume_change(&catan(), -2.0);
        assert_eq!(p.scenario, "Sold 2 fewer units of Catan");
        assert_eq!(p.get("profit_impact"), Some(-44.98));
    }

    #[test]
    fn test_expense_change_profit_impact_is_negated() {
        let p = project_expense_change("All operating", "2026-01", 10_000.0, 10.0);
        assert_eq!(p.get("expense_change"), Some(1000.0));
        assert_eq!(p.get("net_profit_impact"), Some(-1000.0));
        assert_eq!(p.period.as_deref(), Some("2026-01"));
    }

    #[test]
    fn test_hours_change() {
        let p = project_hours_change(20.0, 12.5);
        assert_eq!(p.scenario, "Add 20 rental hours at $12.50/hour");
        assert_eq!(p.get("revenue_impact"), Some(250.0));
        assert_eq!(p.get("profit_impact"), Some(250.0));
    }

    #[test]
    fn test_serialization_keeps_scenario_first() {
        let p = project_hours_change(-4.0, 10.0);
        let json = serde_json::to_string(&p).unwrap();
        assert!(json.starts_with(r#"{"scenario":"Reduce 4 rental hours at $10.00/hour""#));
        assert!(json.contains(r#""revenue_impact":-40.0"#));
    }
}
