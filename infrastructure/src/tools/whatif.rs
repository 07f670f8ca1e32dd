//! What-if tool: linear projections over stored aggregates

use crate::storage::{CafeDatabase, CatalogItem, StorageError};
use cafe_domain::tool::entities::{ParamType, ToolDefinition, ToolParameter};
use cafe_domain::whatif::{
    project_category_price, project_expense_change, project_hours_change, project_item_price,
    project_rental_price, project_volume_change,
};
use cafe_domain::{
    ActionKind, ExpenseCategory, PriceTarget, Projection, Scenario, ToolError, ToolOutput,
    ToolResult,
};
use std::time::Instant;
use tracing::debug;

/// Get the tool definition for whatif
pub fn whatif_definition() -> ToolDefinition {
    ToolDefinition::new(
        ActionKind::WhatIf,
        "Project the revenue and profit impact of a hypothetical change",
    )
    .with_parameter(
        ToolParameter::new("scenario_type", Scenario::TYPES.join(", "), true)
            .with_type(ParamType::String),
    )
    .with_parameter(
        ToolParameter::new("params", "Scenario parameters (see WHAT-IF SCENARIOS)", true)
            .with_type(ParamType::Object),
    )
    .with_example(r#"{"action": "whatif", "scenario_type": "price_change", "params": {"target": "games", "change_percent": 10}}"#)
}

fn storage_error(err: StorageError) -> ToolError {
    ToolError::execution_failed(err.to_string())
}

fn find_item(db: &CafeDatabase, target: &str) -> Result<CatalogItem, ToolError> {
    db.find_item(target)
        .map_err(storage_error)?
        .ok_or_else(|| ToolError::not_found(format!("Could not find item matching '{target}'")))
}

/// "labor" -> "Labor"
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn project(db: &CafeDatabase, scenario: &Scenario) -> Result<Projection, ToolError> {
    match scenario {
        Scenario::PriceChange {
            target,
            change_percent,
        } => match target {
            PriceTarget::Games => {
                let totals = db
                    .game_sales_totals()
                    .map_err(storage_error)?
                    .ok_or_else(|| ToolError::not_found("No game sales recorded"))?;
                Ok(project_category_price("Game", totals, *change_percent))
            }
            PriceTarget::Food => {
                let totals = db
                    .food_sales_totals()
                    .map_err(storage_error)?
                    .ok_or_else(|| ToolError::not_found("No food & beverage orders recorded"))?;
                Ok(project_category_price("Food & beverage", totals, *change_percent))
            }
            PriceTarget::Tables => {
                let revenue = db
                    .rental_revenue()
                    .map_err(storage_error)?
                    .ok_or_else(|| ToolError::not_found("No table rentals recorded"))?;
                Ok(project_rental_price(revenue, *change_percent))
            }
            PriceTarget::Item(name) => {
                let item = find_item(db, name)?;
                let sales = db.item_sales(&item).map_err(storage_error)?;
                if sales.units == 0.0 {
                    return Err(ToolError::not_found(format!("No sales found for {}", item.name)));
                }
                Ok(project_item_price(
                    &item.figures(sales.units),
                    sales.revenue,
                    *change_percent,
                ))
            }
        },
        Scenario::VolumeChange {
            target,
            quantity_change,
        } => {
            let item = find_item(db, target)?;
            let sales = db.item_sales(&item).map_err(storage_error)?;
            Ok(project_volume_change(&item.figures(sales.units), *quantity_change))
        }
        Scenario::ExpenseChange {
            category,
            change_percent,
            month,
        } => {
            let period = month.as_deref().unwrap_or("all time");
            let current = db
                .expense_total(category, month.as_deref())
                .map_err(storage_error)?
                .filter(|total| *total != 0.0)
                .ok_or_else(|| {
                    ToolError::not_found(match category {
                        ExpenseCategory::All => format!("No expenses found for {period}"),
                        ExpenseCategory::Matching(name) => {
                            format!("No expenses found matching category '{name}' for {period}")
                        }
                    })
                })?;
            let label = match category {
                ExpenseCategory::All => "All operating".to_string(),
                ExpenseCategory::Matching(name) => capitalize(name),
            };
            Ok(project_expense_change(&label, period, current, *change_percent))
        }
        Scenario::HoursChange {
            hours_change,
            hourly_rate,
        } => {
            let rate = match hourly_rate {
                Some(rate) => *rate,
                None => db
                    .average_hourly_rate()
                    .map_err(storage_error)?
                    .ok_or_else(|| ToolError::not_found("No table rentals recorded"))?,
            };
            Ok(project_hours_change(*hours_change, rate))
        }
    }
}

/// Execute the whatif tool
pub fn execute_whatif(db: &CafeDatabase, scenario: &Scenario) -> ToolResult {
    let start = Instant::now();
    debug!(scenario = scenario.type_name(), "Projecting scenario");
    let result = match project(db, scenario) {
        Ok(projection) => ToolResult::success(ActionKind::WhatIf, ToolOutput::Projection(projection)),
        Err(e) => ToolResult::failure(ActionKind::WhatIf, e),
    };
    result.with_duration(start.elapsed().as_millis() as u64)
}
