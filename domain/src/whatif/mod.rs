//! What-if scenario domain.
//!
//! A [`Scenario`] describes a hypothetical change to prices, volumes,
//! expenses or rental hours. The projection functions in [`projection`]
//! are pure: storage adapters fetch the aggregates, this module does the
//! arithmetic.

pub mod projection;
pub mod scenario;

pub use projection::{
    ItemFigures, Projection, SalesTotals, project_category_price, project_expense_change,
    project_hours_change, project_item_price, project_rental_price, project_volume_change,
};
pub use scenario::{ExpenseCategory, PriceTarget, Scenario, ScenarioError, normalize_month};
