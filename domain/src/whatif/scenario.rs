//! Scenario value objects and their parsing from action parameters.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Year the seeded cafe data covers; bare month names resolve into it.
pub const DATA_YEAR: i32 = 2026;

/// What a price change applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceTarget {
    Games,
    Food,
    Tables,
    /// A single board game or menu item, matched by name substring.
    Item(String),
}

impl PriceTarget {
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "games" | "game" => PriceTarget::Games,
            "food" | "food_bev" | "drinks" => PriceTarget::Food,
            "tables" | "rentals" | "table_rentals" => PriceTarget::Tables,
            _ => PriceTarget::Item(raw.trim().to_string()),
        }
    }
}

/// Which operating expenses an expense change applies to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseCategory {
    All,
    /// Categories whose name contains this substring (case-insensitive).
    Matching(String),
}

impl ExpenseCategory {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            ExpenseCategory::All
        } else {
            ExpenseCategory::Matching(trimmed.to_lowercase())
        }
    }
}

/// A hypothetical business change to project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scenario_type", rename_all = "snake_case")]
pub enum Scenario {
    PriceChange {
        target: PriceTarget,
        change_percent: f64,
    },
    VolumeChange {
        target: String,
        quantity_change: f64,
    },
    ExpenseChange {
        category: ExpenseCategory,
        change_percent: f64,
        /// Normalized `YYYY-MM`, or `None` for all months.
        month: Option<String>,
    },
    HoursChange {
        hours_change: f64,
        /// `None` means "use the historical average rate".
        hourly_rate: Option<f64>,
    },
}

/// Why a scenario could not be built from action parameters.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ScenarioError {
    #[error("unknown scenario_type '{0}' (expected one of {types})", types = Scenario::TYPES.join(", "))]
    UnknownType(String),

    #[error("missing or invalid parameter '{0}'")]
    Parameter(&'static str),
}

impl ScenarioError {
    /// The offending field, as reported back to the model.
    pub fn field(&self) -> String {
        match self {
            ScenarioError::UnknownType(_) => "scenario_type".to_string(),
            ScenarioError::Parameter(name) => format!("params.{name}"),
        }
    }
}

impl Scenario {
    /// Accepted `scenario_type` names.
    pub const TYPES: [&'static str; 4] = [
        "price_change",
        "volume_change",
        "expense_change",
        "hours_change",
    ];

    /// Build a scenario from a `scenario_type` name and its `params` object.
    pub fn from_params(scenario_type: &str, params: &Map<String, Value>) -> Result<Self, ScenarioError> {
        match scenario_type.trim() {
            "price_change" => Ok(Scenario::PriceChange {
                target: PriceTarget::parse(require_str(params, "target")?),
                change_percent: require_number(params, "change_percent")?,
            }),
            "volume_change" => Ok(Scenario::VolumeChange {
                target: require_str(params, "target")?.trim().to_string(),
                quantity_change: require_number(params, "quantity_change")?,
            }),
            "expense_change" => Ok(Scenario::ExpenseChange {
                category: ExpenseCategory::parse(
                    optional_str(params, "category")?.unwrap_or("all"),
                ),
                change_percent: require_number(params, "change_percent")?,
                month: optional_str(params, "month")?.map(normalize_month),
            }),
            "hours_change" => Ok(Scenario::HoursChange {
                hours_change: require_number(params, "hours_change")?,
                hourly_rate: optional_number(params, "hourly_rate")?,
            }),
            other => Err(ScenarioError::UnknownType(other.to_string())),
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Scenario::PriceChange { .. } => "price_change",
            Scenario::VolumeChange { .. } => "volume_change",
            Scenario::ExpenseChange { .. } => "expense_change",
            Scenario::HoursChange { .. } => "hours_change",
        }
    }
}

/// Normalize a month reference to `YYYY-MM`.
///
/// English month names and three-letter abbreviations resolve into
/// [`DATA_YEAR`]; anything else is passed through trimmed.
pub fn normalize_month(raw: &str) -> String {
    const MONTHS: [&str; 12] = [
        "january",
        "february",
        "march",
        "april",
        "may",
        "june",
        "july",
        "august",
        "september",
        "october",
        "november",
        "december",
    ];
    let lower = raw.trim().to_lowercase();
    let position = MONTHS
        .iter()
        .position(|name| *name == lower || (lower.len() == 3 && name.starts_with(&lower)));
    match position {
        Some(index) => format!("{DATA_YEAR}-{:02}", index + 1),
        None => raw.trim().to_string(),
    }
}

fn require_str<'a>(params: &'a Map<String, Value>, key: &'static str) -> Result<&'a str, ScenarioError> {
    optional_str(params, key)?.ok_or(ScenarioError::Parameter(key))
}

fn optional_str<'a>(
    params: &'a Map<String, Value>,
    key: &'static str,
) -> Result<Option<&'a str>, ScenarioError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) if !s.trim().is_empty() => Ok(Some(s.as_str())),
        Some(_) => Err(ScenarioError::Parameter(key)),
    }
}

fn require_number(params: &Map<String, Value>, key: &'static str) -> Result<f64, ScenarioError> {
    optional_number(params, key)?.ok_or(ScenarioError::Parameter(key))
}

/// Numbers may arrive as JSON numbers or numeric strings ("10", "-5%").
fn optional_number(params: &Map<String, Value>, key: &'static str) -> Result<Option<f64>, ScenarioError> {
    match params.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or(ScenarioError::Parameter(key)),
        Some(Value::String(s)) => s
            .trim()
            .trim_end_matches('%')
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|_| ScenarioError::Parameter(key)),
        Some(_) => Err(ScenarioError::Parameter(key)),
    }
}
