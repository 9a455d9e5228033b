use anyhow::bail;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Comparison operator of a filter criterion
///
/// The set is closed: an operator name outside this list is rejected when a
/// criteria payload is deserialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FilterOperator {
    /// Strict equality
    Equals,
    /// Strict inequality
    NotEquals,
    /// Case-insensitive substring match
    Contains,
    /// Negated substring match
    NotContains,
    /// Case-insensitive prefix match
    StartsWith,
    /// Case-insensitive suffix match
    EndsWith,
    /// Numeric >
    GreaterThan,
    /// Numeric <
    LessThan,
    /// Numeric >=
    GreaterThanOrEqual,
    /// Numeric <=
    LessThanOrEqual,
    /// Inclusive range, value must be a [min, max] pair
    Between,
    /// Membership in a value list
    In,
    /// Negated membership
    NotIn,
}

impl FilterOperator {
    /// Short display label for filter chips
    pub fn label(&self) -> &'static str {
        match self {
            FilterOperator::Equals => "=",
            FilterOperator::NotEquals => "≠",
            FilterOperator::Contains => "содержит",
            FilterOperator::NotContains => "не содержит",
            FilterOperator::StartsWith => "начинается с",
            FilterOperator::EndsWith => "заканчивается на",
            FilterOperator::GreaterThan => ">",
            FilterOperator::LessThan => "<",
            FilterOperator::GreaterThanOrEqual => ">=",
            FilterOperator::LessThanOrEqual => "<=",
            FilterOperator::Between => "между",
            FilterOperator::In => "из списка",
            FilterOperator::NotIn => "вне списка",
        }
    }
}

/// One declarative filter condition: field path, operator, comparison value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriterion {
    /// Dotted path into the record, e.g. "customer.balance"
    pub field: String,
    /// Comparison operator
    pub operator: FilterOperator,
    /// Comparison value: scalar, [min, max] for between, array for in/notIn
    pub value: Value,
    /// Optional human-readable label for UI chips
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl FilterCriterion {
    pub fn new(field: impl Into<String>, operator: FilterOperator, value: Value) -> Self {
        Self {
            field: field.into(),
            operator,
            value,
            label: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check the structural invariants of the criterion
    ///
    /// `between` requires a two-element array value, `in`/`notIn` require an
    /// array value, and the field path must be non-empty.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.field.trim().is_empty() {
            bail!("filter criterion has an empty field path");
        }
        match self.operator {
            FilterOperator::Between => match self.value.as_array() {
                Some(pair) if pair.len() == 2 => Ok(()),
                _ => bail!(
                    "between criterion on '{}' requires a [min, max] pair",
                    self.field
                ),
            },
            FilterOperator::In | FilterOperator::NotIn => {
                if self.value.is_array() {
                    Ok(())
                } else {
                    bail!(
                        "in/notIn criterion on '{}' requires an array value",
                        self.field
                    )
                }
            }
            _ => Ok(()),
        }
    }
}

/// Named snapshot of a criteria set, persisted per module
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedFilter {
    pub id: Uuid,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Criteria captured at save time, in order
    pub criteria: Vec<FilterCriterion>,
    /// Logical namespace ("accounts", "sales", ...) — the only partition key
    pub module: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(rename = "isDefault", default)]
    pub is_default: bool,
}

impl SavedFilter {
    /// Create a new snapshot with a fresh id and the current timestamp
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        criteria: Vec<FilterCriterion>,
        module: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description,
            criteria,
            module: module.into(),
            created_at: Utc::now(),
            updated_at: None,
            is_default: false,
        }
    }

    /// Update the modification timestamp
    pub fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

/// Storage key of a module's saved filter collection
pub fn storage_key(module: &str) -> String {
    format!("{}-saved-filters", module)
}
