use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Comparison applied between the referenced answer and the rule value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionOperator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    GreaterThan,
    LessThan,
    GreaterOrEqual,
    LessOrEqual,
    IsEmpty,
    IsNotEmpty,
    StartsWith,
    EndsWith,
    /// Unrecognized operator; evaluates fail-open.
    #[serde(other)]
    Unknown,
}

/// Effect a satisfied rule has on the block that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ConditionalAction {
    Show,
    Hide,
    Require,
    Optional,
    /// Unrecognized action; neither hides nor requires.
    #[serde(other)]
    Unknown,
}

/// A single "when field X matches, then act" statement owned by a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ConditionalRule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Identifier of the block whose answer is inspected. Looked up on every
    /// evaluation; it may dangle.
    pub field_id: String,
    pub operator: ConditionOperator,
    #[serde(default)]
    pub value: String,
    pub action: ConditionalAction,
}

impl ConditionalRule {
    pub fn new(
        field_id: impl Into<String>,
        operator: ConditionOperator,
        value: impl Into<String>,
        action: ConditionalAction,
    ) -> Self {
        Self {
            id: None,
            field_id: field_id.into(),
            operator,
            value: value.into(),
            action,
        }
    }
}
