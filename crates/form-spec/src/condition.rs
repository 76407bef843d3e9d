use serde_json::Value;
use tracing::trace;

use crate::answers::AnswerMap;
use crate::coerce::{coerce_for_comparison, is_empty_sentinel, parse_numeric};
use crate::spec::rule::{ConditionOperator, ConditionalAction, ConditionalRule};

/// Result for operators the evaluator does not recognise. An unrecognised rule
/// must never block a respondent, so it is treated as satisfied.
pub const UNKNOWN_OPERATOR_RESULT: bool = true;

/// Evaluates one rule against the observed answer of the field it references.
pub fn evaluate_condition(rule: &ConditionalRule, observed: Option<&Value>) -> bool {
    let value = coerce_for_comparison(observed);
    let expected = rule.value.to_lowercase();

    match rule.operator {
        ConditionOperator::Equals => value == expected,
        ConditionOperator::NotEquals => value != expected,
        ConditionOperator::Contains => value.contains(&expected),
        ConditionOperator::NotContains => !value.contains(&expected),
        // NaN on either side makes every comparison false.
        ConditionOperator::GreaterThan => parse_numeric(&value) > parse_numeric(&expected),
        ConditionOperator::LessThan => parse_numeric(&value) < parse_numeric(&expected),
        ConditionOperator::GreaterOrEqual => parse_numeric(&value) >= parse_numeric(&expected),
        ConditionOperator::LessOrEqual => parse_numeric(&value) <= parse_numeric(&expected),
        ConditionOperator::IsEmpty => is_empty_sentinel(&value),
        ConditionOperator::IsNotEmpty => !is_empty_sentinel(&value),
        ConditionOperator::StartsWith => value.starts_with(&expected),
        ConditionOperator::EndsWith => value.ends_with(&expected),
        ConditionOperator::Unknown => UNKNOWN_OPERATOR_RESULT,
    }
}

/// Whether a block carrying `rules` is shown for the given answers.
///
/// Every rule must agree (AND): a `show` rule passes when its condition holds,
/// a `hide` rule passes when it does not, and any other action passes.
pub fn should_show_block(rules: &[ConditionalRule], answers: &AnswerMap) -> bool {
    rules.iter().all(|rule| {
        let met = evaluate_condition(rule, answers.get(&rule.field_id));
        let passes = match rule.action {
            ConditionalAction::Show => met,
            ConditionalAction::Hide => !met,
            ConditionalAction::Require
            | ConditionalAction::Optional
            | ConditionalAction::Unknown => true,
        };
        trace!(field = %rule.field_id, action = ?rule.action, met, passes, "visibility rule");
        passes
    })
}

/// Whether the rules force the block to be answered.
///
/// Unlike visibility this is an OR: one satisfied `require` rule is enough.
/// `optional` rules are not consulted, so rules can only add a requirement on
/// top of the block's own flag. Existing forms depend on this asymmetry.
pub fn should_be_required(rules: &[ConditionalRule], answers: &AnswerMap) -> bool {
    rules.iter().any(|rule| {
        rule.action == ConditionalAction::Require
            && evaluate_condition(rule, answers.get(&rule.field_id))
    })
}
