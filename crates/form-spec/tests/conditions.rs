use serde_json::{Value, json};

use form_spec::spec::rule::{ConditionOperator, ConditionalAction, ConditionalRule};
use form_spec::{AnswerMap, evaluate_condition, should_be_required, should_show_block};

fn answers(value: Value) -> AnswerMap {
    value.as_object().cloned().unwrap_or_default()
}

fn rule(field: &str, operator: ConditionOperator, value: &str, action: ConditionalAction) -> ConditionalRule {
    ConditionalRule::new(field, operator, value, action)
}

#[test]
fn equality_is_symmetric_but_substrings_are_not() {
    let pairs = [("Alpha", "alpha"), ("beta", "gamma"), ("", "")];
    for (left, right) in pairs {
        for operator in [ConditionOperator::Equals, ConditionOperator::NotEquals] {
            let forward = rule("f", operator, right, ConditionalAction::Show);
            let backward = rule("f", operator, left, ConditionalAction::Show);
            assert_eq!(
                evaluate_condition(&forward, Some(&json!(left))),
                evaluate_condition(&backward, Some(&json!(right))),
            );
        }
    }

    let contains = rule("f", ConditionOperator::Contains, "abc", ConditionalAction::Show);
    let reversed = rule("f", ConditionOperator::Contains, "abcdef", ConditionalAction::Show);
    assert!(evaluate_condition(&contains, Some(&json!("abcdef"))));
    assert!(!evaluate_condition(&reversed, Some(&json!("abc"))));

    let starts = rule("f", ConditionOperator::StartsWith, "ab", ConditionalAction::Show);
    let starts_reversed = rule("f", ConditionOperator::StartsWith, "abc", ConditionalAction::Show);
    assert!(evaluate_condition(&starts, Some(&json!("abc"))));
    assert!(!evaluate_condition(&starts_reversed, Some(&json!("ab"))));
}

#[test]
fn no_rules_means_visible_and_not_required() {
    for value in [json!({}), json!({ "q1": "x" }), json!({ "q1": null })] {
        let answers = answers(value);
        assert!(should_show_block(&[], &answers));
        assert!(!should_be_required(&[], &answers));
    }
}

#[test]
fn single_show_rule_tracks_answer() {
    let rules = [rule("F", ConditionOperator::Equals, "x", ConditionalAction::Show)];
    assert!(should_show_block(&rules, &answers(json!({ "F": "x" }))));
    assert!(should_show_block(&rules, &answers(json!({ "F": "X" }))));
    assert!(!should_show_block(&rules, &answers(json!({ "F": "y" }))));
    assert!(!should_show_block(&rules, &AnswerMap::new()));
}

#[test]
fn hide_when_empty() {
    let rules = [rule("q1", ConditionOperator::IsEmpty, "", ConditionalAction::Hide)];
    assert!(!should_show_block(&rules, &answers(json!({ "q1": "" }))));
    assert!(should_show_block(&rules, &answers(json!({ "q1": "filled" }))));
}

#[test]
fn visibility_requires_every_rule() {
    let rules = [
        rule("a", ConditionOperator::Equals, "yes", ConditionalAction::Show),
        rule("b", ConditionOperator::Equals, "yes", ConditionalAction::Hide),
        rule("c", ConditionOperator::Equals, "never", ConditionalAction::Require),
    ];
    assert!(should_show_block(&rules, &answers(json!({ "a": "yes", "b": "no" }))));
    assert!(!should_show_block(&rules, &answers(json!({ "a": "yes", "b": "yes" }))));
    assert!(!should_show_block(&rules, &answers(json!({ "a": "no", "b": "no" }))));
}

#[test]
fn required_needs_any_require_rule() {
    let rules = [
        rule("a", ConditionOperator::Equals, "1", ConditionalAction::Require),
        rule("b", ConditionOperator::Equals, "1", ConditionalAction::Require),
    ];
    assert!(should_be_required(&rules, &answers(json!({ "a": 1 }))));
    assert!(should_be_required(&rules, &answers(json!({ "b": "1" }))));
    assert!(!should_be_required(&rules, &answers(json!({ "a": 2, "b": 2 }))));
}

#[test]
fn non_require_rules_never_require() {
    let rules = [
        rule("a", ConditionOperator::IsEmpty, "", ConditionalAction::Show),
        rule("a", ConditionOperator::IsEmpty, "", ConditionalAction::Hide),
        rule("a", ConditionOperator::IsEmpty, "", ConditionalAction::Optional),
        rule("a", ConditionOperator::Unknown, "", ConditionalAction::Unknown),
    ];
    assert!(!should_be_required(&rules, &AnswerMap::new()));
    assert!(!should_be_required(&rules, &answers(json!({ "a": "x" }))));
}

#[test]
fn unknown_values_deserialize_fail_open() {
    let rule: ConditionalRule = serde_json::from_value(json!({
        "fieldId": "q1",
        "operator": "matches_regex",
        "value": "^a",
        "action": "highlight"
    }))
    .expect("unknown variants still parse");
    assert_eq!(rule.operator, ConditionOperator::Unknown);
    assert_eq!(rule.action, ConditionalAction::Unknown);
    assert!(evaluate_condition(&rule, None));
    assert!(should_show_block(std::slice::from_ref(&rule), &AnswerMap::new()));
}

#[test]
fn dangling_reference_compares_against_blank() {
    let rules = [rule("ghost", ConditionOperator::IsNotEmpty, "", ConditionalAction::Show)];
    assert!(!should_show_block(&rules, &answers(json!({ "q1": "x" }))));
}
