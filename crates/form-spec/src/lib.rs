#![allow(missing_docs)]

pub mod answers;
pub mod coerce;
pub mod condition;
pub mod engine;
pub mod labels;
pub mod pages;
pub mod prefill;
pub mod schema;
pub mod spec;
pub mod validate;

pub use answers::{AnswerMap, ErrorMap, FileAnswer, ValidationResult};
pub use coerce::{coerce_for_comparison, coerce_numeric, is_empty};
pub use condition::{
    UNKNOWN_OPERATOR_RESULT, evaluate_condition, should_be_required, should_show_block,
};
pub use engine::{
    BlockState, EngineOptions, HiddenPolicy, SubmissionOutcome, block_state, evaluate_submission,
    validate_page,
};
pub use labels::{display_label, fallback_label};
pub use pages::{Page, split_pages};
pub use prefill::{hidden_field_key, prefill_hidden_fields};
pub use schema::{answers_schema, document_schema};
pub use spec::{
    Block, BlockType, ConditionOperator, ConditionalAction, ConditionalRule, Document,
    DocumentError, RuleIssue, RuleIssueKind,
};
pub use validate::{validate_answers, validate_block, validate_value};
