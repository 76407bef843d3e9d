pub mod block;
pub mod document;
pub mod rule;

pub use block::{Block, BlockType};
pub use document::{Document, DocumentError, RuleIssue, RuleIssueKind};
pub use rule::{ConditionOperator, ConditionalAction, ConditionalRule};
