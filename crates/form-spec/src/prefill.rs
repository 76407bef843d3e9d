use std::collections::BTreeMap;

use serde_json::Value;
use tracing::debug;

use crate::answers::AnswerMap;
use crate::spec::block::{Block, BlockType};
use crate::spec::document::Document;

/// Query parameter that feeds a hidden field: its trimmed content, or its id
/// when the content is blank.
pub fn hidden_field_key(block: &Block) -> &str {
    match block.content.trim() {
        "" => &block.id,
        key => key,
    }
}

/// Copies URL parameters into hidden-field answers. Returns the ids of the
/// blocks that were filled; answers for other keys are left untouched.
pub fn prefill_hidden_fields(
    document: &Document,
    params: &BTreeMap<String, String>,
    answers: &mut AnswerMap,
) -> Vec<String> {
    let mut filled = Vec::new();
    for block in &document.blocks {
        if block.kind != BlockType::HiddenField {
            continue;
        }
        if let Some(param) = params.get(hidden_field_key(block)) {
            answers.insert(block.id.clone(), Value::String(param.clone()));
            filled.push(block.id.clone());
        }
    }
    debug!(filled = filled.len(), "prefilled hidden fields");
    filled
}
