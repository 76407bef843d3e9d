use schemars::schema_for;
use serde_json::{Map, Value, json};

use crate::engine::SubmissionOutcome;
use crate::spec::block::{Block, BlockType};
use crate::spec::document::Document;

/// JSON Schema describing the document format.
pub fn document_schema() -> Value {
    schema_for!(Document).to_value()
}

/// JSON Schema for the answers of the blocks that are visible in `outcome`.
/// Effectively required blocks are listed under `required`.
pub fn answers_schema(document: &Document, outcome: &SubmissionOutcome) -> Value {
    let mut properties = Map::new();
    let mut required = Vec::new();

    for block in &document.blocks {
        if !block.kind.collects_answer() {
            continue;
        }
        let Some(state) = outcome.state(&block.id) else {
            continue;
        };
        if !state.visible {
            continue;
        }
        properties.insert(block.id.clone(), block_schema(block));
        if state.required && !block.kind.is_external_flow() {
            required.push(Value::String(block.id.clone()));
        }
    }

    json!({
        "$schema": "https://json-schema.org/draft/2020-12/schema",
        "title": document.title.clone().unwrap_or_else(|| "Answers".to_string()),
        "type": "object",
        "properties": properties,
        "required": required,
    })
}

fn block_schema(block: &Block) -> Value {
    let options = block.options();
    match block.kind {
        BlockType::Email => json!({ "type": "string", "format": "email" }),
        BlockType::Url => json!({ "type": "string", "format": "uri" }),
        BlockType::Date => json!({ "type": "string", "format": "date" }),
        BlockType::Time => json!({ "type": "string", "pattern": "^[0-9]{2}:[0-9]{2}$" }),
        BlockType::Number => json!({ "type": ["number", "string"] }),
        BlockType::MultipleChoice | BlockType::Dropdown => {
            json!({ "type": "string", "enum": options })
        }
        BlockType::Checkboxes | BlockType::MultiSelect => json!({
            "type": "array",
            "items": { "type": "string", "enum": options },
        }),
        BlockType::Ranking => json!({
            "type": "array",
            "items": { "type": "string", "enum": options },
            "minItems": options.len(),
            "maxItems": options.len(),
            "uniqueItems": true,
        }),
        BlockType::LinearScale => {
            let (min, max) = block.scale_bounds();
            json!({ "type": ["number", "string"], "minimum": min, "maximum": max })
        }
        BlockType::Rating => {
            json!({ "type": ["number", "string"], "minimum": 1, "maximum": block.rating_max() })
        }
        BlockType::Matrix => {
            let rows: Map<String, Value> = block
                .rows()
                .iter()
                .map(|row| (row.clone(), json!({ "type": "string", "enum": block.columns() })))
                .collect();
            json!({ "type": "object", "properties": rows })
        }
        BlockType::FileUpload => json!({
            "type": "object",
            "properties": {
                "name": { "type": "string" },
                "size": { "type": "number", "maximum": block.file_max_bytes() },
                "type": { "type": "string" },
                "data": { "type": "string" },
            },
            "required": ["name", "type", "data"],
        }),
        BlockType::Signature => json!({ "type": "string", "pattern": "^data:image/" }),
        BlockType::Recaptcha => json!({ "const": "verified" }),
        BlockType::Payment | BlockType::WalletConnect => json!({}),
        _ => json!({ "type": "string" }),
    }
}
