use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::spec::block::{Block, BlockType};

/// Failures raised while loading a document.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("failed to parse document: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("block id '{0}' is used more than once")]
    DuplicateId(String),
}

/// Ordered sequence of blocks making up one form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema, Default)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default)]
    pub blocks: Vec<Block>,
}

impl Document {
    /// Builds a document, rejecting duplicate block identifiers.
    pub fn new(blocks: Vec<Block>) -> Result<Self, DocumentError> {
        let document = Self {
            id: None,
            title: None,
            blocks,
        };
        document.ensure_unique_ids()?;
        Ok(document)
    }

    /// Parses a document from JSON. Accepts either a document object or a
    /// bare array of blocks.
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        let document = if value.is_array() {
            Self {
                blocks: serde_json::from_value(value)?,
                ..Self::default()
            }
        } else {
            serde_json::from_value(value)?
        };
        document.ensure_unique_ids()?;
        Ok(document)
    }

    pub fn ensure_unique_ids(&self) -> Result<(), DocumentError> {
        let mut seen = BTreeSet::new();
        for block in &self.blocks {
            if !seen.insert(block.id.as_str()) {
                return Err(DocumentError::DuplicateId(block.id.clone()));
            }
        }
        Ok(())
    }

    /// Looks up a block by identifier.
    pub fn resolve(&self, id: &str) -> Option<&Block> {
        self.blocks.iter().find(|block| block.id == id)
    }

    /// Reports rules whose `fieldId` cannot be answered. The engines tolerate
    /// these; this is for editors and linting.
    pub fn rule_issues(&self) -> Vec<RuleIssue> {
        let mut issues = Vec::new();
        for block in &self.blocks {
            for (index, rule) in block.conditional_rules.iter().enumerate() {
                let kind = if rule.field_id == block.id {
                    Some(RuleIssueKind::SelfReference)
                } else {
                    match self.resolve(&rule.field_id) {
                        None => Some(RuleIssueKind::Dangling),
                        Some(target) if !target.kind.can_be_referenced() => {
                            Some(RuleIssueKind::NotReferenceable {
                                target_type: target.kind,
                            })
                        }
                        Some(_) => None,
                    }
                };
                if let Some(kind) = kind {
                    issues.push(RuleIssue {
                        block_id: block.id.clone(),
                        rule_index: index,
                        field_id: rule.field_id.clone(),
                        kind,
                    });
                }
            }
        }
        issues
    }
}

/// A rule reference that no respondent answer can satisfy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleIssue {
    pub block_id: String,
    pub rule_index: usize,
    pub field_id: String,
    pub kind: RuleIssueKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum RuleIssueKind {
    Dangling,
    SelfReference,
    NotReferenceable { target_type: BlockType },
}

impl std::fmt::Display for RuleIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            RuleIssueKind::Dangling => write!(
                f,
                "{} rule #{} references missing block '{}'",
                self.block_id, self.rule_index, self.field_id
            ),
            RuleIssueKind::SelfReference => write!(
                f,
                "{} rule #{} references its own block",
                self.block_id, self.rule_index
            ),
            RuleIssueKind::NotReferenceable { target_type } => write!(
                f,
                "{} rule #{} references '{}', a {} block without answers",
                self.block_id, self.rule_index, self.field_id, target_type
            ),
        }
    }
}
