use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::answers::{AnswerMap, ErrorMap, ValidationResult};
use crate::condition::{should_be_required, should_show_block};
use crate::pages::split_pages;
use crate::spec::block::Block;
use crate::spec::document::Document;
use crate::validate::validate_value;

/// How blocks hidden by conditional logic are treated at submission time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "snake_case")]
pub enum HiddenPolicy {
    /// Hidden blocks are not validated and never block a submission.
    #[default]
    Skip,
    /// Hidden blocks are validated with their stored `required` flag, as the
    /// visibility-blind validator does.
    Validate,
}

/// Engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct EngineOptions {
    #[serde(default)]
    pub hidden: HiddenPolicy,
}

/// Resolved visibility and requirement for a single block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BlockState {
    pub id: String,
    pub visible: bool,
    pub required: bool,
}

/// Outcome of evaluating a submission attempt against a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionOutcome {
    pub blocks: Vec<BlockState>,
    pub errors: ErrorMap,
    pub is_valid: bool,
}

impl SubmissionOutcome {
    /// Identifiers of visible blocks in document order.
    pub fn visible_ids(&self) -> impl Iterator<Item = &str> {
        self.blocks
            .iter()
            .filter(|state| state.visible)
            .map(|state| state.id.as_str())
    }

    pub fn state(&self, id: &str) -> Option<&BlockState> {
        self.blocks.iter().find(|state| state.id == id)
    }

    pub fn into_result(self) -> ValidationResult {
        ValidationResult::from_errors(self.errors)
    }
}

/// Computes the state of one block against the current answers.
pub fn block_state(block: &Block, answers: &AnswerMap) -> BlockState {
    let rules = &block.conditional_rules;
    BlockState {
        id: block.id.clone(),
        visible: should_show_block(rules, answers),
        required: block.required || should_be_required(rules, answers),
    }
}

/// Evaluates a whole submission: visibility first, then validation of the
/// visible blocks with their effective requirement.
pub fn evaluate_submission(
    document: &Document,
    answers: &AnswerMap,
    options: &EngineOptions,
) -> SubmissionOutcome {
    evaluate_blocks(document.blocks.iter(), answers, options)
}

/// Runs the submission pipeline on a single page. Pages past the end yield an
/// empty, valid outcome.
pub fn validate_page(
    document: &Document,
    page_index: usize,
    answers: &AnswerMap,
    options: &EngineOptions,
) -> SubmissionOutcome {
    let pages = split_pages(document);
    match pages.get(page_index) {
        Some(page) => evaluate_blocks(page.blocks.iter().copied(), answers, options),
        None => SubmissionOutcome {
            is_valid: true,
            ..SubmissionOutcome::default()
        },
    }
}

fn evaluate_blocks<'a>(
    blocks: impl Iterator<Item = &'a Block>,
    answers: &AnswerMap,
    options: &EngineOptions,
) -> SubmissionOutcome {
    let mut states = Vec::new();
    let mut errors = ErrorMap::new();

    for block in blocks {
        let state = block_state(block, answers);
        let checked_as = match (state.visible, options.hidden) {
            (true, _) => Some(state.required),
            (false, HiddenPolicy::Validate) => Some(block.required),
            (false, HiddenPolicy::Skip) => None,
        };
        if let Some(required) = checked_as
            && let Some(message) = validate_value(block, required, answers.get(&block.id))
        {
            errors.insert(block.id.clone(), message);
        }
        states.push(state);
    }

    let hidden = states.iter().filter(|state| !state.visible).count();
    debug!(
        blocks = states.len(),
        hidden,
        errors = errors.len(),
        "evaluated submission"
    );

    SubmissionOutcome {
        blocks: states,
        is_valid: errors.is_empty(),
        errors,
    }
}
