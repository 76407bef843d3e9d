use std::borrow::Cow;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::answers::{AnswerMap, ErrorMap, FileAnswer, ValidationResult};
use crate::coerce::{coerce_numeric, is_empty, is_truthy};
use crate::spec::block::{Block, BlockType};

pub const REQUIRED_MESSAGE: &str = "This field is required.";
pub const TEXT_MESSAGE: &str = "Must be text.";
pub const EMAIL_MESSAGE: &str = "Enter a valid email.";
pub const NUMBER_MESSAGE: &str = "Enter a valid number.";
pub const URL_MESSAGE: &str = "Enter a valid URL.";
pub const PHONE_MESSAGE: &str = "Enter a valid phone number.";
pub const DATE_MESSAGE: &str = "Enter a valid date.";
pub const TIME_MESSAGE: &str = "Enter a valid time.";
pub const OPTION_MESSAGE: &str = "Select a valid option.";
pub const OPTIONS_MESSAGE: &str = "Select valid options.";
pub const SCALE_MESSAGE: &str = "Select a valid value.";
pub const RATING_MESSAGE: &str = "Select a valid rating.";
pub const MATRIX_MESSAGE: &str = "Complete the matrix.";
pub const RANKING_MISSING_MESSAGE: &str = "Provide a ranking.";
pub const RANKING_UNIQUE_MESSAGE: &str = "Ranking must be unique.";
pub const RANKING_MESSAGE: &str = "Provide a valid ranking.";
pub const FILE_MESSAGE: &str = "Upload a valid file.";
pub const FILE_TYPE_MESSAGE: &str = "File type not allowed.";
pub const SIGNATURE_MESSAGE: &str = "Add a signature.";
pub const IMAGE_MESSAGE: &str = "Provide a valid image.";
pub const VIDEO_MESSAGE: &str = "Provide a valid video URL.";
pub const AUDIO_MESSAGE: &str = "Provide a valid audio URL.";
pub const EMBED_MESSAGE: &str = "Provide a valid embed URL.";
pub const COUNTRY_MESSAGE: &str = "Country is required.";
pub const RECAPTCHA_MESSAGE: &str = "Verify reCAPTCHA.";
pub const HIDDEN_FIELD_MESSAGE: &str = "Hidden field is invalid.";

/// Token a recaptcha block must hold once the challenge succeeded.
pub const RECAPTCHA_VERIFIED: &str = "verified";

const DATA_IMAGE_PREFIX: &str = "data:image/";

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));
static NUMBER_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?(?:[0-9]+|[0-9]*\.[0-9]+)$").expect("number pattern compiles"));
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+0-9()\s-]{6,}$").expect("phone pattern compiles"));
static DATE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("date pattern compiles"));
static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{2}:[0-9]{2}$").expect("time pattern compiles"));

/// Validates every block of `blocks` in order, ignoring conditional visibility.
pub fn validate_answers(blocks: &[Block], answers: &AnswerMap) -> ValidationResult {
    let mut errors = ErrorMap::new();
    for block in blocks {
        if let Some(message) = validate_block(block, answers.get(&block.id)) {
            errors.insert(block.id.clone(), message);
        }
    }
    debug!(blocks = blocks.len(), errors = errors.len(), "validated answers");
    ValidationResult::from_errors(errors)
}

/// Validates one answer using the block's own `required` flag.
pub fn validate_block(block: &Block, value: Option<&Value>) -> Option<String> {
    validate_value(block, block.required, value)
}

/// Validates one answer with an explicit required flag, so callers can pass
/// the rule-adjusted requirement instead of the stored one.
pub fn validate_value(block: &Block, required: bool, value: Option<&Value>) -> Option<String> {
    if block.kind.is_external_flow() {
        return None;
    }

    if is_empty(value) {
        return (required && !block.kind.is_display_only()).then(|| REQUIRED_MESSAGE.to_string());
    }

    let value = value?;
    check_type(block, required, value).map(Cow::into_owned)
}

fn check_type(block: &Block, required: bool, value: &Value) -> Option<Cow<'static, str>> {
    match block.kind {
        BlockType::ShortAnswer
        | BlockType::LongAnswer
        | BlockType::Text
        | BlockType::Paragraph
        | BlockType::Title
        | BlockType::Label
        | BlockType::ThankYouPage => fails(value.is_string(), TEXT_MESSAGE),
        BlockType::Email => fails(matches_text(value, &EMAIL_PATTERN), EMAIL_MESSAGE),
        BlockType::Number => fails(is_number_answer(value), NUMBER_MESSAGE),
        BlockType::Url => fails(value.as_str().is_some_and(is_http_url), URL_MESSAGE),
        BlockType::Phone => fails(matches_text(value, &PHONE_PATTERN), PHONE_MESSAGE),
        BlockType::Date => fails(matches_text(value, &DATE_PATTERN), DATE_MESSAGE),
        BlockType::Time => fails(matches_text(value, &TIME_PATTERN), TIME_MESSAGE),
        BlockType::MultipleChoice | BlockType::Dropdown => fails(
            value.as_str().is_some_and(|text| is_option(block, text)),
            OPTION_MESSAGE,
        ),
        BlockType::Checkboxes | BlockType::MultiSelect => {
            let valid = value.as_array().is_some_and(|items| {
                items
                    .iter()
                    .all(|item| item.as_str().is_some_and(|text| is_option(block, text)))
            });
            fails(valid, OPTIONS_MESSAGE)
        }
        BlockType::LinearScale => {
            let (min, max) = block.scale_bounds();
            fails(within(value, min, max), SCALE_MESSAGE)
        }
        BlockType::Rating => fails(within(value, 1.0, block.rating_max()), RATING_MESSAGE),
        BlockType::Matrix => check_matrix(block, required, value).map(Cow::Borrowed),
        BlockType::Ranking => check_ranking(block, value).map(Cow::Borrowed),
        BlockType::FileUpload => check_file(block, value),
        BlockType::Signature => fails(
            value.as_str().is_some_and(is_data_image),
            SIGNATURE_MESSAGE,
        ),
        BlockType::Image => fails(
            value
                .as_str()
                .is_some_and(|text| is_http_url(text) || is_data_image(text)),
            IMAGE_MESSAGE,
        ),
        BlockType::Video => fails(value.as_str().is_some_and(is_http_url), VIDEO_MESSAGE),
        BlockType::Audio => fails(value.as_str().is_some_and(is_http_url), AUDIO_MESSAGE),
        BlockType::Embed => fails(value.as_str().is_some_and(is_http_url), EMBED_MESSAGE),
        BlockType::RespondentCountry => fails(value.is_string(), COUNTRY_MESSAGE),
        BlockType::Recaptcha => fails(
            value.as_str() == Some(RECAPTCHA_VERIFIED),
            RECAPTCHA_MESSAGE,
        ),
        BlockType::HiddenField => fails(value.is_string(), HIDDEN_FIELD_MESSAGE),
        // Answers for these are collected elsewhere; see `validate_value`.
        BlockType::Payment | BlockType::WalletConnect => None,
        BlockType::Heading1
        | BlockType::Heading2
        | BlockType::Heading3
        | BlockType::Divider
        | BlockType::PageBreak
        | BlockType::NewPage
        | BlockType::ConditionalLogic
        | BlockType::CalculatedField
        | BlockType::Unknown => None,
    }
}

fn fails(valid: bool, message: &'static str) -> Option<Cow<'static, str>> {
    (!valid).then_some(Cow::Borrowed(message))
}

fn matches_text(value: &Value, pattern: &Regex) -> bool {
    value.as_str().is_some_and(|text| pattern.is_match(text))
}

fn is_option(block: &Block, text: &str) -> bool {
    block.options().iter().any(|option| option == text)
}

fn is_number_answer(value: &Value) -> bool {
    match value {
        Value::Number(number) => number.as_f64().is_some_and(f64::is_finite),
        Value::String(text) => NUMBER_PATTERN.is_match(text),
        _ => false,
    }
}

fn within(value: &Value, min: f64, max: f64) -> bool {
    let numeric = coerce_numeric(Some(value));
    numeric.is_finite() && numeric >= min && numeric <= max
}

fn is_http_url(text: &str) -> bool {
    Url::parse(text).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

fn is_data_image(text: &str) -> bool {
    text.starts_with(DATA_IMAGE_PREFIX)
}

fn check_matrix(block: &Block, required: bool, value: &Value) -> Option<&'static str> {
    let Some(record) = value.as_object() else {
        return Some(MATRIX_MESSAGE);
    };
    let columns = block.columns();
    let is_column = |selected: Option<&Value>| {
        selected
            .and_then(Value::as_str)
            .is_some_and(|text| columns.iter().any(|column| column == text))
    };

    for row in block.rows() {
        let selected = record.get(row);
        let chosen = is_truthy(selected);
        if required && (!chosen || !is_column(selected)) {
            return Some(MATRIX_MESSAGE);
        }
        if chosen && !is_column(selected) {
            return Some(OPTIONS_MESSAGE);
        }
    }
    None
}

fn check_ranking(block: &Block, value: &Value) -> Option<&'static str> {
    let Some(items) = value.as_array() else {
        return Some(RANKING_MISSING_MESSAGE);
    };

    // Serialized form keeps `"1"` and `1` distinct.
    let unique: BTreeSet<String> = items.iter().map(Value::to_string).collect();
    if unique.len() != items.len() {
        return Some(RANKING_UNIQUE_MESSAGE);
    }

    let options = block.options();
    let every_item_known = items
        .iter()
        .all(|item| item.as_str().is_some_and(|text| is_option(block, text)));
    if !every_item_known || items.len() != options.len() {
        return Some(RANKING_MESSAGE);
    }
    None
}

fn check_file(block: &Block, value: &Value) -> Option<Cow<'static, str>> {
    let Some(object) = value.as_object() else {
        return Some(Cow::Borrowed(FILE_MESSAGE));
    };
    let file = FileAnswer::from_object(object);
    let present = |field: &Option<String>| field.as_deref().is_some_and(|text| !text.is_empty());
    if !present(&file.name) || !present(&file.mime_type) || !present(&file.data) {
        return Some(Cow::Borrowed(FILE_MESSAGE));
    }

    if let Some(size) = file.size
        && size > block.file_max_bytes()
    {
        return Some(Cow::Owned(format!(
            "File exceeds {:.1}MB limit.",
            block.file_max_size_mb()
        )));
    }

    if !matches_allowed_type(&file, block.allowed_file_types()) {
        return Some(Cow::Borrowed(FILE_TYPE_MESSAGE));
    }
    None
}

/// Matches a file against the allowed list. Entries may be exact MIME types,
/// `type/*` wildcards, or extensions with or without the leading dot. An empty
/// list allows everything.
pub fn matches_allowed_type(file: &FileAnswer, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let mime = file.mime_type.as_deref().unwrap_or_default();
    let extension = file.extension().unwrap_or_default();

    allowed.iter().any(|entry| {
        let normalized = entry.trim().to_lowercase();
        if normalized.is_empty() {
            return false;
        }
        if let Some(prefix) = normalized.strip_suffix('*')
            && prefix.ends_with('/')
        {
            return mime.starts_with(prefix);
        }
        if normalized.contains('/') {
            return mime == normalized;
        }
        if extension.is_empty() {
            return false;
        }
        match normalized.strip_prefix('.') {
            Some(dotless) => extension == dotless,
            None => extension == normalized,
        }
    })
}
