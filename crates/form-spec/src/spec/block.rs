use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::spec::rule::ConditionalRule;

/// Every block variant a form document may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum BlockType {
    Text,
    Title,
    Label,
    Heading1,
    Heading2,
    Heading3,
    Paragraph,
    ShortAnswer,
    LongAnswer,
    Email,
    Number,
    Url,
    Phone,
    Date,
    Time,
    MultipleChoice,
    Checkboxes,
    Dropdown,
    MultiSelect,
    LinearScale,
    Matrix,
    Rating,
    Payment,
    Signature,
    Ranking,
    WalletConnect,
    FileUpload,
    Divider,
    Image,
    Video,
    Audio,
    Embed,
    PageBreak,
    NewPage,
    ThankYouPage,
    ConditionalLogic,
    CalculatedField,
    HiddenField,
    Recaptcha,
    RespondentCountry,
    /// Tag written by a newer editor; validated fail-open.
    #[serde(other)]
    Unknown,
}

impl BlockType {
    /// All known variants, in editor order.
    pub const ALL: [BlockType; 40] = [
        BlockType::Text,
        BlockType::Title,
        BlockType::Label,
        BlockType::Heading1,
        BlockType::Heading2,
        BlockType::Heading3,
        BlockType::Paragraph,
        BlockType::ShortAnswer,
        BlockType::LongAnswer,
        BlockType::Email,
        BlockType::Number,
        BlockType::Url,
        BlockType::Phone,
        BlockType::Date,
        BlockType::Time,
        BlockType::MultipleChoice,
        BlockType::Checkboxes,
        BlockType::Dropdown,
        BlockType::MultiSelect,
        BlockType::LinearScale,
        BlockType::Matrix,
        BlockType::Rating,
        BlockType::Payment,
        BlockType::Signature,
        BlockType::Ranking,
        BlockType::WalletConnect,
        BlockType::FileUpload,
        BlockType::Divider,
        BlockType::Image,
        BlockType::Video,
        BlockType::Audio,
        BlockType::Embed,
        BlockType::PageBreak,
        BlockType::NewPage,
        BlockType::ThankYouPage,
        BlockType::ConditionalLogic,
        BlockType::CalculatedField,
        BlockType::HiddenField,
        BlockType::Recaptcha,
        BlockType::RespondentCountry,
    ];

    /// Tag used in serialized documents.
    pub fn as_str(&self) -> &'static str {
        match self {
            BlockType::Text => "text",
            BlockType::Title => "title",
            BlockType::Label => "label",
            BlockType::Heading1 => "heading1",
            BlockType::Heading2 => "heading2",
            BlockType::Heading3 => "heading3",
            BlockType::Paragraph => "paragraph",
            BlockType::ShortAnswer => "short-answer",
            BlockType::LongAnswer => "long-answer",
            BlockType::Email => "email",
            BlockType::Number => "number",
            BlockType::Url => "url",
            BlockType::Phone => "phone",
            BlockType::Date => "date",
            BlockType::Time => "time",
            BlockType::MultipleChoice => "multiple-choice",
            BlockType::Checkboxes => "checkboxes",
            BlockType::Dropdown => "dropdown",
            BlockType::MultiSelect => "multi-select",
            BlockType::LinearScale => "linear-scale",
            BlockType::Matrix => "matrix",
            BlockType::Rating => "rating",
            BlockType::Payment => "payment",
            BlockType::Signature => "signature",
            BlockType::Ranking => "ranking",
            BlockType::WalletConnect => "wallet-connect",
            BlockType::FileUpload => "file-upload",
            BlockType::Divider => "divider",
            BlockType::Image => "image",
            BlockType::Video => "video",
            BlockType::Audio => "audio",
            BlockType::Embed => "embed",
            BlockType::PageBreak => "page-break",
            BlockType::NewPage => "new-page",
            BlockType::ThankYouPage => "thank-you-page",
            BlockType::ConditionalLogic => "conditional-logic",
            BlockType::CalculatedField => "calculated-field",
            BlockType::HiddenField => "hidden-field",
            BlockType::Recaptcha => "recaptcha",
            BlockType::RespondentCountry => "respondent-country",
            BlockType::Unknown => "unknown",
        }
    }

    /// Blocks that present content and never collect a required answer.
    pub fn is_display_only(&self) -> bool {
        matches!(
            self,
            BlockType::Text
                | BlockType::Title
                | BlockType::Label
                | BlockType::Heading1
                | BlockType::Heading2
                | BlockType::Heading3
                | BlockType::Paragraph
                | BlockType::Divider
                | BlockType::Image
                | BlockType::Video
                | BlockType::Audio
                | BlockType::Embed
                | BlockType::PageBreak
                | BlockType::NewPage
                | BlockType::ThankYouPage
        )
    }

    /// Blocks whose answer is collected by an external flow and always passes.
    pub fn is_external_flow(&self) -> bool {
        matches!(self, BlockType::Payment | BlockType::WalletConnect)
    }

    pub fn is_page_separator(&self) -> bool {
        matches!(self, BlockType::PageBreak | BlockType::NewPage)
    }

    /// Whether a conditional rule may use a block of this type as its `fieldId`.
    pub fn can_be_referenced(&self) -> bool {
        !self.is_display_only() && !matches!(self, BlockType::ConditionalLogic)
    }

    /// Whether respondents submit a value for this block.
    pub fn collects_answer(&self) -> bool {
        !self.is_display_only()
            && !matches!(
                self,
                BlockType::ConditionalLogic | BlockType::CalculatedField | BlockType::Unknown
            )
    }
}

impl std::fmt::Display for BlockType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One typed unit of a form document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: BlockType,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_start: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_end: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time_step: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_max_size_mb: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_allowed_types: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_amount: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_currency: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditional_rules: Vec<ConditionalRule>,
}

pub const DEFAULT_SCALE_MIN: f64 = 1.0;
pub const DEFAULT_SCALE_MAX: f64 = 5.0;
pub const DEFAULT_RATING_MAX: f64 = 5.0;
pub const DEFAULT_FILE_MAX_SIZE_MB: f64 = 0.5;

impl Block {
    /// Creates a block with no variant-specific fields set.
    pub fn new(id: impl Into<String>, kind: BlockType) -> Self {
        Self {
            id: id.into(),
            kind,
            content: String::new(),
            required: false,
            placeholder: None,
            options: None,
            rows: None,
            columns: None,
            time_start: None,
            time_end: None,
            time_step: None,
            scale_min: None,
            scale_max: None,
            rating_max: None,
            file_max_size_mb: None,
            file_allowed_types: None,
            payment_amount: None,
            payment_currency: None,
            payment_description: None,
            conditional_rules: Vec::new(),
        }
    }

    pub fn options(&self) -> &[String] {
        self.options.as_deref().unwrap_or_default()
    }

    pub fn rows(&self) -> &[String] {
        self.rows.as_deref().unwrap_or_default()
    }

    pub fn columns(&self) -> &[String] {
        self.columns.as_deref().unwrap_or_default()
    }

    pub fn allowed_file_types(&self) -> &[String] {
        self.file_allowed_types.as_deref().unwrap_or_default()
    }

    pub fn scale_bounds(&self) -> (f64, f64) {
        (
            self.scale_min.unwrap_or(DEFAULT_SCALE_MIN),
            self.scale_max.unwrap_or(DEFAULT_SCALE_MAX),
        )
    }

    pub fn rating_max(&self) -> f64 {
        self.rating_max.unwrap_or(DEFAULT_RATING_MAX)
    }

    /// Upload limit in bytes (MiB based).
    pub fn file_max_bytes(&self) -> f64 {
        self.file_max_size_mb.unwrap_or(DEFAULT_FILE_MAX_SIZE_MB) * 1024.0 * 1024.0
    }

    pub fn file_max_size_mb(&self) -> f64 {
        self.file_max_size_mb.unwrap_or(DEFAULT_FILE_MAX_SIZE_MB)
    }
}
