use crate::spec::block::{Block, BlockType};

/// Label shown when a block has no content of its own.
pub fn fallback_label(kind: BlockType) -> &'static str {
    match kind {
        BlockType::Text
        | BlockType::Divider
        | BlockType::PageBreak
        | BlockType::NewPage
        | BlockType::Unknown => "",
        BlockType::Title => "Title",
        BlockType::Label => "Label",
        BlockType::Heading1 => "Heading 1",
        BlockType::Heading2 => "Heading 2",
        BlockType::Heading3 => "Heading 3",
        BlockType::Paragraph => "Paragraph",
        BlockType::ShortAnswer
        | BlockType::LongAnswer
        | BlockType::MultipleChoice
        | BlockType::Checkboxes
        | BlockType::Dropdown
        | BlockType::MultiSelect
        | BlockType::LinearScale
        | BlockType::Matrix
        | BlockType::Rating => "Question",
        BlockType::Email => "Email address",
        BlockType::Number => "Number",
        BlockType::Url => "URL",
        BlockType::Phone => "Phone number",
        BlockType::Date => "Date",
        BlockType::Time => "Time",
        BlockType::Payment => "Payment",
        BlockType::Signature => "Signature",
        BlockType::Ranking => "Ranking",
        BlockType::WalletConnect => "Wallet Connect",
        BlockType::FileUpload => "File upload",
        BlockType::Image => "Image",
        BlockType::Video => "Video",
        BlockType::Audio => "Audio",
        BlockType::Embed => "Embed",
        BlockType::ThankYouPage => "Thank you",
        BlockType::ConditionalLogic => "Conditional logic",
        BlockType::CalculatedField => "Calculated field",
        BlockType::HiddenField => "Hidden field",
        BlockType::Recaptcha => "reCAPTCHA",
        BlockType::RespondentCountry => "Respondent's country",
    }
}

/// Label for a block: its trimmed content, or the fallback for its type.
/// Image content holds the image source, so images always use the fallback.
pub fn display_label(block: &Block) -> &str {
    if block.kind == BlockType::Image {
        return fallback_label(block.kind);
    }
    match block.content.trim() {
        "" => fallback_label(block.kind),
        content => content,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_wins_over_fallback() {
        let mut block = Block::new("q1", BlockType::Email);
        assert_eq!(display_label(&block), "Email address");
        block.content = "  Work email ".into();
        assert_eq!(display_label(&block), "Work email");
    }

    #[test]
    fn images_ignore_content() {
        let mut block = Block::new("img", BlockType::Image);
        block.content = "https://cdn.example.com/a.png".into();
        assert_eq!(display_label(&block), "Image");
    }
}
