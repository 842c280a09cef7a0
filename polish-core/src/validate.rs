use crate::error::PolishError;
use crate::types::FieldType;

/// Fields shorter than this (in characters, after trimming) are not sent for polishing.
pub const MIN_POLISH_CHARS: usize = 10;

/// Pre-flight check run before a field is sent to the polish endpoint.
///
/// # Errors
///
/// [`PolishError::EmptyInput`] for a blank field, [`PolishError::TooShort`]
/// when it has fewer than [`MIN_POLISH_CHARS`] characters.
pub fn check_polish_input(field: FieldType, text: &str) -> Result<(), PolishError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(PolishError::EmptyInput(field));
    }
    if trimmed.chars().count() < MIN_POLISH_CHARS {
        return Err(PolishError::TooShort(field));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_field_asks_for_content() {
        let err = check_polish_input(FieldType::Brief, "  \n").unwrap_err();
        assert_eq!(err.to_string(), "请先输入案由内容");
    }

    #[test]
    fn short_field_is_not_worth_polishing() {
        let err = check_polish_input(FieldType::Analysis, "太短了。").unwrap_err();
        assert_eq!(err.to_string(), "情况分析内容太少，无需润色");
    }

    #[test]
    fn counts_characters_not_bytes() {
        assert!(check_polish_input(FieldType::Suggest, "建议学校食堂适当降价。").is_ok());
        assert!(check_polish_input(FieldType::Suggest, "九个字的一句话啊。").is_err());
    }
}
