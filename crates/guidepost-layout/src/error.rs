use thiserror::Error;

pub type Result<T> = std::result::Result<T, LayoutError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    #[error("unsupported alignment code: {0}")]
    InvalidAlignment(i32),

    #[error("pointer position must be finite, got {0}")]
    InvalidPointerPosition(f32),
}

#[cfg(test)]
mod tests {
    use super::LayoutError;

    #[test]
    fn messages_name_the_rejected_value() {
        assert_eq!(
            LayoutError::InvalidAlignment(42).to_string(),
            "unsupported alignment code: 42"
        );
        assert!(
            LayoutError::InvalidPointerPosition(f32::NAN)
                .to_string()
                .contains("NaN")
        );
    }
}
