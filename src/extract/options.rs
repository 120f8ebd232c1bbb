//! Extraction options.

/// Options for pulling a student record out of document text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    /// How malformed goal blocks are handled
    pub error_mode: ErrorMode,
}

impl ExtractOptions {
    /// Create new extract options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Skip malformed goal blocks instead of failing.
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }
}

/// Error handling mode for goal blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on the first malformed block
    #[default]
    Strict,
    /// Log and skip malformed blocks
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_options_builder() {
        assert_eq!(ExtractOptions::default().error_mode, ErrorMode::Strict);
        assert_eq!(ExtractOptions::new().lenient().error_mode, ErrorMode::Lenient);
        assert_eq!(
            ExtractOptions::new()
                .lenient()
                .with_error_mode(ErrorMode::Strict)
                .error_mode,
            ErrorMode::Strict
        );
    }
}
