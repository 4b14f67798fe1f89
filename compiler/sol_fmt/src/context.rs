//! Formatting configuration.

/// Default spaces per indentation level.
pub const INDENT_WIDTH: usize = 4;

/// Formatter configuration.
#[derive(Clone, Copy, Debug)]
pub struct FormatConfig {
    /// Spaces per indentation level.
    pub indent_width: usize,
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self {
            indent_width: INDENT_WIDTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_indent() {
        assert_eq!(FormatConfig::default().indent_width, 4);
    }
}
