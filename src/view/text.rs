//! Fixed-metric text measurement for the simulated view

use unicode_linebreak::{linebreaks, BreakOpportunity};
use unicode_segmentation::UnicodeSegmentation;

/// Metrics used to turn text into a line count
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextMetrics {
    /// Line height in logical pixels
    pub line_height: f32,
    /// Advance of every grapheme
    pub char_width: f32,
}

impl Default for TextMetrics {
    fn default() -> Self {
        // 16px * 1.5
        Self {
            line_height: 24.0,
            char_width: 8.0,
        }
    }
}

impl TextMetrics {
    pub fn new(line_height: f32, char_width: f32) -> Self {
        Self {
            line_height,
            char_width,
        }
    }

    fn width(&self, text: &str) -> f32 {
        text.graphemes(true).count() as f32 * self.char_width
    }

    /// Number of lines `text` wraps into at `max_width`.
    ///
    /// Empty text still renders one line. Segments wider than the line are
    /// not split further.
    pub fn line_count(&self, text: &str, max_width: f32) -> usize {
        if text.is_empty() {
            return 1;
        }

        let mut lines = 1;
        let mut line_width: f32 = 0.0;
        let mut segment_start = 0;

        for (offset, opportunity) in linebreaks(text) {
            let segment = &text[segment_start..offset];
            segment_start = offset;

            let content = segment.trim_end_matches(['\n', '\r']);

            // Trailing whitespace may hang past the edge
            if line_width > 0.0 && line_width + self.width(content.trim_end()) > max_width {
                lines += 1;
                line_width = 0.0;
            }
            line_width += self.width(content);

            if opportunity == BreakOpportunity::Mandatory && offset < text.len() {
                lines += 1;
                line_width = 0.0;
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metrics() -> TextMetrics {
        TextMetrics::new(10.0, 8.0)
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(metrics().line_count("", 100.0), 1);
    }

    #[test]
    fn test_single_line() {
        assert_eq!(metrics().line_count("Hello", 100.0), 1);
    }

    #[test]
    fn test_line_wrap() {
        // With 8px per char, 40px width = 5 chars per line
        assert_eq!(metrics().line_count("Hello World", 40.0), 2);
        assert_eq!(metrics().line_count("aa bb cc dd", 40.0), 2);
    }

    #[test]
    fn test_explicit_newline() {
        assert_eq!(metrics().line_count("Hello\nWorld", 1000.0), 2);
        assert_eq!(metrics().line_count("Hello\n\nWorld", 1000.0), 3);
    }

    #[test]
    fn test_overlong_word_stays_on_one_line() {
        assert_eq!(metrics().line_count("abcdefghij", 40.0), 1);
    }
}
