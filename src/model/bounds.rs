//! Scroll bounds and content measurement.
//!
//! Text layout is a platform concern, so the engine only asks a
//! [`ContentMeasurer`] for heights. [`MonospaceMeasurer`] is a portable
//! estimator for headless use and tests.

use super::app_state::TeleprompterState;

/// Derived scroll limits, recomputed whenever layout inputs change.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollBounds {
    pub content_height: f64,
    pub viewport_height: f64,
}

impl ScrollBounds {
    /// Bounds from measured sizes. Negative or non-finite sizes count as 0.
    pub fn new(content_height: f64, viewport_height: f64) -> Self {
        Self {
            content_height: non_negative(content_height),
            viewport_height: non_negative(viewport_height),
        }
    }

    /// Largest valid offset; zero means the content already fits.
    pub fn max_offset_px(&self) -> f64 {
        (self.content_height - self.viewport_height).max(0.0)
    }

    /// Does the content overflow the viewport?
    pub fn is_scrollable(&self) -> bool {
        self.max_offset_px() > 0.0
    }
}

fn non_negative(v: f64) -> f64 {
    if v.is_finite() {
        v.max(0.0)
    } else {
        0.0
    }
}

/// Inputs that determine the measured content height.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub text: String,
    pub font_size_px: f64,
    pub line_height: f64,
    pub letter_spacing_px: f64,
    pub panel_width: f64,
    pub panel_height: f64,
}

impl TextLayout {
    pub fn from_state(state: &TeleprompterState) -> Self {
        Self {
            text: state.script_text.clone(),
            font_size_px: state.panel.font_size_px,
            line_height: state.panel.line_height,
            letter_spacing_px: state.panel.letter_spacing_px,
            panel_width: state.panel.width,
            panel_height: state.panel.height,
        }
    }
}

/// Measures laid-out script text.
pub trait ContentMeasurer {
    /// Returns content and viewport heights for the given layout.
    fn measure(&self, layout: &TextLayout) -> ScrollBounds;
}

/// Estimates wrapped height of monospaced text.
///
/// Words wrap greedily at the column count that fits the panel width; a
/// word longer than a line is broken across lines.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMeasurer {
    /// Glyph advance as a fraction of the font size.
    pub glyph_width_ratio: f64,
    /// Horizontal padding on each side of the text column.
    pub horizontal_padding_px: f64,
}

impl Default for MonospaceMeasurer {
    fn default() -> Self {
        Self {
            glyph_width_ratio: 0.6,
            horizontal_padding_px: 12.0,
        }
    }
}

impl MonospaceMeasurer {
    /// Number of characters that fit on one line.
    pub fn columns(&self, layout: &TextLayout) -> usize {
        let advance = layout.font_size_px * self.glyph_width_ratio + layout.letter_spacing_px;
        let column_width = (layout.panel_width - 2.0 * self.horizontal_padding_px).max(1.0);
        if !advance.is_finite() || advance <= 0.0 {
            return 1;
        }
        ((column_width / advance).floor() as usize).max(1)
    }

    /// Number of wrapped lines for `text` at `columns` characters per line.
    pub fn line_count(text: &str, columns: usize) -> usize {
        let columns = columns.max(1);
        let text = if text.is_empty() { " " } else { text };
        text.split('\n')
            .map(|paragraph| wrapped_lines(paragraph, columns))
            .sum()
    }
}

fn wrapped_lines(paragraph: &str, columns: usize) -> usize {
    let mut lines = 1;
    let mut used = 0;
    for word in paragraph.split_whitespace() {
        let mut len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= columns {
            used = needed;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        while len > columns {
            len -= columns;
            lines += 1;
        }
        used = len;
    }
    lines
}

impl ContentMeasurer for MonospaceMeasurer {
    fn measure(&self, layout: &TextLayout) -> ScrollBounds {
        let lines = Self::line_count(&layout.text, self.columns(layout));
        let content_height = (lines as f64 * layout.font_size_px * layout.line_height).ceil();
        ScrollBounds::new(content_height, layout.panel_height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn layout(text: &str) -> TextLayout {
        TextLayout {
            text: text.to_string(),
            font_size_px: 10.0,
            line_height: 1.0,
            letter_spacing_px: 0.0,
            // 24px padding + 60px column = 10 columns at 6px per glyph
            panel_width: 84.0,
            panel_height: 20.0,
        }
    }

    #[test]
    fn max_offset_is_never_negative() {
        assert_eq!(ScrollBounds::new(50.0, 100.0).max_offset_px(), 0.0);
        assert_eq!(ScrollBounds::new(-10.0, -5.0).max_offset_px(), 0.0);
        assert_eq!(ScrollBounds::new(f64::NAN, 10.0).max_offset_px(), 0.0);
        assert_eq!(ScrollBounds::new(300.0, 120.0).max_offset_px(), 180.0);
    }

    #[test]
    fn columns_follow_width_and_spacing() {
        let m = MonospaceMeasurer::default();
        assert_eq!(m.columns(&layout("")), 10);

        let mut spaced = layout("");
        spaced.letter_spacing_px = 4.0;
        assert_eq!(m.columns(&spaced), 6);
    }

    #[test]
    fn words_wrap_greedily() {
        assert_eq!(MonospaceMeasurer::line_count("aaaa bbbb", 10), 1);
        assert_eq!(MonospaceMeasurer::line_count("aaaa bbbb cc", 10), 2);
        assert_eq!(MonospaceMeasurer::line_count("a\n\nb", 10), 3);
        assert_eq!(MonospaceMeasurer::line_count("", 10), 1);
    }

    #[test]
    fn long_words_break_across_lines() {
        assert_eq!(MonospaceMeasurer::line_count("abcdefghijklmnopqrstuvwxy", 10), 3);
    }

    #[test]
    fn measure_scales_with_line_height() {
        let m = MonospaceMeasurer::default();
        let mut l = layout("aaaa bbbb cc dddd eeee");
        let bounds = m.measure(&l);
        assert_eq!(bounds.content_height, 30.0);
        assert_eq!(bounds.max_offset_px(), 10.0);

        l.line_height = 2.0;
        assert_eq!(m.measure(&l).content_height, 60.0);
    }
}
