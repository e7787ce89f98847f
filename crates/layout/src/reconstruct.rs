use holdex_core::{Page, TextRun};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use thiserror::Error;

/// Tuned for the font size and column spacing of the supported statements.
pub const DEFAULT_LINE_THRESHOLD: f64 = 4.6;
pub const DEFAULT_CELL_THRESHOLD: f64 = 7.0;
pub const DEFAULT_CELL_SEPARATOR: char = '\t';

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("Failed to parse layout config: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Invalid {name} threshold: {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("Cell separator must not be a newline")]
    NewlineSeparator,
}

/// Geometry thresholds used to turn positioned runs into lines and cells.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Vertical distance above which two runs sit on different lines.
    pub line_threshold: f64,
    /// Horizontal gap above which two runs on one line are separate cells.
    pub cell_threshold: f64,
    pub cell_separator: char,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_threshold: DEFAULT_LINE_THRESHOLD,
            cell_threshold: DEFAULT_CELL_THRESHOLD,
            cell_separator: DEFAULT_CELL_SEPARATOR,
        }
    }
}

impl LayoutConfig {
    pub fn from_toml(toml_content: &str) -> Result<Self, LayoutError> {
        let config: LayoutConfig = toml::from_str(toml_content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), LayoutError> {
        for (name, value) in [("line", self.line_threshold), ("cell", self.cell_threshold)] {
            if !value.is_finite() || value < 0.0 {
                return Err(LayoutError::InvalidThreshold { name, value });
            }
        }
        if self.cell_separator == '\n' {
            return Err(LayoutError::NewlineSeparator);
        }
        Ok(())
    }
}

/// Rebuilds row/column structure from the geometry of a page's text runs.
#[derive(Debug, Clone, Default)]
pub struct LayoutReconstructor {
    config: LayoutConfig,
}

impl LayoutReconstructor {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    /// Reconstruct one page into newline-delimited lines of separator-delimited cells.
    ///
    /// Runs are visited once, in extraction order. A vertical jump beyond the
    /// line threshold starts a new line unless it stays within the tallest run
    /// seen on the current row; a horizontal gap beyond the cell threshold on
    /// the same line starts a new cell.
    pub fn reconstruct_page(&self, page: &Page) -> String {
        let cfg = &self.config;
        let mut out = String::new();
        let mut last: Option<(f64, f64)> = None;
        let mut line_height = 0.0f64;

        for run in page.runs() {
            let mut text: Cow<'_, str> = Cow::Borrowed(&run.text);
            let mut broke = false;

            if let Some((last_x, last_y)) = last {
                let delta = (last_y - run.y).abs();
                if delta > cfg.line_threshold {
                    if self.needs_inferred_break(&out, run) && delta - 1.0 > line_height {
                        tracing::trace!(delta, line_height, "inferred line break");
                        out.push('\n');
                        broke = true;
                    }
                } else if (run.x - last_x).abs() > cfg.cell_threshold {
                    text = Cow::Owned(format!("{}{}", cfg.cell_separator, run.text));
                }
            }

            out.push_str(&text);

            if run.end_of_line {
                out.push('\n');
                broke = true;
            }

            if broke || text.ends_with('\n') {
                line_height = 0.0;
            } else {
                line_height = line_height.max(run.height);
            }

            last = Some((run.trailing_edge(), run.y));
        }

        out
    }

    fn needs_inferred_break(&self, out: &str, run: &TextRun) -> bool {
        !out.is_empty() && !out.ends_with('\n') && !run.signals_line_break()
    }

    /// Reconstruct every page and join them with newlines into one line stream.
    pub fn reconstruct_document(&self, pages: &[Page]) -> String {
        pages
            .iter()
            .map(|page| self.reconstruct_page(page))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use holdex_core::ContentItem;

    fn run(text: &str, x: f64, y: f64, width: f64) -> TextRun {
        TextRun::new(text, x, y, width, 4.0)
    }

    fn page(runs: Vec<TextRun>) -> Page {
        Page::from_runs(runs)
    }

    fn reconstruct(runs: Vec<TextRun>) -> String {
        LayoutReconstructor::default().reconstruct_page(&page(runs))
    }

    // ── Cells ────────────────────────────────────────────────────────────────

    #[test]
    fn gap_above_threshold_inserts_separator() {
        let out = reconstruct(vec![
            run("12345678/001", 10.0, 100.0, 50.0),
            run("1,234.56", 67.5, 100.0, 30.0),
        ]);
        assert_eq!(out, "12345678/001\t1,234.56");
    }

    #[test]
    fn gap_at_threshold_does_not_split() {
        let out = reconstruct(vec![run("Axis", 10.0, 100.0, 20.0), run("Fund", 37.0, 100.0, 20.0)]);
        assert_eq!(out, "AxisFund");
    }

    #[test]
    fn small_baseline_jitter_stays_on_line() {
        let out = reconstruct(vec![run("a", 0.0, 100.0, 5.0), run("b", 20.0, 102.0, 5.0)]);
        assert_eq!(out, "a\tb");
    }

    // ── Lines ────────────────────────────────────────────────────────────────

    #[test]
    fn vertical_jump_breaks_line() {
        let out = reconstruct(vec![run("first", 0.0, 100.0, 20.0), run("second", 0.0, 112.0, 20.0)]);
        assert_eq!(out, "first\nsecond");
    }

    #[test]
    fn jump_within_row_height_does_not_break() {
        // Tall glyph on the row absorbs a 6-unit jump.
        let runs = vec![TextRun::new("big", 0.0, 100.0, 20.0, 10.0), run("sub", 22.0, 106.0, 10.0)];
        assert_eq!(reconstruct(runs), "bigsub");
    }

    #[test]
    fn jump_at_line_threshold_does_not_break() {
        let runs = vec![TextRun::new("a", 0.0, 0.0, 5.0, 1.0), TextRun::new("b", 5.0, 4.6, 5.0, 1.0)];
        assert_eq!(reconstruct(runs), "ab");
    }

    #[test]
    fn jump_just_over_line_threshold_breaks() {
        let runs = vec![TextRun::new("a", 0.0, 0.0, 5.0, 1.0), TextRun::new("b", 5.0, 4.7, 5.0, 1.0)];
        assert_eq!(reconstruct(runs), "a\nb");
    }

    #[test]
    fn explicit_end_of_line_appends_break() {
        let out = reconstruct(vec![run("a", 0.0, 100.0, 5.0).with_end_of_line(), run("b", 0.0, 100.0, 5.0)]);
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn no_double_break_after_end_of_line() {
        let out = reconstruct(vec![run("a", 0.0, 100.0, 5.0).with_end_of_line(), run("b", 0.0, 120.0, 5.0)]);
        assert_eq!(out, "a\nb");
    }

    #[test]
    fn blank_eol_run_suppresses_inferred_break() {
        let out = reconstruct(vec![
            run("a", 0.0, 100.0, 5.0),
            TextRun::new(" ", 0.0, 120.0, 1.0, 4.0).with_end_of_line(),
            run("b", 0.0, 120.0, 5.0),
        ]);
        assert_eq!(out, "a \nb");
    }

    #[test]
    fn row_height_resets_after_break() {
        // The first row is tall, the second is not: a 6-unit jump after the
        // break must start a new line again.
        let out = reconstruct(vec![
            TextRun::new("head", 0.0, 100.0, 20.0, 10.0).with_end_of_line(),
            run("x", 0.0, 120.0, 5.0),
            run("y", 0.0, 126.0, 5.0),
        ]);
        assert_eq!(out, "head\nx\ny");
    }

    // ── Pages ────────────────────────────────────────────────────────────────

    #[test]
    fn markers_are_skipped() {
        let p = Page::new(vec![ContentItem::Marker, run("a", 0.0, 0.0, 1.0).into(), ContentItem::Marker]);
        assert_eq!(LayoutReconstructor::default().reconstruct_page(&p), "a");
    }

    #[test]
    fn empty_page_contributes_empty_segment() {
        let r = LayoutReconstructor::default();
        let doc = r.reconstruct_document(&[
            page(vec![run("a", 0.0, 0.0, 1.0)]),
            Page::default(),
            page(vec![run("b", 0.0, 0.0, 1.0)]),
        ]);
        assert_eq!(doc, "a\n\nb");
    }

    #[test]
    fn reconstruction_is_idempotent() {
        let r = LayoutReconstructor::default();
        let p = page(vec![
            run("Folio", 0.0, 50.0, 20.0),
            run("Value", 40.0, 50.0, 20.0),
            run("123", 0.0, 70.0, 10.0),
        ]);
        assert_eq!(r.reconstruct_page(&p), r.reconstruct_page(&p));
    }

    // ── Config ───────────────────────────────────────────────────────────────

    #[test]
    fn config_from_toml_overrides_defaults() {
        let cfg = LayoutConfig::from_toml("cell_threshold = 12.0\ncell_separator = \"|\"").unwrap();
        assert_eq!(cfg.cell_threshold, 12.0);
        assert_eq!(cfg.line_threshold, DEFAULT_LINE_THRESHOLD);
        assert_eq!(cfg.cell_separator, '|');
    }

    #[test]
    fn config_rejects_negative_threshold() {
        assert!(matches!(
            LayoutConfig::from_toml("line_threshold = -1.0"),
            Err(LayoutError::InvalidThreshold { name: "line", .. })
        ));
    }

    #[test]
    fn custom_separator_is_used() {
        let r = LayoutReconstructor::new(LayoutConfig { cell_separator: '|', ..LayoutConfig::default() });
        let out = r.reconstruct_page(&page(vec![run("a", 0.0, 0.0, 5.0), run("b", 30.0, 0.0, 5.0)]));
        assert_eq!(out, "a|b");
    }
}
