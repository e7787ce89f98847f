use serde::{Deserialize, Serialize};

/// One positioned fragment of page text, as handed over by the extraction backend.
///
/// `x`/`y` is the baseline origin in a top-left-origin viewport space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// The backend saw an explicit end-of-line after this run.
    #[serde(default)]
    pub end_of_line: bool,
}

impl TextRun {
    pub fn new(text: impl Into<String>, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { text: text.into(), x, y, width, height, end_of_line: false }
    }

    pub fn with_end_of_line(mut self) -> Self {
        self.end_of_line = true;
        self
    }

    /// Horizontal position where the run stops.
    pub fn trailing_edge(&self) -> f64 {
        self.x + self.width
    }

    /// Whether the run already carries its own line break, so none should be inferred.
    pub fn signals_line_break(&self) -> bool {
        self.text.starts_with('\n') || (self.text.trim().is_empty() && self.end_of_line)
    }
}

/// An entry of a page's content stream. Marker entries carry no text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentItem {
    Run(TextRun),
    Marker,
}

impl From<TextRun> for ContentItem {
    fn from(run: TextRun) -> Self {
        ContentItem::Run(run)
    }
}

/// Content items of one page, in extraction order (not necessarily reading order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub items: Vec<ContentItem>,
}

impl Page {
    pub fn new(items: Vec<ContentItem>) -> Self {
        Self { items }
    }

    pub fn from_runs(runs: impl IntoIterator<Item = TextRun>) -> Self {
        Self { items: runs.into_iter().map(ContentItem::Run).collect() }
    }

    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.items.iter().filter_map(|item| match item {
            ContentItem::Run(run) => Some(run),
            ContentItem::Marker => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_edge_adds_width() {
        let run = TextRun::new("INF", 10.0, 20.0, 12.5, 8.0);
        assert_eq!(run.trailing_edge(), 22.5);
    }

    #[test]
    fn blank_run_with_eol_signals_break() {
        assert!(TextRun::new("  ", 0.0, 0.0, 1.0, 1.0).with_end_of_line().signals_line_break());
        assert!(TextRun::new("\nabc", 0.0, 0.0, 1.0, 1.0).signals_line_break());
        assert!(!TextRun::new("  ", 0.0, 0.0, 1.0, 1.0).signals_line_break());
        assert!(!TextRun::new("abc", 0.0, 0.0, 1.0, 1.0).with_end_of_line().signals_line_break());
    }

    #[test]
    fn page_runs_skip_markers() {
        let page = Page::new(vec![
            ContentItem::Marker,
            TextRun::new("a", 0.0, 0.0, 1.0, 1.0).into(),
            ContentItem::Marker,
        ]);
        assert_eq!(page.runs().count(), 1);
    }

    #[test]
    fn end_of_line_defaults_to_false_when_absent() {
        let run: TextRun =
            serde_json::from_str(r#"{"text":"x","x":1.0,"y":2.0,"width":3.0,"height":4.0}"#)
                .unwrap();
        assert!(!run.end_of_line);
    }
}
