use scraper::Selector;

/// Structural description of where paper fields live in an alert email body.
///
/// Scholar's alert markup is positional: each paper is an `<h3><a>` title
/// followed by sibling `<div>`s holding the author/venue line and the
/// abstract. Keeping the positions here makes a layout change a one-place
/// fix, and alternate layouts plug into the extractor without touching the
/// aggregator.
#[derive(Debug, Clone)]
pub struct LayoutSchema {
    /// Selector for the title anchor of each paper entry.
    pub title_anchor: Selector,
    /// Index of the author/venue block among the `<div>` siblings that follow
    /// the title element.
    pub author_div: usize,
    /// Index of the abstract block among those same siblings.
    pub abstract_div: usize,
}

impl LayoutSchema {
    /// The layout of Scholar alert emails as observed since 2019.
    pub fn scholar() -> Self {
        Self {
            title_anchor: Selector::parse("h3 > a").unwrap(),
            author_div: 0,
            abstract_div: 1,
        }
    }
}

impl Default for LayoutSchema {
    fn default() -> Self {
        Self::scholar()
    }
}
