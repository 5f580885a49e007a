use std::collections::HashMap;

use scholar_digest_mail::Message;

use crate::{ExtractOptions, LayoutSchema, Paper, Stats, extract_papers};

/// Papers aggregated across messages, keyed by title.
///
/// Discovery order is remembered alongside the map so that report ordering is
/// deterministic: `sorted` is a stable frequency sort with discovery order as
/// the tie-break, never raw map iteration order.
#[derive(Debug, Default)]
pub struct AggPapers {
    by_title: HashMap<String, Paper>,
    order: Vec<String>,
}

impl AggPapers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one observation in. An existing title gains the new observation's
    /// `freq` and `refs`; a new title is inserted as-is. First-seen wins for
    /// all other fields.
    pub fn merge(&mut self, paper: Paper) {
        match self.by_title.get_mut(&paper.title) {
            Some(existing) => {
                existing.freq += paper.freq;
                existing.refs.extend(paper.refs);
            }
            None => {
                self.order.push(paper.title.clone());
                self.by_title.insert(paper.title.clone(), paper);
            }
        }
    }

    pub fn get(&self, title: &str) -> Option<&Paper> {
        self.by_title.get(title)
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }

    /// Papers in discovery order.
    pub fn iter(&self) -> impl Iterator<Item = &Paper> {
        self.order.iter().filter_map(|t| self.by_title.get(t))
    }

    /// Papers ordered for output: frequency descending, discovery order as
    /// the tie-break.
    pub fn sorted(&self) -> Vec<&Paper> {
        let mut papers: Vec<&Paper> = self.iter().collect();
        papers.sort_by(|a, b| b.freq.cmp(&a.freq)); // stable sort keeps discovery order within equal freq
        papers
    }
}

/// Runs the extractor over a batch of messages and folds the results into one
/// aggregate. A bad message never aborts the batch: it is counted in
/// `stats.errors` and contributes nothing.
pub fn extract_and_aggregate(
    msgs: &[Message],
    schema: &LayoutSchema,
    opts: ExtractOptions,
) -> (Stats, AggPapers) {
    let mut stats = Stats {
        messages: msgs.len(),
        ..Stats::default()
    };
    let mut agg = AggPapers::new();

    for msg in msgs {
        let papers = match extract_papers(msg, schema, opts) {
            Ok(papers) => papers,
            Err(e) => {
                tracing::warn!(id = %msg.id, error = %e, "failed to extract papers");
                stats.errors += 1;
                continue;
            }
        };

        stats.titles += papers.len();
        for paper in papers {
            agg.merge(paper);
        }
    }

    (stats, agg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Abstract, PaperRef};

    fn paper(title: &str, freq: usize, ref_msg: Option<&str>) -> Paper {
        Paper {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            author: String::new(),
            abstract_: Abstract::default(),
            source: String::new(),
            refs: ref_msg
                .map(|id| {
                    vec![PaperRef {
                        message_id: id.to_string(),
                        source_label: "src".to_string(),
                    }]
                })
                .unwrap_or_default(),
            freq,
        }
    }

    #[test]
    fn merge_sums_freq_and_concatenates_refs() {
        let mut agg = AggPapers::new();
        agg.merge(paper("A", 1, Some("m1")));
        agg.merge(paper("A", 2, Some("m2")));

        let merged = agg.get("A").unwrap();
        assert_eq!(merged.freq, 3);
        assert_eq!(merged.refs.len(), 2);
        assert_eq!(merged.refs[0].message_id, "m1");
        assert_eq!(merged.refs[1].message_id, "m2");
        assert_eq!(agg.len(), 1);
    }

    #[test]
    fn first_seen_wins_for_non_merged_fields() {
        let mut agg = AggPapers::new();
        let mut first = paper("A", 1, None);
        first.url = "https://first.example.com".to_string();
        let mut second = paper("A", 1, None);
        second.url = "https://second.example.com".to_string();

        agg.merge(first);
        agg.merge(second);
        assert_eq!(agg.get("A").unwrap().url, "https://first.example.com");
    }

    #[test]
    fn sorted_is_freq_descending_with_stable_ties() {
        let mut agg = AggPapers::new();
        agg.merge(paper("one", 1, None));
        agg.merge(paper("three", 1, None));
        agg.merge(paper("two", 1, None));
        agg.merge(paper("three", 1, None));
        agg.merge(paper("three", 1, None));
        agg.merge(paper("two", 1, None));

        let titles: Vec<&str> = agg.sorted().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["three", "two", "one"]);

        // equal frequencies keep discovery order
        let mut tied = AggPapers::new();
        tied.merge(paper("z", 1, None));
        tied.merge(paper("a", 1, None));
        tied.merge(paper("m", 1, None));
        let titles: Vec<&str> = tied.sorted().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["z", "a", "m"]);
    }

    #[test]
    fn freq_is_at_least_the_number_of_refs() {
        let mut agg = AggPapers::new();
        agg.merge(paper("A", 1, Some("m1")));
        agg.merge(paper("A", 1, None));
        let p = agg.get("A").unwrap();
        assert!(p.freq >= p.refs.len());
    }
}
