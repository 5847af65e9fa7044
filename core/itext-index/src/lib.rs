//! Annotation index: which intertexts cover a line, grouped and filtered by
//! source, plus the text store that answers passage queries.

pub mod session;
pub mod store;
pub mod tally;

pub use session::{filter_by_source, group_by_source, source_range, target_range, Session, SourceSet};
pub use store::{query_path, StoreError, TextStore};
pub use tally::SourceTally;

#[cfg(test)]
mod tests {
    use super::*;
    use itext_protocol::Itext;

    #[test]
    fn test_badge_counts_follow_filter() {
        let rows = ["1.1", "1.2", "1.3", "1.4"];
        let session: Session = [
            ("ovid", "1.1", "1.1"),
            ("ovid", "1.2", "1.3"),
            ("lucan", "1.1", "1.1"),
            ("homer", "1.1.1", "1.1.3"),
        ]
        .into_iter()
        .map(|(source, start, stop)| Itext {
            source: source.to_string(),
            target_start: start.to_string(),
            target_stop: stop.to_string(),
            ..Itext::default()
        })
        .collect();

        let all = session.sources();
        let counts: Vec<usize> = rows
            .iter()
            .map(|loc| filter_by_source(session.by_locus(loc), &all).len())
            .collect();
        assert_eq!(counts, vec![2, 1, 1, 0]);

        let lucan: SourceSet = ["lucan".to_string()].into_iter().collect();
        let counts: Vec<usize> = rows
            .iter()
            .map(|loc| filter_by_source(session.by_locus(loc), &lucan).len())
            .collect();
        assert_eq!(counts, vec![1, 0, 0, 0]);
    }
}
