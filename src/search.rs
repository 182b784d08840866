use crate::loader::FileRecord;
use std::sync::Arc;

fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

pub fn matches_term(record: &FileRecord, term_lower: &str) -> bool {
    if term_lower.is_empty() {
        return true;
    }
    if contains_folded(&record.name, term_lower) {
        return true;
    }
    record
        .description
        .as_deref()
        .is_some_and(|d| contains_folded(d, term_lower))
}

/// Case-insensitive substring filter over name and description.
/// The output keeps the relative order of `records`.
pub fn filter_records(records: &[Arc<FileRecord>], term: &str) -> Vec<Arc<FileRecord>> {
    let term_lower = term.to_lowercase();
    records
        .iter()
        .filter(|record| matches_term(record, &term_lower))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::RecordId;
    use crate::registry::FileDescriptor;
    use serde_json::json;

    fn record(idx: usize, name: &str, description: Option<&str>) -> Arc<FileRecord> {
        Arc::new(FileRecord::from_parts(
            RecordId(idx),
            &FileDescriptor::new(name, description, "x"),
            json!([]),
            format!("file:///data/{name}"),
        ))
    }

    fn sample() -> Vec<Arc<FileRecord>> {
        vec![
            record(0, "tasks.json", Some("Lista de tareas con 30 registros")),
            record(1, "Users.JSON", None),
            record(2, "orders.json", Some("Pedidos del mes")),
            record(3, "config.json", Some("App SETTINGS")),
        ]
    }

    fn names(records: &[Arc<FileRecord>]) -> Vec<&str> {
        records.iter().map(|r| r.name.as_str()).collect()
    }

    #[test]
    fn empty_term_returns_everything_in_order() {
        let records = sample();
        let out = filter_records(&records, "");
        assert_eq!(out, records);
    }

    #[test]
    fn name_match_is_case_insensitive() {
        let records = sample();
        assert_eq!(names(&filter_records(&records, "users")), vec!["Users.JSON"]);
        assert_eq!(names(&filter_records(&records, "ORDERS")), vec!["orders.json"]);
    }

    #[test]
    fn description_match_is_case_insensitive() {
        let records = sample();
        assert_eq!(names(&filter_records(&records, "settings")), vec!["config.json"]);
        assert_eq!(names(&filter_records(&records, "TAREAS")), vec!["tasks.json"]);
    }

    #[test]
    fn absent_description_never_matches() {
        let records = vec![record(0, "a.json", None)];
        assert!(filter_records(&records, "none").is_empty());
    }

    #[test]
    fn unmatched_term_yields_empty_view() {
        assert!(filter_records(&sample(), "xyz-nomatch").is_empty());
    }

    #[test]
    fn result_is_ordered_subsequence_with_exact_membership() {
        let records = sample();
        for term in ["json", "o", "de", "S", ".", "pedidos", "zzz"] {
            let out = filter_records(&records, term);
            let mut cursor = 0usize;
            for kept in &out {
                let pos = records[cursor..]
                    .iter()
                    .position(|r| Arc::ptr_eq(r, kept))
                    .expect("output must be a subsequence");
                cursor += pos + 1;
            }
            let lower = term.to_lowercase();
            for r in &records {
                let expected = r.name.to_lowercase().contains(&lower)
                    || r
                        .description
                        .as_ref()
                        .is_some_and(|d| d.to_lowercase().contains(&lower));
                assert_eq!(out.iter().any(|o| Arc::ptr_eq(o, r)), expected, "term {term:?}");
            }
        }
    }

    #[test]
    fn filtering_does_not_mutate_input() {
        let records = sample();
        let before = records.clone();
        let _ = filter_records(&records, "orders");
        assert_eq!(records, before);
    }
}
