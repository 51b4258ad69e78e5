use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::fmt::Debug;

/// A raw result row as returned by one query. Columns are matched by
/// position, so the field order of an implementing struct is the column
/// order of its query.
pub trait Record: DeserializeOwned + Debug + Clone {
    const COLUMNS: &'static [&'static str];
    fn count(&self) -> u64;
}

/// `{entity, label, cnt}`, used by types, occupations and identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EntityRecord {
    pub entity: Option<String>,
    pub label: Option<String>,
    pub cnt: u64,
}

impl Record for EntityRecord {
    const COLUMNS: &'static [&'static str] = &["entity", "label", "cnt"];

    fn count(&self) -> u64 {
        self.cnt
    }
}

/// `{entity, label, predicate, cnt}`, used by backlinks.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredicateRecord {
    pub entity: Option<String>,
    pub label: Option<String>,
    pub predicate: Option<String>,
    pub cnt: u64,
}

impl Record for PredicateRecord {
    const COLUMNS: &'static [&'static str] = &["entity", "label", "predicate", "cnt"];

    fn count(&self) -> u64 {
        self.cnt
    }
}

/// `{entity, label, type, cnt}`, used by properties.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TypedRecord {
    pub entity: Option<String>,
    pub label: Option<String>,
    pub datatype: Option<String>,
    pub cnt: u64,
}

impl Record for TypedRecord {
    const COLUMNS: &'static [&'static str] = &["entity", "label", "type", "cnt"];

    fn count(&self) -> u64 {
        self.cnt
    }
}

/// A raw row tagged with the page whose query produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourcedRecord<R> {
    pub source: String,
    pub record: R,
}

/// Parses a comma-separated response body. The first line is a header and
/// only its width is checked; names come from `R::COLUMNS`. Empty cells
/// become `None`, an empty or non-numeric count is an error.
pub fn parse_csv<R: Record>(body: &str) -> Result<Vec<R>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(body.as_bytes());
    let header_width = reader
        .headers()
        .map_err(|e| anyhow!("Can not read CSV header: {e}"))?
        .len();
    if header_width != R::COLUMNS.len() {
        return Err(anyhow!(
            "Expected {} columns ({}), got {header_width}",
            R::COLUMNS.len(),
            R::COLUMNS.join(", ")
        ));
    }
    reader
        .records()
        .enumerate()
        .map(|(num, record)| {
            let record = record.map_err(|e| anyhow!("CSV row {}: {e}", num + 1))?;
            record
                .deserialize::<R>(None)
                .map_err(|e| anyhow!("CSV row {}: {e}", num + 1))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_entity_rows() {
        let body = "item,itemLabel,cnt\nhttp://www.wikidata.org/entity/Q5,human,3\n,,7\n";
        let rows: Vec<EntityRecord> = parse_csv(body).unwrap();
        assert_eq!(
            rows,
            vec![
                EntityRecord {
                    entity: Some("http://www.wikidata.org/entity/Q5".to_string()),
                    label: Some("human".to_string()),
                    cnt: 3
                },
                EntityRecord {
                    entity: None,
                    label: None,
                    cnt: 7
                },
            ]
        );
    }

    #[test]
    fn quoted_cells_keep_commas() {
        let body = "a,b,c,d\nhttp://www.wikidata.org/entity/P31,\"instance of, really\",http://wikiba.se/ontology#WikibaseItem,12\n";
        let rows: Vec<TypedRecord> = parse_csv(body).unwrap();
        assert_eq!(rows[0].label.as_deref(), Some("instance of, really"));
        assert_eq!(rows[0].count(), 12);
    }

    #[test]
    fn header_only_is_empty() {
        let rows: Vec<PredicateRecord> = parse_csv("a,b,c,d\n").unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn missing_count_is_fatal() {
        assert!(parse_csv::<EntityRecord>("a,b,c\nQ5,human,\n").is_err());
        assert!(parse_csv::<EntityRecord>("a,b,c\nQ5,human,many\n").is_err());
    }

    #[test]
    fn wrong_width_is_fatal() {
        assert!(parse_csv::<EntityRecord>("a,b\nQ5,human\n").is_err());
        assert!(parse_csv::<EntityRecord>("a,b,c\nQ5,human,1,2\n").is_err());
    }
}
