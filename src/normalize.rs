use crate::record::{EntityRecord, PredicateRecord, TypedRecord};
use std::fmt;

pub const ENTITY_PREFIX: &str = "http://www.wikidata.org/entity/";
pub const PROPERTY_NAMESPACE: &str = "Property:";
pub const WIKIBASE_ONTOLOGY_PREFIX: &str = "http://wikiba.se/ontology#";

pub const PREDICATE_PREFIXES: &[(&str, &str)] = &[
    ("http://www.wikidata.org/prop/statement/", "ps:"),
    ("http://www.wikidata.org/prop/qualifier/", "pq:"),
    ("http://www.wikidata.org/prop/reference/", "pr:"),
    ("http://www.w3.org/2002/07/owl#", "owl:"),
    ("http://schema.org/", "schema:"),
    (WIKIBASE_ONTOLOGY_PREFIX, "wikibase:"),
];

/// A label cell. `Placeholder` stands in for an absent label; it orders
/// before every real label and is never shown.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Label {
    Placeholder,
    Text(String),
}

impl Label {
    fn or_placeholder(label: &Option<String>) -> Self {
        match label {
            Some(text) => Self::Text(text.to_owned()),
            None => Self::Placeholder,
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Placeholder => Ok(()),
            Label::Text(text) => write!(f, "{text}"),
        }
    }
}

/// Grouping key shared by all sections: everything but the count.
pub trait GroupKey: Ord + Clone + fmt::Debug {
    fn entity(&self) -> &str;
    fn label(&self) -> &Label;
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EntityRow {
    pub entity: String,
    pub label: Label,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PredicateRow {
    pub entity: String,
    pub label: Label,
    pub predicate: String,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedRow {
    pub entity: String,
    pub label: Label,
    pub datatype: String,
}

macro_rules! impl_group_key {
    ($($row:ty),*) => {
        $(impl GroupKey for $row {
            fn entity(&self) -> &str {
                &self.entity
            }

            fn label(&self) -> &Label {
                &self.label
            }
        })*
    };
}

impl_group_key!(EntityRow, PredicateRow, TypedRow);

/// Removes `prefix` once if `value` starts with it.
pub fn strip_prefix(value: &str, prefix: &str) -> String {
    value.strip_prefix(prefix).unwrap_or(value).to_string()
}

/// Replaces a leading `long` with `short`, once.
pub fn shorten_prefix(value: &str, long: &str, short: &str) -> String {
    match value.strip_prefix(long) {
        Some(rest) => format!("{short}{rest}"),
        None => value.to_string(),
    }
}

pub fn shorten_predicate(predicate: &str) -> String {
    PREDICATE_PREFIXES
        .iter()
        .find(|(long, _)| predicate.starts_with(long))
        .map(|(long, short)| shorten_prefix(predicate, long, short))
        .unwrap_or_else(|| predicate.to_string())
}

fn local_entity(entity: &str) -> String {
    strip_prefix(entity, ENTITY_PREFIX)
}

fn property_page(entity: &str) -> String {
    format!("{PROPERTY_NAMESPACE}{}", local_entity(entity))
}

// ---------------------------------------------------------------------------
// One normalizer per section. `None` means the row has no complete
// grouping key and does not take part in aggregation.
// ---------------------------------------------------------------------------

/// Types and occupations: items with placeholders for absent cells.
pub fn normalize_item(record: &EntityRecord) -> Option<EntityRow> {
    Some(EntityRow {
        entity: record.entity.as_deref().map(local_entity).unwrap_or_default(),
        label: Label::or_placeholder(&record.label),
    })
}

pub fn normalize_backlink(record: &PredicateRecord) -> Option<PredicateRow> {
    Some(PredicateRow {
        entity: record.entity.as_deref().map(property_page).unwrap_or_default(),
        label: Label::or_placeholder(&record.label),
        predicate: shorten_predicate(record.predicate.as_deref()?),
    })
}

pub fn normalize_identifier(record: &EntityRecord) -> Option<EntityRow> {
    Some(EntityRow {
        entity: property_page(record.entity.as_deref()?),
        label: Label::Text(record.label.to_owned()?),
    })
}

pub fn normalize_property(record: &TypedRecord) -> Option<TypedRow> {
    Some(TypedRow {
        entity: property_page(record.entity.as_deref()?),
        label: Label::Text(record.label.to_owned()?),
        datatype: shorten_prefix(
            record.datatype.as_deref()?,
            WIKIBASE_ONTOLOGY_PREFIX,
            "wikibase:",
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_record(entity: Option<&str>, label: Option<&str>, cnt: u64) -> EntityRecord {
        EntityRecord {
            entity: entity.map(|s| s.to_string()),
            label: label.map(|s| s.to_string()),
            cnt,
        }
    }

    #[test]
    fn strip_prefix_is_idempotent() {
        let full = "http://www.wikidata.org/entity/Q5";
        let once = strip_prefix(full, ENTITY_PREFIX);
        assert_eq!(once, "Q5");
        assert_eq!(strip_prefix(&once, ENTITY_PREFIX), "Q5");
        assert_eq!(strip_prefix("urn:x:Q5", ENTITY_PREFIX), "urn:x:Q5");
        assert_eq!(strip_prefix("", ENTITY_PREFIX), "");
    }

    #[test]
    fn prefix_only_replaced_at_start() {
        let value = "x http://schema.org/about";
        assert_eq!(shorten_predicate(value), value);
        assert_eq!(shorten_predicate("http://schema.org/about"), "schema:about");
        assert_eq!(
            shorten_predicate("http://www.wikidata.org/prop/qualifier/P580"),
            "pq:P580"
        );
        assert_eq!(
            shorten_predicate("http://wikiba.se/ontology#sitelinks"),
            "wikibase:sitelinks"
        );
        assert_eq!(
            shorten_predicate("http://www.wikidata.org/prop/reference/P854"),
            "pr:P854"
        );
        assert_eq!(
            shorten_predicate("http://www.w3.org/2002/07/owl#sameAs"),
            "owl:sameAs"
        );
        assert_eq!(
            shorten_predicate("http://www.wikidata.org/prop/direct/P31"),
            "http://www.wikidata.org/prop/direct/P31"
        );
    }

    #[test]
    fn placeholder_sorts_first() {
        let mut labels = vec![
            Label::Text("zebra".to_string()),
            Label::Text("!".to_string()),
            Label::Text("".to_string()),
            Label::Placeholder,
            Label::Text("@".to_string()),
        ];
        labels.sort();
        assert_eq!(labels[0], Label::Placeholder);
        assert_ne!(Label::Placeholder, Label::Text("@".to_string()));
        assert_eq!(Label::Placeholder.to_string(), "");
    }

    #[test]
    fn item_placeholders() {
        let row = normalize_item(&entity_record(None, None, 7)).unwrap();
        assert_eq!(row.entity, "");
        assert_eq!(row.label, Label::Placeholder);
        let row = normalize_item(&entity_record(
            Some("http://www.wikidata.org/entity/Q5"),
            Some("human"),
            1,
        ))
        .unwrap();
        assert_eq!(row.entity, "Q5");
        assert_eq!(row.label, Label::Text("human".to_string()));
    }

    #[test]
    fn backlink_rows() {
        let record = PredicateRecord {
            entity: Some("http://www.wikidata.org/entity/P1448".to_string()),
            label: Some("official name".to_string()),
            predicate: Some("http://www.wikidata.org/prop/statement/P1448".to_string()),
            cnt: 2,
        };
        let row = normalize_backlink(&record).unwrap();
        assert_eq!(row.entity, "Property:P1448");
        assert_eq!(row.predicate, "ps:P1448");

        let record = PredicateRecord {
            entity: None,
            label: None,
            predicate: Some("http://schema.org/about".to_string()),
            cnt: 2,
        };
        let row = normalize_backlink(&record).unwrap();
        assert_eq!(row.entity, "");
        assert_eq!(row.label, Label::Placeholder);
        assert_eq!(row.predicate, "schema:about");
    }

    #[test]
    fn identifier_and_property_rows() {
        let row = normalize_identifier(&entity_record(
            Some("http://www.wikidata.org/entity/P214"),
            Some("VIAF ID"),
            4,
        ))
        .unwrap();
        assert_eq!(row.entity, "Property:P214");
        assert!(normalize_identifier(&entity_record(None, Some("x"), 1)).is_none());
        assert!(normalize_identifier(&entity_record(Some("P1"), None, 1)).is_none());

        let record = TypedRecord {
            entity: Some("http://www.wikidata.org/entity/P31".to_string()),
            label: Some("instance of".to_string()),
            datatype: Some("http://wikiba.se/ontology#WikibaseItem".to_string()),
            cnt: 9,
        };
        let row = normalize_property(&record).unwrap();
        assert_eq!(row.entity, "Property:P31");
        assert_eq!(row.datatype, "wikibase:WikibaseItem");
    }
}
