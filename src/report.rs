use crate::section::{SectionKind, SectionOutput};
use crate::template::format_named;
use anyhow::{anyhow, Result};
use chrono::prelude::*;
use std::collections::HashMap;

/// Placeholders for the five wikitables, in report order.
const WIKITABLE_KEYS: [&str; 5] = [
    "wikitable1",
    "wikitable2",
    "wikitable3",
    "wikitable4",
    "wikitable5",
];

/// Sentence naming the pages left out of a section, empty if none were.
pub fn missing_message(pages: &[String]) -> String {
    if pages.is_empty() {
        return String::new();
    }
    format!(
        "Ignored due to query timeouts: [[{}]]\n",
        pages.join("]], [[")
    )
}

pub fn update_timestamp(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d, %H:%M").to_string()
}

/// Fills the report skeleton. Every section must be present exactly once.
pub fn compose(skeleton: &str, sections: &[SectionOutput], now: DateTime<Utc>) -> Result<String> {
    let mut values: HashMap<&str, String> = HashMap::new();
    for (num, kind) in SectionKind::ALL.iter().enumerate() {
        let mut matching = sections.iter().filter(|s| s.kind == *kind);
        let section = matching
            .next()
            .ok_or_else(|| anyhow!("No result for section '{kind}'"))?;
        if matching.next().is_some() {
            return Err(anyhow!("Duplicate result for section '{kind}'"));
        }
        values.insert(WIKITABLE_KEYS[num], section.wikitable.to_owned());
        values.insert(kind.name(), missing_message(&section.missing));
    }
    values.insert("update", update_timestamp(now));
    format_named(skeleton, &values)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(kind: SectionKind, missing: &[&str]) -> SectionOutput {
        SectionOutput {
            kind,
            wikitable: format!("<{kind}>"),
            missing: missing.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 0).unwrap()
    }

    const SKELETON: &str = "{{{{Note}}}} updated {update}\n\
        {wikitable1}{types}{wikitable2}{occupations}{wikitable3}{backlinks}\
        {wikitable4}{identifiers}{wikitable5}{properties}";

    #[test]
    fn missing_messages() {
        assert_eq!(missing_message(&[]), "");
        assert_eq!(
            missing_message(&["User:A".to_string(), "User:B".to_string()]),
            "Ignored due to query timeouts: [[User:A]], [[User:B]]\n"
        );
    }

    #[test]
    fn composes_in_report_order() {
        let sections: Vec<SectionOutput> = SectionKind::ALL
            .iter()
            .rev()
            .map(|kind| match kind {
                SectionKind::Occupations => output(*kind, &["User:C"]),
                _ => output(*kind, &[]),
            })
            .collect();
        let report = compose(SKELETON, &sections, now()).unwrap();
        assert_eq!(
            report,
            "{{Note}} updated 2024-03-09, 17:05\n\
             <types><occupations>Ignored due to query timeouts: [[User:C]]\n\
             <backlinks><identifiers><properties>"
        );
    }

    #[test]
    fn incomplete_sections_are_rejected() {
        let sections = vec![output(SectionKind::Types, &[])];
        assert!(compose(SKELETON, &sections, now()).is_err());

        let mut sections: Vec<SectionOutput> =
            SectionKind::ALL.iter().map(|k| output(*k, &[])).collect();
        sections.push(output(SectionKind::Types, &[]));
        assert!(compose(SKELETON, &sections, now()).is_err());
    }
}
