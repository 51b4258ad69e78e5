use crate::aggregate::{aggregate, rank};
use crate::normalize::{
    normalize_backlink, normalize_identifier, normalize_item, normalize_property, EntityRow,
    PredicateRow, TypedRow,
};
use crate::page_results::PageResults;
use crate::record::{EntityRecord, PredicateRecord, Record, TypedRecord};
use crate::render_wikitext::{render_table, WikitextRow};
use crate::sparql::{QueryEndpoint, QueryExecutor};
use anyhow::Result;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionKind {
    Types,
    Occupations,
    Backlinks,
    Identifiers,
    Properties,
}

impl SectionKind {
    /// Report order.
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Types,
        SectionKind::Occupations,
        SectionKind::Backlinks,
        SectionKind::Identifiers,
        SectionKind::Properties,
    ];

    /// Name of the query template, and of the missing-pages placeholder.
    pub const fn name(&self) -> &'static str {
        match self {
            SectionKind::Types => "types",
            SectionKind::Occupations => "occupations",
            SectionKind::Backlinks => "backlinks",
            SectionKind::Identifiers => "identifiers",
            SectionKind::Properties => "properties",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.name() == name)
    }

    /// Executes this section's pipeline with its own schema and row shape.
    pub async fn run<E: QueryEndpoint>(
        &self,
        executor: &QueryExecutor<E>,
        template: &str,
        pages: &[String],
    ) -> Result<SectionOutput> {
        match self {
            SectionKind::Types => TYPES.run(executor, template, pages).await,
            SectionKind::Occupations => OCCUPATIONS.run(executor, template, pages).await,
            SectionKind::Backlinks => BACKLINKS.run(executor, template, pages).await,
            SectionKind::Identifiers => IDENTIFIERS.run(executor, template, pages).await,
            SectionKind::Properties => PROPERTIES.run(executor, template, pages).await,
        }
    }
}

impl fmt::Display for SectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

// ---------------------------------------------------------------------------
// SectionConfig – schema, normalizer, row shape and column names
// ---------------------------------------------------------------------------

pub struct SectionConfig<R, K> {
    pub kind: SectionKind,
    pub normalize: fn(&R) -> Option<K>,
    pub column_names: &'static [&'static str],
}

impl<R, K> fmt::Debug for SectionConfig<R, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SectionConfig")
            .field("kind", &self.kind)
            .field("column_names", &self.column_names)
            .finish()
    }
}

pub const TYPES: SectionConfig<EntityRecord, EntityRow> = SectionConfig {
    kind: SectionKind::Types,
    normalize: normalize_item,
    column_names: &["rank", "item", "label", "count"],
};

pub const OCCUPATIONS: SectionConfig<EntityRecord, EntityRow> = SectionConfig {
    kind: SectionKind::Occupations,
    normalize: normalize_item,
    column_names: &["rank", "item", "label", "count"],
};

pub const BACKLINKS: SectionConfig<PredicateRecord, PredicateRow> = SectionConfig {
    kind: SectionKind::Backlinks,
    normalize: normalize_backlink,
    column_names: &["rank", "predicate", "property", "label", "count"],
};

pub const IDENTIFIERS: SectionConfig<EntityRecord, EntityRow> = SectionConfig {
    kind: SectionKind::Identifiers,
    normalize: normalize_identifier,
    column_names: &["rank", "property", "label", "count"],
};

pub const PROPERTIES: SectionConfig<TypedRecord, TypedRow> = SectionConfig {
    kind: SectionKind::Properties,
    normalize: normalize_property,
    column_names: &["rank", "property", "label", "type", "count"],
};

/// The rendered wikitable of one section, with the pages left out of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionOutput {
    pub kind: SectionKind,
    pub wikitable: String,
    pub missing: Vec<String>,
}

impl<R: Record, K: WikitextRow> SectionConfig<R, K> {
    pub async fn run<E: QueryEndpoint>(
        &self,
        executor: &QueryExecutor<E>,
        template: &str,
        pages: &[String],
    ) -> Result<SectionOutput> {
        let results =
            PageResults::<R>::collect(executor, self.kind.name(), template, pages).await?;
        let wikitable = self.wikitable(&results);
        Ok(SectionOutput {
            kind: self.kind,
            wikitable,
            missing: results.missing,
        })
    }

    /// Normalizes, aggregates, ranks and renders the combined rows.
    pub fn wikitable(&self, results: &PageResults<R>) -> String {
        let mut dropped = 0;
        let normalized: Vec<(K, u64)> = results
            .records()
            .filter_map(|record| match (self.normalize)(record) {
                Some(key) => Some((key, record.count())),
                None => {
                    dropped += 1;
                    None
                }
            })
            .collect();
        if dropped > 0 {
            tracing::debug!("{}: {dropped} rows without a complete key dropped", self.kind);
        }
        let ranked = rank(aggregate(normalized));
        tracing::info!(
            "{}: {} rows, {} aggregated, {} pages missing",
            self.kind,
            results.rows.len(),
            ranked.len(),
            results.missing.len()
        );
        render_table(&ranked, self.column_names)
    }
}
