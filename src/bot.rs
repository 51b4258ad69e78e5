use crate::publish::Publisher;
use crate::report::{compose, missing_message};
use crate::section::{SectionKind, SectionOutput};
use crate::sparql::{QueryEndpoint, QueryExecutor};
use crate::template::TemplateStore;
use anyhow::{anyhow, Result};
use chrono::Utc;
use std::collections::HashMap;
use std::future::Future;

fn template_for(templates: &HashMap<SectionKind, String>, kind: SectionKind) -> Result<&str> {
    templates
        .get(&kind)
        .map(|s| s.as_str())
        .ok_or_else(|| anyhow!("No query template for section {kind}"))
}

/// One complete statistics run: query all sections for the given pages,
/// compose the report and hand it to the publisher.
pub struct Bot<E> {
    executor: QueryExecutor<E>,
    templates: TemplateStore,
    publisher: Box<dyn Publisher>,
}

impl<E: std::fmt::Debug> std::fmt::Debug for Bot<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bot")
            .field("executor", &self.executor)
            .field("templates", &self.templates)
            .finish()
    }
}

impl<E: QueryEndpoint> Bot<E> {
    pub fn new(
        executor: QueryExecutor<E>,
        templates: TemplateStore,
        publisher: Box<dyn Publisher>,
    ) -> Self {
        Self {
            executor,
            templates,
            publisher,
        }
    }

    pub const fn executor(&self) -> &QueryExecutor<E> {
        &self.executor
    }

    /// Templates are read up front so a missing file fails before the
    /// first query.
    async fn query_templates(
        &self,
        kinds: &[SectionKind],
    ) -> Result<HashMap<SectionKind, String>> {
        let mut ret = HashMap::new();
        for kind in kinds {
            let template = self.templates.read_query_template(kind.name()).await?;
            ret.insert(*kind, template);
        }
        Ok(ret)
    }

    async fn run_sections(
        &self,
        kinds: &[SectionKind],
        pages: &[String],
    ) -> Result<Vec<SectionOutput>> {
        let templates = self.query_templates(kinds).await?;
        let mut ret = vec![];
        for kind in kinds {
            let template = template_for(&templates, *kind)?;
            ret.push(kind.run(&self.executor, template, pages).await?);
        }
        Ok(ret)
    }

    /// Runs all sections, publishes the report, and returns its text.
    /// Nothing is published if any step fails.
    pub async fn run(&self, pages: &[String]) -> Result<String> {
        self.executor.failure_log().truncate().await?;
        let skeleton = self.templates.read_report_template().await?;
        tracing::info!("Running statistics for {} pages", pages.len());
        let sections = self.run_sections(&SectionKind::ALL, pages).await?;
        let report = compose(&skeleton, &sections, Utc::now())?;
        self.publisher.publish(&report).await?;
        Ok(report)
    }

    /// Clears the failure log before `pages` is awaited, then runs either
    /// one section or the full report.
    pub async fn run_discovered<F>(&self, section: Option<SectionKind>, pages: F) -> Result<String>
    where
        F: Future<Output = Result<Vec<String>>>,
    {
        self.executor.failure_log().truncate().await?;
        let pages = pages.await?;
        match section {
            Some(kind) => self.run_single(kind, &pages).await,
            None => self.run(&pages).await,
        }
    }

    /// Wikitable and missing-page notice of a single section, without
    /// composing or publishing a report.
    pub async fn run_single(&self, kind: SectionKind, pages: &[String]) -> Result<String> {
        self.executor.failure_log().truncate().await?;
        let sections = self.run_sections(&[kind], pages).await?;
        Ok(sections
            .into_iter()
            .map(|s| format!("{}\n{}", s.wikitable, missing_message(&s.missing)))
            .collect())
    }
}
