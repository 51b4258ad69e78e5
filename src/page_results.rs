use crate::record::{Record, SourcedRecord};
use crate::sparql::{QueryEndpoint, QueryExecutor, QueryOutcome};
use anyhow::Result;

/// Union of one section's rows over all pages that answered, plus the
/// pages that did not, in page order.
#[derive(Debug, Clone, PartialEq)]
pub struct PageResults<R> {
    pub rows: Vec<SourcedRecord<R>>,
    pub missing: Vec<String>,
}

impl<R> Default for PageResults<R> {
    fn default() -> Self {
        Self {
            rows: vec![],
            missing: vec![],
        }
    }
}

impl<R: Record> PageResults<R> {
    /// Runs `template` once per page. A failed page is recorded and
    /// skipped; any error aborts the whole collection.
    pub async fn collect<E: QueryEndpoint>(
        executor: &QueryExecutor<E>,
        section: &str,
        template: &str,
        pages: &[String],
    ) -> Result<Self> {
        let mut ret = Self::default();
        for page in pages {
            match executor.query_page::<R>(template, page).await? {
                QueryOutcome::Table(rows) => {
                    ret.rows.extend(rows.into_iter().map(|record| SourcedRecord {
                        source: page.to_owned(),
                        record,
                    }));
                }
                QueryOutcome::Failed { status, elapsed } => {
                    tracing::warn!(
                        section,
                        "Query for page '{page}' failed: status {status} after {:.1} s",
                        elapsed.as_secs_f64()
                    );
                    ret.missing.push(page.to_owned());
                }
            }
        }
        Ok(ret)
    }

    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.rows.iter().map(|r| &r.record)
    }
}
