use crate::failure_log::FailureLog;
use crate::rate_limit::RateLimit;
use crate::record::{parse_csv, Record};
use crate::template::format_named;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use reqwest::header;
use std::collections::HashMap;
use std::fmt;
use std::time::{Duration, Instant};

/// What the query endpoint answered, before any parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EndpointResponse {
    /// HTTP 200 with a delimited-text body
    Success(String),
    /// Any other HTTP status
    Status(u16),
    /// No HTTP response at all (timeout, connection reset, ...)
    Transport(String),
}

#[async_trait]
pub trait QueryEndpoint: Send + Sync {
    async fn post_query(&self, query: &str) -> EndpointResponse;
}

// ---------------------------------------------------------------------------
// WdqsEndpoint – form-encoded POST against a SPARQL service, CSV results
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WdqsEndpoint {
    url: String,
    client: reqwest::Client,
}

impl WdqsEndpoint {
    pub fn new(url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow!("Can not build HTTP client: {e}"))?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl QueryEndpoint for WdqsEndpoint {
    async fn post_query(&self, query: &str) -> EndpointResponse {
        let mut params: HashMap<&str, &str> = HashMap::new();
        params.insert("query", query);
        let response = match self
            .client
            .post(&self.url)
            .header(header::ACCEPT, "text/csv")
            .form(&params)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => return EndpointResponse::Transport(e.to_string()),
        };
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return EndpointResponse::Status(status.as_u16());
        }
        match response.text().await {
            Ok(body) => EndpointResponse::Success(body),
            Err(e) => EndpointResponse::Transport(e.to_string()),
        }
    }
}

// ---------------------------------------------------------------------------
// QueryExecutor
// ---------------------------------------------------------------------------

/// Result of one query. `Failed` is recoverable: the page is skipped for
/// this section. Anything fatal comes back as `Err` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome<R> {
    Table(Vec<R>),
    Failed { status: String, elapsed: Duration },
}

impl fmt::Display for EndpointResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointResponse::Success(_) => write!(f, "200"),
            EndpointResponse::Status(code) => write!(f, "{code}"),
            EndpointResponse::Transport(e) => write!(f, "error ({e})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct QueryExecutor<E> {
    endpoint: E,
    rate_limit: RateLimit,
    failure_log: FailureLog,
}

impl<E: QueryEndpoint> QueryExecutor<E> {
    pub const fn new(endpoint: E, rate_limit: RateLimit, failure_log: FailureLog) -> Self {
        Self {
            endpoint,
            rate_limit,
            failure_log,
        }
    }

    pub const fn endpoint(&self) -> &E {
        &self.endpoint
    }

    pub const fn failure_log(&self) -> &FailureLog {
        &self.failure_log
    }

    /// Fills the page title into `template` and runs the query.
    pub async fn query_page<R: Record>(
        &self,
        template: &str,
        page: &str,
    ) -> Result<QueryOutcome<R>> {
        let query = Self::query_for_page(template, page)?;
        self.run_query(&query).await
    }

    pub fn query_for_page(template: &str, page: &str) -> Result<String> {
        if page.trim().is_empty() {
            return Err(anyhow!("Empty page title"));
        }
        let mut values = HashMap::new();
        values.insert("pagetitle", page.replace(' ', "_"));
        format_named(template, &values)
    }

    /// The rate-limit pause happens after every request, before the
    /// response is looked at.
    pub async fn run_query<R: Record>(&self, query: &str) -> Result<QueryOutcome<R>> {
        tracing::debug!("Running query: {query}");
        let start = Instant::now();
        let response = self.endpoint.post_query(query).await;
        let elapsed = start.elapsed();
        self.rate_limit.wait().await;

        match response {
            EndpointResponse::Success(body) => {
                let rows = parse_csv::<R>(&body)
                    .map_err(|e| anyhow!("Malformed query result: {e}\nQuery: {query}"))?;
                Ok(QueryOutcome::Table(rows))
            }
            failed => {
                let status = failed.to_string();
                self.failure_log.append(&status, query, elapsed).await?;
                Ok(QueryOutcome::Failed { status, elapsed })
            }
        }
    }
}
