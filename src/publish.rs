use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde_json::Value;
use wikimisc::mediawiki::api::Api;

#[async_trait]
pub trait Publisher: Send + Sync {
    /// Replaces the whole content of the report page with `text`.
    async fn publish(&self, text: &str) -> Result<()>;
}

// ---------------------------------------------------------------------------
// WikiPublisher – bot-password login, then a single edit
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct WikiPublisher {
    api_url: String,
    page: String,
    summary: String,
    user: String,
    password: String,
}

impl WikiPublisher {
    pub fn new(api_url: &str, page: &str, summary: &str, user: &str, password: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            page: page.to_string(),
            summary: summary.to_string(),
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    fn check_edit_result(result: &Value) -> Result<()> {
        match result["edit"]["result"].as_str() {
            Some("Success") => Ok(()),
            _ => Err(anyhow!("Edit was not successful: {result}")),
        }
    }
}

#[async_trait]
impl Publisher for WikiPublisher {
    async fn publish(&self, text: &str) -> Result<()> {
        let mut api = Api::new(&self.api_url)
            .await
            .map_err(|e| anyhow!("Can't talk to MediaWiki API at {}: {e}", self.api_url))?;
        api.login(self.user.to_owned(), self.password.to_owned())
            .await
            .map_err(|e| anyhow!("Login as {} failed: {e}", self.user))?;
        let token = api
            .get_edit_token()
            .await
            .map_err(|e| anyhow!("Can't get edit token: {e}"))?;
        let params = api.params_into(&[
            ("action", "edit"),
            ("title", self.page.as_str()),
            ("text", text),
            ("summary", self.summary.as_str()),
            ("minor", "1"),
            ("bot", "1"),
            ("watchlist", "nochange"),
            ("token", token.as_str()),
        ]);
        let result = api
            .post_query_api_json(&params)
            .await
            .map_err(|e| anyhow!("Saving {} failed: {e}", self.page))?;
        Self::check_edit_result(&result)?;
        tracing::info!("Published report to {}", self.page);
        Ok(())
    }
}

/// Prints the report instead of saving it.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdoutPublisher;

#[async_trait]
impl Publisher for StdoutPublisher {
    async fn publish(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edit_result() {
        let ok = json!({"edit": {"result": "Success", "pageid": 1, "nochange": ""}});
        assert!(WikiPublisher::check_edit_result(&ok).is_ok());
        let failed = json!({"error": {"code": "protectedpage"}});
        assert!(WikiPublisher::check_edit_result(&failed).is_err());
        let failed = json!({"edit": {"result": "Failure"}});
        assert!(WikiPublisher::check_edit_result(&failed).is_err());
    }

    #[tokio::test]
    async fn stdout_publisher_succeeds() {
        assert!(StdoutPublisher.publish("text").await.is_ok());
    }
}
