use anyhow::{anyhow, Result};
use serde_json::Value;
use wikimisc::mediawiki::api::Api;

/// Lists the tracked source pages: everything in one namespace whose title
/// starts with a fixed prefix.
#[derive(Debug, Clone)]
pub struct PageDiscovery {
    api_url: String,
    namespace: u64,
    prefix: String,
}

impl PageDiscovery {
    pub fn new(api_url: &str, namespace: u64, prefix: &str) -> Self {
        Self {
            api_url: api_url.to_string(),
            namespace,
            prefix: prefix.to_string(),
        }
    }

    /// All matching titles in API order, over all continuation batches.
    pub async fn pages(&self) -> Result<Vec<String>> {
        let api = Api::new(&self.api_url)
            .await
            .map_err(|e| anyhow!("Can't talk to MediaWiki API at {}: {e}", self.api_url))?;
        let namespace = self.namespace.to_string();
        let params = api.params_into(&[
            ("action", "query"),
            ("list", "allpages"),
            ("apnamespace", namespace.as_str()),
            ("apprefix", self.prefix.as_str()),
            ("aplimit", "max"),
        ]);
        let result = api
            .get_query_api_json_all(&params)
            .await
            .map_err(|e| anyhow!("Page discovery failed: {e}"))?;
        let pages = Self::titles_from_result(&result);
        tracing::info!("Found {} pages with prefix '{}'", pages.len(), self.prefix);
        Ok(pages)
    }

    fn titles_from_result(result: &Value) -> Vec<String> {
        result["query"]["allpages"]
            .as_array()
            .map(|pages| {
                pages
                    .iter()
                    .filter_map(|page| page["title"].as_str())
                    .filter(|title| !title.is_empty())
                    .map(|title| title.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titles_in_api_order() {
        let result = json!({"batchcomplete": "", "query": {"allpages": [
            {"pageid": 2, "ns": 2, "title": "User:Pasleim/Items for deletion/Page deleted/B"},
            {"pageid": 1, "ns": 2, "title": "User:Pasleim/Items for deletion/Page deleted/A"},
            {"pageid": 3, "ns": 2}
        ]}});
        assert_eq!(
            PageDiscovery::titles_from_result(&result),
            vec![
                "User:Pasleim/Items for deletion/Page deleted/B".to_string(),
                "User:Pasleim/Items for deletion/Page deleted/A".to_string(),
            ]
        );
    }

    #[test]
    fn no_pages() {
        assert!(PageDiscovery::titles_from_result(&json!({"query": {}})).is_empty());
        assert!(PageDiscovery::titles_from_result(&json!({})).is_empty());
    }
}
