use anyhow::{Context, Result};
use chrono::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncWriteExt;

/// Append-only text file recording every failed query of a run.
#[derive(Debug, Clone)]
pub struct FailureLog {
    path: PathBuf,
}

impl FailureLog {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Empties the log; called once at the start of a run.
    pub async fn truncate(&self) -> Result<()> {
        tokio::fs::write(&self.path, "")
            .await
            .with_context(|| format!("Can not truncate failure log {}", self.path.display()))
    }

    pub async fn append(&self, status: &str, query: &str, elapsed: Duration) -> Result<()> {
        let line = Self::format_line(Utc::now(), status, query, elapsed);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Can not open failure log {}", self.path.display()))?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    fn format_line(now: DateTime<Utc>, status: &str, query: &str, elapsed: Duration) -> String {
        format!(
            "{}: status {status} for query {query} ({} s)\n\n",
            now.format("%Y-%m-%d %H:%M:%S"),
            elapsed.as_secs_f64()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_truncate() {
        let dir = tempfile::tempdir().unwrap();
        let log = FailureLog::new(&dir.path().join("templog.txt"));
        log.append("503", "SELECT 1", Duration::from_millis(1500))
            .await
            .unwrap();
        log.append("500", "SELECT 2", Duration::from_secs(60))
            .await
            .unwrap();
        let text = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(text.matches("status ").count(), 2);
        assert!(text.contains("status 503 for query SELECT 1 (1.5 s)"));

        log.truncate().await.unwrap();
        assert_eq!(std::fs::read_to_string(log.path()).unwrap(), "");
    }

    #[test]
    fn line_format() {
        let now = Utc.with_ymd_and_hms(2024, 3, 9, 17, 5, 0).unwrap();
        let line = FailureLog::format_line(now, "503", "Q", Duration::from_secs(2));
        assert_eq!(line, "2024-03-09 17:05:00: status 503 for query Q (2 s)\n\n");
    }
}
