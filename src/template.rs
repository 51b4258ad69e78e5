use anyhow::{anyhow, Context, Result};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Substitutes `{name}` placeholders from `values`. `{{` and `}}` are
/// literal braces, so SPARQL and wikitext bodies can carry their own.
pub fn format_named(template: &str, values: &HashMap<&str, String>) -> Result<String> {
    let mut ret = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                ret.push('{');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(anyhow!("Unterminated placeholder '{{{name}' in template"))
                        }
                        Some(c) => name.push(c),
                    }
                }
                let value = values
                    .get(name.as_str())
                    .ok_or_else(|| anyhow!("Unknown placeholder '{{{name}}}' in template"))?;
                ret += value;
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                ret.push('}');
            }
            '}' => return Err(anyhow!("Single '}}' encountered in template")),
            c => ret.push(c),
        }
    }
    Ok(ret)
}

// ---------------------------------------------------------------------------
// TemplateStore – query templates and the report skeleton on disk
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct TemplateStore {
    root: PathBuf,
}

impl TemplateStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn query_path(&self, name: &str) -> PathBuf {
        self.root.join("queries").join(format!("{name}.rq"))
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join("static").join("report_template.txt")
    }

    pub async fn read_query_template(&self, name: &str) -> Result<String> {
        let path = self.query_path(name);
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Can not read query template {}", path.display()))
    }

    pub async fn read_report_template(&self) -> Result<String> {
        let path = self.report_path();
        tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Can not read report template {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&'static str, &str)]) -> HashMap<&'static str, String> {
        pairs.iter().map(|(k, v)| (*k, v.to_string())).collect()
    }

    #[test]
    fn substitutes_and_unescapes() {
        let template = "SELECT ?x WHERE {{ ?x schema:about <{pagetitle}> }}";
        let ret = format_named(template, &values(&[("pagetitle", "User:Foo_Bar")])).unwrap();
        assert_eq!(ret, "SELECT ?x WHERE { ?x schema:about <User:Foo_Bar> }");
    }

    #[test]
    fn values_are_not_reinterpreted() {
        let ret = format_named("a{x}b", &values(&[("x", "{{|}}")])).unwrap();
        assert_eq!(ret, "a{{|}}b");
    }

    #[test]
    fn rejects_bad_templates() {
        let v = values(&[("x", "1")]);
        assert!(format_named("{y}", &v).is_err());
        assert!(format_named("{x", &v).is_err());
        assert!(format_named("x}", &v).is_err());
        assert!(format_named("{x{}", &v).is_err());
    }

    #[tokio::test]
    async fn reads_templates_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("queries")).unwrap();
        std::fs::create_dir_all(dir.path().join("static")).unwrap();
        std::fs::write(dir.path().join("queries/types.rq"), "Q {pagetitle}").unwrap();
        std::fs::write(dir.path().join("static/report_template.txt"), "{update}").unwrap();

        let store = TemplateStore::new(dir.path());
        assert_eq!(store.read_query_template("types").await.unwrap(), "Q {pagetitle}");
        assert_eq!(store.read_report_template().await.unwrap(), "{update}");
        assert!(store.read_query_template("nonexistent").await.is_err());
    }
}
