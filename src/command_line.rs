use crate::section::SectionKind;
use anyhow::{anyhow, Result};
use std::path::PathBuf;

pub const USAGE: &str = "Usage: pagedeleted_stats [--config <path>] [--dry-run] [--section <name>]
  --config <path>   JSON config file (default: ./config.json)
  --dry-run         print the report instead of publishing it
  --section <name>  with --dry-run: only run one of types, occupations,
                    backlinks, identifiers, properties";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CommandLine {
    pub config: Option<PathBuf>,
    pub dry_run: bool,
    pub section: Option<SectionKind>,
}

impl CommandLine {
    /// Parses the arguments after the program name.
    pub fn parse(args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut ret = Self::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" => {
                    let path = args
                        .next()
                        .ok_or_else(|| anyhow!("--config needs a path\n{USAGE}"))?;
                    ret.config = Some(PathBuf::from(path));
                }
                "--dry-run" => ret.dry_run = true,
                "--section" => {
                    let name = args
                        .next()
                        .ok_or_else(|| anyhow!("--section needs a name\n{USAGE}"))?;
                    let kind = SectionKind::from_name(&name)
                        .ok_or_else(|| anyhow!("Unknown section '{name}'\n{USAGE}"))?;
                    ret.section = Some(kind);
                }
                other => return Err(anyhow!("Unknown argument '{other}'\n{USAGE}")),
            }
        }
        if ret.section.is_some() && !ret.dry_run {
            return Err(anyhow!("--section requires --dry-run\n{USAGE}"));
        }
        Ok(ret)
    }
}
