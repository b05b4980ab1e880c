#![forbid(unsafe_code)]

use clap::Parser;
use std::collections::BTreeSet;
use std::path::PathBuf;
use termorder_core::{
    DEFAULT_BATCH_LIMIT, MAX_BATCH_LIMIT, ResolverConfig, Taxonomy, TaxonomyError, TaxonomyScope,
};

/// termorder_mcp: relative ordering of taxonomy terms over MCP stdio.
#[derive(Parser, Debug, Clone)]
#[command(name = "termorder_mcp", version, about)]
pub(crate) struct Config {
    /// Directory holding the term database.
    #[arg(
        long,
        env = "TERMORDER_STORAGE_DIR",
        value_name = "DIR",
        default_value = ".termorder"
    )]
    pub(crate) storage_dir: PathBuf,

    /// Taxonomy open to reordering (repeatable). Without any, every stored taxonomy is.
    #[arg(
        long = "taxonomy",
        env = "TERMORDER_TAXONOMIES",
        value_name = "NAME",
        value_delimiter = ',',
        value_parser = parse_taxonomy
    )]
    pub(crate) taxonomies: Vec<Taxonomy>,

    /// Siblings processed per reorder call.
    #[arg(
        long,
        env = "TERMORDER_BATCH_LIMIT",
        value_name = "N",
        default_value_t = DEFAULT_BATCH_LIMIT,
        value_parser = parse_batch_limit
    )]
    pub(crate) batch_limit: usize,

    /// Reject every write tool.
    #[arg(long, env = "TERMORDER_READ_ONLY")]
    pub(crate) read_only: bool,

    /// tracing filter directive, e.g. `info` or `termorder_core=debug`.
    #[arg(
        long = "log",
        env = "TERMORDER_LOG",
        value_name = "FILTER",
        default_value = "info"
    )]
    pub(crate) log_filter: String,
}

impl Config {
    pub(crate) fn resolver_config(&self) -> ResolverConfig {
        let taxonomies = if self.taxonomies.is_empty() {
            TaxonomyScope::All
        } else {
            TaxonomyScope::Only(self.taxonomies.iter().cloned().collect::<BTreeSet<_>>())
        };
        ResolverConfig {
            batch_limit: self.batch_limit,
            taxonomies,
        }
    }
}

fn parse_taxonomy(raw: &str) -> Result<Taxonomy, TaxonomyError> {
    Taxonomy::try_new(raw.trim())
}

fn parse_batch_limit(raw: &str) -> Result<usize, String> {
    let value = raw
        .trim()
        .parse::<usize>()
        .map_err(|err| format!("batch limit must be an integer: {err}"))?;
    if !(1..=MAX_BATCH_LIMIT).contains(&value) {
        return Err(format!("batch limit must be within 1..={MAX_BATCH_LIMIT}"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Config, clap::Error> {
        Config::try_parse_from(std::iter::once("termorder_mcp").chain(args.iter().copied()))
    }

    #[test]
    fn taxonomy_flags_build_a_scope() {
        let config = parse(&[
            "--storage-dir",
            "/tmp/terms",
            "--taxonomy",
            "category",
            "--taxonomy",
            "genre,post_tag",
        ])
        .expect("parse");
        let names = config
            .taxonomies
            .iter()
            .map(Taxonomy::as_str)
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["category", "genre", "post_tag"]);
        match config.resolver_config().taxonomies {
            TaxonomyScope::Only(set) => assert_eq!(set.len(), 3),
            TaxonomyScope::All => panic!("expected a restricted scope"),
        }
    }

    #[test]
    fn batch_limit_is_bounded() {
        assert!(parse(&["--batch-limit", "0"]).is_err());
        assert!(parse(&["--batch-limit", "1001"]).is_err());
        assert!(parse(&["--batch-limit", "many"]).is_err());
        let config = parse(&["--batch-limit", "1000"]).expect("parse");
        assert_eq!(config.resolver_config().batch_limit, 1000);
    }

    #[test]
    fn invalid_taxonomy_names_are_rejected() {
        assert!(parse(&["--taxonomy", "Bad Name"]).is_err());
    }

    #[test]
    fn read_only_is_a_flag() {
        let config = parse(&["--read-only"]).expect("parse");
        assert!(config.read_only);
    }
}
