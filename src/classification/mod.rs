//! Reference list of classification codes offered for lookup.

use std::collections::BTreeSet;
use std::path::Path;
use anyhow::{Result, Context, bail};
use csv::ReaderBuilder;
use log::{debug, info};
use serde::Serialize;

use crate::utils::file_utils;

/// Header of the code column in the reference file; the first column is used otherwise
pub const CODE_HEADER: &str = "HS코드";

/// Read the reference file and return its unique, sorted, non-blank codes
pub fn load_codes(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    debug!("Loading classification codes from {}", path.display());

    let content = file_utils::read_text_file(path)?;
    let codes = parse_codes(&content)
        .with_context(|| format!("Failed to parse classification file {}", path.display()))?;

    info!("Loaded {} classification codes", codes.len());
    Ok(codes)
}

/// Parse reference CSV text into unique, sorted, non-blank codes
pub fn parse_codes(content: &str) -> Result<Vec<String>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers = reader.headers().context("Failed to read header row")?.clone();
    if headers.is_empty() {
        bail!("classification file has no columns");
    }
    let column = headers.iter()
        .position(|h| h.trim() == CODE_HEADER)
        .unwrap_or(0);

    let mut codes = BTreeSet::new();
    for row in reader.records() {
        let row = row.context("Malformed classification row")?;
        if let Some(code) = row.get(column).map(str::trim).filter(|c| !c.is_empty()) {
            codes.insert(code.to_string());
        }
    }

    Ok(codes.into_iter().collect())
}

/// Codes matching a search prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeSearch {
    pub candidates: Vec<String>,

    /// Nothing started with the prefix, so `candidates` is the full list
    pub fell_back: bool,
}

/// Filter codes by prefix; an empty prefix keeps everything
pub fn search_codes(codes: &[String], prefix: &str) -> CodeSearch {
    let prefix = prefix.trim();
    if prefix.is_empty() {
        return CodeSearch { candidates: codes.to_vec(), fell_back: false };
    }

    let candidates: Vec<String> = codes.iter()
        .filter(|code| code.starts_with(prefix))
        .cloned()
        .collect();

    if candidates.is_empty() {
        debug!("No classification code starts with {:?}", prefix);
        CodeSearch { candidates: codes.to_vec(), fell_back: true }
    } else {
        CodeSearch { candidates, fell_back: false }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn codes(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_named_column_is_trimmed_deduplicated_and_sorted() -> Result<()> {
        let parsed = parse_codes("순번,HS코드\n1, 8542 \n2,8486\n3,\n4,8542\n")?;
        assert_eq!(parsed, codes(&["8486", "8542"]));
        Ok(())
    }

    #[test]
    fn test_first_column_is_used_without_named_header() -> Result<()> {
        let parsed = parse_codes("code,desc\n854231,a\n848620,b\n  ,c\n")?;
        assert_eq!(parsed, codes(&["848620", "854231"]));
        Ok(())
    }

    #[test]
    fn test_search_codes_by_prefix() {
        let all = codes(&["8486", "848620", "8542"]);

        assert_eq!(search_codes(&all, "848"), CodeSearch {
            candidates: codes(&["8486", "848620"]),
            fell_back: false,
        });
        assert_eq!(search_codes(&all, ""), CodeSearch { candidates: all.clone(), fell_back: false });
        assert_eq!(search_codes(&all, "9"), CodeSearch { candidates: all.clone(), fell_back: true });
    }
}
