//! Loading category bibliographies for rendering.
//!
//! Files are parsed with `nom-bibtex`, with the standard month macros
//! predefined. A file the parser rejects as a whole is retried entry by
//! entry, and an entry it still rejects is read field by field with a
//! tolerant scanner. Only blocks without an `@type{key` head are dropped.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use lazy_static::lazy_static;
use nom_bibtex::Bibtex;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::{month_name, MONTH_MACROS, PLACEHOLDER_KEY_PREFIX, SENTINEL_YEAR};
use crate::entry::split_entries;

lazy_static! {
    static ref FOUR_DIGITS: Regex = Regex::new(r"\d{4}").unwrap();
    static ref ENTRY_HEAD: Regex = Regex::new(r"^\s*@(\w+)\s*[{(]\s*([^,\s{}()]+)\s*").unwrap();
    static ref FIELD_START: Regex = Regex::new(r"[,\s]([A-Za-z][\w-]*)\s*=\s*").unwrap();
    static ref MONTH_STRINGS: String = MONTH_MACROS
        .iter()
        .map(|(name, full)| format!("@string{{{} = \"{}\"}}\n", name, full))
        .collect();
}

/// Errors that can occur when loading a bibliography file.
#[derive(Error, Debug)]
pub enum BibError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),
}

/// A parsed bibliography entry with whitespace-normalized field values.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BibEntry {
    pub key: String,
    pub entry_type: String,
    /// Field values keyed by lowercased field name
    pub fields: BTreeMap<String, String>,
}

impl BibEntry {
    /// Returns the value of `name`, or an empty string when absent.
    pub fn get(&self, name: &str) -> &str {
        self.fields
            .get(&name.to_lowercase())
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Builds an entry from `(name, value)` pairs. Mostly useful in tests.
    pub fn with_fields<'a, I>(key: &str, fields: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        BibEntry {
            key: key.to_string(),
            entry_type: "article".to_string(),
            fields: fields
                .into_iter()
                .map(|(name, value)| (name.to_lowercase(), normalize_value(value)))
                .collect(),
        }
    }

    /// True for the entries the splitter writes into empty buckets.
    pub fn is_placeholder(&self) -> bool {
        self.key.starts_with(PLACEHOLDER_KEY_PREFIX)
            && self.get("year") == SENTINEL_YEAR.to_string()
    }
}

/// Returns the first four-digit run of the `year` field, or 0.
pub fn entry_year(entry: &BibEntry) -> u32 {
    FOUR_DIGITS
        .find(entry.get("year"))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

/// Sorts entries newest first.
///
/// The ascending `(year, title)` order is reversed, so within one year the
/// titles also come out in descending order.
pub fn sort_entries(entries: &mut [BibEntry]) {
    entries.sort_by(|a, b| {
        (entry_year(a), a.get("title")).cmp(&(entry_year(b), b.get("title")))
    });
    entries.reverse();
}

/// Parses bibliography text into entries.
///
/// Entries the full parser rejects are still returned, read with the
/// tolerant scanner; fields it cannot make sense of are simply absent.
pub fn parse_bibliography(text: &str) -> Vec<BibEntry> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    if let Some(entries) = parse_strict(text) {
        return entries;
    }

    warn!("bibliography rejected as a whole, parsing entry by entry");
    split_entries(text)
        .iter()
        .flat_map(|block| parse_block(block))
        .collect()
}

fn parse_strict(text: &str) -> Option<Vec<BibEntry>> {
    let source = format!("{}{}", *MONTH_STRINGS, text);
    match Bibtex::parse(&source) {
        Ok(bibtex) => Some(collect_entries(&bibtex)),
        Err(err) => {
            debug!(error = ?err, "parser rejected input");
            None
        }
    }
}

fn parse_block(block: &str) -> Vec<BibEntry> {
    if let Some(entries) = parse_strict(block) {
        return entries;
    }

    match read_tolerant(block) {
        Some(entry) => {
            warn!(key = %entry.key, "entry rejected by parser, read with tolerant scanner");
            vec![entry]
        }
        None => {
            let head = block.trim_start().lines().next().unwrap_or_default();
            if head.starts_with('@') {
                warn!(entry = head, "skipping entry without a readable head");
            }
            Vec::new()
        }
    }
}

/// Reads one raw entry block without a grammar.
///
/// Requires an `@type{key` head. Values may be braced (nesting allowed),
/// quoted, or bare tokens; bare month macros are expanded and other bare
/// tokens are kept as written. The first occurrence of a field wins.
pub fn read_tolerant(block: &str) -> Option<BibEntry> {
    let head = ENTRY_HEAD.captures(block)?;
    let entry_type = head[1].to_lowercase();
    let key = head[2].to_string();

    let mut fields = BTreeMap::new();
    let mut pos = head.get(0).map_or(0, |m| m.end());

    while let Some(cap) = FIELD_START.captures_at(block, pos) {
        let value_start = cap.get(0).map_or(block.len(), |m| m.end());
        let (value, value_end) = read_value(block, value_start);
        fields
            .entry(cap[1].to_lowercase())
            .or_insert_with(|| normalize_value(&value));
        pos = value_end.max(value_start);
    }

    Some(BibEntry {
        key,
        entry_type,
        fields,
    })
}

/// Reads the value starting at byte `start`, returning it and the byte
/// offset just past it.
fn read_value(text: &str, start: usize) -> (String, usize) {
    let rest = &text[start..];

    match rest.chars().next() {
        Some('{') => {
            let mut depth = 0usize;
            for (i, c) in rest.char_indices() {
                match c {
                    '{' => depth += 1,
                    '}' => {
                        depth -= 1;
                        if depth == 0 {
                            return (rest[1..i].to_string(), start + i + 1);
                        }
                    }
                    _ => {}
                }
            }
            (rest[1..].to_string(), text.len())
        }
        Some('"') => {
            let mut depth = 0i64;
            for (i, c) in rest.char_indices().skip(1) {
                match c {
                    '{' => depth += 1,
                    '}' => depth -= 1,
                    '"' if depth <= 0 => return (rest[1..i].to_string(), start + i + 1),
                    _ => {}
                }
            }
            (rest[1..].to_string(), text.len())
        }
        _ => {
            let end = rest
                .find(|c: char| matches!(c, ',' | '}' | ')' | '\n'))
                .unwrap_or(rest.len());
            let token = rest[..end].trim();
            let value = month_name(token).unwrap_or(token).to_string();
            (value, start + end)
        }
    }
}

fn collect_entries(bibtex: &Bibtex) -> Vec<BibEntry> {
    bibtex
        .bibliographies()
        .iter()
        .map(|bib| {
            let mut fields = BTreeMap::new();
            for (name, value) in bib.tags() {
                fields.insert(name.to_lowercase(), normalize_value(value));
            }
            BibEntry {
                key: bib.citation_key().to_string(),
                entry_type: bib.entry_type().to_lowercase(),
                fields,
            }
        })
        .collect()
}

/// Collapses runs of whitespace (line breaks included) into single spaces.
fn normalize_value(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Loads and parses a category file.
///
/// A missing file is not an error and yields no entries. Placeholder entries
/// are dropped.
pub fn load_bib(path: &Path) -> Result<Vec<BibEntry>, BibError> {
    if !path.exists() {
        debug!(file = %path.display(), "bibliography not found, treating as empty");
        return Ok(Vec::new());
    }

    let content = fs::read_to_string(path)?;
    let entries: Vec<BibEntry> = parse_bibliography(&content)
        .into_iter()
        .filter(|entry| {
            if entry.is_placeholder() {
                debug!(key = %entry.key, "skipping placeholder entry");
                false
            } else {
                true
            }
        })
        .collect();

    debug!(file = %path.display(), entries = entries.len(), "loaded bibliography");
    Ok(entries)
}
