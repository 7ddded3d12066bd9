//! Splitting an aggregate bibliography into category and topic files.
//!
//! Each entry goes to at most one category (first keyword match in
//! [`CLASSIFICATION_ORDER`]) and to every topic whose label appears in its
//! `topic` field. Every output file is always produced; empty buckets get a
//! placeholder entry with the sentinel year.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::{
    category, Category, Topic, CATEGORIES, CLASSIFICATION_ORDER, PLACEHOLDER_KEY_PREFIX,
    SENTINEL_YEAR, TOPICS,
};
use crate::entry::{extract_field, extract_year, split_entries};

/// Errors that can occur while writing split files.
#[derive(Error, Debug)]
pub enum SplitError {
    #[error("Failed to create directory '{path}': {source}")]
    CreateDir { path: String, source: io::Error },

    #[error("Failed to write '{path}': {source}")]
    Write { path: String, source: io::Error },
}

/// One entry block together with its position in the input.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedEntry {
    pub text: String,
    pub position: usize,
}

/// A rendered output file of the splitter.
#[derive(Debug, Clone, PartialEq)]
pub struct SplitFile {
    /// File name inside the output directory (e.g. `published.bib`)
    pub file_name: &'static str,
    /// Number of real entries (0 when the file holds the placeholder)
    pub entries: usize,
    /// Full file contents, trailing newline included
    pub contents: String,
}

/// Returns the category of an entry, if any of its keywords names one.
pub fn classify(entry: &str) -> Option<&'static Category> {
    let keywords = extract_field(entry, "keywords");
    CLASSIFICATION_ORDER
        .iter()
        .find(|keyword| keywords.iter().any(|k| k == *keyword))
        .and_then(|keyword| category(keyword))
}

/// Returns every topic whose label appears in the entry's `topic` field.
pub fn topics_of(entry: &str) -> Vec<&'static Topic> {
    let labels = extract_field(entry, "topic");
    TOPICS
        .iter()
        .filter(|topic| labels.iter().any(|l| l == topic.label))
        .collect()
}

/// Sorts a bucket in place.
///
/// Dated entries come first, oldest year first. Undated entries (year 0)
/// follow as a group. Ties are broken by input position, later entries
/// first.
pub fn sort_bucket(bucket: &mut [PositionedEntry]) {
    bucket.sort_by_key(|entry| {
        let year = extract_year(&entry.text);
        (year == 0, year, std::cmp::Reverse(entry.position))
    });
}

/// Classifies and sorts all entries of `text`, returning every output file.
///
/// The result always lists the category files followed by the topic files,
/// in the order declared in [`crate::config`].
pub fn split_bibliography(text: &str) -> Vec<SplitFile> {
    let entries: Vec<PositionedEntry> = split_entries(text)
        .into_iter()
        .enumerate()
        .map(|(position, text)| PositionedEntry { text, position })
        .collect();

    let mut categories: Vec<Vec<PositionedEntry>> = vec![Vec::new(); CATEGORIES.len()];
    let mut topics: Vec<Vec<PositionedEntry>> = vec![Vec::new(); TOPICS.len()];

    for entry in &entries {
        if let Some(cat) = classify(&entry.text) {
            if let Some(index) = CATEGORIES.iter().position(|c| c == cat) {
                categories[index].push(entry.clone());
            }
        }

        for topic in topics_of(&entry.text) {
            if let Some(index) = TOPICS.iter().position(|t| t == topic) {
                topics[index].push(entry.clone());
            }
        }
    }

    debug!(entries = entries.len(), "segmented aggregate bibliography");

    let category_files = CATEGORIES.iter().zip(categories).map(|(cat, bucket)| {
        build_file(
            cat.file_name,
            bucket,
            placeholder(cat.keyword, &format!("No {} entries", cat.keyword)),
        )
    });

    let topic_files = TOPICS.iter().zip(topics).map(|(topic, bucket)| {
        build_file(
            topic.file_name,
            bucket,
            placeholder(
                &topic.label.replace(' ', "_"),
                &format!("No publications yet in {}", topic.label),
            ),
        )
    });

    category_files.chain(topic_files).collect()
}

fn build_file(
    file_name: &'static str,
    mut bucket: Vec<PositionedEntry>,
    placeholder: String,
) -> SplitFile {
    if bucket.is_empty() {
        return SplitFile {
            file_name,
            entries: 0,
            contents: format!("{}\n", placeholder),
        };
    }

    sort_bucket(&mut bucket);
    let blocks: Vec<&str> = bucket.iter().map(|e| e.text.as_str()).collect();

    SplitFile {
        file_name,
        entries: bucket.len(),
        contents: format!("{}\n", blocks.join("\n\n")),
    }
}

/// Builds the placeholder entry written for an empty bucket.
pub fn placeholder(key_suffix: &str, title: &str) -> String {
    format!(
        "@misc{{{}{}, title={{{}}}, author={{}}, year={{{}}} }}",
        PLACEHOLDER_KEY_PREFIX, key_suffix, title, SENTINEL_YEAR
    )
}

/// Writes split files into `out_dir`, creating the directory if needed.
pub fn write_split(out_dir: &Path, files: &[SplitFile]) -> Result<(), SplitError> {
    fs::create_dir_all(out_dir).map_err(|source| SplitError::CreateDir {
        path: out_dir.display().to_string(),
        source,
    })?;

    for file in files {
        let path = out_dir.join(file.file_name);
        fs::write(&path, &file.contents).map_err(|source| SplitError::Write {
            path: path.display().to_string(),
            source,
        })?;
        info!(file = %path.display(), entries = file.entries, "wrote split file");
    }

    Ok(())
}
