//! bib-pipeline: split a BibTeX file and render a publication list.
//!
//! This library provides functionality to:
//! - Segment an aggregate `.bib` file into entries and classify them by
//!   status (`keywords`) and subject (`topic`)
//! - Write one sorted `.bib` file per category and topic
//! - Parse the category files and render them as a Markdown fragment

pub mod bib;
pub mod config;
pub mod entry;
pub mod format;
pub mod output;
pub mod split;

pub use bib::{load_bib, parse_bibliography, sort_entries, BibEntry};
pub use entry::{extract_field, extract_year, split_entries};
pub use format::{format_authors, format_entry};
pub use output::{render_document, render_from_dir};
pub use split::{split_bibliography, write_split, SplitFile};
