//! Citation line formatting.
//!
//! Turns one [`BibEntry`] into a single Markdown line: highlighted author
//! list, year, italic title, bold journal, a `[Link](...)` and, for
//! submitted manuscripts, the submission note.

use lazy_static::lazy_static;
use regex::Regex;

use crate::bib::BibEntry;
use crate::config::{HIGHLIGHTED_AUTHORS, SUBMISSION_PHRASES, SUBMITTED_HEADING_PREFIX};

lazy_static! {
    static ref AUTHOR_SEPARATOR: Regex = Regex::new(r"(?i)\band\b").unwrap();
    static ref HIGHLIGHT: Regex =
        Regex::new(&format!("(?i)({})", HIGHLIGHTED_AUTHORS.join("|"))).unwrap();
    static ref SUBMISSION_NOTE: Regex = Regex::new(&format!(
        r"(?i)^\s*({})\s+(.+)",
        SUBMISSION_PHRASES.join("|")
    ))
    .unwrap();
}

/// Wraps every highlighted author name found in `name` in bold.
pub fn highlight_author(name: &str) -> String {
    HIGHLIGHT.replace_all(name, "**${1}**").into_owned()
}

/// Formats a raw BibTeX author field.
///
/// Names are split on the word `and`, highlighted and joined as
/// `A, B and C`. Returns an empty string when there are no names.
///
/// # Examples
///
/// ```
/// use bib_pipeline::format_authors;
///
/// assert_eq!(
///     format_authors("Doe, Jane and Roe, Richard and Bao, Xiyuan"),
///     "Doe, Jane, Roe, Richard and **Bao, Xiyuan**"
/// );
/// ```
pub fn format_authors(field: &str) -> String {
    let names: Vec<String> = AUTHOR_SEPARATOR
        .split(field)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(highlight_author)
        .collect();

    match names.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{} and {}", rest.join(", "), last),
    }
}

/// Returns the link target of an entry: DOI first, then URL.
pub fn link_target(entry: &BibEntry) -> Option<String> {
    let doi = entry.get("doi").trim();
    let url = entry.get("url").trim();

    if !doi.is_empty() {
        Some(format!("https://doi.org/{}", doi))
    } else if !url.is_empty() {
        Some(url.to_string())
    } else {
        None
    }
}

/// Formats the submission note of a submitted manuscript.
///
/// A note such as `Submitted to Some Journal` keeps its phrase and gets the
/// journal name in bold. Anything else is returned trimmed and unchanged.
pub fn format_submission_note(note: &str) -> String {
    let note = note.trim();
    match SUBMISSION_NOTE.captures(note) {
        Some(cap) => format!("{} **{}**", &cap[1], cap[2].trim()),
        None => note.to_string(),
    }
}

/// Formats one entry as a single citation line for the given section.
///
/// # Examples
///
/// ```
/// use bib_pipeline::{format_entry, BibEntry};
///
/// let entry = BibEntry::with_fields("x", [
///     ("author", "Smith, John"),
///     ("title", "On Rocks."),
///     ("year", "2020"),
/// ]);
/// assert_eq!(
///     format_entry(&entry, "Peer-reviewed"),
///     "Smith, John (2020). *On Rocks*."
/// );
/// ```
pub fn format_entry(entry: &BibEntry, section: &str) -> String {
    let authors = format_authors(entry.get("author"));
    let title = entry.get("title").trim_end_matches('.');
    let journal = entry.get("journal");
    let year = entry.get("year").trim();

    let mut pieces: Vec<String> = Vec::new();

    if !authors.is_empty() {
        if year.is_empty() {
            pieces.push(format!("{}.", authors));
        } else {
            pieces.push(format!("{} ({}).", authors, year));
        }
    }
    if !title.is_empty() {
        pieces.push(format!("*{}*.", title));
    }
    if !journal.is_empty() {
        pieces.push(format!("**{}**.", journal));
    }
    if let Some(target) = link_target(entry) {
        pieces.push(format!("[Link]({})", target));
    }

    if section.to_lowercase().starts_with(SUBMITTED_HEADING_PREFIX) {
        let howpublished = entry.get("howpublished").trim();
        let note = if howpublished.is_empty() {
            entry.get("note").trim()
        } else {
            howpublished
        };
        if !note.is_empty() {
            pieces.push(format_submission_note(note));
        }
    }

    pieces.join(" ").trim().to_string()
}
