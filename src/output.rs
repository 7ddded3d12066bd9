//! Publication list assembly.
//!
//! Builds the generated Markdown fragment: the do-not-edit marker, then one
//! heading per section with its citation bullets or `_No entries._`.

use std::path::Path;

use tracing::info;

use crate::bib::{load_bib, sort_entries, BibEntry, BibError};
use crate::config::{Section, GENERATED_MARKER, SECTIONS};
use crate::format::format_entry;

/// Renders the document from already loaded sections.
///
/// Entries are sorted newest first before formatting. Sections are emitted
/// in the order given, including empty ones.
///
/// # Implementation Note
///
/// The document is a list of newline-terminated lines joined with a newline,
/// so consecutive lines end up separated by a blank line.
pub fn render_document(sections: &[(Section, Vec<BibEntry>)]) -> String {
    let mut lines: Vec<String> = vec![format!("{}\n", GENERATED_MARKER)];

    for (section, entries) in sections {
        lines.push(format!("## {}\n", section.heading));

        if entries.is_empty() {
            lines.push("_No entries._\n\n".to_string());
            continue;
        }

        let mut entries = entries.clone();
        sort_entries(&mut entries);
        for entry in &entries {
            lines.push(format!("- {}\n", format_entry(entry, section.heading)));
        }
        lines.push("\n".to_string());
    }

    lines.join("\n")
}

/// Loads every section file from `bib_dir` and renders the document.
///
/// Missing section files render as empty sections.
pub fn render_from_dir(bib_dir: &Path) -> Result<String, BibError> {
    let mut sections = Vec::with_capacity(SECTIONS.len());

    for section in SECTIONS {
        let entries = load_bib(&bib_dir.join(section.file_name))?;
        info!(section = section.heading, entries = entries.len(), "loaded section");
        sections.push((*section, entries));
    }

    Ok(render_document(&sections))
}
