//! Static configuration: categories, topics, render sections and default paths.
//!
//! Every fixed label and file name used by the splitter and the renderer is
//! declared here once. Lookups go through the tables instead of re-deriving
//! names at runtime.

/// Default aggregate bibliography read by `split`.
pub const DEFAULT_INPUT: &str = "references.bib";

/// Default directory holding the split category/topic files.
pub const DEFAULT_BIB_DIR: &str = "bib";

/// Default location of the rendered publication list.
pub const DEFAULT_OUTPUT: &str = "_generated/publications_body.qmd";

/// First line of every rendered document.
pub const GENERATED_MARKER: &str = "<!-- Auto-generated. Do not edit directly. -->";

/// Year written into placeholder entries for empty buckets.
pub const SENTINEL_YEAR: u32 = 9999;

/// Citation key prefix of placeholder entries.
pub const PLACEHOLDER_KEY_PREFIX: &str = "empty_";

/// A publication status bucket used by the splitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// Token looked up (lowercased) in the `keywords` field
    pub keyword: &'static str,
    /// Output file name inside the bib directory
    pub file_name: &'static str,
}

/// A subject-matter bucket, independent of the category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Topic {
    /// Token looked up (lowercased) in the `topic` field
    pub label: &'static str,
    /// Output file name inside the bib directory
    pub file_name: &'static str,
}

/// One heading of the rendered document and the split file feeding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Section {
    pub heading: &'static str,
    pub file_name: &'static str,
}

/// Categories in output order.
pub const CATEGORIES: &[Category] = &[
    Category {
        keyword: "published",
        file_name: "published.bib",
    },
    Category {
        keyword: "submitted",
        file_name: "submitted.bib",
    },
    Category {
        keyword: "inprep",
        file_name: "inprep.bib",
    },
];

/// Classification order: the first keyword present in an entry wins.
pub const CLASSIFICATION_ORDER: &[&str] = &["submitted", "inprep", "published"];

/// Topics in output order.
pub const TOPICS: &[Topic] = &[
    Topic {
        label: "mantle dynamics",
        file_name: "mantle-dynamics.bib",
    },
    Topic {
        label: "interior–surface coupling",
        file_name: "interior-surface-coupling.bib",
    },
    Topic {
        label: "geodynamical methods",
        file_name: "geodynamical-methods.bib",
    },
];

/// Sections of the rendered document, in display order.
pub const SECTIONS: &[Section] = &[
    Section {
        heading: "Peer-reviewed",
        file_name: "published.bib",
    },
    Section {
        heading: "Manuscripts submitted",
        file_name: "submitted.bib",
    },
    Section {
        heading: "Manuscripts in preparation",
        file_name: "inprep.bib",
    },
];

/// Heading prefix (lowercase) of the section that gets the submission note.
pub const SUBMITTED_HEADING_PREFIX: &str = "manuscripts submitted";

/// Author name patterns rendered in bold. Matched case-insensitively.
pub const HIGHLIGHTED_AUTHORS: &[&str] = &[r"Bao,\s*Xiyuan", r"Xiyuan\s*Bao"];

/// Leading phrases of a submission note that are followed by a journal name.
pub const SUBMISSION_PHRASES: &[&str] = &[
    "under review in",
    "submitted to",
    "in revision",
    "revision under review in",
];

/// Standard BibTeX month macros and their expansions.
pub const MONTH_MACROS: &[(&str, &str)] = &[
    ("jan", "January"),
    ("feb", "February"),
    ("mar", "March"),
    ("apr", "April"),
    ("may", "May"),
    ("jun", "June"),
    ("jul", "July"),
    ("aug", "August"),
    ("sep", "September"),
    ("oct", "October"),
    ("nov", "November"),
    ("dec", "December"),
];

/// Returns the expansion of a month macro such as `jun`.
pub fn month_name(token: &str) -> Option<&'static str> {
    let token = token.to_lowercase();
    MONTH_MACROS
        .iter()
        .find(|(name, _)| *name == token)
        .map(|(_, full)| *full)
}

/// Returns the category whose keyword token matches `keyword`.
pub fn category(keyword: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|c| c.keyword == keyword)
}

/// Returns every output file name the splitter produces, in write order.
pub fn split_file_names() -> Vec<&'static str> {
    CATEGORIES
        .iter()
        .map(|c| c.file_name)
        .chain(TOPICS.iter().map(|t| t.file_name))
        .collect()
}
