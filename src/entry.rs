//! BibTeX entry segmentation and tolerant field extraction.
//!
//! Entries are cut out of the raw text by tracking brace depth line by line.
//! Fields are pulled out with regular expressions; anything that does not
//! match simply yields an empty result.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref TOKEN_SEPARATOR: Regex = Regex::new(r"\s*,\s*|;").unwrap();
    static ref YEAR_FIELD: Regex = Regex::new(r#"(?i)year\s*=\s*[{"]?(\d{4})[}"]?"#).unwrap();
    static ref KEYWORDS_FIELD: Regex = Regex::new(&field_pattern("keywords")).unwrap();
    static ref TOPIC_FIELD: Regex = Regex::new(&field_pattern("topic")).unwrap();
}

/// Pattern capturing the braced or quoted value of `field`.
fn field_pattern(field: &str) -> String {
    format!(r#"(?i){}\s*=\s*[{{"]([^}}"]+)[}}"]"#, regex::escape(field))
}

/// Splits raw bibliography text into entry blocks.
///
/// A line starting with `@` opens a new entry only when the brace depth is
/// back to zero and something has already been accumulated. Lines are kept
/// exactly as they appear in the input. Unbalanced braces are not detected
/// and lead to merged entries.
///
/// # Examples
///
/// ```
/// use bib_pipeline::split_entries;
///
/// let text = "@article{a,\n  year = {2020}\n}\n@book{b,\n  year = {2021}\n}";
/// let entries = split_entries(text);
/// assert_eq!(entries.len(), 2);
/// assert!(entries[1].starts_with("@book{b,"));
/// ```
pub fn split_entries(text: &str) -> Vec<String> {
    let mut entries: Vec<String> = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut depth: i64 = 0;

    for line in text.lines() {
        if line.trim().starts_with('@') && depth == 0 && !current.is_empty() {
            entries.push(current.join("\n"));
            current = vec![line];
            depth = brace_delta(line);
        } else {
            current.push(line);
            depth += brace_delta(line);
        }
    }

    if !current.is_empty() {
        entries.push(current.join("\n"));
    }

    entries
}

fn brace_delta(line: &str) -> i64 {
    let opened = line.matches('{').count() as i64;
    let closed = line.matches('}').count() as i64;
    opened - closed
}

/// Extracts a comma/semicolon separated field as lowercased tokens.
///
/// Only the first occurrence of `field` is considered. The value must be
/// wrapped in braces or double quotes and may not contain nested braces.
/// `keywords` and `topic` use precompiled patterns.
/// Returns an empty vector when the field is missing.
///
/// # Examples
///
/// ```
/// use bib_pipeline::extract_field;
///
/// let entry = "@article{a,\n  keywords = {Published; Mantle}\n}";
/// assert_eq!(extract_field(entry, "keywords"), vec!["published", "mantle"]);
/// assert!(extract_field(entry, "topic").is_empty());
/// ```
pub fn extract_field(entry: &str, field: &str) -> Vec<String> {
    let compiled;
    let re: &Regex = match field.to_lowercase().as_str() {
        "keywords" => &*KEYWORDS_FIELD,
        "topic" => &*TOPIC_FIELD,
        _ => match Regex::new(&field_pattern(field)) {
            Ok(re) => {
                compiled = re;
                &compiled
            }
            Err(_) => return Vec::new(),
        },
    };

    let raw = match re.captures(entry).and_then(|cap| cap.get(1)) {
        Some(m) => m.as_str(),
        None => return Vec::new(),
    };

    TOKEN_SEPARATOR
        .split(raw)
        .map(|token| token.trim().to_lowercase())
        .filter(|token| !token.is_empty())
        .collect()
}

/// Extracts the four-digit year of an entry, or 0 when there is none.
pub fn extract_year(entry: &str) -> u32 {
    YEAR_FIELD
        .captures(entry)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Tests for split_entries ---

    #[test]
    fn test_split_entries_two_entries() {
        // Given: two entries on consecutive lines
        let text = "@article{a,\n  title = {One}\n}\n@article{b,\n  title = {Two}\n}";

        // When: we segment the text
        let entries = split_entries(text);

        // Then: each entry keeps its own lines
        assert_eq!(
            entries,
            vec![
                "@article{a,\n  title = {One}\n}".to_string(),
                "@article{b,\n  title = {Two}\n}".to_string(),
            ]
        );
    }

    #[test]
    fn test_split_entries_keeps_blank_lines_with_previous_entry() {
        // Given: entries separated by a blank line
        let text = "@misc{a,\n  year = {2020}\n}\n\n@misc{b,\n  year = {2021}\n}";

        // When: we segment the text
        let entries = split_entries(text);

        // Then: the blank line stays attached to the first entry
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], "@misc{a,\n  year = {2020}\n}\n");
    }

    #[test]
    fn test_split_entries_at_sign_inside_entry_is_not_a_boundary() {
        // Given: a line starting with @ while braces are still open
        let text = "@misc{a,\n  note = {\n@someone on social media}\n}\n@misc{b}";

        // When: we segment the text
        let entries = split_entries(text);

        // Then: the inner line does not start a new entry
        assert_eq!(entries.len(), 2);
        assert!(entries[0].contains("@someone"));
    }

    #[test]
    fn test_split_entries_indented_at_sign_starts_entry() {
        let text = "@misc{a}\n   @misc{b}";
        let entries = split_entries(text);
        assert_eq!(entries, vec!["@misc{a}".to_string(), "   @misc{b}".to_string()]);
    }

    #[test]
    fn test_split_entries_unbalanced_braces_merge_entries() {
        // Given: an entry that never closes its brace
        let text = "@misc{a,\n  title = {Open\n@misc{b}";

        // When: we segment the text
        let entries = split_entries(text);

        // Then: segmentation silently merges the following entry
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn test_split_entries_leading_comment_is_its_own_block() {
        let text = "% header comment\n@misc{a}";
        let entries = split_entries(text);
        assert_eq!(entries, vec!["% header comment".to_string(), "@misc{a}".to_string()]);
    }

    #[test]
    fn test_split_entries_empty_text() {
        assert!(split_entries("").is_empty());
    }

    // --- Tests for extract_field ---

    #[test]
    fn test_extract_field_braced_value() {
        let entry = "@article{a,\n  topic = {Mantle dynamics, Geodynamical Methods}\n}";
        assert_eq!(
            extract_field(entry, "topic"),
            vec!["mantle dynamics", "geodynamical methods"]
        );
    }

    #[test]
    fn test_extract_field_quoted_value() {
        let entry = "@article{a,\n  keywords = \"submitted\"\n}";
        assert_eq!(extract_field(entry, "keywords"), vec!["submitted"]);
    }

    #[test]
    fn test_extract_field_case_insensitive_name() {
        let entry = "@article{a,\n  KEYWORDS = {InPrep}\n}";
        assert_eq!(extract_field(entry, "keywords"), vec!["inprep"]);
    }

    #[test]
    fn test_extract_field_drops_empty_tokens() {
        let entry = "@article{a, keywords = {published;; , }}";
        assert_eq!(extract_field(entry, "keywords"), vec!["published"]);
    }

    #[test]
    fn test_extract_field_precompiled_and_other_fields_agree() {
        // Given: an entry with classification fields and an arbitrary one
        let entry = "@article{a,\n  Topic = {Mantle Dynamics},\n  series = {Geo; Dyn}\n}";

        // When: we extract a precompiled field by a differently cased name,
        // and a field without a precompiled pattern
        let topics = extract_field(entry, "TOPIC");
        let series = extract_field(entry, "series");

        // Then: both go through the same tokenization
        assert_eq!(topics, vec!["mantle dynamics"]);
        assert_eq!(series, vec!["geo", "dyn"]);
    }

    #[test]
    fn test_extract_field_missing() {
        let entry = "@article{a,\n  title = {Nothing here}\n}";
        assert!(extract_field(entry, "keywords").is_empty());
    }

    #[test]
    fn test_extract_field_empty_value_does_not_match() {
        let entry = "@article{a, keywords = {}}";
        assert!(extract_field(entry, "keywords").is_empty());
    }

    // --- Tests for extract_year ---

    #[test]
    fn test_extract_year_braced() {
        assert_eq!(extract_year("@misc{a, year = {2019}}"), 2019);
    }

    #[test]
    fn test_extract_year_bare_and_quoted() {
        assert_eq!(extract_year("@misc{a, year = 2018}"), 2018);
        assert_eq!(extract_year("@misc{a, Year = \"2017\"}"), 2017);
    }

    #[test]
    fn test_extract_year_missing_or_malformed() {
        assert_eq!(extract_year("@misc{a, title = {No year}}"), 0);
        assert_eq!(extract_year("@misc{a, year = {in press}}"), 0);
        assert_eq!(extract_year("@misc{a, year = {21}}"), 0);
    }
}
