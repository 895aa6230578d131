//! Record decoding for the corpus tables
//!
//! All four tables use the same multi-character field separator. The final
//! field of a record may be free text that itself contains the separator
//! token, so every split is bounded at the expected field count.

use regex_lite::Regex;
use std::sync::OnceLock;
use thiserror::Error;

/// Field separator used by all four corpus tables
pub const SEPARATOR: &str = " +++$+++ ";

/// Marker the corpus uses for an unknown optional field
pub const UNKNOWN_MARKER: &str = "?";

/// Errors raised while decoding a single record
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("invalid {field} value '{value}'")]
    Field { field: &'static str, value: String },
}

/// Split a raw record into exactly `n` fields.
///
/// The split is bounded at `n` segments so the last field absorbs any
/// remaining text verbatim, including occurrences of the separator token.
/// An unlimited split would silently corrupt free-text fields.
pub fn split_fields(line: &str, n: usize) -> Result<Vec<&str>, DecodeError> {
    let fields: Vec<&str> = line.splitn(n, SEPARATOR).collect();
    if fields.len() < n {
        return Err(DecodeError::FieldCount {
            expected: n,
            found: fields.len(),
        });
    }
    Ok(fields)
}

fn line_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"L\d+").expect("line-id pattern is valid"))
}

fn quoted_item_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"'([^']*)'").expect("quoted-item pattern is valid"))
}

/// Extract line identifiers from a serialized conversation list, in
/// left-to-right order.
///
/// The list is bracketed, comma-separated, and single-quoted
/// (e.g. `['L194', 'L195']`); identifiers are matched by shape, so the
/// surrounding punctuation never needs parsing.
pub fn extract_line_ids(list: &str) -> Vec<&str> {
    line_id_pattern()
        .find_iter(list)
        .map(|m| m.as_str())
        .collect()
}

/// Parse a bracketed, comma-separated, single-quoted list (the genres field)
pub fn parse_quoted_list(list: &str) -> Vec<String> {
    quoted_item_pattern()
        .captures_iter(list)
        .map(|c| c[1].to_string())
        .collect()
}

/// Parse a release year, tolerating suffixed corpus forms like `1982/I`
pub fn parse_year(value: &str) -> Result<u16, DecodeError> {
    let digits: &str = {
        let trimmed = value.trim();
        let end = trimmed
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len());
        &trimmed[..end]
    };
    digits.parse().map_err(|_| DecodeError::Field {
        field: "year",
        value: value.to_string(),
    })
}

/// Parse a decimal field (the rating)
pub fn parse_f64(field: &'static str, value: &str) -> Result<f64, DecodeError> {
    value.trim().parse().map_err(|_| DecodeError::Field {
        field,
        value: value.to_string(),
    })
}

/// Parse an unsigned integer field (the vote count)
pub fn parse_u64(field: &'static str, value: &str) -> Result<u64, DecodeError> {
    value.trim().parse().map_err(|_| DecodeError::Field {
        field,
        value: value.to_string(),
    })
}

/// Normalize an optional field: the unknown marker becomes `None`, any
/// other value is preserved exactly.
pub fn optional_field(value: &str) -> Option<&str> {
    if value == UNKNOWN_MARKER {
        None
    } else {
        Some(value)
    }
}

/// Parse a credit position: an integer, or the unknown marker
pub fn parse_credit(value: &str) -> Result<Option<i32>, DecodeError> {
    match optional_field(value.trim()) {
        None => Ok(None),
        Some(v) => v.parse().map(Some).map_err(|_| DecodeError::Field {
            field: "credit_position",
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_exact_field_count() {
        let line = "m0 +++$+++ Toy Story +++$+++ 1995";
        let fields = split_fields(line, 3).unwrap();
        assert_eq!(fields, vec!["m0", "Toy Story", "1995"]);
    }

    #[test]
    fn test_split_preserves_separator_in_final_field() {
        let line = "L1 +++$+++ u0 +++$+++ m0 +++$+++ WOODY +++$+++ one +++$+++ two";
        let fields = split_fields(line, 5).unwrap();
        assert_eq!(fields[4], "one +++$+++ two");
    }

    #[test]
    fn test_split_too_few_fields() {
        let err = split_fields("m0 +++$+++ Toy Story", 3).unwrap_err();
        assert!(matches!(
            err,
            DecodeError::FieldCount {
                expected: 3,
                found: 2
            }
        ));
    }

    #[test]
    fn test_extract_line_ids_in_source_order() {
        let ids = extract_line_ids("['L204', 'L19', 'L1044']");
        assert_eq!(ids, vec!["L204", "L19", "L1044"]);
    }

    #[test]
    fn test_extract_line_ids_ignores_other_tokens() {
        assert!(extract_line_ids("['u12', 'm4']").is_empty());
        assert!(extract_line_ids("[]").is_empty());
    }

    #[test]
    fn test_parse_quoted_list() {
        let genres = parse_quoted_list("['comedy', 'crime']");
        assert_eq!(genres, vec!["comedy", "crime"]);
        assert!(parse_quoted_list("[]").is_empty());
    }

    #[test]
    fn test_parse_year_plain_and_suffixed() {
        assert_eq!(parse_year("1995").unwrap(), 1995);
        assert_eq!(parse_year("1982/I").unwrap(), 1982);
        assert!(parse_year("unknown").is_err());
    }

    #[test]
    fn test_optional_field_unknown_marker() {
        assert_eq!(optional_field("?"), None);
        assert_eq!(optional_field("m"), Some("m"));
        // Only the exact marker is normalized.
        assert_eq!(optional_field("??"), Some("??"));
    }

    #[test]
    fn test_parse_credit() {
        assert_eq!(parse_credit("3").unwrap(), Some(3));
        assert_eq!(parse_credit("?").unwrap(), None);
        assert!(parse_credit("lead").is_err());
    }
}
