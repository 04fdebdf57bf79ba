//! Tolerant parsing of association lists (tags, collections, sections)
//! submitted as multipart text fields.
//!
//! Clients send these in several shapes: a JSON array (`["a","b"]`, `[1,2]`),
//! a comma-separated list (`a, b`), or a bare single value (`a`). All three
//! are accepted.

use serde_json::Value;

use crate::error::CoreError;
use crate::types::DbId;

/// A parsed association field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssociationList<T> {
    /// A JSON array or a comma-separated list.
    Explicit(Vec<T>),
    /// A value with no list structure at all.
    Single(T),
}

impl<T: PartialEq> AssociationList<T> {
    /// Flatten into a list with duplicates removed, keeping first occurrence.
    pub fn into_vec(self) -> Vec<T> {
        match self {
            AssociationList::Single(item) => vec![item],
            AssociationList::Explicit(items) => {
                let mut out: Vec<T> = Vec::with_capacity(items.len());
                for item in items {
                    if !out.contains(&item) {
                        out.push(item);
                    }
                }
                out
            }
        }
    }
}

/// Split a raw field into string items before typing them.
fn split_raw(raw: &str) -> AssociationList<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return AssociationList::Explicit(Vec::new());
    }

    if let Ok(Value::Array(values)) = serde_json::from_str::<Value>(trimmed) {
        let items = values
            .into_iter()
            .filter_map(|v| match v {
                Value::String(s) => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .collect();
        return AssociationList::Explicit(items);
    }

    if trimmed.contains(',') {
        let items = trimmed
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        return AssociationList::Explicit(items);
    }

    AssociationList::Single(trimmed.to_string())
}

/// Parse a list of names (tags). Never fails.
pub fn parse_names(raw: &str) -> AssociationList<String> {
    split_raw(raw)
}

/// Parse a list of numeric ids (collections, sections).
pub fn parse_ids(field: &str, raw: &str) -> Result<AssociationList<DbId>, CoreError> {
    let parse_one = |s: &str| {
        s.parse::<DbId>()
            .map_err(|_| CoreError::Validation(format!("Invalid id '{s}' in field '{field}'")))
    };
    match split_raw(raw) {
        AssociationList::Single(s) => parse_one(&s).map(AssociationList::Single),
        AssociationList::Explicit(items) => items
            .iter()
            .map(|s| parse_one(s))
            .collect::<Result<Vec<_>, _>>()
            .map(AssociationList::Explicit),
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn json_array_of_names() {
        let parsed = parse_names(r#"["politics", " local ", ""]"#);
        assert_eq!(
            parsed,
            AssociationList::Explicit(vec!["politics".to_string(), "local".to_string()])
        );
    }

    #[test]
    fn comma_separated_names() {
        let parsed = parse_names("a, b ,,c");
        assert_eq!(parsed.into_vec(), vec!["a", "b", "c"]);
    }

    #[test]
    fn plain_string_is_single() {
        assert_eq!(
            parse_names("  breaking news "),
            AssociationList::Single("breaking news".to_string())
        );
    }

    #[test]
    fn duplicates_are_removed_in_order() {
        let parsed = parse_names(r#"["a","b","a"]"#);
        assert_eq!(parsed.into_vec(), vec!["a", "b"]);
    }

    #[test]
    fn blank_field_is_empty_list() {
        assert_eq!(parse_names("   ").into_vec(), Vec::<String>::new());
    }

    #[test]
    fn ids_from_every_shape() {
        assert_eq!(parse_ids("sections", "[1, 2, 2]").unwrap().into_vec(), vec![1, 2]);
        assert_eq!(parse_ids("sections", r#"["3","4"]"#).unwrap().into_vec(), vec![3, 4]);
        assert_eq!(parse_ids("sections", "5,6").unwrap().into_vec(), vec![5, 6]);
        assert_eq!(parse_ids("sections", "7").unwrap(), AssociationList::Single(7));
    }

    #[test]
    fn invalid_id_is_validation_error() {
        assert_matches!(parse_ids("collections", "1,x"), Err(CoreError::Validation(msg)) if msg.contains("collections"));
        assert_matches!(parse_ids("collections", "abc"), Err(CoreError::Validation(_)));
    }
}
