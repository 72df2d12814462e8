//! # Identifier Generation
//!
//! Each backend has its own id scheme and they share no state:
//!
//! - **Tokens** (JSON backend): `{prefix}_{yyyymmdd_HHMMSS}_{6 hex}`, e.g.
//!   `n_20251017_091500_3fa2c1`. Readable and roughly time-sortable. Nothing
//!   checks a new token against the collection; two records would need the
//!   same second and the same 24 random bits to collide.
//! - **Numbers** (Markdown backend): one more than the largest `<n>-` prefix
//!   among the files in the record directory. Dense and small, at the cost of
//!   a directory listing on every creation.

use crate::error::{Result, StudyNavError};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::Path;
use uuid::Uuid;

const TOKEN_SUFFIX_LEN: usize = 6;

pub fn token_id(prefix: &str, at: DateTime<Utc>) -> String {
    let random = Uuid::new_v4().simple().to_string();
    format!(
        "{}_{}_{}",
        prefix,
        at.format("%Y%m%d_%H%M%S"),
        &random[..TOKEN_SUFFIX_LEN]
    )
}

pub fn new_token_id(prefix: &str) -> String {
    token_id(prefix, Utc::now())
}

/// The integer before the first `-` of a file name, if the name starts with one.
pub fn leading_number(file_name: &str) -> Option<u64> {
    let (head, _) = file_name.split_once('-')?;
    if head.is_empty() || !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

/// Next numeric id for a record directory: max existing + 1, or 1 when empty.
pub fn next_numeric_id(dir: &Path) -> Result<u64> {
    if !dir.exists() {
        return Ok(1);
    }

    let mut max_id = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if let Some(n) = entry.file_name().to_str().and_then(leading_number) {
            max_id = max_id.max(n);
        }
    }
    max_id.checked_add(1).ok_or_else(|| {
        StudyNavError::Store(format!(
            "{}: no numeric id left after {}",
            dir.display(),
            max_id
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::HashSet;
    use tempfile::TempDir;

    #[test]
    fn token_has_prefix_timestamp_and_hex_suffix() {
        let at = Utc.with_ymd_and_hms(2025, 10, 17, 9, 15, 0).unwrap();
        let id = token_id("n", at);
        assert!(id.starts_with("n_20251017_091500_"));
        let suffix = id.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), 6);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn tokens_are_distinct_within_one_second() {
        let at = Utc.with_ymd_and_hms(2025, 10, 17, 9, 15, 0).unwrap();
        let ids: HashSet<String> = (0..200).map(|_| token_id("t", at)).collect();
        // 24 random bits; 200 draws collide with probability ~0.1%.
        assert!(ids.len() >= 199);
    }

    #[test]
    fn leading_number_requires_digits_then_dash() {
        assert_eq!(leading_number("12-write-report.md"), Some(12));
        assert_eq!(leading_number("3-.md"), Some(3));
        assert_eq!(leading_number("notes.md"), None);
        assert_eq!(leading_number("x12-abc.md"), None);
        assert_eq!(leading_number("-abc.md"), None);
        assert_eq!(leading_number("12.md"), None);
    }

    #[test]
    fn numeric_id_starts_at_one() {
        let dir = TempDir::new().unwrap();
        assert_eq!(next_numeric_id(dir.path()).unwrap(), 1);
        assert_eq!(next_numeric_id(&dir.path().join("missing")).unwrap(), 1);
    }

    #[test]
    fn exhausted_numeric_ids_are_an_error() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(format!("{}-x.md", u64::MAX)), "").unwrap();
        let err = next_numeric_id(dir.path()).unwrap_err();
        assert!(matches!(err, StudyNavError::Store(_)));
    }

    #[test]
    fn numeric_id_is_max_plus_one_and_ignores_other_files() {
        let dir = TempDir::new().unwrap();
        for name in ["1-a.md", "7-b.md", "3-c.md", "README.md", "99.md"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        assert_eq!(next_numeric_id(dir.path()).unwrap(), 8);
    }
}
