use crate::error::{Result, StudyNavError};
use crate::model::{parse_date, Record};
use crate::store::RecordStore;
use chrono::NaiveDate;

/// Fetch a record or fail with `NotFound`.
pub fn require<R: Record, S: RecordStore<R>>(store: &S, id: &str) -> Result<R> {
    store
        .get(id)?
        .ok_or_else(|| StudyNavError::not_found(R::KIND, id))
}

pub fn clean_title(title: &str) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(StudyNavError::Api("Title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Trimmed, non-empty tags in the order given.
pub fn clean_tags<I, T>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: AsRef<str>,
{
    tags.into_iter()
        .map(|t| t.as_ref().trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}

pub fn parse_due(raw: &str) -> Result<NaiveDate> {
    parse_date(raw).ok_or_else(|| {
        StudyNavError::Api(format!("Invalid date '{}' (expected YYYY-MM-DD)", raw.trim()))
    })
}
