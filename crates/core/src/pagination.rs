//! Pagination parameters for list endpoints.
//!
//! `limit` and `offset` arrive as raw query strings and are untrusted. An
//! absent (or empty) `limit` means "no limit"; an absent `offset` means 0.

use crate::error::CoreError;

/// A validated page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Page {
    pub limit: Option<i64>,
    pub offset: i64,
}

impl Page {
    /// Apply the window to an already ordered iterator.
    pub fn slice<T>(&self, items: impl IntoIterator<Item = T>) -> Vec<T> {
        let skipped = items.into_iter().skip(self.offset_usize());
        match self.limit {
            Some(limit) => skipped.take(usize::try_from(limit).unwrap_or(usize::MAX)).collect(),
            None => skipped.collect(),
        }
    }

    fn offset_usize(&self) -> usize {
        usize::try_from(self.offset).unwrap_or(usize::MAX)
    }
}

/// Parse and validate raw `limit`/`offset` query values.
pub fn parse_page(limit: Option<&str>, offset: Option<&str>) -> Result<Page, CoreError> {
    let limit = parse_non_negative(limit, "limit")?;
    let offset = parse_non_negative(offset, "offset")?.unwrap_or(0);
    Ok(Page { limit, offset })
}

fn parse_non_negative(raw: Option<&str>, name: &str) -> Result<Option<i64>, CoreError> {
    let Some(raw) = raw.filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    match raw.parse::<i64>() {
        Ok(value) if value >= 0 => Ok(Some(value)),
        _ => Err(CoreError::Validation(format!("Invalid {name} parameter"))),
    }
}
