use async_trait::async_trait;

use super::base::{CleanOutcome, TableCleaner};
use crate::error::RowError;
use crate::pipeline::processing::clean::nulls::replace_nulls;
use crate::pipeline::processing::clean::registry::CleanerKind;
use crate::types::Row;

/// Cleaner for tables whose only quirk is their null spellings
pub struct NullsOnlyCleaner {
    kind: CleanerKind,
    spellings: &'static [&'static str],
}

impl NullsOnlyCleaner {
    pub fn new(kind: CleanerKind, spellings: &'static [&'static str]) -> Self {
        Self { kind, spellings }
    }
}

#[async_trait]
impl TableCleaner for NullsOnlyCleaner {
    async fn clean(&self, mut row: Row, _row_num: usize) -> Result<CleanOutcome, RowError> {
        replace_nulls(&mut row, self.spellings);
        Ok(CleanOutcome::Cleaned(row))
    }

    fn kind(&self) -> CleanerKind {
        self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_topa_backslash_is_null() {
        let cleaner = NullsOnlyCleaner::new(CleanerKind::Topa, &["", "\\"]);
        let row = Row::from_pairs([("a", "\\"), ("b", ""), ("c", "NA")]);

        let outcome = cleaner.clean(row, 1).await.unwrap();
        let row = outcome.row();

        assert!(row.is_null("a"));
        assert!(row.is_null("b"));
        assert_eq!(row.text("c"), Some("NA"));
    }
}
