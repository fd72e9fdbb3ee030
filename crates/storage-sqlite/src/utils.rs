//! Utility functions for SQLite storage operations.

/// Conservative bound on bound parameters per statement
/// (SQLITE_MAX_VARIABLE_NUMBER on older builds).
pub const SQLITE_MAX_PARAMS: usize = 999;

/// Splits rows for multi-row INSERTs so that `rows * columns` stays under
/// [`SQLITE_MAX_PARAMS`].
pub fn chunk_rows_for_sqlite<T>(rows: &[T], columns: usize) -> impl Iterator<Item = &[T]> {
    let per_chunk = (SQLITE_MAX_PARAMS / columns.max(1)).max(1);
    rows.chunks(per_chunk)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_rows_empty() {
        let rows: Vec<i32> = vec![];
        assert_eq!(chunk_rows_for_sqlite(&rows, 3).count(), 0);
    }

    #[test]
    fn test_chunk_rows_respects_column_count() {
        let rows: Vec<i32> = (0..1000).collect();
        let chunks: Vec<_> = chunk_rows_for_sqlite(&rows, 3).collect();
        assert_eq!(chunks.len(), 4);
        assert_eq!(chunks[0].len(), 333);
        assert_eq!(chunks[3].len(), 1);
    }

    #[test]
    fn test_chunk_rows_zero_columns_does_not_panic() {
        let rows: Vec<i32> = (0..5).collect();
        assert_eq!(chunk_rows_for_sqlite(&rows, 0).count(), 1);
    }
}
