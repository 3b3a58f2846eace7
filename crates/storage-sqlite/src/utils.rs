//! Helpers shared by the SQLite repositories.

/// Upper bound on bound parameters per `IN (...)` list. SQLite's default
/// `SQLITE_MAX_VARIABLE_NUMBER` is 999; the rest is left for other clauses.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Splits `items` into slices small enough for one `IN (...)` query each.
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}
