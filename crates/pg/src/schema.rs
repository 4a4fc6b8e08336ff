/// Schema metadata for PostgreSQL tables.
///
/// Provides compile-time SQL generation for table creation and indexing.
/// All methods return `&'static str` to avoid runtime allocations and enable
/// compile-time string construction via [`const_format::concatcp!`].
///
/// # Design
///
/// This trait contains no I/O operations—it purely describes table structure.
/// Actual database operations live in the repository traits of the crates
/// that own each entity.
pub trait Schema {
    /// Returns the table name in the database.
    fn name() -> &'static str;
    /// Returns `CREATE TABLE IF NOT EXISTS` DDL statement.
    fn creates() -> &'static str;
    /// Returns `CREATE INDEX IF NOT EXISTS` statements for all indices.
    fn indices() -> &'static str;
}
