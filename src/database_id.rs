//! ID type definitions for records owned by the backend.

/// The ID of a transaction.
///
/// Negative values denote rows that only exist locally and have not been
/// assigned an ID by the backend yet.
pub type TransactionId = i64;

/// The ID of a (sub-)account.
pub type AccountId = i64;

/// The database ID of a user-defined category.
pub type CustomCategoryId = i64;
