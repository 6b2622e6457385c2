/// League persistence backends.
pub mod league_store;
/// Database model definitions.
pub mod models;
/// Built-in demo data.
pub mod seed;
/// Storage abstraction layer for database operations.
pub mod storage;
