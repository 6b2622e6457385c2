mod config;
mod error;
mod store;

pub use config::JsonFileConfig;
pub use error::JsonStoreError;
pub use store::JsonFileLeagueStore;
