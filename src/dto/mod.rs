use time::{OffsetDateTime, format_description::well_known::Rfc3339};

pub mod auth;
pub mod export;
pub mod game;
pub mod health;
pub mod roster;
pub mod sse;
pub mod standings;
pub mod validation;

/// Current UTC time as RFC 3339, used for creation timestamps and defaulted import dates.
pub(crate) fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
