//! Axum extractors for request handling
//!
//! Custom extractors for validated bodies, path parameters, and the
//! history `limit` query.

mod limit;
mod path;
mod validated;

pub use limit::HistoryLimit;
pub use path::{ConversationPath, PathParams, UsernamePath};
pub use validated::ValidatedJson;
