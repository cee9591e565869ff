pub mod compose;
pub mod error;
pub mod extract;
pub mod intent;
pub mod models;

pub use compose::{compose_reply, replies};
pub use error::ProviderError;
pub use extract::extract_place;
pub use intent::classify_intent;
pub use models::*;
