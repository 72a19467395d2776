pub mod http;
pub mod serve;

pub use http::HttpState;
pub use serve::{serve, ServerSettings};
