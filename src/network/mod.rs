//! Network layer - request preparation, execution and retry policy
//!
//! Every endpoint wrapper funnels through [`ApiClient::request`].

pub mod client;
pub mod curl;
pub mod retry;

pub use client::{encode_path_segment, ApiClient, PreparedRequest, RequestOptions};
pub use curl::to_curl;
pub use retry::RetryPolicy;
