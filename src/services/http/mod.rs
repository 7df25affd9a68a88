pub mod client;
pub mod csrf;
pub mod transport;

pub use client::ApiClient;
pub use csrf::CsrfInterceptor;
pub use transport::{ApiRequest, ApiResponse, RequestOptions, Transport};
