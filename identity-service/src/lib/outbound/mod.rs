pub mod api_client;
pub mod repositories;

pub use api_client::SignedApiClient;
