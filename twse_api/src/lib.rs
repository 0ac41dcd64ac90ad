mod client;
mod errors;
mod feed;
pub mod types;
pub use self::client::{Client, ClientConfig, FeedBody, DEFAULT_BASE_URL};
pub use self::errors::Error;
pub use self::feed::Feed;
