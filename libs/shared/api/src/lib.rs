pub mod client;

pub use client::{ApiClient, NoToken, TokenSource};
