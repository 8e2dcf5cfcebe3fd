pub mod client;
pub mod config;
pub mod credential;
pub mod endpoints;
pub mod error;
pub mod sign;
pub mod types;

pub use client::EcClient;
pub use config::EcConfig;
pub use credential::Credentials;
pub use endpoints::{CustomerLookup, Endpoint};
pub use error::EcError;
pub use types::{Envelope, Method};
