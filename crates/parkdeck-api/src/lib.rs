// parkdeck-api: Async Rust client for the ParkDeck platform REST API
// (user-service + parking-service).

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod envelope;
pub mod error;
pub mod transport;

pub use auth::{Role, SessionTokens, TokenSource};
pub use client::ApiClient;
pub use envelope::{Page, PageRequest, SortDir};
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
