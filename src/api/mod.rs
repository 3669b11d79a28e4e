//! FeedMob API client layer.
//!
//! ```text
//!   FeedmobClient::<operation>()
//!        │
//!        ├─ request::build_*      URL + query / JSON body (+ spend validation)
//!        ├─ token::TokenIssuer    fresh HS256 token per call
//!        └─ transport::Transport  single HTTP call, classified failure
//! ```

pub mod client;
pub mod operation;
pub mod request;
pub mod token;
pub mod transport;

pub use client::FeedmobClient;
pub use operation::{HttpMethod, Operation};
pub use request::{DirectSpend, Query, RequestEnvelope};
pub use token::{Credentials, SignedToken, TokenClaims, TokenIssuer};
pub use transport::{HttpTransport, Transport};
