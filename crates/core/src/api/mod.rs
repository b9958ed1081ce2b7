//! Commerce API client.
//!
//! Everything that touches the remote REST API lives here: the request
//! wrapper with bearer-token auth and error normalization, the canonical
//! wire DTOs (which absorb the API's mixed field casing once, at this
//! boundary), and the request sequencer that keeps stale paginated
//! responses from overwriting newer renders.

mod client;
mod sequencer;
pub mod types;

pub use client::{ApiBody, ApiClient, ApiError, RequestBody};
pub use sequencer::Sequencer;
