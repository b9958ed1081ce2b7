//! HTTP middleware stack for the admin console.

pub mod auth;
pub mod request_id;
pub mod session;

pub use auth::{Merchant, MerchantSession};
pub use request_id::request_id_middleware;
pub use session::{SessionKey, create_session_layer};
