//! Async client for the UniFi controller's legacy API.
//!
//! Only the surface needed to manage per-client network access is modelled:
//! session login/logout, user groups, known users (`list/user`), single-user
//! lookup (`stat/user/{mac}`), and the `block-sta` / `unblock-sta` commands.

pub mod auth;
pub mod error;
pub mod legacy;
pub mod transport;

pub use auth::ControllerPlatform;
pub use error::Error;
pub use legacy::LegacyClient;
pub use legacy::models::{LegacyUser, LegacyUserGroup};
pub use transport::{TlsMode, TransportConfig};
