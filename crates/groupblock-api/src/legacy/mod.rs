// Legacy API client modules
//
// Hand-written client for the controller's legacy endpoints, all wrapped in
// the `{ meta: { rc, msg }, data: [...] }` envelope.

pub mod auth;
pub mod client;
pub mod clients;
pub mod models;
pub mod users;

pub use client::LegacyClient;
