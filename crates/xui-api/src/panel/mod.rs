// Panel API client modules
//
// Hand-written client for the 3X-UI panel's `/panel/api/inbounds` endpoints.
// Every response is wrapped in the `{ success, msg, obj }` envelope.

pub mod auth;
pub mod client;
pub mod clients;
pub mod inbounds;
pub mod models;
pub mod traffic;

pub use client::PanelClient;
