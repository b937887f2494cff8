// xui-api: Async Rust client for the 3X-UI panel API

pub mod auth;
pub mod error;
pub mod panel;
pub mod transport;

pub use auth::{Credentials, SESSION_COOKIE};
pub use error::Error;
pub use panel::PanelClient;
pub use panel::models::{
    ApiResponse, Client, ClientSettings, ClientSettingsRequest, ClientTraffic, EmbeddedJson,
    Inbound, Settings,
};
pub use transport::{TlsMode, TransportConfig};

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
