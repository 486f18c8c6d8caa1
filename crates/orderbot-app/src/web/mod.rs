// Web frontend module
pub mod protocol;
pub mod routes;
pub mod server;
pub mod session_manager;

pub use protocol::{ClientMessage, ServerMessage, SessionDetails, SessionInfo};
pub use server::{WebServer, WebServerConfig};
pub use session_manager::{Session, SessionManager};
