// ============================================================================
// Gateway Module - Websocket Push
// ============================================================================
//
// Holds live websocket sessions per (role, user id) and pushes event frames
// to them as bus events arrive. Registration replaces and closes any prior
// session for the same key; a failed push evicts the entry. There is no
// queueing for disconnected recipients, missed frames are lost.
//
// ============================================================================

pub mod push;
pub mod registry;
pub mod session;

pub use push::{topics_for_role, PushRelay};
pub use registry::ConnectionRegistry;
pub use session::WsSession;
