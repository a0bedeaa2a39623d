//! Request handlers for the WebSocket and HTTP endpoints.

mod http;
mod websocket;

pub use http::{debug_room_state, get_room_detail, get_rooms, health_check};
pub use websocket::{websocket_handler, websocket_handler_default};
