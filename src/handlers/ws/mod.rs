//! # Primary session channel (`/client-ws`)
//!
//! One WebSocket connection per client. The server assigns the session
//! identifier on accept and announces it before anything else; the client
//! never picks its own.
//!
//! ### Message Types
//!
//! **Incoming:**
//! - `{"type": "text-input", "text": "..."}` - one conversation turn
//! - `{"type": "synthesize", "text": "..."}` - speech synthesis request;
//!   partial results stream back in sentence order
//! - `{"type": "interrupt"}` - control message forwarded to the
//!   conversation backend
//!
//! **Outgoing:**
//! - `{"type": "session-ready", "session_id": "..."}` - sent once on accept
//! - `{"type": "reply", "text": "..."}` - conversation response
//! - `{"type": "synthesis", "status": "partial" | "complete" | "error", ...}` -
//!   synthesis events for requests made on this channel
//! - `{"type": "interrupt-ack"}` - interrupt acknowledged
//! - `{"type": "error", "message": "..."}` - handler-level error; the
//!   connection stays open
//!
//! Handler-level errors never terminate the dispatch loop; only transport
//! failure does, and that tears down exactly this session.

pub mod dispatch;
pub mod handler;
pub mod messages;

pub use handler::client_ws_handler;
pub use messages::{ClientMessage, ServerMessage};
