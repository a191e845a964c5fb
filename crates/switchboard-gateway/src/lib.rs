//! HTTP and `WebSocket` gateway for the Switchboard phone directory.
//!
//! This crate provides an Axum server that exposes:
//!
//! - **`WebSocket` endpoint** (`/ws/operators/{operator_id}`) streaming
//!   `phonebookUpdate` events to every open session of one operator
//! - **REST endpoints** driving the directory engine: registration,
//!   binding, positioning, and reachability queries
//!
//! # Architecture
//!
//! One [`PhoneManager`](switchboard_directory::PhoneManager) is shared by
//! every handler behind a single async mutex. The engine pushes through a
//! [`RoomGateway`], which keeps a broadcast channel per operator identity,
//! so a push only ever reaches the sessions of the operator it names.

pub mod error;
pub mod handlers;
pub mod rooms;
pub mod router;
pub mod server;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::GatewayError;
pub use rooms::RoomGateway;
pub use router::{build_router, build_router_with_origins};
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
