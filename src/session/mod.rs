//! User session: state plus the controller that mutates it.
//!
//! # Data Flow
//! ```text
//! user command ─┐
//!               ├─▶ controller.rs ─▶ wallet bridge / contract
//! mint event ───┘        │
//!                        ▼
//!                   state.rs ─▶ ui::view
//! ```

pub mod controller;
pub mod state;

pub use controller::{request_connection, Connection, MintSession, SessionSettings};
pub use state::SessionState;
