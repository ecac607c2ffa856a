//! Terminal UI.
//!
//! # Components
//! - view.rs: header, call-to-action, counter, toast list
//! - toast.rs: transient notifications with expiry
//! - spinner.rs: "Mining..." indicator
//! - confetti.rs: celebration burst after a successful mint

pub mod confetti;
pub mod spinner;
pub mod toast;
pub mod view;

pub use toast::{Toast, ToastKind, ToastQueue};
pub use view::{render, ViewOptions};
