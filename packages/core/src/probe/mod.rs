//! Ctrl+Alt+Del screen probe
//!
//! Heuristic for "is this VNC session alive and interactive": screenshot,
//! press Ctrl+Alt+Del, wait, screenshot again and compare.

pub mod checker;
pub mod error;
pub mod framebuffer;
pub mod rfb;
pub mod session;
pub mod types;

#[cfg(test)]
pub mod mock_session;

pub use checker::check_ctrl_alt_del;
pub use error::ProbeError;
pub use rfb::VncConnector;
pub use session::{ScreenSession, SessionConnector};
pub use types::{ChangeCriterion, Key, ProbeOptions, Screenshot, Target, CTRL_ALT_DEL};
