//! Screen session interface
//!
//! The probe only needs three things from a remote desktop: a picture of
//! the screen, a way to press keys, and a way to hang up.

use async_trait::async_trait;

use crate::probe::{
    error::ProbeError,
    types::{Key, Screenshot, Target},
};

/// An open remote desktop session.
#[async_trait]
pub trait ScreenSession: Send {
    /// Capture the current framebuffer.
    async fn screenshot(&mut self) -> Result<Screenshot, ProbeError>;

    /// Press `keys` together: all down in order, then up in reverse order.
    async fn press_keys(&mut self, keys: &[Key]) -> Result<(), ProbeError>;

    async fn close(&mut self) -> Result<(), ProbeError>;
}

/// Opens [`ScreenSession`]s.
#[async_trait]
pub trait SessionConnector: Send + Sync {
    async fn connect(&self, target: &Target) -> Result<Box<dyn ScreenSession>, ProbeError>;
}
