//! Error types for screen probes

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while probing a VNC server
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("Connection failed: {0}")]
    Connect(#[from] std::io::Error),

    /// RFB handshake or authentication failed.
    #[error("Handshake failed: {message}")]
    Handshake { message: String },

    #[error("Session error: {message}")]
    Session { message: String },

    #[error("Probe timed out after {0:?}")]
    Timeout(Duration),

    /// An update from the server did not fit the screen it announced.
    #[error("Framebuffer error: {message}")]
    Framebuffer { message: String },

    #[error("Invalid target: {0}")]
    InvalidTarget(String),
}

impl ProbeError {
    pub fn handshake(message: impl Into<String>) -> Self {
        Self::Handshake { message: message.into() }
    }

    pub fn session(message: impl Into<String>) -> Self {
        Self::Session { message: message.into() }
    }

    pub fn framebuffer(message: impl Into<String>) -> Self {
        Self::Framebuffer { message: message.into() }
    }

    /// Failures expected from arbitrary hosts on the internet: unreachable,
    /// password protected, speaking broken RFB, sending updates that don't
    /// fit their screen, or too slow. A probe that hits one of these simply
    /// reports "no change".
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ProbeError::Connect(_)
                | ProbeError::Handshake { .. }
                | ProbeError::Session { .. }
                | ProbeError::Timeout(_)
                | ProbeError::Framebuffer { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_side_failures_are_transient() {
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");

        assert!(ProbeError::from(refused).is_transient());
        assert!(ProbeError::handshake("wrong password").is_transient());
        assert!(ProbeError::session("reset").is_transient());
        assert!(ProbeError::Timeout(Duration::from_secs(5)).is_transient());
        assert!(ProbeError::framebuffer("rect out of bounds").is_transient());
    }

    #[test]
    fn bad_targets_are_not_transient() {
        assert!(!ProbeError::InvalidTarget("host:".into()).is_transient());
    }
}
