//! Core data types for screen probes

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::config::DEFAULT_SCREEN_DELAY_MS;
use crate::probe::error::ProbeError;
use crate::search::VncRecord;

pub const DEFAULT_VNC_PORT: u16 = 5900;

/// Bytes per pixel in a [`Screenshot`]: blue, green, red, padding.
pub const BYTES_PER_PIXEL: usize = 4;

/// A VNC endpoint to probe.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Target {
    pub host: String,
    pub port: u16,
}

impl Target {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Parses `host` or `host:port`. Anything after a second `:` is ignored.
impl FromStr for Target {
    type Err = ProbeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split(':');
        let host = parts.next().unwrap_or_default();
        if host.is_empty() {
            return Err(ProbeError::InvalidTarget(format!("missing host in '{}'", s)));
        }

        let port = match parts.next() {
            None => DEFAULT_VNC_PORT,
            Some(raw) => raw
                .parse::<u16>()
                .ok()
                .filter(|port| *port != 0)
                .ok_or_else(|| ProbeError::InvalidTarget(format!("invalid port in '{}'", s)))?,
        };

        Ok(Self::new(host, port))
    }
}

impl From<&VncRecord> for Target {
    fn from(record: &VncRecord) -> Self {
        Self::new(record.ip.clone(), record.port)
    }
}

/// Keys the probe knows how to press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Ctrl,
    Alt,
    Del,
}

impl Key {
    /// X11 keysym sent in the RFB key event.
    pub fn keysym(self) -> u32 {
        match self {
            Key::Ctrl => 0xffe3,
            Key::Alt => 0xffe9,
            Key::Del => 0xffff,
        }
    }
}

pub const CTRL_ALT_DEL: [Key; 3] = [Key::Ctrl, Key::Alt, Key::Del];

/// A captured framebuffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Screenshot {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u8>,
}

impl Screenshot {
    pub fn same_shape(&self, other: &Screenshot) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.pixels.len() == other.pixels.len()
    }

    fn colours(&self) -> impl Iterator<Item = &[u8]> {
        // Padding byte excluded: it never carries colour.
        self.pixels
            .chunks_exact(BYTES_PER_PIXEL)
            .map(|pixel| &pixel[..3])
    }
}

/// When do two screenshots count as "the screen changed"?
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeCriterion {
    /// Every pixel differs.
    #[default]
    All,
    /// At least one pixel differs.
    Any,
}

impl ChangeCriterion {
    /// Screenshots of different sizes, and empty screenshots, never count
    /// as changed.
    pub fn changed(self, before: &Screenshot, after: &Screenshot) -> bool {
        if !before.same_shape(after) || before.pixels.is_empty() {
            return false;
        }

        let mut pairs = before.colours().zip(after.colours());
        match self {
            ChangeCriterion::All => pairs.all(|(a, b)| a != b),
            ChangeCriterion::Any => pairs.any(|(a, b)| a != b),
        }
    }
}

impl FromStr for ChangeCriterion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(ChangeCriterion::All),
            "any" => Ok(ChangeCriterion::Any),
            other => Err(format!("unknown change mode '{}' (expected all or any)", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// Wait between the keystroke and the second screenshot.
    pub screen_delay: Duration,
    pub criterion: ChangeCriterion,
}

impl ProbeOptions {
    /// Hard limit for a whole probe: two and a half screen delays.
    pub fn time_budget(&self) -> Duration {
        self.screen_delay.mul_f64(2.5)
    }
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            screen_delay: Duration::from_millis(DEFAULT_SCREEN_DELAY_MS),
            criterion: ChangeCriterion::default(),
        }
    }
}
