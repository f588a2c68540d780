//! VNC sessions over `vnc-rs`
//!
//! The RFB protocol itself (handshake, encodings, input events) is handled
//! by the `vnc` crate. This adapter keeps a local copy of the remote screen
//! from the update stream and turns it into [`Screenshot`]s on demand.

use std::future;
use std::time::Duration;

use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::time::{self, Instant};
use vnc::{PixelFormat, Rect, VncClient, VncEncoding, VncError, VncEvent, X11Event};

use crate::probe::{
    error::ProbeError,
    framebuffer::{Framebuffer, Region},
    session::{ScreenSession, SessionConnector},
    types::{Key, Screenshot, Target},
};

/// Sleep between polls of an empty event queue.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// A screenshot is taken once updates have stopped for this long.
const SETTLE: Duration = Duration::from_millis(100);

/// How long to wait for a refresh when the server sends nothing back.
/// Servers may skip incremental updates for an unchanged screen.
const CAPTURE_WINDOW: Duration = Duration::from_millis(500);

/// Connects to real VNC servers without a password.
#[derive(Debug, Clone, Default)]
pub struct VncConnector;

impl VncConnector {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SessionConnector for VncConnector {
    async fn connect(&self, target: &Target) -> Result<Box<dyn ScreenSession>, ProbeError> {
        if target.port == 0 {
            return Err(ProbeError::InvalidTarget(target.to_string()));
        }
        let tcp = TcpStream::connect((target.host.as_str(), target.port)).await?;

        let client = vnc::VncConnector::new(tcp)
            .set_auth_method(future::ready(Err::<String, _>(VncError::NoPassword)))
            .add_encoding(VncEncoding::Zrle)
            .add_encoding(VncEncoding::CopyRect)
            .add_encoding(VncEncoding::Raw)
            .allow_shared(true)
            .set_pixel_format(PixelFormat::bgra())
            .build()
            .map_err(|err| ProbeError::handshake(err.to_string()))?
            .try_start()
            .await
            .map_err(|err| ProbeError::handshake(err.to_string()))?
            .finish()
            .map_err(|err| ProbeError::handshake(err.to_string()))?;

        tracing::debug!(%target, "VNC session established");

        Ok(Box::new(VncSession {
            client,
            frame: Framebuffer::new(),
            captured: false,
        }))
    }
}

struct VncSession {
    client: VncClient,
    frame: Framebuffer,
    /// A screenshot has already been taken in this session.
    captured: bool,
}

impl VncSession {
    fn apply(&mut self, event: VncEvent) -> Result<(), ProbeError> {
        match event {
            VncEvent::SetResolution(screen) => {
                self.frame.resize(screen.width as usize, screen.height as usize);
            }
            VncEvent::RawImage(rect, data) => self.frame.draw(region(&rect), &data)?,
            VncEvent::Copy(dst, src) => self.frame.copy(region(&dst), region(&src))?,
            VncEvent::Error(message) => return Err(ProbeError::session(message)),
            // Cursor shapes, bells and clipboard text don't affect the screen.
            _ => {}
        }
        Ok(())
    }

    async fn send_key(&self, key: Key, down: bool) -> Result<(), ProbeError> {
        self.client
            .input(X11Event::KeyEvent((key.keysym(), down).into()))
            .await
            .map_err(|err| ProbeError::session(err.to_string()))
    }
}

#[async_trait]
impl ScreenSession for VncSession {
    async fn screenshot(&mut self) -> Result<Screenshot, ProbeError> {
        // The first capture asks for the whole screen and waits until all of
        // it has arrived; later ones only need what changed since.
        let whole_screen = !self.captured;
        let request = if whole_screen {
            X11Event::FullRefresh
        } else {
            X11Event::Refresh
        };
        self.client
            .input(request)
            .await
            .map_err(|err| ProbeError::session(err.to_string()))?;

        let started = Instant::now();
        let mut last_event = started;
        let mut updated = false;

        loop {
            let event = self
                .client
                .poll_event()
                .await
                .map_err(|err| ProbeError::session(err.to_string()))?;

            match event {
                Some(event) => {
                    self.apply(event)?;
                    updated = true;
                    last_event = Instant::now();
                }
                None => {
                    let painted = if whole_screen {
                        self.frame.is_complete()
                    } else {
                        self.frame.is_ready()
                    };
                    let quiet = last_event.elapsed() >= SETTLE;
                    let waited = started.elapsed() >= CAPTURE_WINDOW;
                    if painted && quiet && (updated || waited) {
                        break;
                    }
                    time::sleep(POLL_INTERVAL).await;
                }
            }
        }

        self.captured = true;
        Ok(self.frame.snapshot())
    }

    async fn press_keys(&mut self, keys: &[Key]) -> Result<(), ProbeError> {
        for key in keys {
            self.send_key(*key, true).await?;
        }
        for key in keys.iter().rev() {
            self.send_key(*key, false).await?;
        }
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ProbeError> {
        self.client
            .close()
            .await
            .map_err(|err| ProbeError::session(err.to_string()))
    }
}

fn region(rect: &Rect) -> Region {
    Region {
        x: rect.x as usize,
        y: rect.y as usize,
        width: rect.width as usize,
        height: rect.height as usize,
    }
}
