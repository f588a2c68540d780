//! Scripted VNC sessions for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{self, Instant};

use crate::probe::{
    error::ProbeError,
    session::{ScreenSession, SessionConnector},
    types::{Key, Screenshot, Target, BYTES_PER_PIXEL},
};

/// A solid-colour screenshot.
pub fn solid(width: usize, height: usize, colour: u8) -> Screenshot {
    Screenshot {
        width,
        height,
        pixels: vec![colour; width * height * BYTES_PER_PIXEL],
    }
}

#[derive(Default)]
struct Script {
    connect_error: Option<ProbeError>,
    screens: VecDeque<Result<Screenshot, ProbeError>>,
    screenshot_delay: Duration,
    pressed: Vec<Vec<Key>>,
    shot_times: Vec<Instant>,
    closed: usize,
}

/// Connector whose sessions replay a fixed script. Hosts listed with
/// `with_host` get their own script; everything else uses the default one.
#[derive(Clone, Default)]
pub struct MockConnector {
    default: Arc<Mutex<Script>>,
    hosts: Arc<Mutex<HashMap<String, Arc<Mutex<Script>>>>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Screenshots handed out in order, one per `screenshot()` call.
    pub fn with_screens(self, screens: Vec<Screenshot>) -> Self {
        self.default
            .lock()
            .unwrap()
            .screens
            .extend(screens.into_iter().map(Ok));
        self
    }

    pub fn with_screenshot_error(self, err: ProbeError) -> Self {
        self.default.lock().unwrap().screens.push_back(Err(err));
        self
    }

    pub fn with_connect_error(self, err: ProbeError) -> Self {
        self.default.lock().unwrap().connect_error = Some(err);
        self
    }

    pub fn with_screenshot_delay(self, delay: Duration) -> Self {
        self.default.lock().unwrap().screenshot_delay = delay;
        self
    }

    /// Give `host` its own script built by `build`.
    pub fn with_host(self, host: &str, build: impl FnOnce(MockConnector) -> MockConnector) -> Self {
        let scripted = build(MockConnector::new());
        self.hosts
            .lock()
            .unwrap()
            .insert(host.to_string(), scripted.default);
        self
    }

    pub fn pressed(&self) -> Vec<Vec<Key>> {
        self.default.lock().unwrap().pressed.clone()
    }

    pub fn shot_times(&self) -> Vec<Instant> {
        self.default.lock().unwrap().shot_times.clone()
    }

    pub fn closed(&self) -> usize {
        self.default.lock().unwrap().closed
    }

    fn script_for(&self, host: &str) -> Arc<Mutex<Script>> {
        self.hosts
            .lock()
            .unwrap()
            .get(host)
            .cloned()
            .unwrap_or_else(|| self.default.clone())
    }
}

#[async_trait]
impl SessionConnector for MockConnector {
    async fn connect(&self, target: &Target) -> Result<Box<dyn ScreenSession>, ProbeError> {
        let script = self.script_for(&target.host);
        if let Some(err) = script.lock().unwrap().connect_error.take() {
            return Err(err);
        }
        Ok(Box::new(MockSession { script }))
    }
}

struct MockSession {
    script: Arc<Mutex<Script>>,
}

#[async_trait]
impl ScreenSession for MockSession {
    async fn screenshot(&mut self) -> Result<Screenshot, ProbeError> {
        let delay = self.script.lock().unwrap().screenshot_delay;
        time::sleep(delay).await;

        let mut script = self.script.lock().unwrap();
        script.shot_times.push(Instant::now());
        script
            .screens
            .pop_front()
            .unwrap_or_else(|| Err(ProbeError::session("no more screens scripted")))
    }

    async fn press_keys(&mut self, keys: &[Key]) -> Result<(), ProbeError> {
        self.script.lock().unwrap().pressed.push(keys.to_vec());
        Ok(())
    }

    async fn close(&mut self) -> Result<(), ProbeError> {
        self.script.lock().unwrap().closed += 1;
        Ok(())
    }
}
