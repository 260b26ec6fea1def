// ABOUTME: In-memory stand-in for the platform behind every foundation.
// ABOUTME: Tracks which apps exist per foundation, records calls, and injects failures.

use async_trait::async_trait;
use cfdeploy::courier::{Courier, CourierError, CourierFactory, CourierResult, LoginRequest};
use cfdeploy::types::AppName;
use parking_lot::Mutex;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct PlatformState {
    /// Apps per foundation host, with whether each is started.
    apps: HashMap<String, BTreeMap<String, bool>>,
    /// (host, verb) pairs that fail.
    failures: BTreeSet<(String, String)>,
    /// "verb args" per host, in call order.
    calls: Vec<(String, String)>,
    /// Hosts that saw a logout.
    logged_out: Vec<String>,
}

/// Shared simulated platform; cheap to clone.
#[derive(Clone, Default)]
pub struct FakePlatform {
    state: Arc<Mutex<PlatformState>>,
}

impl FakePlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a running app on `host`.
    pub fn with_app(self, host: &str, app: &str) -> Self {
        self.state
            .lock()
            .apps
            .entry(host.to_string())
            .or_default()
            .insert(app.to_string(), true);
        self
    }

    /// Make `verb` fail on `host`.
    pub fn failing(self, host: &str, verb: &str) -> Self {
        self.state
            .lock()
            .failures
            .insert((host.to_string(), verb.to_string()));
        self
    }

    /// Apps present on `host`, sorted by name.
    pub fn apps(&self, host: &str) -> Vec<String> {
        self.state
            .lock()
            .apps
            .get(host)
            .map(|apps| apps.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn is_started(&self, host: &str, app: &str) -> Option<bool> {
        self.state
            .lock()
            .apps
            .get(host)
            .and_then(|apps| apps.get(app).copied())
    }

    /// Calls made against `host`, as "verb args".
    pub fn calls(&self, host: &str) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter(|(h, _)| h == host)
            .map(|(_, c)| c.clone())
            .collect()
    }

    pub fn logged_out(&self, host: &str) -> bool {
        self.state.lock().logged_out.iter().any(|h| h == host)
    }

    pub fn factory(&self) -> Arc<dyn CourierFactory> {
        Arc::new(FakeFactory {
            platform: self.clone(),
        })
    }
}

struct FakeFactory {
    platform: FakePlatform,
}

impl CourierFactory for FakeFactory {
    fn build(&self) -> Result<Box<dyn Courier>, CourierError> {
        Ok(Box::new(FakeCourier {
            platform: self.platform.clone(),
            host: Mutex::new(None),
        }))
    }
}

/// Courier bound to whichever foundation it logged into.
struct FakeCourier {
    platform: FakePlatform,
    host: Mutex<Option<String>>,
}

impl FakeCourier {
    fn host(&self) -> String {
        self.host.lock().clone().unwrap_or_default()
    }

    /// Record the call, then fail it if scripted to.
    fn call(&self, verb: &str, args: &str) -> Result<String, CourierError> {
        let host = self.host();
        let command = format!("{verb} {args}").trim_end().to_string();
        let mut state = self.platform.state.lock();
        state.calls.push((host.clone(), command.clone()));

        if state.failures.contains(&(host.clone(), verb.to_string())) {
            return Err(CourierError::Failed {
                command: format!("cf {command}"),
                status: "exit status: 1".to_string(),
                output: format!("FAILED {verb} on {host}\n").into_bytes(),
            });
        }
        Ok(host)
    }

    fn ok(message: String) -> CourierResult {
        Ok(format!("{message}\n").into_bytes())
    }
}

#[async_trait]
impl Courier for FakeCourier {
    async fn login(&self, request: &LoginRequest<'_>) -> CourierResult {
        *self.host.lock() = Some(request.foundation.host().to_string());
        let host = self.call("login", request.org)?;
        Self::ok(format!("logged in to {host}"))
    }

    async fn exists(&self, app: &AppName) -> Result<bool, CourierError> {
        let host = self.host();
        let state = self.platform.state.lock();
        // Lookups aren't recorded as calls; they never change the platform.
        if state.failures.contains(&(host.clone(), "exists".to_string())) {
            return Err(CourierError::TimedOut {
                command: format!("cf app {app}"),
                timeout: Duration::from_secs(30),
            });
        }
        Ok(state
            .apps
            .get(&host)
            .is_some_and(|apps| apps.contains_key(app.as_str())))
    }

    async fn push(&self, app: &AppName, _path: &Path, instances: u16) -> CourierResult {
        let host = self.call("push", &format!("{app} -i {instances}"))?;
        self.platform
            .state
            .lock()
            .apps
            .entry(host.clone())
            .or_default()
            .insert(app.to_string(), true);
        Self::ok(format!("pushed {app} to {host}"))
    }

    async fn rename(&self, from: &AppName, to: &AppName) -> CourierResult {
        let host = self.call("rename", &format!("{from} {to}"))?;
        let mut state = self.platform.state.lock();
        let apps = state.apps.entry(host).or_default();
        if let Some(started) = apps.remove(from.as_str()) {
            apps.insert(to.to_string(), started);
        }
        Self::ok(format!("renamed {from} to {to}"))
    }

    async fn start(&self, app: &AppName) -> CourierResult {
        let host = self.call("start", app.as_str())?;
        if let Some(started) = self
            .platform
            .state
            .lock()
            .apps
            .entry(host)
            .or_default()
            .get_mut(app.as_str())
        {
            *started = true;
        }
        Self::ok(format!("started {app}"))
    }

    async fn stop(&self, app: &AppName) -> CourierResult {
        let host = self.call("stop", app.as_str())?;
        if let Some(started) = self
            .platform
            .state
            .lock()
            .apps
            .entry(host)
            .or_default()
            .get_mut(app.as_str())
        {
            *started = false;
        }
        Self::ok(format!("stopped {app}"))
    }

    async fn delete(&self, app: &AppName) -> CourierResult {
        let host = self.call("delete", app.as_str())?;
        self.platform
            .state
            .lock()
            .apps
            .entry(host)
            .or_default()
            .remove(app.as_str());
        Self::ok(format!("deleted {app}"))
    }

    async fn map_route(&self, app: &AppName, domain: &str, hostname: &str) -> CourierResult {
        self.call("map-route", &format!("{app} {domain} --hostname {hostname}"))?;
        Self::ok(format!("mapped {hostname}.{domain}"))
    }

    async fn logout(&self) -> CourierResult {
        let host = self.call("logout", "")?;
        self.platform.state.lock().logged_out.push(host);
        Self::ok("logged out".to_string())
    }
}
