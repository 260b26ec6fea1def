// ABOUTME: Test support utilities.
// ABOUTME: Scripted mock actions and creators, plus a fake platform courier.

// Each test binary only uses some of these helpers, so allow dead_code.
#![allow(dead_code)]

pub mod courier;

use async_trait::async_trait;
use cfdeploy::config::Environment;
use cfdeploy::deploy::{Action, ActionCreator, ActionError, Command, DeployError, OutputBuffer};
use cfdeploy::types::{FoundationUrl, Operation};
use nonempty::NonEmpty;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Once};

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("cfdeploy=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// `n` foundations named https://api.f0.example.com, https://api.f1.example.com, ...
pub fn foundations(n: usize) -> NonEmpty<FoundationUrl> {
    let urls = (0..n)
        .map(|i| FoundationUrl::parse(&format!("https://api.f{i}.example.com")).unwrap())
        .collect();
    NonEmpty::from_vec(urls).expect("at least one foundation")
}

pub fn environment(n: usize) -> Environment {
    Environment::new("test", foundations(n))
}

/// Every command each foundation received, in order.
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<(usize, Command)>>>);

impl CallLog {
    fn record(&self, index: usize, command: Command) {
        self.0.lock().push((index, command));
    }

    /// Commands received by one foundation, in order.
    pub fn commands(&self, index: usize) -> Vec<Command> {
        self.0
            .lock()
            .iter()
            .filter(|(i, _)| *i == index)
            .map(|(_, c)| *c)
            .collect()
    }

    /// How many times `command` ran on foundation `index`.
    pub fn count(&self, index: usize, command: Command) -> usize {
        self.commands(index).iter().filter(|c| **c == command).count()
    }

    /// Foundations that received `command` at least once.
    pub fn foundations_with(&self, command: Command) -> Vec<usize> {
        let mut indexes: Vec<usize> = self
            .0
            .lock()
            .iter()
            .filter(|(_, c)| *c == command)
            .map(|(i, _)| *i)
            .collect();
        indexes.sort_unstable();
        indexes.dedup();
        indexes
    }
}

/// How one foundation's mock action behaves.
#[derive(Clone, Default)]
pub struct Script {
    failures: HashMap<Command, String>,
    output: HashMap<Command, String>,
    panic_on: Option<Command>,
}

impl Script {
    pub fn fail(mut self, command: Command, message: &str) -> Self {
        self.failures.insert(command, message.to_string());
        self
    }

    pub fn write(mut self, command: Command, text: &str) -> Self {
        self.output.insert(command, text.to_string());
        self
    }

    pub fn panic_on(mut self, command: Command) -> Self {
        self.panic_on = Some(command);
        self
    }
}

pub struct MockAction {
    index: usize,
    script: Script,
    log: CallLog,
    output: OutputBuffer,
}

impl MockAction {
    pub fn new(index: usize, script: Script, log: CallLog, output: OutputBuffer) -> Self {
        Self {
            index,
            script,
            log,
            output,
        }
    }

    fn step(&mut self, command: Command) -> Result<(), ActionError> {
        self.log.record(self.index, command);
        if self.script.panic_on == Some(command) {
            panic!("scripted panic on {command}");
        }
        if let Some(text) = self.script.output.get(&command) {
            self.output.write_all(text.as_bytes()).unwrap();
        }
        match self.script.failures.get(&command) {
            Some(message) => Err(ActionError::failed(message.clone())),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl Action for MockAction {
    async fn initially(&mut self) -> Result<(), ActionError> {
        self.step(Command::Initially)
    }

    async fn verify(&mut self) -> Result<(), ActionError> {
        self.step(Command::Verify)
    }

    async fn execute(&mut self) -> Result<(), ActionError> {
        // Let other workers run so foundations genuinely interleave.
        tokio::task::yield_now().await;
        self.step(Command::Execute)
    }

    async fn post_execute(&mut self) -> Result<(), ActionError> {
        self.step(Command::PostExecute)
    }

    async fn success(&mut self) -> Result<(), ActionError> {
        self.step(Command::Success)
    }

    async fn undo(&mut self) -> Result<(), ActionError> {
        self.step(Command::Undo)
    }

    async fn finally(&mut self) -> Result<(), ActionError> {
        self.step(Command::Finally)
    }
}

/// Creator handing out scripted mock actions, one script per foundation.
pub struct MockCreator {
    scripts: Vec<Script>,
    log: CallLog,
    fail_create_at: Option<usize>,
}

impl MockCreator {
    pub fn new(scripts: Vec<Script>) -> Self {
        Self {
            scripts,
            log: CallLog::default(),
            fail_create_at: None,
        }
    }

    /// All foundations succeed at everything.
    pub fn succeeding(n: usize) -> Self {
        Self::new(vec![Script::default(); n])
    }

    pub fn fail_create_at(mut self, index: usize) -> Self {
        self.fail_create_at = Some(index);
        self
    }

    pub fn log(&self) -> &CallLog {
        &self.log
    }
}

impl ActionCreator for MockCreator {
    type Action = MockAction;

    fn operation(&self) -> Operation {
        Operation::Push
    }

    fn create(
        &self,
        environment: &Environment,
        output: OutputBuffer,
        foundation: &FoundationUrl,
    ) -> Result<MockAction, DeployError> {
        let index = environment
            .foundations
            .iter()
            .position(|f| f == foundation)
            .expect("foundation belongs to environment");

        if self.fail_create_at == Some(index) {
            return Err(DeployError::Initialization {
                operation: Operation::Push,
                foundation: foundation.clone(),
                reason: "no courier".to_string(),
            });
        }

        let script = self.scripts.get(index).cloned().unwrap_or_default();
        Ok(MockAction::new(index, script, self.log.clone(), output))
    }

    fn initially_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::login(Operation::Push, errors)
    }

    fn execute_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::operation(Operation::Push, errors)
    }

    fn undo_error(
        &self,
        execute_errors: Vec<ActionError>,
        undo_errors: Vec<ActionError>,
    ) -> DeployError {
        DeployError::rollback(Operation::Push, execute_errors, undo_errors)
    }

    fn success_error(&self, errors: Vec<ActionError>) -> DeployError {
        DeployError::finish(Operation::Push, errors)
    }
}
