//! Scripted fakes for driving the watcher without a mail server.
//!
//! Every transport call blocks until the test queues the matching [`Step`],
//! so tests run in lockstep with the watcher and observe every status.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use mail_channels::{ControlCommand, ControlSender, MailStatus, StatusSubscriber};
use mail_transport::{IdleOutcome, MailTransport, ServerConfig};
use tokio::sync::mpsc;
use tokio::time::Instant;

/// The fake failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct FakeError(pub String);

/// A scripted transport result.
#[derive(Debug)]
pub enum Step {
    Connect(Result<(), FakeError>),
    Count(Result<u32, FakeError>),
    Idle(Result<IdleOutcome, FakeError>),
}

/// A transport call, as the fake saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Connect { user: String },
    Count { connection: usize, mailbox: String },
    Idle { connection: usize, timeout: Duration },
    Close { connection: usize },
}

#[derive(Debug, Default)]
struct Log {
    calls: Vec<(Instant, Call)>,
    live: usize,
    max_live: usize,
    next_id: usize,
}

/// A connection handed out by the fake.
#[derive(Debug)]
pub struct FakeConnection {
    id: usize,
    open: bool,
}

/// The transport half, owned by the watcher.
pub struct FakeTransport {
    steps: tokio::sync::Mutex<mpsc::UnboundedReceiver<Step>>,
    log: Arc<Mutex<Log>>,
}

/// The test half: queues steps and inspects the calls.
#[derive(Clone)]
pub struct Script {
    steps: mpsc::UnboundedSender<Step>,
    log: Arc<Mutex<Log>>,
}

/// Create a connected fake transport and its script.
pub fn fake_transport() -> (FakeTransport, Script) {
    let (sender, receiver) = mpsc::unbounded_channel();
    let log = Arc::new(Mutex::new(Log::default()));
    (
        FakeTransport {
            steps: tokio::sync::Mutex::new(receiver),
            log: Arc::clone(&log),
        },
        Script {
            steps: sender,
            log,
        },
    )
}

impl FakeTransport {
    fn record(&self, call: Call) {
        self.log.lock().unwrap().calls.push((Instant::now(), call));
    }

    async fn next_step(&self) -> Step {
        let mut steps = self.steps.lock().await;
        match steps.recv().await {
            Some(step) => step,
            None => std::future::pending().await,
        }
    }
}

impl MailTransport for FakeTransport {
    type Connection = FakeConnection;
    type Error = FakeError;

    async fn connect(
        &self,
        _server: &ServerConfig,
        credentials: &authinfo::Credentials,
    ) -> Result<FakeConnection, FakeError> {
        self.record(Call::Connect {
            user: credentials.user.clone(),
        });

        match self.next_step().await {
            Step::Connect(Ok(())) => {
                let mut log = self.log.lock().unwrap();
                log.next_id += 1;
                log.live += 1;
                log.max_live = log.max_live.max(log.live);
                Ok(FakeConnection {
                    id: log.next_id,
                    open: true,
                })
            }
            Step::Connect(Err(error)) => Err(error),
            other => panic!("expected a connect step, got {other:?}"),
        }
    }

    async fn count_unread(
        &self,
        connection: &mut FakeConnection,
        mailbox: &str,
    ) -> Result<u32, FakeError> {
        assert!(connection.open, "count on a closed connection");
        self.record(Call::Count {
            connection: connection.id,
            mailbox: mailbox.to_owned(),
        });

        match self.next_step().await {
            Step::Count(result) => result,
            other => panic!("expected a count step, got {other:?}"),
        }
    }

    async fn idle(
        &self,
        connection: &mut FakeConnection,
        timeout: Duration,
    ) -> Result<IdleOutcome, FakeError> {
        assert!(connection.open, "idle on a closed connection");
        self.record(Call::Idle {
            connection: connection.id,
            timeout,
        });

        match self.next_step().await {
            Step::Idle(result) => result,
            other => panic!("expected an idle step, got {other:?}"),
        }
    }

    async fn close(&self, connection: &mut FakeConnection) {
        if !connection.open {
            return;
        }
        connection.open = false;
        self.record(Call::Close {
            connection: connection.id,
        });
        self.log.lock().unwrap().live -= 1;
    }
}

impl Script {
    fn push(&self, step: Step) {
        self.steps.send(step).unwrap();
    }

    pub fn connect_ok(&self) {
        self.push(Step::Connect(Ok(())));
    }

    pub fn connect_err(&self, message: &str) {
        self.push(Step::Connect(Err(FakeError(message.to_owned()))));
    }

    pub fn count(&self, unread: u32) {
        self.push(Step::Count(Ok(unread)));
    }

    pub fn count_err(&self, message: &str) {
        self.push(Step::Count(Err(FakeError(message.to_owned()))));
    }

    pub fn idle(&self, outcome: IdleOutcome) {
        self.push(Step::Idle(Ok(outcome)));
    }

    pub fn idle_err(&self, message: &str) {
        self.push(Step::Idle(Err(FakeError(message.to_owned()))));
    }

    pub fn calls(&self) -> Vec<Call> {
        let log = self.log.lock().unwrap();
        log.calls.iter().map(|(_, call)| call.clone()).collect()
    }

    /// Instants of the connect attempts.
    pub fn connect_times(&self) -> Vec<Instant> {
        let log = self.log.lock().unwrap();
        log.calls
            .iter()
            .filter(|(_, call)| matches!(call, Call::Connect { .. }))
            .map(|(at, _)| *at)
            .collect()
    }

    /// Let the watcher run until it has made a call matching `predicate`.
    pub async fn wait_for_call(&self, predicate: impl Fn(&Call) -> bool) {
        while !self.calls().iter().any(&predicate) {
            tokio::task::yield_now().await;
        }
    }

    pub fn live(&self) -> usize {
        self.log.lock().unwrap().live
    }

    pub fn max_live(&self) -> usize {
        self.log.lock().unwrap().max_live
    }
}

/// Credentials provider with a fixed answer.
pub struct StaticAuth(pub Option<authinfo::Credentials>);

impl StaticAuth {
    pub fn user(user: &str) -> Self {
        Self(Some(authinfo::Credentials {
            user: user.to_owned(),
            password: "secret".into(),
        }))
    }
}

impl authinfo::AuthProvider for StaticAuth {
    type Error = FakeError;

    async fn lookup(&self, host: &str) -> Result<authinfo::Credentials, FakeError> {
        self.0
            .clone()
            .ok_or_else(|| FakeError(format!("no credentials for {host}")))
    }
}

/// A spawned watcher plus everything needed to drive it.
pub struct Harness {
    pub script: Script,
    pub status: StatusSubscriber,
    pub control: ControlSender,
    pub task: tokio::task::JoinHandle<()>,
}

pub const IDLE_TIMEOUT: Duration = Duration::from_secs(60);

pub fn config(reconnect: mailbox_watcher::ReconnectPolicy) -> mailbox_watcher::Config {
    mailbox_watcher::Config {
        server: ServerConfig::new("imap.example.com", true, "INBOX"),
        idle_timeout: IDLE_TIMEOUT,
        reconnect,
    }
}

impl Harness {
    pub fn start(reconnect: mailbox_watcher::ReconnectPolicy) -> Self {
        Self::start_with_auth(reconnect, StaticAuth::user("alice"))
    }

    pub fn start_with_auth(reconnect: mailbox_watcher::ReconnectPolicy, auth: StaticAuth) -> Self {
        let (transport, script) = fake_transport();
        let (publisher, status) = mail_channels::status_channel();
        let (control, receiver) = mail_channels::control_channel();

        let watcher = mailbox_watcher::Watcher::new(mailbox_watcher::Params {
            config: config(reconnect),
            transport,
            auth,
            status: publisher,
            control: receiver,
        });
        let task = tokio::spawn(watcher.run());

        Self {
            script,
            status,
            control,
            task,
        }
    }

    pub async fn next_status(&mut self) -> MailStatus {
        self.status.next().await.expect("watcher should be running")
    }

    pub fn send(&self, command: ControlCommand) {
        self.control.send(command).unwrap();
    }

    /// Send quit and wait for the watcher to stop.
    pub async fn quit(self) -> Script {
        self.send(ControlCommand::Quit);
        self.task.await.unwrap();
        self.script
    }
}
