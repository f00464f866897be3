//! The watcher state machine.

use authinfo::AuthProvider;
use mail_channels::{ControlCommand, ControlReceiver, MailStatus, StatusPublisher};
use mail_transport::{IdleOutcome, MailTransport};
use tracing::Instrument as _;

use crate::state::{State, Wake};

/// The error type of a watcher over the given collaborators.
pub type WatcherError<Auth, Transport> =
    crate::WatchError<<Auth as AuthProvider>::Error, <Transport as MailTransport>::Error>;

/// Parameters for [`Watcher::new`].
pub struct Params<Transport, Auth> {
    /// What to watch and how.
    pub config: crate::Config,

    /// Mail server access.
    pub transport: Transport,

    /// Credentials source.
    pub auth: Auth,

    /// Where to publish the statuses.
    pub status: StatusPublisher,

    /// Where the commands come from.
    pub control: ControlReceiver,
}

/// Watches one mailbox on one server.
pub struct Watcher<Transport, Auth> {
    config: crate::Config,
    transport: Transport,
    auth: Auth,
    status: StatusPublisher,
    control: ControlReceiver,

    /// Delay source for automatic reconnects; `None` under the manual policy.
    backoff: Option<exp_backoff::State>,
}

/// What ended an IDLE wait.
enum IdleInterrupt<Error> {
    Idle(Result<IdleOutcome, Error>),
    Command(Result<ControlCommand, mail_channels::ControlClosed>),
}

impl<Transport, Auth> Watcher<Transport, Auth>
where
    Transport: MailTransport,
    Auth: AuthProvider + Sync,
{
    /// Assemble a watcher; nothing happens until [`run`](Self::run).
    pub fn new(params: Params<Transport, Auth>) -> Self {
        let Params {
            config,
            transport,
            auth,
            status,
            control,
        } = params;

        let backoff = match config.reconnect {
            crate::ReconnectPolicy::Backoff(params) => Some(exp_backoff::State::new(params)),
            crate::ReconnectPolicy::Manual => None,
        };

        Self {
            config,
            transport,
            auth,
            status,
            control,
            backoff,
        }
    }

    /// Run until a quit command arrives or the control channel closes.
    pub async fn run(self) {
        let span = tracing::info_span!(
            "watcher",
            server_name = %self.config.server.name,
            imap_mailbox = %self.config.server.mailbox,
        );
        self.run_loop().instrument(span).await
    }

    async fn run_loop(mut self) {
        tracing::info!(
            imap_host = %self.config.server.host,
            imap_port = self.config.server.port,
            imap_tls_mode = ?self.config.server.tls_mode,
            idle_timeout = ?self.config.idle_timeout,
            reconnect = ?self.config.reconnect,
            "starting mailbox watcher"
        );

        let mut state = State::Disconnected(Wake::Now);
        loop {
            if let State::Stopped = state {
                break;
            }

            let from = state.kind();
            state = match self.pending_command() {
                Some(command) => self.handle_command(command, state).await,
                None => self.step(state).await,
            };
            tracing::trace!(?from, to = ?state.kind(), "state transition");
        }

        tracing::info!("mailbox watcher stopped");
    }

    /// Advance the state machine by one state.
    async fn step(&mut self, state: State<Transport::Connection>) -> State<Transport::Connection> {
        match state {
            State::Disconnected(wake) => self.wait_to_connect(wake).await,
            State::Connecting => self.connect().await,
            State::Polling(connection) => self.poll(connection).await,
            State::Idling(connection) => self.idle(connection).await,
            State::Stopped => State::Stopped,
        }
    }

    /// Take a queued command, if any, without waiting.
    fn pending_command(&mut self) -> Option<ControlCommand> {
        match self.control.try_receive() {
            Ok(command) => command,
            Err(mail_channels::ControlClosed) => Some(Self::closed_control()),
        }
    }

    fn closed_control() -> ControlCommand {
        tracing::info!("control channel closed");
        ControlCommand::Quit
    }

    /// Apply a command: drop the connection, then stop or start over.
    async fn handle_command(
        &mut self,
        command: ControlCommand,
        state: State<Transport::Connection>,
    ) -> State<Transport::Connection> {
        tracing::debug!(?command, state = ?state.kind(), "handling command");

        if let Some(connection) = state.into_connection() {
            self.discard(connection).await;
        }

        match command {
            ControlCommand::Quit => State::Stopped,
            ControlCommand::Reconnect => {
                if let Some(backoff) = &mut self.backoff {
                    backoff.reset();
                }
                State::Disconnected(Wake::Now)
            }
        }
    }

    async fn wait_to_connect(&mut self, wake: Wake) -> State<Transport::Connection> {
        let command = match wake {
            Wake::Now => return State::Connecting,
            Wake::After(delay) => {
                tokio::select! {
                    biased;
                    command = self.control.receive() => command,
                    () = tokio::time::sleep(delay) => return State::Connecting,
                }
            }
            Wake::OnCommand => self.control.receive().await,
        };

        let command = command.unwrap_or_else(|mail_channels::ControlClosed| Self::closed_control());
        self.handle_command(command, State::Disconnected(wake)).await
    }

    async fn connect(&mut self) -> State<Transport::Connection> {
        let server = &self.config.server;

        let credentials = match self.auth.lookup(&server.host).await {
            Ok(credentials) => credentials,
            Err(error) => return self.fail(crate::WatchError::AuthLookup(error)),
        };

        let result = self.transport.connect(server, &credentials).await;
        drop(credentials);

        match result {
            Ok(connection) => {
                tracing::info!("connected");
                State::Polling(connection)
            }
            Err(error) => self.fail(crate::WatchError::Connect(error)),
        }
    }

    async fn poll(&mut self, mut connection: Transport::Connection) -> State<Transport::Connection> {
        let result = self
            .transport
            .count_unread(&mut connection, &self.config.server.mailbox)
            .await;

        match result {
            Ok(unread) => {
                tracing::info!(unread, "mailbox polled");
                self.status.publish(MailStatus::Unread(unread));
                if let Some(backoff) = &mut self.backoff {
                    backoff.reset();
                }
                State::Idling(connection)
            }
            Err(error) => {
                self.discard(connection).await;
                self.fail(crate::WatchError::Protocol(error))
            }
        }
    }

    async fn idle(&mut self, mut connection: Transport::Connection) -> State<Transport::Connection> {
        let interrupt = tokio::select! {
            biased;
            command = self.control.receive() => IdleInterrupt::Command(command),
            result = self.transport.idle(&mut connection, self.config.idle_timeout) => {
                IdleInterrupt::Idle(result)
            }
        };

        match interrupt {
            IdleInterrupt::Idle(Ok(outcome)) => {
                tracing::debug!(?outcome, "idle finished, re-polling");
                State::Polling(connection)
            }
            IdleInterrupt::Idle(Err(error)) => {
                self.discard(connection).await;
                self.fail(crate::WatchError::Protocol(error))
            }
            IdleInterrupt::Command(command) => {
                let command =
                    command.unwrap_or_else(|mail_channels::ControlClosed| Self::closed_control());
                self.handle_command(command, State::Idling(connection)).await
            }
        }
    }

    /// Close and drop a connection.
    async fn discard(&self, mut connection: Transport::Connection) {
        self.transport.close(&mut connection).await;
        tracing::debug!("connection closed");
    }

    /// Publish the failure and pick the way out of the disconnected state.
    fn fail(&mut self, error: WatcherError<Auth, Transport>) -> State<Transport::Connection> {
        self.status.publish(MailStatus::Error(error.to_string()));

        match &mut self.backoff {
            Some(backoff) => {
                let delay = backoff.advance();
                tracing::warn!(%error, retry_in = ?delay, "mailbox watch failed");
                State::Disconnected(Wake::After(delay))
            }
            None => {
                tracing::warn!(%error, "mailbox watch failed, waiting for a reconnect command");
                State::Disconnected(Wake::OnCommand)
            }
        }
    }
}
