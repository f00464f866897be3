//! Control command channel.

use tokio::sync::mpsc;

/// A command for the watcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlCommand {
    /// Drop the current connection, if any, and connect again right away.
    Reconnect,

    /// Drop the current connection, if any, and stop.
    Quit,
}

/// The receiving watcher is gone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("control receiver closed")]
pub struct ControlSendError(pub ControlCommand);

/// Every control sender is gone and no commands are left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("control channel closed")]
pub struct ControlClosed;

/// Create a connected control sender/receiver pair.
pub fn control_channel() -> (ControlSender, ControlReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (ControlSender { sender }, ControlReceiver { receiver })
}

/// The sending half of the control channel.
#[derive(Debug, Clone)]
pub struct ControlSender {
    sender: mpsc::UnboundedSender<ControlCommand>,
}

impl ControlSender {
    /// Queue a command. Never blocks.
    pub fn send(&self, command: ControlCommand) -> Result<(), ControlSendError> {
        self.sender
            .send(command)
            .map_err(|mpsc::error::SendError(command)| ControlSendError(command))
    }

    /// Whether the watcher has gone away.
    pub fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }
}

/// The receiving half of the control channel.
#[derive(Debug)]
pub struct ControlReceiver {
    receiver: mpsc::UnboundedReceiver<ControlCommand>,
}

impl ControlReceiver {
    /// Take the next pending command without waiting.
    pub fn try_receive(&mut self) -> Result<Option<ControlCommand>, ControlClosed> {
        match self.receiver.try_recv() {
            Ok(command) => Ok(Some(command)),
            Err(mpsc::error::TryRecvError::Empty) => Ok(None),
            Err(mpsc::error::TryRecvError::Disconnected) => Err(ControlClosed),
        }
    }

    /// Wait for the next command.
    ///
    /// Cancel safe: dropping the future never loses a command.
    pub async fn receive(&mut self) -> Result<ControlCommand, ControlClosed> {
        self.receiver.recv().await.ok_or(ControlClosed)
    }
}
