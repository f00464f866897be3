//! Reading control commands from standard input.

use mail_channels::{ControlCommand, ControlSender};
use tokio::io::AsyncBufReadExt as _;

/// Parse one input line.
pub fn parse(line: &str) -> Option<ControlCommand> {
    match line.trim().to_ascii_lowercase().as_str() {
        "r" | "reconnect" => Some(ControlCommand::Reconnect),
        "q" | "quit" => Some(ControlCommand::Quit),
        _ => None,
    }
}

/// Forward commands typed on stdin to every watcher.
///
/// Returns after a quit command or at the end of input.
pub async fn forward_stdin(senders: Vec<ControlSender>) -> std::io::Result<()> {
    let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let Some(command) = parse(&line) else {
            tracing::warn!(input = %line.trim(), "unknown command, expected r(econnect) or q(uit)");
            continue;
        };

        tracing::debug!(?command, "broadcasting command");
        broadcast(&senders, command);

        if command == ControlCommand::Quit {
            return Ok(());
        }
    }

    tracing::debug!("end of command input");
    Ok(())
}

/// Send `command` to every watcher that is still running.
pub fn broadcast(senders: &[ControlSender], command: ControlCommand) {
    for sender in senders {
        // A stopped watcher has nothing left to do with the command.
        let _ = sender.send(command);
    }
}
