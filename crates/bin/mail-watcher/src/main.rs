//! Watch IMAP mailboxes and report unread mail on the console.

mod cli;
mod commands;
mod display;
mod logging;
mod settings;

use std::process::ExitCode;
use std::time::Duration;

use clap::Parser as _;
use color_eyre::eyre::Result;
use mail_channels::ControlCommand;
use tokio::task::JoinSet;
use tracing::instrument::WithSubscriber as _;

/// How long the watchers get to log out after an interrupt.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Why the process is about to exit.
enum Finish {
    Stopped(Result<()>),
    Interrupted(std::io::Result<()>),
}

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    let args = cli::Args::parse();
    let dispatch = logging::dispatch(args.debug);

    let runtime = tokio::runtime::Runtime::new()?;
    let result = runtime.block_on(run(args).with_subscriber(dispatch));

    // The stdin reader sits in a blocking read that cannot be cancelled.
    runtime.shutdown_background();

    result
}

async fn run(args: cli::Args) -> Result<ExitCode> {
    let settings = settings::load(args.config).await?;

    let mut tasks = JoinSet::new();
    let mut senders = Vec::with_capacity(settings.watchers.len());
    let transport = mail_transport::ImapTransport::default();

    for config in settings.watchers {
        let label = format!("{}/{}", config.server.name, config.server.mailbox);
        let (status, statuses) = mail_channels::status_channel();
        let (control, receiver) = mail_channels::control_channel();
        senders.push(control);

        let watcher = mailbox_watcher::Watcher::new(mailbox_watcher::Params {
            config,
            transport: transport.clone(),
            auth: settings.auth.clone(),
            status,
            control: receiver,
        });

        tasks.spawn(watcher.run().with_current_subscriber());
        tasks.spawn(display::show(label, statuses).with_current_subscriber());
    }

    let input = senders.clone();
    tokio::spawn(
        async move {
            if let Err(error) = commands::forward_stdin(input).await {
                tracing::warn!(%error, "reading commands failed");
            }
        }
        .with_current_subscriber(),
    );

    let finish = tokio::select! {
        result = join_all(&mut tasks) => Finish::Stopped(result),
        result = tokio::signal::ctrl_c() => Finish::Interrupted(result),
    };

    match finish {
        Finish::Stopped(result) => {
            result?;
            tracing::info!("all watchers stopped");
            Ok(ExitCode::SUCCESS)
        }
        Finish::Interrupted(result) => {
            result?;
            tracing::info!("interrupted, shutting down");

            commands::broadcast(&senders, ControlCommand::Quit);
            match tokio::time::timeout(SHUTDOWN_GRACE, join_all(&mut tasks)).await {
                Ok(result) => result?,
                Err(_) => tracing::warn!("watchers did not stop in time"),
            }

            Ok(ExitCode::FAILURE)
        }
    }
}

async fn join_all(tasks: &mut JoinSet<()>) -> Result<()> {
    while let Some(result) = tasks.join_next().await {
        result?;
    }
    Ok(())
}
