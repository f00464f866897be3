//! Docker-backed tests for the IMAP transport.

use std::error::Error;
use std::time::Duration;

use mail_transport::{ImapTransport, MailTransport as _, ServerConfig, TlsMode};

const IMAP_USER: &str = "test";
const IMAP_PASSWORD: &str = "secret";

fn server_config(host: &str, port: u16) -> ServerConfig {
    ServerConfig {
        port,
        tls_mode: TlsMode::Plain,
        ..ServerConfig::new(host, false, "INBOX")
    }
}

fn credentials() -> authinfo::Credentials {
    authinfo::Credentials {
        user: IMAP_USER.to_owned(),
        password: IMAP_PASSWORD.into(),
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn counts_unread_messages() -> Result<(), Box<dyn Error + Send + Sync>> {
    imap_integration::require_integration_tests_enabled()?;

    let server = imap_integration::start_greenmail(IMAP_USER, IMAP_PASSWORD).await?;
    let mut seeder = imap_integration::connect_with_retry(
        &server.host,
        server.port,
        IMAP_USER,
        IMAP_PASSWORD,
    )
    .await?;

    let transport = ImapTransport::default();
    let config = server_config(&server.host, server.port);
    let mut connection = transport.connect(&config, &credentials()).await?;

    let before = transport.count_unread(&mut connection, "INBOX").await?;
    imap_integration::deliver(&mut seeder, "INBOX", "Integration Test").await?;
    let after = transport.count_unread(&mut connection, "INBOX").await?;

    assert_eq!(after, before + 1);

    transport.close(&mut connection).await;
    transport.close(&mut connection).await;
    assert!(!connection.is_open());

    seeder.logout().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn idle_wakes_up_on_new_mail() -> Result<(), Box<dyn Error + Send + Sync>> {
    imap_integration::require_integration_tests_enabled()?;

    let server = imap_integration::start_greenmail(IMAP_USER, IMAP_PASSWORD).await?;
    let mut seeder = imap_integration::connect_with_retry(
        &server.host,
        server.port,
        IMAP_USER,
        IMAP_PASSWORD,
    )
    .await?;

    let transport = ImapTransport::default();
    let config = server_config(&server.host, server.port);
    let mut connection = transport.connect(&config, &credentials()).await?;
    transport.count_unread(&mut connection, "INBOX").await?;

    let idle = transport.idle(&mut connection, Duration::from_secs(30));
    let deliver = async {
        tokio::time::sleep(Duration::from_secs(1)).await;
        imap_integration::deliver(&mut seeder, "INBOX", "Wake up").await
    };
    let (outcome, delivered) = tokio::join!(idle, deliver);
    delivered?;

    assert_eq!(outcome?, mail_transport::IdleOutcome::NewData);
    assert_eq!(transport.count_unread(&mut connection, "INBOX").await?, 1);

    transport.close(&mut connection).await;
    seeder.logout().await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn rejects_bad_credentials() -> Result<(), Box<dyn Error + Send + Sync>> {
    imap_integration::require_integration_tests_enabled()?;

    let server = imap_integration::start_greenmail(IMAP_USER, IMAP_PASSWORD).await?;
    imap_integration::connect_with_retry(&server.host, server.port, IMAP_USER, IMAP_PASSWORD)
        .await?
        .logout()
        .await?;

    let transport = ImapTransport::default();
    let config = server_config(&server.host, server.port);
    let wrong = authinfo::Credentials {
        user: IMAP_USER.to_owned(),
        password: "wrong".into(),
    };

    let error = transport.connect(&config, &wrong).await.unwrap_err();

    assert!(
        matches!(error, mail_transport::ImapError::Login(_)),
        "{error:?}"
    );
    Ok(())
}
