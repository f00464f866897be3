//! GreenMail container helpers.

use testcontainers::{
    GenericImage, ImageExt as _, core::IntoContainerPort as _, runners::AsyncRunner as _,
};

/// A running GreenMail server and how to reach its IMAP port.
pub struct GreenMail {
    /// Keeps the container alive.
    pub container: testcontainers::ContainerAsync<GenericImage>,

    /// Host the mapped port is reachable on.
    pub host: String,

    /// Host port mapped to [`IMAP_PORT`](crate::IMAP_PORT).
    pub port: u16,
}

/// Starts a GreenMail container with a single mail user.
pub async fn start_greenmail(
    user: &str,
    password: &str,
) -> Result<GreenMail, testcontainers::TestcontainersError> {
    let container = GenericImage::new("greenmail/standalone", "latest")
        .with_exposed_port(crate::IMAP_PORT.tcp())
        .with_wait_for(testcontainers::core::WaitFor::message_on_stdout(
            "Starting GreenMail API server at",
        ))
        .with_env_var("GREENMAIL_USERS", format!("{user}:{password}"))
        .start()
        .await?;

    let host = container.get_host().await?.to_string();
    let port = container.get_host_port_ipv4(crate::IMAP_PORT).await?;

    Ok(GreenMail {
        container,
        host,
        port,
    })
}
