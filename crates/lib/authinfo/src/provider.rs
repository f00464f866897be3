//! The credentials provider abstraction.

/// Resolves credentials for a host.
pub trait AuthProvider {
    /// An error that the lookup may fail with.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Look up the credentials for `host`.
    fn lookup(
        &self,
        host: &str,
    ) -> impl std::future::Future<Output = Result<crate::Credentials, Self::Error>> + Send;
}
