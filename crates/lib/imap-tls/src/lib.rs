//! IMAP transport stream setup: plaintext, implicit TLS or STARTTLS.

mod connect;
mod mode;
mod rustls_connector;
mod stream;

pub use connect::*;
pub use mode::*;
pub use rustls_connector::*;
pub use stream::*;
