//! Mail server access for the mailbox watcher.
//!
//! [`MailTransport`] is the seam between the watcher's control logic and the
//! wire protocol; [`ImapTransport`] implements it on top of `async-imap`.

mod imap;
mod server;
mod transport;

pub use imap::*;
pub use server::*;
pub use transport::*;

pub use imap_tls::TlsMode;
