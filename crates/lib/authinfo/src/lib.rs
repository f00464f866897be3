//! Credential lookup from a netrc-style `authinfo` store.

mod credentials;
mod file;
mod parse;
mod provider;

pub use credentials::*;
pub use file::*;
pub use parse::*;
pub use provider::*;
