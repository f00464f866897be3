//! Parsing of the `authinfo` text format.
//!
//! Every non-blank line is one record made of whitespace-separated key/value
//! pairs, e.g.:
//!
//! ```text
//! machine imap.example.com login alice password s3cret
//! ```
//!
//! The order of the pairs inside a record does not matter and keys other than
//! `machine`, `login` and `password` are ignored.

use crate::{Credentials, Password};

/// A single complete record from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record<'a> {
    /// The host this record applies to.
    pub machine: &'a str,

    /// Login name.
    pub login: &'a str,

    /// Password.
    pub password: &'a str,
}

impl Record<'_> {
    /// Turn the record into owned credentials.
    pub fn to_credentials(&self) -> Credentials {
        Credentials {
            user: self.login.to_owned(),
            password: Password::new(self.password),
        }
    }
}

/// Parse one line into a record.
///
/// Returns `None` for blank lines, comments and lines that lack any of the
/// required keys.
pub fn parse_line(line: &str) -> Option<Record<'_>> {
    let line = line.trim_start();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let mut machine = None;
    let mut login = None;
    let mut password = None;

    let mut tokens = line.split_whitespace();
    while let (Some(key), Some(value)) = (tokens.next(), tokens.next()) {
        let slot = match key {
            "machine" => &mut machine,
            "login" => &mut login,
            "password" => &mut password,
            _ => continue,
        };
        slot.get_or_insert(value);
    }

    Some(Record {
        machine: machine?,
        login: login?,
        password: password?,
    })
}

/// Iterate over all well-formed records in the store contents.
pub fn records(contents: &str) -> impl Iterator<Item = Record<'_>> {
    contents.lines().filter_map(parse_line)
}

/// Find the credentials for `host`; the first matching record wins.
pub fn find(contents: &str, host: &str) -> Option<Credentials> {
    records(contents)
        .find(|record| record.machine == host)
        .map(|record| record.to_credentials())
}
