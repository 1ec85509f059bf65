//! Request construction.

use std::fmt;

use crate::error::{ProtocolError, Result};

/// A single MPD command line.
///
/// Arguments are always sent double-quoted with `"` and `\` escaped, which
/// MPD accepts for every argument type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    name: &'static str,
    args: Vec<String>,
}

impl Request {
    /// Start a request for `name` with no arguments.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append many arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Command name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Serialize to a newline-terminated line.
    pub fn to_line(&self) -> Result<String> {
        let mut line = String::from(self.name);
        for arg in &self.args {
            if arg.contains(['\n', '\r']) {
                return Err(ProtocolError::InvalidArgument(arg.clone()));
            }
            line.push(' ');
            line.push_str(&quote(arg));
        }
        line.push('\n');
        Ok(line)
    }

    // Convenience constructors for the commands used by the bridge.

    /// `currentsong`
    pub fn current_song() -> Self {
        Self::new("currentsong")
    }

    /// `status`
    pub fn status() -> Self {
        Self::new("status")
    }

    /// `playlistinfo`
    pub fn playlist_info() -> Self {
        Self::new("playlistinfo")
    }

    /// `search <tag> <value> [<tag> <value>...]`
    pub fn search<'a, I>(filters: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        filters
            .into_iter()
            .fold(Self::new("search"), |req, (tag, value)| req.arg(tag).arg(value))
    }

    /// `add <uri>`
    pub fn add(uri: &str) -> Self {
        Self::new("add").arg(uri)
    }

    /// `pause 0|1`
    pub fn pause(paused: bool) -> Self {
        Self::new("pause").arg(if paused { "1" } else { "0" })
    }

    /// `play <songpos>`
    pub fn play(position: u32) -> Self {
        Self::new("play").arg(position.to_string())
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    let mut quoted = String::with_capacity(arg.len() + 2);
    quoted.push('"');
    for ch in arg.chars() {
        if ch == '"' || ch == '\\' {
            quoted.push('\\');
        }
        quoted.push(ch);
    }
    quoted.push('"');
    quoted
}
