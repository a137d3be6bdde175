// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! A single RouterOS command, kept as data until it is rendered.

use std::fmt::Display;

/// Render a boolean the way RouterOS expects it.
#[must_use]
pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// Quote a string parameter, escaping the characters the RouterOS CLI interprets.
#[must_use]
pub fn quote(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        if matches!(c, '"' | '\\' | '$') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// The value of a command parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    /// Free text: names, comments, list names. Always quoted.
    Str(String),
    /// A bare word understood by the CLI: addresses, chains, actions.
    Token(String),
    Num(i64),
    /// Rendered as `yes` / `no`
    Bool(bool),
    /// A parameter that takes no value (e.g. `fib`)
    Flag,
}

impl Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Str(s) => write!(f, "{}", quote(s)),
            Value::Token(t) => write!(f, "{t}"),
            Value::Num(n) => write!(f, "{n}"),
            Value::Bool(b) => write!(f, "{}", yes_no(*b)),
            Value::Flag => Ok(()),
        }
    }
}

/// A command as an ordered list of parameters.
///
/// Parameters render in the order they were set. The same key may be set twice; both
/// occurrences are kept since some producers legitimately repeat matchers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    verb: &'static str,
    args: Vec<(&'static str, Value)>,
}

impl Command {
    #[must_use]
    pub fn new(verb: &'static str) -> Self {
        Self {
            verb,
            args: Vec::with_capacity(8),
        }
    }
    #[must_use]
    pub fn add() -> Self {
        Self::new("add")
    }
    #[must_use]
    pub fn arg(mut self, key: &'static str, value: Value) -> Self {
        self.args.push((key, value));
        self
    }
    #[must_use]
    pub fn str(self, key: &'static str, value: impl Into<String>) -> Self {
        self.arg(key, Value::Str(value.into()))
    }
    #[must_use]
    pub fn token(self, key: &'static str, value: impl Display) -> Self {
        self.arg(key, Value::Token(value.to_string()))
    }
    #[must_use]
    pub fn num(self, key: &'static str, value: impl Into<i64>) -> Self {
        self.arg(key, Value::Num(value.into()))
    }
    #[must_use]
    pub fn bool(self, key: &'static str, value: bool) -> Self {
        self.arg(key, Value::Bool(value))
    }
    #[must_use]
    pub fn flag(self, key: &'static str) -> Self {
        self.arg(key, Value::Flag)
    }
    /// Set a quoted parameter only if there is a value for it
    #[must_use]
    pub fn opt_str(self, key: &'static str, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.str(key, value),
            None => self,
        }
    }
    /// Set a bare parameter only if there is a value for it
    #[must_use]
    pub fn opt_token(self, key: &'static str, value: Option<impl Display>) -> Self {
        match value {
            Some(value) => self.token(key, value),
            None => self,
        }
    }

    #[must_use]
    pub fn verb(&self) -> &'static str {
        self.verb
    }
    /// The first value set for `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.args.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }
    pub fn args(&self) -> impl Iterator<Item = (&'static str, &Value)> {
        self.args.iter().map(|(k, v)| (*k, v))
    }
}

impl Display for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.verb)?;
        for (key, value) in &self.args {
            match value {
                Value::Flag => write!(f, " {key}")?,
                value => write!(f, " {key}={value}")?,
            }
        }
        Ok(())
    }
}
