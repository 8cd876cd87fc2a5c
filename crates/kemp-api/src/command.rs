// One named remote operation plus its parameters.
//
// A `Command` maps to exactly one HTTP GET: the name becomes the last path
// segment, the parameters the query string.

use std::collections::BTreeMap;

/// A command for the appliance's pseudo-RPC API (`get`, `set`, `showvs`, ...).
///
/// Parameters live in a `BTreeMap`, so the encoded query string is stable
/// even though the appliance does not care about order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    name: String,
    params: BTreeMap<String, String>,
}

impl Command {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }

    /// Add (or replace) a parameter.
    #[must_use]
    pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    /// Add a parameter only when `value` is non-empty.
    #[must_use]
    pub fn param_if_set(self, key: impl Into<String>, value: &str) -> Self {
        if value.is_empty() {
            self
        } else {
            self.param(key, value)
        }
    }

    /// Add a `Y`/`N` flag parameter.
    #[must_use]
    pub fn flag(self, key: impl Into<String>, on: bool) -> Self {
        self.param(key, if on { "Y" } else { "N" })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &BTreeMap<String, String> {
        &self.params
    }

    pub fn get_param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_are_sorted_and_replaceable() {
        let cmd = Command::new("set")
            .param("value", "Y")
            .param("param", "Enable")
            .param("value", "N");

        let keys: Vec<_> = cmd.params().keys().map(String::as_str).collect();
        assert_eq!(keys, ["param", "value"]);
        assert_eq!(cmd.get_param("value"), Some("N"));
    }

    #[test]
    fn optional_and_flag_params() {
        let cmd = Command::new("addvs")
            .param_if_set("nickname", "")
            .param_if_set("checkurl", "/health")
            .flag("transparent", true)
            .flag("sslacceleration", false);

        assert_eq!(cmd.get_param("nickname"), None);
        assert_eq!(cmd.get_param("checkurl"), Some("/health"));
        assert_eq!(cmd.get_param("transparent"), Some("Y"));
        assert_eq!(cmd.get_param("sslacceleration"), Some("N"));
    }
}
