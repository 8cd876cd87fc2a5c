// Generic get/set parameter commands.
//
// `get` answers with `Data` children whose names are not known in
// advance. The decoder captures them as ordered (name, value) pairs;
// `ParameterMap::from_captured` turns those into a key-unique map.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::debug;

use crate::client::Client;
use crate::command::Command;
use crate::error::Error;
use crate::xml;

/// Parameter name → value, built from a dynamically captured `Data` section.
///
/// Contains exactly the elements that appeared in the response; nothing is
/// defaulted in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ParameterMap(BTreeMap<String, String>);

impl ParameterMap {
    /// Convert captured pairs into a map. A repeated name keeps its last value.
    pub fn from_captured(pairs: Vec<(String, String)>) -> Self {
        Self(pairs.into_iter().collect())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Re-encode as a success document.
    pub fn to_xml(&self) -> String {
        xml::encode_parameters(self.iter())
    }
}

impl FromIterator<(String, String)> for ParameterMap {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for ParameterMap {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Client {
    /// Read one appliance parameter.
    ///
    /// `GET get?param={name}`
    ///
    /// A name missing from the response yields an empty string, not an
    /// error; the appliance omits parameters that are unset.
    pub async fn get(&self, name: &str) -> Result<String, Error> {
        let params = self.get_all(name).await?;
        Ok(params.get(name).unwrap_or_default().to_owned())
    }

    /// Everything the appliance returned for a `get`, not just `name`.
    pub async fn get_all(&self, name: &str) -> Result<ParameterMap, Error> {
        debug!(param = name, "reading parameter");
        let cmd = Command::new("get").param("param", name);
        self.request_parameters(&cmd).await
    }

    /// Write one appliance parameter and return its previous value.
    ///
    /// `GET get?param={name}` then `GET set?param={name}&value={value}`
    ///
    /// The read and the write are two separate requests. Another writer can
    /// change the parameter in between, and the returned value will not
    /// reflect that. The new value is not read back.
    pub async fn set(&self, name: &str, value: &str) -> Result<String, Error> {
        let previous = self.get(name).await?;

        debug!(param = name, "writing parameter");
        let cmd = Command::new("set").param("param", name).param("value", value);
        self.request_parameters(&cmd).await?;

        Ok(previous)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn captured(list: &[(&str, &str)]) -> Vec<(String, String)> {
        list.iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    #[test]
    fn from_captured_is_order_independent() {
        let a = ParameterMap::from_captured(captured(&[("a", "1"), ("b", "2")]));
        let b = ParameterMap::from_captured(captured(&[("b", "2"), ("a", "1")]));
        assert_eq!(a, b);
        assert_eq!(a.get("b"), Some("2"));
        assert_eq!(a.get("c"), None);
    }

    #[test]
    fn from_captured_keeps_last_duplicate() {
        let map = ParameterMap::from_captured(captured(&[("a", "1"), ("a", "2")]));
        assert_eq!(map.len(), 1);
        assert_eq!(map.get("a"), Some("2"));
    }

    #[test]
    fn xml_round_trip_preserves_map() {
        let map = ParameterMap::from_captured(captured(&[
            ("hostname", "lb-01"),
            ("motd", "maintenance <tonight> & tomorrow"),
            ("Enable", ""),
        ]));

        let again = ParameterMap::from_captured(xml::capture_parameters(&map.to_xml()).unwrap());
        assert_eq!(again, map);
    }
}
