//! Per-call request options: query parameters and content type.

use std::collections::BTreeMap;

/// Key that selects the content type when options are built from pairs.
pub const CONTENT_TYPE_KEY: &str = "content-type";

/// Query parameters plus an optional `Content-Type` for a single request.
///
/// Passed by reference and never modified by the client. Query keys are kept
/// sorted so the encoded query string is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    query: BTreeMap<String, String>,
    content_type: Option<String>,
}

impl RequestOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a query parameter, replacing any previous value for `key`.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn query_params(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    pub fn content_type_value(&self) -> Option<&str> {
        self.content_type.as_deref()
    }
}

/// Builds options from loose key/value pairs. The `content-type` key becomes
/// the content type; every other pair becomes a query parameter.
impl<K, V> FromIterator<(K, V)> for RequestOptions
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), |opts, (k, v)| {
            let key = k.into();
            if key == CONTENT_TYPE_KEY {
                opts.content_type(v)
            } else {
                opts.query(key, v)
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn content_type_key_is_not_a_query_param() {
        let map: HashMap<&str, &str> =
            [("content-type", "application/json"), ("repos", "libs-release")].into();
        let opts: RequestOptions = map.into_iter().collect();
        assert_eq!(opts.content_type_value(), Some("application/json"));
        assert_eq!(opts.query_params().len(), 1);
        assert_eq!(opts.query_params()["repos"], "libs-release");
    }

    #[test]
    fn builder_overwrites_duplicate_keys() {
        let opts = RequestOptions::new().query("type", "local").query("type", "remote");
        assert_eq!(opts.query_params()["type"], "remote");
        assert_eq!(opts.content_type_value(), None);
    }
}
