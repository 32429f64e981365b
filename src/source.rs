//! Input dictionaries.
//!
//! Query decoders expose repeated parameters as a map from key to an ordered
//! list of values. [`QuerySource`] abstracts over the map type so callers can
//! pass whatever their router produced.

use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;

/// A read-only mapping from query key to its values, in input order.
///
/// # Example
///
/// ```rust
/// use querybind::QuerySource;
/// use std::collections::HashMap;
///
/// let params = HashMap::from([("tag".to_string(), vec!["a".to_string(), "b".to_string()])]);
///
/// assert_eq!(params.query_values("tag").map(<[String]>::len), Some(2));
/// assert!(params.query_values("missing").is_none());
/// ```
pub trait QuerySource {
    /// Returns the values given for `key`, or `None` if the key is absent.
    fn query_values(&self, key: &str) -> Option<&[String]>;
}

impl<S: BuildHasher> QuerySource for HashMap<String, Vec<String>, S> {
    fn query_values(&self, key: &str) -> Option<&[String]> {
        self.get(key).map(Vec::as_slice)
    }
}

impl QuerySource for BTreeMap<String, Vec<String>> {
    fn query_values(&self, key: &str) -> Option<&[String]> {
        self.get(key).map(Vec::as_slice)
    }
}

impl<S: BuildHasher> QuerySource for IndexMap<String, Vec<String>, S> {
    fn query_values(&self, key: &str) -> Option<&[String]> {
        self.get(key).map(Vec::as_slice)
    }
}

impl<Q: QuerySource + ?Sized> QuerySource for &Q {
    fn query_values(&self, key: &str) -> Option<&[String]> {
        (**self).query_values(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[test]
    fn test_hash_map_source() {
        let mut params = HashMap::new();
        params.insert("roles".to_string(), owned(&["admin", "user"]));

        assert_eq!(params.query_values("roles"), Some(&owned(&["admin", "user"])[..]));
        assert_eq!(params.query_values("other"), None);
    }

    #[test]
    fn test_btree_and_index_map_sources() {
        let btree = BTreeMap::from([("page".to_string(), owned(&["2"]))]);
        let index: IndexMap<String, Vec<String>> =
            IndexMap::from([("page".to_string(), owned(&["3"]))]);

        assert_eq!(btree.query_values("page"), Some(&owned(&["2"])[..]));
        assert_eq!(index.query_values("page"), Some(&owned(&["3"])[..]));
    }

    #[test]
    fn test_dyn_source() {
        let params = HashMap::from([("q".to_string(), owned(&["x"]))]);
        let source: &dyn QuerySource = &params;

        assert_eq!(source.query_values("q").map(<[String]>::len), Some(1));
    }
}
