//! Getter Module
//!
//! Loaders that fetch a value from the source of truth on a cache miss.

use std::fmt;

// == Getter ==
/// Loads the bytes for a key that is not cached.
///
/// Implement it on a type, or wrap a closure in [`GetterFn`].
pub trait Getter: Send + Sync {
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>>;
}

// == Getter Fn ==
/// Adapts a closure into a [`Getter`].
///
/// ```
/// use ringcache::group::{Getter, GetterFn};
///
/// let getter = GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec()));
/// assert_eq!(getter.get("key").unwrap(), b"key");
/// ```
pub struct GetterFn<F>(F);

impl<F> GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

impl<F> Getter for GetterFn<F>
where
    F: Fn(&str) -> anyhow::Result<Vec<u8>> + Send + Sync,
{
    fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
        (self.0)(key)
    }
}

impl<F> fmt::Debug for GetterFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("GetterFn")
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use std::collections::HashMap;

    struct MapGetter(HashMap<String, String>);

    impl Getter for MapGetter {
        fn get(&self, key: &str) -> anyhow::Result<Vec<u8>> {
            self.0
                .get(key)
                .map(|v| v.clone().into_bytes())
                .ok_or_else(|| anyhow!("{key} not exist"))
        }
    }

    #[test]
    fn test_getter_fn_calls_closure() {
        let getter = GetterFn::new(|key: &str| Ok(key.as_bytes().to_vec()));
        assert_eq!(getter.get("key").unwrap(), b"key".to_vec());
    }

    #[test]
    fn test_getter_fn_propagates_error() {
        let getter = GetterFn::new(|key: &str| Err(anyhow!("no value for {key}")));
        let err = getter.get("missing").unwrap_err();
        assert_eq!(err.to_string(), "no value for missing");
    }

    #[test]
    fn test_struct_getter_as_trait_object() {
        let db = HashMap::from([("Tom".to_string(), "630".to_string())]);
        let getter: Box<dyn Getter> = Box::new(MapGetter(db));

        assert_eq!(getter.get("Tom").unwrap(), b"630".to_vec());
        assert!(getter.get("Jack").is_err());
    }
}
