/*!
The decompressed payload of a save is an Unreal Engine GVAS document. This
crate does not interpret it. Instead, a [`PayloadCodec`] implementation (for
instance one backed by a GVAS library) is handed in by the caller and the
container code passes bytes and text through it untouched.

GVAS maps do not record the type of their keys, so a decoder needs to be told
which maps are keyed by structs. [`TypeHints`] carries that information as
dotted paths rooted at the top of the save:

```
use palsave::TypeHints;

let mut hints = TypeHints::new();
hints.insert(".worldSaveData.CharacterSaveParameterMap.Key", "Struct")?;
assert_eq!(hints.get(".worldSaveData.CharacterSaveParameterMap.Key"), Some("Struct"));
# Ok::<(), palsave::SavError>(())
```
*/

use crate::SavError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Error reported by a payload codec implementation
pub type PayloadError = Box<dyn std::error::Error + Send + Sync>;

/// Converts decompressed save payloads to and from a textual representation
pub trait PayloadCodec {
    /// Decode payload bytes into text using the given key type hints
    fn decode_payload(&self, data: &[u8], hints: &TypeHints) -> Result<String, PayloadError>;

    /// Encode text back into payload bytes
    fn encode_payload(&self, text: &str) -> Result<Vec<u8>, PayloadError>;
}

impl<T: PayloadCodec + ?Sized> PayloadCodec for &'_ T {
    fn decode_payload(&self, data: &[u8], hints: &TypeHints) -> Result<String, PayloadError> {
        (**self).decode_payload(data, hints)
    }

    fn encode_payload(&self, text: &str) -> Result<Vec<u8>, PayloadError> {
        (**self).encode_payload(text)
    }
}

impl<T: PayloadCodec + ?Sized> PayloadCodec for Box<T> {
    fn decode_payload(&self, data: &[u8], hints: &TypeHints) -> Result<String, PayloadError> {
        (**self).decode_payload(data, hints)
    }

    fn encode_payload(&self, text: &str) -> Result<Vec<u8>, PayloadError> {
        (**self).encode_payload(text)
    }
}

/// Map key type overrides keyed by dotted structural path
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct TypeHints {
    hints: BTreeMap<String, String>,
}

impl TypeHints {
    pub fn new() -> Self {
        TypeHints::default()
    }

    /// The struct keyed maps found in a Palworld world save (`Level.sav`)
    pub fn palworld() -> Self {
        let paths = [
            ".worldSaveData.CharacterSaveParameterMap.Key",
            ".worldSaveData.FoliageGridSaveDataMap.Key",
            ".worldSaveData.FoliageGridSaveDataMap.ModelMap.InstanceDataMap.Key",
            ".worldSaveData.MapObjectSpawnerInStageSaveData.Key",
            ".worldSaveData.ItemContainerSaveData.Key",
            ".worldSaveData.CharacterContainerSaveData.Key",
        ];

        let hints = paths
            .iter()
            .map(|path| (String::from(*path), String::from("Struct")))
            .collect();
        TypeHints { hints }
    }

    /// Adds a hint, replacing any previous tag for the path
    ///
    /// Paths must start with a `.` and must not contain empty segments.
    pub fn insert(
        &mut self,
        path: impl Into<String>,
        tag: impl Into<String>,
    ) -> Result<Option<String>, SavError> {
        let path = path.into();
        let tag = tag.into();
        validate_path(&path)?;
        if tag.is_empty() {
            return Err(SavError::invalid_argument(format!(
                "type hint for {} has an empty tag",
                path
            )));
        }

        Ok(self.hints.insert(path, tag))
    }

    pub fn get(&self, path: &str) -> Option<&str> {
        self.hints.get(path).map(|x| x.as_str())
    }

    pub fn len(&self) -> usize {
        self.hints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hints.is_empty()
    }

    /// Iterate over `(path, tag)` pairs in path order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.hints.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

fn validate_path(path: &str) -> Result<(), SavError> {
    match path.strip_prefix('.') {
        Some(rest) if !rest.is_empty() && rest.split('.').all(|x| !x.is_empty()) => Ok(()),
        _ => Err(SavError::invalid_argument(format!(
            "type hint path must be a dotted path rooted at '.': {:?}",
            path
        ))),
    }
}

impl TryFrom<BTreeMap<String, String>> for TypeHints {
    type Error = SavError;

    fn try_from(value: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut hints = TypeHints::new();
        for (path, tag) in value {
            hints.insert(path, tag)?;
        }
        Ok(hints)
    }
}

impl From<TypeHints> for BTreeMap<String, String> {
    fn from(value: TypeHints) -> Self {
        value.hints
    }
}

impl<'a> IntoIterator for &'a TypeHints {
    type Item = (&'a String, &'a String);
    type IntoIter = std::collections::btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.hints.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SavErrorKind;

    #[test]
    fn palworld_hints() {
        let hints = TypeHints::palworld();
        assert_eq!(hints.len(), 6);
        assert_eq!(
            hints.get(".worldSaveData.FoliageGridSaveDataMap.ModelMap.InstanceDataMap.Key"),
            Some("Struct")
        );
    }

    #[test]
    fn reject_unrooted_paths() {
        let mut hints = TypeHints::new();
        for path in ["", ".", "worldSaveData.Key", ".worldSaveData..Key", ".Key."] {
            let err = hints.insert(path, "Struct").unwrap_err();
            assert!(
                matches!(err.kind(), SavErrorKind::InvalidArgument { .. }),
                "{:?}",
                path
            );
        }
        assert!(hints.is_empty());
    }

    #[test]
    fn reject_empty_tag() {
        let mut hints = TypeHints::new();
        assert!(hints.insert(".a.Key", "").is_err());
    }

    #[test]
    fn insert_replaces() {
        let mut hints = TypeHints::new();
        assert_eq!(hints.insert(".a.Key", "Struct").unwrap(), None);
        assert_eq!(
            hints.insert(".a.Key", "Guid").unwrap(),
            Some(String::from("Struct"))
        );
        assert_eq!(hints.iter().collect::<Vec<_>>(), vec![(".a.Key", "Guid")]);
    }
}
