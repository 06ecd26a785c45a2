//! Variable identifiers.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Borrow;
use std::fmt;

/// Name used to look up a variable in a model's variable directory.
///
/// An identifier holds the exact bytes of its row in the host's identifier
/// matrix. Equality and ordering are byte-wise, so sorted collections of
/// identifiers give a reproducible order independent of the order in which
/// the host declared them, and two rows that differ in any byte never
/// compare equal.
///
/// Decoding never fails, which means an identifier may be empty (an all-blank
/// row) or hold bytes that are not valid UTF-8. Neither kind ever resolves
/// against a model, since models are looked up by text.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VariableId(Box<[u8]>);

impl VariableId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into().into_bytes().into_boxed_slice())
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// The identifier as text, if its bytes are valid UTF-8.
    pub fn to_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    /// Length in bytes of the source row.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Debug for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "VariableId(\"{}\")", self.0.escape_ascii())
    }
}

/// Invalid UTF-8 is shown with replacement characters.
impl fmt::Display for VariableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.0))
    }
}

impl From<&str> for VariableId {
    fn from(value: &str) -> Self {
        Self::from_bytes(value.as_bytes())
    }
}

impl From<String> for VariableId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<Vec<u8>> for VariableId {
    fn from(value: Vec<u8>) -> Self {
        Self(value.into_boxed_slice())
    }
}

impl AsRef<[u8]> for VariableId {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

// Lets sets and maps keyed by `VariableId` be queried with plain bytes.
impl Borrow<[u8]> for VariableId {
    fn borrow(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for VariableId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for VariableId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Self::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn ordering_is_bytewise() {
        let mut ids = vec![
            VariableId::from("beta"),
            VariableId::from("Alpha"),
            VariableId::from_bytes(&[0xFF]),
            VariableId::from("alpha"),
        ];
        ids.sort();
        let names: Vec<String> = ids.iter().map(|x| x.to_string()).collect();
        assert_eq!(names, ["Alpha", "alpha", "beta", "\u{FFFD}"]);
    }

    #[test]
    fn set_lookup_by_bytes() {
        let set: BTreeSet<VariableId> = ["alpha", "beta"].into_iter().map(VariableId::from).collect();
        assert!(set.contains(b"alpha".as_slice()));
        assert!(!set.contains(b"gamma".as_slice()));
    }

    #[test]
    fn invalid_utf8_is_kept_verbatim() {
        let a = VariableId::from_bytes(&[b'x', 0xFF]);
        let b = VariableId::from_bytes(&[b'x', 0xFE]);
        assert_ne!(a, b);
        assert_eq!(a.len(), 2);
        assert_eq!(a.to_str(), None);
        assert_eq!(format!("{:?}", a), "VariableId(\"x\\xff\")");
        assert_eq!(VariableId::from("mach").to_str(), Some("mach"));
    }

    #[test]
    fn serialises_as_plain_string() {
        let id = VariableId::from("dynamicPressure");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"dynamicPressure\"");
        let back: VariableId = serde_json::from_str("\"q\"").unwrap();
        assert_eq!(back, VariableId::from("q"));
    }
}
