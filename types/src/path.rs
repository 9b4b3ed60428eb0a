//! Child indices and derivation paths (`m/0'/1/2h`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::PathError;

/// Offset added to an index to mark hardened derivation (2^31).
pub const HARDENED_OFFSET: u32 = 0x8000_0000;

/// A child number as it appears on the wire: `i` for normal children,
/// `i + 2^31` for hardened ones.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChildIndex(u32);

impl ChildIndex {
    /// A normal (non-hardened) child, `index < 2^31`.
    pub fn normal(index: u32) -> Result<Self, PathError> {
        if index >= HARDENED_OFFSET {
            return Err(PathError::IndexOutOfRange(index));
        }
        Ok(Self(index))
    }

    /// A hardened child, `index < 2^31`; stored as `index + 2^31`.
    pub fn hardened(index: u32) -> Result<Self, PathError> {
        if index >= HARDENED_OFFSET {
            return Err(PathError::IndexOutOfRange(index));
        }
        Ok(Self(index + HARDENED_OFFSET))
    }

    pub fn new(index: u32, hardened: bool) -> Result<Self, PathError> {
        if hardened {
            Self::hardened(index)
        } else {
            Self::normal(index)
        }
    }

    /// Wrap a raw serialized child number.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The serialized child number, hardened offset included.
    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_hardened(self) -> bool {
        self.0 >= HARDENED_OFFSET
    }

    /// The index without the hardened offset.
    pub const fn index(self) -> u32 {
        self.0 & !HARDENED_OFFSET
    }

    pub fn to_be_bytes(self) -> [u8; 4] {
        self.0.to_be_bytes()
    }
}

impl fmt::Debug for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChildIndex({})", self)
    }
}

impl fmt::Display for ChildIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_hardened() {
            write!(f, "{}'", self.index())
        } else {
            write!(f, "{}", self.index())
        }
    }
}

impl FromStr for ChildIndex {
    type Err = PathError;

    /// Accepts `5`, `5'`, `5h` and `5H`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (digits, hardened) = match s.strip_suffix(['\'', 'h', 'H']) {
            Some(rest) => (rest, true),
            None => (s, false),
        };
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::InvalidComponent(s.to_string()));
        }
        let index: u32 = digits
            .parse()
            .map_err(|_| PathError::InvalidComponent(s.to_string()))?;
        Self::new(index, hardened)
    }
}

/// Sequence of child indices leading from the master node.
#[derive(Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DerivationPath(Vec<ChildIndex>);

impl DerivationPath {
    /// The empty path, `m`.
    pub fn master() -> Self {
        Self(Vec::new())
    }

    pub fn from_indices(indices: Vec<ChildIndex>) -> Result<Self, PathError> {
        if indices.len() > u8::MAX as usize {
            return Err(PathError::TooDeep(indices.len()));
        }
        Ok(Self(indices))
    }

    /// A new path one level deeper.
    pub fn child(&self, index: ChildIndex) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    pub fn is_master(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of derivation steps from the master node.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn last(&self) -> Option<ChildIndex> {
        self.0.last().copied()
    }

    pub fn as_slice(&self) -> &[ChildIndex] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ChildIndex> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a DerivationPath {
    type Item = &'a ChildIndex;
    type IntoIter = std::slice::Iter<'a, ChildIndex>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Debug for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DerivationPath({})", self)
    }
}

impl fmt::Display for DerivationPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("m")?;
        for index in &self.0 {
            write!(f, "/{}", index)?;
        }
        Ok(())
    }
}

impl FromStr for DerivationPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.trim().split('/');
        match parts.next() {
            Some("m") | Some("M") => {}
            _ => return Err(PathError::MissingMaster),
        }
        let indices = parts
            .map(ChildIndex::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_indices(indices)
    }
}

impl TryFrom<String> for DerivationPath {
    type Error = PathError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<DerivationPath> for String {
    fn from(path: DerivationPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_bip32_vector_path() {
        let path: DerivationPath = "m/0'/1/2'/2/1000000000".parse().unwrap();
        let raw: Vec<u32> = path.iter().map(|i| i.raw()).collect();
        assert_eq!(
            raw,
            vec![HARDENED_OFFSET, 1, HARDENED_OFFSET + 2, 2, 1_000_000_000]
        );
        assert_eq!(path.to_string(), "m/0'/1/2'/2/1000000000");
        assert_eq!(path.depth(), 5);
    }

    #[test]
    fn h_suffix_is_hardened() {
        let a: DerivationPath = "m/44h/0H/0'".parse().unwrap();
        assert!(a.iter().all(|i| i.is_hardened()));
        assert_eq!(a.to_string(), "m/44'/0'/0'");
    }

    #[test]
    fn master_path() {
        let m: DerivationPath = "m".parse().unwrap();
        assert!(m.is_master());
        assert_eq!(m.to_string(), "m");
        assert_eq!(m, DerivationPath::master());
    }

    #[test]
    fn rejects_malformed_paths() {
        assert_eq!(
            "0/1".parse::<DerivationPath>(),
            Err(PathError::MissingMaster)
        );
        assert!("m/".parse::<DerivationPath>().is_err());
        assert!("m/x".parse::<DerivationPath>().is_err());
        assert!("m/-1".parse::<DerivationPath>().is_err());
        assert!("m/1''".parse::<DerivationPath>().is_err());
        assert_eq!(
            "m/2147483648".parse::<DerivationPath>(),
            Err(PathError::IndexOutOfRange(2_147_483_648))
        );
    }

    #[test]
    fn child_index_bounds() {
        assert!(ChildIndex::normal(HARDENED_OFFSET - 1).is_ok());
        assert!(ChildIndex::normal(HARDENED_OFFSET).is_err());
        let h = ChildIndex::hardened(7).unwrap();
        assert!(h.is_hardened());
        assert_eq!(h.index(), 7);
        assert_eq!(h.raw(), HARDENED_OFFSET + 7);
        assert_eq!(ChildIndex::from_raw(h.raw()), h);
    }

    #[test]
    fn child_does_not_mutate_parent() {
        let parent: DerivationPath = "m/1".parse().unwrap();
        let child = parent.child(ChildIndex::hardened(3).unwrap());
        assert_eq!(parent.to_string(), "m/1");
        assert_eq!(child.to_string(), "m/1/3'");
    }

    #[test]
    fn serde_uses_string_form() {
        let path: DerivationPath = "m/84'/0'/0'/0/5".parse().unwrap();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"m/84'/0'/0'/0/5\"");
        let back: DerivationPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
