//! The name attached to a field inside a GFF struct.

use std::fmt;
use std::str::{from_utf8, FromStr, Utf8Error};

use serde::de::{Deserialize, Deserializer, Error as DeError, Visitor};
use serde::ser::{Serialize, Serializer};

use crate::error::Error;

/// Name of a field inside a [`crate::value::Struct`](crate::value::Struct).
///
/// Stored as a fixed 16-byte array, NUL-padded, matching its on-disk representation
/// (§4.2's `LabelEntry`). Construction validates that the text fits: at most 16 bytes
/// in UTF-8 and no embedded NUL.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label([u8; 16]);

impl Label {
    /// Returns the label's text, if it is valid UTF-8 up to the first NUL padding byte.
    pub fn as_str(&self) -> Result<&str, Utf8Error> {
        for i in 0..self.0.len() {
            if self.0[i] == 0 {
                return from_utf8(&self.0[0..i]);
            }
        }
        from_utf8(&self.0)
    }

    /// Builds a label from raw bytes, which must be at most 16 bytes and contain no NUL.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCharacter`] if the slice is longer than 16 bytes or
    /// contains a NUL byte before its end.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() > 16 {
            return Err(Error::InvalidCharacter(format!(
                "label is {} bytes, but labels are limited to 16 bytes",
                bytes.len()
            )));
        }
        if bytes.contains(&0) {
            return Err(Error::InvalidCharacter("label contains an embedded NUL byte".into()));
        }
        let mut storage = [0u8; 16];
        storage[..bytes.len()].copy_from_slice(bytes);
        Ok(Label(storage))
    }
}

impl fmt::Debug for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.as_str() {
            Ok(value) => write!(f, "Label({value})"),
            Err(_) => write!(f, "Label({:?})", self.0),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let value = self.as_str().map_err(|_| fmt::Error)?;
        write!(f, "{value}")
    }
}

impl From<[u8; 16]> for Label {
    fn from(arr: [u8; 16]) -> Self {
        Label(arr)
    }
}

impl AsRef<[u8]> for Label {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Error> {
        Self::from_bytes(value.as_bytes())
    }
}

struct LabelVisitor;

impl<'de> Visitor<'de> for LabelVisitor {
    type Value = Label;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string of at most 16 bytes in UTF-8")
    }

    fn visit_str<E: DeError>(self, value: &str) -> Result<Label, E> {
        Label::from_bytes(value.as_bytes()).map_err(DeError::custom)
    }
}

impl<'de> Deserialize<'de> for Label {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_str(LabelVisitor)
    }
}

impl Serialize for Label {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let text = self.as_str().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(text)
    }
}

#[cfg(test)]
mod tests {
    use super::Label;

    #[test]
    fn label_constructs_from_str() {
        assert_eq!(Label::from(*b"short\0\0\0\0\0\0\0\0\0\0\0"), "short".parse().unwrap());
        assert_eq!(Label::from(*b"exact_16_chars_\0"), "exact_16_chars_".parse().unwrap());
    }

    #[test]
    fn label_rejects_too_long() {
        assert!("more_then_16_characters".parse::<Label>().is_err());
    }

    #[test]
    fn label_display_round_trips_text() {
        let label: Label = "FirstName".parse().unwrap();
        assert_eq!(label.to_string(), "FirstName");
    }
}
