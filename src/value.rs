//! The Value Model: the single tree representation shared by all three codecs.

use std::fmt;
use std::str::{from_utf8, FromStr};

use indexmap::IndexMap;

use crate::error::Error;
use crate::field_type::FieldType;
use crate::label::Label;
use crate::language::LanguageId;

/// The sentinel value meaning "unset" for a `Dword` strref or a struct id.
pub const SENTINEL: u32 = 0xFFFF_FFFF;

/// A short ASCII resource name, at most 16 bytes, as used for `ResRef` fields and
/// ERF archive entries.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ResRef(String);

impl ResRef {
    /// Builds a `ResRef`, validating that it is ASCII and at most 16 bytes.
    ///
    /// # Errors
    /// Returns [`Error::InvalidCharacter`] if the text is longer than 16 bytes or
    /// contains a non-ASCII byte.
    pub fn new(text: impl Into<String>) -> Result<Self, Error> {
        let text = text.into();
        if text.len() > 16 {
            return Err(Error::InvalidCharacter(format!(
                "resref {text:?} is {} bytes, but resrefs are limited to 16 bytes",
                text.len()
            )));
        }
        if !text.is_ascii() {
            return Err(Error::InvalidCharacter(format!("resref {text:?} contains non-ASCII bytes")));
        }
        Ok(ResRef(text))
    }

    /// Returns the resref's text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ResRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ResRef({:?})", self.0)
    }
}

impl fmt::Display for ResRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ResRef {
    type Err = Error;

    fn from_str(text: &str) -> Result<Self, Error> {
        Self::new(text)
    }
}

/// The 4-byte ASCII tag identifying a GFF document's sub-type, e.g. `"UTC "`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct MagicTag([u8; 4]);

impl MagicTag {
    /// Builds a tag from text, truncating to 4 bytes or right-padding with spaces
    /// if shorter, matching the DSL's `gff.MagicTag` normalization (§4.4).
    pub fn new(text: &str) -> Self {
        let mut bytes = [b' '; 4];
        for (slot, byte) in bytes.iter_mut().zip(text.as_bytes().iter().take(4)) {
            *slot = *byte;
        }
        MagicTag(bytes)
    }

    /// Builds a tag from exactly 4 raw bytes, as read from a binary header.
    pub fn from_bytes(bytes: [u8; 4]) -> Self {
        MagicTag(bytes)
    }

    /// The 4 raw bytes of this tag.
    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// The tag's text, if it is valid ASCII.
    pub fn as_str(&self) -> Result<&str, Error> {
        from_utf8(&self.0).map_err(|_| Error::InvalidCharacter("magic tag is not ASCII".into()))
    }
}

impl fmt::Debug for MagicTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.as_str() {
            Ok(s) => write!(f, "MagicTag({s:?})"),
            Err(_) => write!(f, "MagicTag({:?})", self.0),
        }
    }
}

/// A localized string bundle: an optional string-table reference plus per-language text.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LocString {
    /// Index into the external string table (`dialog.tlk`), or [`SENTINEL`] if unset.
    pub strref: u32,
    /// Text for each language/gender this string has been localized into.
    pub entries: IndexMap<LanguageId, String>,
}

impl LocString {
    /// Builds an empty loc-string with the strref left at the sentinel.
    pub fn new() -> Self {
        LocString { strref: SENTINEL, entries: IndexMap::new() }
    }

    /// Returns `true` if [`LocString::strref`] is the sentinel value.
    pub fn has_no_strref(&self) -> bool {
        self.strref == SENTINEL
    }
}

/// An ordered record of labeled fields, carrying an opaque `struct_id`.
///
/// Field order is insertion order, and readers preserve whatever order their
/// source carries. Only [`dsl::write`](crate::dsl::write) imposes canonical
/// emission order, via [`canonicalize`], and only on the text it emits.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Struct {
    /// Metadata the game layer interprets; opaque to this codec.
    pub struct_id: u32,
    fields: IndexMap<Label, Value>,
}

impl Struct {
    /// Builds an empty struct with the given struct id.
    pub fn new(struct_id: u32) -> Self {
        Struct { struct_id, fields: IndexMap::new() }
    }

    /// Inserts a field, preserving first-seen order for the label.
    ///
    /// # Errors
    /// Returns [`Error::MalformedBinary`]-free [`Error::TypeMismatch`]... actually
    /// returns [`Error::InvalidCharacter`] only via [`Label`] construction upstream;
    /// here it returns an error if the label is already present, since §3 requires
    /// labels to be unique within a struct.
    pub fn insert(&mut self, label: Label, value: Value) -> Result<(), Error> {
        if self.fields.contains_key(&label) {
            return Err(Error::TypeMismatch {
                expected: "a struct with unique labels".into(),
                found: format!("duplicate label {label}"),
            });
        }
        self.fields.insert(label, value);
        Ok(())
    }

    /// Looks up a field by label.
    pub fn get(&self, label: &str) -> Option<&Value> {
        self.fields.iter().find(|(l, _)| l.as_str().map(|s| s == label).unwrap_or(false)).map(|(_, v)| v)
    }

    /// Number of fields in this struct.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if this struct has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Iterates over `(label, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Label, &Value)> {
        self.fields.iter()
    }
}

impl<'a> IntoIterator for &'a Struct {
    type Item = (&'a Label, &'a Value);
    type IntoIter = indexmap::map::Iter<'a, Label, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

/// A GFF value: one of the 17 field types.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Unsigned 8-bit integer.
    Byte(u8),
    /// Signed 8-bit integer.
    Char(i8),
    /// Unsigned 16-bit integer.
    Word(u16),
    /// Signed 16-bit integer.
    Short(i16),
    /// Unsigned 32-bit integer.
    Dword(u32),
    /// Signed 32-bit integer.
    Int(i32),
    /// Unsigned 64-bit integer.
    Dword64(u64),
    /// Signed 64-bit integer.
    Int64(i64),
    /// 32-bit float.
    Float(f32),
    /// 64-bit float.
    Double(f64),
    /// Short ASCII resource reference.
    ResRef(ResRef),
    /// Length-prefixed byte string, stored decoded as UTF-8 text (§3).
    CExoString(String),
    /// Localized string bundle.
    CExoLocString(LocString),
    /// Opaque byte blob.
    Void(Vec<u8>),
    /// Nested struct.
    Struct(Struct),
    /// Ordered list of structs.
    List(Vec<Struct>),
}

impl Value {
    /// The field type tag for this value.
    pub fn field_type(&self) -> FieldType {
        match self {
            Value::Byte(_) => FieldType::Byte,
            Value::Char(_) => FieldType::Char,
            Value::Word(_) => FieldType::Word,
            Value::Short(_) => FieldType::Short,
            Value::Dword(_) => FieldType::Dword,
            Value::Int(_) => FieldType::Int,
            Value::Dword64(_) => FieldType::Dword64,
            Value::Int64(_) => FieldType::Int64,
            Value::Float(_) => FieldType::Float,
            Value::Double(_) => FieldType::Double,
            Value::ResRef(_) => FieldType::ResRef,
            Value::CExoString(_) => FieldType::CExoString,
            Value::CExoLocString(_) => FieldType::CExoLocString,
            Value::Void(_) => FieldType::Void,
            Value::Struct(_) => FieldType::Struct,
            Value::List(_) => FieldType::List,
        }
    }
}

/// A complete GFF document: a file-type tag plus its root struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// The 4-byte file-type tag, e.g. `"UTC "`.
    pub magic_tag: MagicTag,
    /// The document's root struct. Conventionally carries `struct_id == SENTINEL`.
    pub root: Struct,
}

impl Document {
    /// Builds a document from a magic tag and root struct.
    pub fn new(magic_tag: MagicTag, root: Struct) -> Self {
        Document { magic_tag, root }
    }
}

/// Normalizes line endings in a string value per §3: CRLF folds to LF and trailing
/// whitespace is stripped.
pub fn normalize_string_value(text: &str) -> String {
    text.replace("\r\n", "\n").trim_end().to_string()
}

/// Recursively sorts `s`'s fields (and every nested struct/list/loc-string) into the
/// canonical emission order: `(field_type.canonical_rank(), label.to_lowercase())`.
///
/// Every codec reader in this crate calls this immediately after parsing, so that
/// a document's field order in memory never depends on which format it was read
/// from, matching how the reference tooling always normalizes on load before
/// writing any of the three formats back out.
pub fn canonicalize(s: &mut Struct) {
    let mut entries: Vec<(Label, Value)> = s.fields.drain(..).collect();
    entries.sort_by(|(a_label, a_value), (b_label, b_value)| {
        let a_rank = a_value.field_type().canonical_rank();
        let b_rank = b_value.field_type().canonical_rank();
        a_rank.cmp(&b_rank).then_with(|| sort_key(a_label).cmp(&sort_key(b_label)))
    });
    for (_, value) in entries.iter_mut() {
        canonicalize_value(value);
    }
    s.fields = entries.into_iter().collect();
}

fn sort_key(label: &Label) -> String {
    label.as_str().unwrap_or_default().to_lowercase()
}

fn canonicalize_value(value: &mut Value) {
    match value {
        Value::Struct(inner) => canonicalize(inner),
        Value::List(items) => items.iter_mut().for_each(canonicalize),
        Value::CExoLocString(loc) => {
            let mut entries: Vec<(LanguageId, String)> = loc.entries.drain(..).collect();
            entries.sort_by_key(|(id, _)| id.name().map(str::to_lowercase).unwrap_or_default());
            loc.entries = entries.into_iter().collect();
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resref_rejects_too_long() {
        assert!(ResRef::new("this_name_is_seventeen").is_err());
    }

    #[test]
    fn resref_rejects_non_ascii() {
        assert!(ResRef::new("caf\u{e9}").is_err());
    }

    #[test]
    fn magic_tag_pads_short_text() {
        assert_eq!(MagicTag::new("UTC").as_str().unwrap(), "UTC ");
    }

    #[test]
    fn magic_tag_truncates_long_text() {
        assert_eq!(MagicTag::new("UTCX_EXTRA").as_str().unwrap(), "UTCX");
    }

    #[test]
    fn struct_rejects_duplicate_labels() {
        let mut s = Struct::new(SENTINEL);
        s.insert("A".parse().unwrap(), Value::Byte(1)).unwrap();
        assert!(s.insert("A".parse().unwrap(), Value::Byte(2)).is_err());
    }

    #[test]
    fn struct_preserves_insertion_order() {
        let mut s = Struct::new(0);
        s.insert("b".parse().unwrap(), Value::Byte(2)).unwrap();
        s.insert("a".parse().unwrap(), Value::Byte(1)).unwrap();
        let labels: Vec<_> = s.iter().map(|(l, _)| l.to_string()).collect();
        assert_eq!(labels, ["b", "a"]);
    }

    #[test]
    fn normalize_folds_crlf_and_trims_trailing() {
        assert_eq!(normalize_string_value("hi\r\nthere   "), "hi\nthere");
    }

    #[test]
    fn canonicalize_sorts_by_type_rank_then_lowercased_label() {
        let mut s = Struct::new(0);
        s.insert("zeta".parse().unwrap(), Value::Dword(1)).unwrap();
        s.insert("alpha".parse().unwrap(), Value::Int(2)).unwrap();
        s.insert("Beta".parse().unwrap(), Value::Byte(3)).unwrap();
        canonicalize(&mut s);
        let labels: Vec<_> = s.iter().map(|(l, _)| l.to_string()).collect();
        assert_eq!(labels, ["Beta", "alpha", "zeta"]);
    }

    #[test]
    fn canonicalize_sorts_locstring_entries_by_name_not_id() {
        use crate::language::{Gender, Language, LanguageId};

        let mut loc = LocString::new();
        loc.entries.insert(LanguageId::new(Language::Spanish, Gender::Male), "hola".into());
        loc.entries.insert(LanguageId::new(Language::Polish, Gender::Male), "czesc".into());
        let mut s = Struct::new(0);
        s.insert("Greeting".parse().unwrap(), Value::CExoLocString(loc)).unwrap();
        canonicalize(&mut s);
        match s.get("Greeting").unwrap() {
            Value::CExoLocString(loc) => {
                let names: Vec<_> = loc.entries.keys().map(|id| id.name().unwrap()).collect();
                assert_eq!(names, ["POLISH", "SPANISH"]);
            }
            other => panic!("expected a loc-string, got {other:?}"),
        }
    }
}
