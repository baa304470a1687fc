//! Static bijection among the four identifier namespaces for the 17 GFF field types.

use crate::error::Error;

/// One of the 17 field types a GFF [`crate::value::Value`] can hold.
///
/// The discriminant values match the binary type code used on disk (§4.2), so
/// converting to/from `u32` is a plain cast rather than a lookup table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum FieldType {
    /// Unsigned 8-bit integer.
    Byte = 0,
    /// Signed 8-bit integer.
    Char = 1,
    /// Unsigned 16-bit integer.
    Word = 2,
    /// Signed 16-bit integer.
    Short = 3,
    /// Unsigned 32-bit integer.
    Dword = 4,
    /// Signed 32-bit integer.
    Int = 5,
    /// Unsigned 64-bit integer, stored indirectly in the field-data blob.
    Dword64 = 6,
    /// Signed 64-bit integer, stored indirectly.
    Int64 = 7,
    /// 32-bit IEEE 754 float.
    Float = 8,
    /// 64-bit IEEE 754 float, stored indirectly.
    Double = 9,
    /// Length-prefixed (u32) byte string.
    CExoString = 10,
    /// Length-prefixed (u8) ASCII resource reference, at most 16 bytes.
    ResRef = 11,
    /// `{ strref, per-language text }` bundle.
    CExoLocString = 12,
    /// Opaque length-prefixed (u32) byte blob.
    Void = 13,
    /// Nested struct.
    Struct = 14,
    /// Ordered sequence of structs.
    List = 15,
    /// 4-byte ASCII file-type tag; only ever appears at the root of a [`crate::value::Document`].
    MagicTag = 16,
}

impl FieldType {
    /// All 17 field types, in binary type-tag order (0–16). For the order fields are
    /// grouped in when emitting DSL/JSON output, see [`FieldType::canonical_rank`].
    pub const ALL: [FieldType; 17] = [
        FieldType::Byte,
        FieldType::Char,
        FieldType::Word,
        FieldType::Short,
        FieldType::Dword,
        FieldType::Int,
        FieldType::Dword64,
        FieldType::Int64,
        FieldType::Float,
        FieldType::Double,
        FieldType::CExoString,
        FieldType::ResRef,
        FieldType::CExoLocString,
        FieldType::Void,
        FieldType::Struct,
        FieldType::List,
        FieldType::MagicTag,
    ];

    /// Returns `true` for the three types that carry children rather than a leaf value.
    #[inline]
    pub fn is_node(&self) -> bool {
        matches!(self, FieldType::Struct | FieldType::List | FieldType::CExoLocString)
    }

    /// Returns `true` for string types that escape `"`, `\t`, `\n` in DSL/JSON text.
    #[inline]
    pub fn is_escaped_string(&self) -> bool {
        matches!(self, FieldType::CExoString)
    }

    /// Returns `true` for string types that must never contain a backslash.
    #[inline]
    pub fn is_literal_string(&self) -> bool {
        matches!(self, FieldType::ResRef | FieldType::MagicTag | FieldType::Void)
    }

    /// Returns `true` if the field's payload is stored inline in the 4-byte
    /// `value_or_offset` slot of its binary field entry, rather than in the
    /// field-data blob.
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(
            self,
            FieldType::Byte
                | FieldType::Char
                | FieldType::Word
                | FieldType::Short
                | FieldType::Dword
                | FieldType::Int
                | FieldType::Float
        )
    }

    /// Converts a binary type code (0–16) to a `FieldType`.
    ///
    /// # Errors
    /// Returns [`Error::UnknownType`] for any byte outside 0–16. `MagicTag` (16) is
    /// accepted here for symmetry even though it is never read from a field entry
    /// on disk — it only ever arrives via the header.
    pub fn from_binary_tag(tag: u32) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|t| *t as u32 == tag)
            .ok_or_else(|| Error::UnknownType(format!("binary type tag {tag}")))
    }

    /// The binary type code for this field type.
    #[inline]
    pub fn binary_tag(&self) -> u32 {
        *self as u32
    }

    /// The JSON `"type"` tag used by the reference community tooling.
    pub fn json_tag(&self) -> &'static str {
        match self {
            FieldType::Byte => "byte",
            FieldType::Char => "char",
            FieldType::Word => "word",
            FieldType::Short => "short",
            FieldType::Dword => "dword",
            FieldType::Int => "int",
            FieldType::Dword64 => "dword64",
            FieldType::Int64 => "int64",
            FieldType::Float => "float",
            FieldType::Double => "double",
            FieldType::CExoString => "cexostring",
            FieldType::ResRef => "resref",
            FieldType::CExoLocString => "cexolocstring",
            FieldType::Void => "void",
            FieldType::Struct => "struct",
            FieldType::List => "list",
            FieldType::MagicTag => "__data_type",
        }
    }

    /// Looks up a field type by its JSON `"type"` tag.
    pub fn from_json_tag(tag: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|t| t.json_tag() == tag)
            .ok_or_else(|| Error::UnknownType(format!("JSON type {tag:?}")))
    }

    /// The DSL type tag, e.g. `"gff.Byte"`. `Void` uses `"gff.Base64String"` in the
    /// DSL, reflecting how its payload is written (base64 text), even though its
    /// JSON tag remains `"void"`.
    pub fn dsl_tag(&self) -> &'static str {
        match self {
            FieldType::Byte => "gff.Byte",
            FieldType::Char => "gff.Char",
            FieldType::Word => "gff.Word",
            FieldType::Short => "gff.Short",
            FieldType::Dword => "gff.Dword",
            FieldType::Int => "gff.Int",
            FieldType::Dword64 => "gff.Dword64",
            FieldType::Int64 => "gff.Int64",
            FieldType::Float => "gff.Float",
            FieldType::Double => "gff.Double",
            FieldType::CExoString => "gff.CExoString",
            FieldType::ResRef => "gff.ResRef",
            FieldType::CExoLocString => "gff.CExoLocString",
            FieldType::Void => "gff.Base64String",
            FieldType::Struct => "gff.Struct",
            FieldType::List => "gff.List",
            FieldType::MagicTag => "gff.MagicTag",
        }
    }

    /// Looks up a field type by its DSL type tag.
    pub fn from_dsl_tag(tag: &str) -> Result<Self, Error> {
        Self::ALL
            .into_iter()
            .find(|t| t.dsl_tag() == tag)
            .ok_or_else(|| Error::UnknownType(format!("DSL type {tag:?}")))
    }

    /// This type's rank in the canonical field-emission order used by the DSL and
    /// JSON writers (§4.4 "Emit ordering"): struct fields are sorted by
    /// `(canonical_rank, label.to_lowercase())` before being written, regardless of
    /// the order they were read in. Note this does NOT match [`FieldType::binary_tag`]
    /// order: `Int` sorts before `Dword`, and `Int64`/`Dword64` sort before `Float`/`Double`.
    pub fn canonical_rank(&self) -> u8 {
        match self {
            FieldType::Byte => 0,
            FieldType::Char => 1,
            FieldType::Word => 2,
            FieldType::Short => 3,
            FieldType::Int => 4,
            FieldType::Dword => 5,
            FieldType::Int64 => 6,
            FieldType::Dword64 => 7,
            FieldType::Float => 8,
            FieldType::Double => 9,
            FieldType::MagicTag => 10,
            FieldType::ResRef => 11,
            FieldType::CExoString => 12,
            FieldType::Void => 13,
            FieldType::CExoLocString => 14,
            FieldType::Struct => 15,
            FieldType::List => 16,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::FieldType;

    #[test]
    fn binary_tag_round_trips() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::from_binary_tag(ty.binary_tag()).unwrap(), ty);
        }
    }

    #[test]
    fn json_tag_round_trips() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::from_json_tag(ty.json_tag()).unwrap(), ty);
        }
    }

    #[test]
    fn dsl_tag_round_trips() {
        for ty in FieldType::ALL {
            assert_eq!(FieldType::from_dsl_tag(ty.dsl_tag()).unwrap(), ty);
        }
    }

    #[test]
    fn node_types_are_exactly_three() {
        let nodes: Vec<_> = FieldType::ALL.into_iter().filter(FieldType::is_node).collect();
        assert_eq!(nodes, [FieldType::CExoLocString, FieldType::Struct, FieldType::List]);
    }

    #[test]
    fn unknown_binary_tag_is_rejected() {
        assert!(FieldType::from_binary_tag(99).is_err());
    }

    #[test]
    fn canonical_rank_diverges_from_binary_tag_order() {
        assert!(FieldType::Int.canonical_rank() < FieldType::Dword.canonical_rank());
        assert!(FieldType::Dword.binary_tag() < FieldType::Int.binary_tag());
    }
}
