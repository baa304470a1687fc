//! Splits one line of `.ndugff` text into a type tag, field name, optional struct id,
//! and optional raw value, mirroring the reference tooling's single tokenizer regex.

use std::sync::OnceLock;

use regex::Regex;

use crate::error::{Error, Result};
use crate::field_type::FieldType;

/// A DSL type tag: one of the 17 field types, or the locstring-only `gff.Language`
/// pseudo-type that never appears as a [`crate::value::Value`] on its own.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tag {
    /// A genuine field type.
    Field(FieldType),
    /// `gff.Language(...)`, used only for the per-language entries inside a
    /// `gff.CExoLocString(...)` node.
    Language,
}

impl Tag {
    fn dsl_tag(&self) -> &'static str {
        match self {
            Tag::Field(ty) => ty.dsl_tag(),
            Tag::Language => "gff.Language",
        }
    }
}

/// One parsed line of `.ndugff` text.
#[derive(Debug)]
pub enum Line {
    /// A blank line or a `#`-prefixed comment; ignored.
    Blank,
    /// `end()`, closing the innermost open node.
    End,
    /// A field line: either a leaf value or the opening of a node (struct/list/loc-string).
    Field { tag: Tag, name: String, struct_id: Option<i64>, raw_value: Option<String> },
}

fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        let mut tags: Vec<&str> = FieldType::ALL.iter().map(FieldType::dsl_tag).collect();
        tags.push("gff.Language");
        let alternation = tags.iter().map(|t| regex::escape(t)).collect::<Vec<_>>().join("|");
        let source = format!(
            r#"^(?P<type>{alternation})\((?P<name>[\w ]*)\)(?:\.id\((?P<struct_id>-?\d+)\))?(?:\:[ ]*(?P<value>.+))?$"#
        );
        Regex::new(&source).expect("statically constructed DSL pattern is valid")
    })
}

fn tag_from_text(text: &str) -> Result<Tag> {
    if text == "gff.Language" {
        return Ok(Tag::Language);
    }
    FieldType::from_dsl_tag(text).map(Tag::Field)
}

/// Tokenizes one stripped line of `.ndugff` text. `line_no` is used only to locate errors.
pub fn tokenize(line_no: usize, line: &str) -> Result<Line> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(Line::Blank);
    }
    if line == "end()" {
        return Ok(Line::End);
    }
    let caps = pattern().captures(line).ok_or_else(|| Error::malformed_line(line_no, format!("unrecognized line {line:?}")))?;
    let tag_text = &caps["type"];
    let tag = tag_from_text(tag_text).map_err(|_| Error::malformed_line(line_no, format!("unknown type tag {tag_text:?}")))?;
    let name = caps.name("name").map(|m| m.as_str().to_string()).unwrap_or_default();
    let struct_id = caps
        .name("struct_id")
        .map(|m| m.as_str().parse::<i64>().map_err(|_| Error::malformed_line(line_no, "struct id is not an integer")))
        .transpose()?;
    let raw_value = caps.name("value").map(|m| m.as_str().to_string());

    if matches!(tag, Tag::Field(FieldType::Struct)) && struct_id.is_none() {
        return Err(Error::malformed_line(line_no, "gff.Struct is missing its .id(...)"));
    }
    Ok(Line::Field { tag, name, struct_id, raw_value })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokenizes_a_leaf_field() {
        match tokenize(1, r#"gff.CExoString(Name): "Aribeth""#).unwrap() {
            Line::Field { tag: Tag::Field(FieldType::CExoString), name, raw_value, .. } => {
                assert_eq!(name, "Name");
                assert_eq!(raw_value.as_deref(), Some(r#""Aribeth""#));
            }
            other => panic!("unexpected line: {other:?}"),
        }
    }

    #[test]
    fn tokenizes_a_struct_open_with_id() {
        match tokenize(1, "gff.Struct(Nested).id(5):").unwrap() {
            Line::Field { tag: Tag::Field(FieldType::Struct), name, struct_id, .. } => {
                assert_eq!(name, "Nested");
                assert_eq!(struct_id, Some(5));
            }
            other => panic!("unexpected line: {other:?}"),
        }
    }

    #[test]
    fn struct_without_id_is_rejected() {
        assert!(tokenize(1, "gff.Struct(Nested):").is_err());
    }

    #[test]
    fn recognizes_end_and_blank_and_comment() {
        assert!(matches!(tokenize(1, "end()").unwrap(), Line::End));
        assert!(matches!(tokenize(1, "").unwrap(), Line::Blank));
        assert!(matches!(tokenize(1, "# a comment").unwrap(), Line::Blank));
    }

    #[test]
    fn unrecognized_line_is_rejected() {
        assert!(tokenize(1, "not a dsl line").is_err());
    }
}
