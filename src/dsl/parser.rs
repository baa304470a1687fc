//! Parses `.ndugff` text into a [`Document`] with a small stack machine, one open
//! node (struct, list, or loc-string) per stack frame.

use crate::dsl::tokenizer::{tokenize, Line, Tag};
use crate::error::{Error, Result};
use crate::field_type::FieldType;
use crate::language::LanguageId;
use crate::value::{normalize_string_value, Document, LocString, MagicTag, ResRef, Struct, Value, SENTINEL};

enum Container {
    /// The implicit document root, holding exactly the two pseudo-fields every
    /// `.ndugff` file has: `gff.MagicTag(__type__)` and `gff.Struct(__root__)`.
    Top { magic_tag: Option<MagicTag>, root: Option<Struct> },
    Struct(Struct),
    List(Vec<Struct>),
    Loc(LocString),
}

struct Frame {
    /// The field name this frame will be attached under once it closes.
    /// Empty for list members, which attach positionally instead.
    name: String,
    container: Container,
}

/// Parses a complete `.ndugff` document from `text`.
///
/// # Errors
/// Returns [`Error::MalformedText`] for any unrecognized line, type/value
/// mismatch, or unbalanced `end()`/open node.
pub fn parse(text: &str) -> Result<Document> {
    let mut stack = vec![Frame { name: String::new(), container: Container::Top { magic_tag: None, root: None } }];

    for (i, raw_line) in text.lines().enumerate() {
        let line_no = i + 1;
        match tokenize(line_no, raw_line)? {
            Line::Blank => {}
            Line::End => {
                if stack.len() <= 1 {
                    return Err(Error::UnbalancedScope(format!("line {line_no}: end() with no open node to close")));
                }
                let frame = stack.pop().expect("checked above");
                attach_closed_frame(line_no, &mut stack, frame)?;
            }
            Line::Field { tag, name, struct_id, raw_value } => {
                if let Tag::Field(ty) = tag {
                    if ty.is_node() {
                        let container = match ty {
                            FieldType::Struct => Container::Struct(Struct::new(struct_id_from_pretty(struct_id.expect("tokenizer requires .id() on gff.Struct")))),
                            FieldType::List => Container::List(Vec::new()),
                            FieldType::CExoLocString => Container::Loc(LocString::new()),
                            _ => unreachable!("is_node() is only true for Struct, List, CExoLocString"),
                        };
                        stack.push(Frame { name, container });
                        continue;
                    }
                }
                let raw_value = raw_value.ok_or_else(|| Error::malformed_line(line_no, format!("{name} is missing a value")))?;
                let text_value = decode_text(line_no, tag, &raw_value)?;
                let top = stack.last_mut().expect("the top-level frame is never popped");
                apply_leaf(line_no, top, tag, &name, &text_value)?;
            }
        }
    }

    if stack.len() != 1 {
        return Err(Error::UnbalancedScope(format!("{} node(s) left open at end of input", stack.len() - 1)));
    }
    match stack.pop().expect("checked above").container {
        Container::Top { magic_tag: Some(magic_tag), root: Some(root) } => Ok(Document::new(magic_tag, root)),
        Container::Top { magic_tag, root } => Err(Error::UnbalancedScope(format!(
            "document is missing {}",
            match (magic_tag.is_some(), root.is_some()) {
                (false, _) => "gff.MagicTag(__type__)",
                (_, false) => "gff.Struct(__root__)",
                _ => unreachable!(),
            }
        ))),
        _ => unreachable!("the bottom stack frame is always Container::Top"),
    }
}

fn struct_id_from_pretty(raw: i64) -> u32 {
    if raw == -1 {
        SENTINEL
    } else {
        raw as u32
    }
}

fn attach_closed_frame(line_no: usize, stack: &mut [Frame], frame: Frame) -> Result<()> {
    let Frame { name, container } = frame;
    let parent = stack.last_mut().expect("checked by caller");

    match (&mut parent.container, container) {
        (Container::Top { root, .. }, Container::Struct(s)) if name == "__root__" => {
            *root = Some(s);
            Ok(())
        }
        (Container::Top { .. }, _) => {
            Err(Error::malformed_line(line_no, "only gff.Struct(__root__) may close directly under the document"))
        }
        (Container::Struct(parent), Container::Struct(s)) => {
            parent.insert(name.parse()?, Value::Struct(s)).map_err(|e| Error::malformed_line(line_no, e.to_string()))
        }
        (Container::Struct(parent), Container::List(items)) => {
            parent.insert(name.parse()?, Value::List(items)).map_err(|e| Error::malformed_line(line_no, e.to_string()))
        }
        (Container::Struct(parent), Container::Loc(loc)) => {
            parent.insert(name.parse()?, Value::CExoLocString(loc)).map_err(|e| Error::malformed_line(line_no, e.to_string()))
        }
        (Container::List(items), Container::Struct(s)) => {
            items.push(s);
            Ok(())
        }
        (Container::List(_), _) => Err(Error::malformed_line(line_no, "a gff.List may only contain gff.Struct members")),
        (Container::Loc(_), _) => Err(Error::malformed_line(line_no, "a gff.CExoLocString may not contain nested nodes")),
    }
}

fn apply_leaf(line_no: usize, frame: &mut Frame, tag: Tag, name: &str, text: &str) -> Result<()> {
    match (&mut frame.container, tag) {
        (Container::Top { magic_tag, .. }, Tag::Field(FieldType::MagicTag)) if name == "__type__" => {
            *magic_tag = Some(MagicTag::new(text));
            Ok(())
        }
        (Container::Top { .. }, _) => {
            Err(Error::malformed_line(line_no, "only gff.MagicTag(__type__) may appear directly under the document"))
        }
        (Container::Loc(loc), Tag::Field(FieldType::Dword)) if name == "strref" => {
            loc.strref = parse_dword(line_no, text)?;
            Ok(())
        }
        (Container::Loc(loc), Tag::Language) => {
            let id = LanguageId::from_name(name).map_err(|e| Error::malformed_line(line_no, e.to_string()))?;
            loc.entries.insert(id, normalize_string_value(text));
            Ok(())
        }
        (Container::Loc(_), _) => Err(Error::malformed_line(
            line_no,
            "a gff.CExoLocString node may only contain gff.Dword(strref) and gff.Language(...) fields",
        )),
        (Container::Struct(_), Tag::Field(FieldType::MagicTag)) => {
            Err(Error::malformed_line(line_no, "gff.MagicTag may only appear as the document's __type__"))
        }
        (Container::Struct(s), Tag::Field(ty)) => {
            let value = leaf_value(line_no, ty, text)?;
            s.insert(name.parse()?, value).map_err(|e| Error::malformed_line(line_no, e.to_string()))
        }
        (Container::Struct(_), Tag::Language) => {
            Err(Error::malformed_line(line_no, "gff.Language may only appear inside a gff.CExoLocString node"))
        }
        (Container::List(_), _) => Err(Error::malformed_line(line_no, "a gff.List may only contain gff.Struct members")),
    }
}

fn leaf_value(line_no: usize, ty: FieldType, text: &str) -> Result<Value> {
    let int_err = |e: std::num::ParseIntError| Error::malformed_line(line_no, e.to_string());
    let float_err = |e: std::num::ParseFloatError| Error::malformed_line(line_no, e.to_string());
    Ok(match ty {
        FieldType::Byte => Value::Byte(text.parse().map_err(int_err)?),
        FieldType::Char => Value::Char(text.parse().map_err(int_err)?),
        FieldType::Word => Value::Word(text.parse().map_err(int_err)?),
        FieldType::Short => Value::Short(text.parse().map_err(int_err)?),
        FieldType::Dword => Value::Dword(parse_dword(line_no, text)?),
        FieldType::Int => Value::Int(text.parse().map_err(int_err)?),
        FieldType::Dword64 => Value::Dword64(text.parse().map_err(int_err)?),
        FieldType::Int64 => Value::Int64(text.parse().map_err(int_err)?),
        FieldType::Float => Value::Float(text.parse().map_err(float_err)?),
        FieldType::Double => Value::Double(text.parse().map_err(float_err)?),
        FieldType::ResRef => Value::ResRef(ResRef::new(text.to_string()).map_err(|e| Error::malformed_line(line_no, e.to_string()))?),
        FieldType::CExoString => Value::CExoString(normalize_string_value(text)),
        FieldType::Void => Value::Void(decode_base64(line_no, text)?),
        FieldType::MagicTag | FieldType::Struct | FieldType::List | FieldType::CExoLocString => {
            unreachable!("node types and MagicTag are routed before reaching leaf_value")
        }
    })
}

fn parse_dword(line_no: usize, text: &str) -> Result<u32> {
    if text == "-1" {
        return Ok(SENTINEL);
    }
    text.parse().map_err(|e: std::num::ParseIntError| Error::malformed_line(line_no, e.to_string()))
}

fn decode_base64(line_no: usize, text: &str) -> Result<Vec<u8>> {
    use base64::Engine;
    base64::engine::general_purpose::STANDARD.decode(text).map_err(|e| Error::malformed_line(line_no, e.to_string()))
}

/// Strips one layer of surrounding quotes (unconditionally, matching the reference
/// tooling), then unescapes `\r\n`, `\"`, `\t`, `\n` for escaped-string types.
fn decode_text(line_no: usize, tag: Tag, raw: &str) -> Result<String> {
    let unquoted = raw.trim_matches('"');
    if !unquoted.contains('\\') {
        return Ok(unquoted.to_string());
    }
    match tag {
        Tag::Field(ty) if ty.is_escaped_string() => Ok(unescape(unquoted)),
        Tag::Language => Ok(unescape(unquoted)),
        Tag::Field(ty) if ty.is_literal_string() => {
            Err(Error::malformed_line(line_no, format!("{} values may not contain a backslash", ty.dsl_tag())))
        }
        _ => Err(Error::malformed_line(line_no, "backslashes are not allowed in this value")),
    }
}

fn unescape(text: &str) -> String {
    text.replace("\\r\\n", "\n").replace("\\\"", "\"").replace("\\t", "\t").replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_minimal_document() {
        let text = "gff.MagicTag(__type__): \"UTC \"\ngff.Struct(__root__).id(-1):\n    gff.Short(HP): 42\nend()\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.magic_tag.as_str().unwrap(), "UTC ");
        assert_eq!(doc.root.get("HP"), Some(&Value::Short(42)));
    }

    #[test]
    fn parses_nested_struct_and_list() {
        let text = concat!(
            "gff.MagicTag(__type__): \"UTI \"\n",
            "gff.Struct(__root__).id(-1):\n",
            "    gff.Struct(Owner).id(3):\n",
            "        gff.Byte(Slot): 1\n",
            "    end()\n",
            "    gff.List(Items):\n",
            "        gff.Struct(\"\").id(0):\n",
            "            gff.Dword(Tag): 7\n",
            "        end()\n",
            "    end()\n",
            "end()\n",
        );
        let doc = parse(text).unwrap();
        match doc.root.get("Owner").unwrap() {
            Value::Struct(s) => {
                assert_eq!(s.struct_id, 3);
                assert_eq!(s.get("Slot"), Some(&Value::Byte(1)));
            }
            other => panic!("expected a struct, got {other:?}"),
        }
        match doc.root.get("Items").unwrap() {
            Value::List(items) => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].get("Tag"), Some(&Value::Dword(7)));
            }
            other => panic!("expected a list, got {other:?}"),
        }
    }

    #[test]
    fn parses_locstring_with_strref_and_languages() {
        let text = concat!(
            "gff.MagicTag(__type__): \"UTC \"\n",
            "gff.Struct(__root__).id(-1):\n",
            "    gff.CExoLocString(FirstName):\n",
            "        gff.Dword(strref): -1\n",
            "        gff.Language(ENGLISH): \"Aribeth\"\n",
            "    end()\n",
            "end()\n",
        );
        let doc = parse(text).unwrap();
        match doc.root.get("FirstName").unwrap() {
            Value::CExoLocString(loc) => {
                assert!(loc.has_no_strref());
                assert_eq!(loc.entries.get(&LanguageId(0)).map(String::as_str), Some("Aribeth"));
            }
            other => panic!("expected a loc-string, got {other:?}"),
        }
    }

    #[test]
    fn unescapes_quotes_and_tabs_in_cexostring() {
        let text = "gff.MagicTag(__type__): \"UTC \"\ngff.Struct(__root__).id(-1):\n    gff.CExoString(Desc): \"a\\ttabbed \\\"quote\\\"\"\nend()\n";
        let doc = parse(text).unwrap();
        assert_eq!(doc.root.get("Desc"), Some(&Value::CExoString("a\ttabbed \"quote\"".into())));
    }

    #[test]
    fn rejects_backslash_in_resref() {
        let text = "gff.MagicTag(__type__): \"UTC \"\ngff.Struct(__root__).id(-1):\n    gff.ResRef(Tpl): \"weird\\\\name\"\nend()\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn rejects_unbalanced_end() {
        let text = "gff.MagicTag(__type__): \"UTC \"\ngff.Struct(__root__).id(-1):\nend()\nend()\n";
        assert!(parse(text).is_err());
    }

    #[test]
    fn rejects_missing_root() {
        let text = "gff.MagicTag(__type__): \"UTC \"\n";
        assert!(parse(text).is_err());
    }
}
