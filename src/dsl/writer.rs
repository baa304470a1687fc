//! Emits a [`Document`] as `.ndugff` text.
//!
//! Fields are not necessarily in canonical order on entry (readers preserve
//! whatever order their source carries), so this is the one place in the crate
//! that sorts: a cloned copy of the root is passed through
//! [`crate::value::canonicalize`] before anything is written.

use crate::language::LanguageId;
use crate::value::{canonicalize, Document, LocString, Struct, Value, SENTINEL};

/// Renders `doc` as `.ndugff` text, sorting fields into canonical order first.
pub fn write(doc: &Document) -> String {
    let mut root = doc.root.clone();
    canonicalize(&mut root);

    let mut out = String::new();
    let tag = doc.magic_tag.as_str().unwrap_or("????");
    out.push_str(&format!("gff.MagicTag(__type__): \"{tag}\"\n"));
    out.push_str(&format!("gff.Struct(__root__).id({}):\n", pretty_struct_id(root.struct_id)));
    write_struct_fields(&mut out, &root, 1);
    out.push_str(&format!("{}end()\n", end_indent(0)));
    out
}

fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// `end()` closes the node opened at `depth`, indented half a level deeper than
/// that node's own opening line — cosmetic only, matched for fidelity with the
/// reference tooling's output.
fn end_indent(depth: usize) -> String {
    " ".repeat(depth * 4 + 2)
}

fn pretty_struct_id(id: u32) -> String {
    if id == SENTINEL { "-1".to_string() } else { id.to_string() }
}

fn pretty_dword(value: u32) -> String {
    if value == SENTINEL { "-1".to_string() } else { value.to_string() }
}

fn escape_text(text: &str) -> String {
    text.replace('"', "\\\"").replace('\t', "\\t").replace('\n', "\\n")
}

fn write_struct_fields(out: &mut String, s: &Struct, depth: usize) {
    for (label, value) in s.iter() {
        write_field(out, label.as_str().unwrap_or_default(), value, depth);
    }
}

fn write_field(out: &mut String, name: &str, value: &Value, depth: usize) {
    let pad = indent(depth);
    match value {
        Value::Byte(v) => out.push_str(&format!("{pad}gff.Byte({name}): {v}\n")),
        Value::Char(v) => out.push_str(&format!("{pad}gff.Char({name}): {v}\n")),
        Value::Word(v) => out.push_str(&format!("{pad}gff.Word({name}): {v}\n")),
        Value::Short(v) => out.push_str(&format!("{pad}gff.Short({name}): {v}\n")),
        Value::Dword(v) => out.push_str(&format!("{pad}gff.Dword({name}): {}\n", pretty_dword(*v))),
        Value::Int(v) => out.push_str(&format!("{pad}gff.Int({name}): {v}\n")),
        Value::Dword64(v) => out.push_str(&format!("{pad}gff.Dword64({name}): {v}\n")),
        Value::Int64(v) => out.push_str(&format!("{pad}gff.Int64({name}): {v}\n")),
        Value::Float(v) => out.push_str(&format!("{pad}gff.Float({name}): {v}\n")),
        Value::Double(v) => out.push_str(&format!("{pad}gff.Double({name}): {v}\n")),
        Value::ResRef(r) => out.push_str(&format!("{pad}gff.ResRef({name}): \"{}\"\n", r.as_str())),
        Value::CExoString(text) => out.push_str(&format!("{pad}gff.CExoString({name}): \"{}\"\n", escape_text(text))),
        Value::Void(blob) => {
            use base64::Engine;
            let encoded = base64::engine::general_purpose::STANDARD.encode(blob);
            out.push_str(&format!("{pad}gff.Base64String({name}): \"{encoded}\"\n"));
        }
        Value::CExoLocString(loc) => write_locstring(out, name, loc, depth),
        Value::Struct(inner) => {
            out.push_str(&format!("{pad}gff.Struct({name}).id({}):\n", pretty_struct_id(inner.struct_id)));
            write_struct_fields(out, inner, depth + 1);
            out.push_str(&format!("{}end()\n", end_indent(depth)));
        }
        Value::List(items) => {
            out.push_str(&format!("{pad}gff.List({name}):\n"));
            for item in items {
                out.push_str(&format!("{}gff.Struct().id({}):\n", indent(depth + 1), pretty_struct_id(item.struct_id)));
                write_struct_fields(out, item, depth + 2);
                out.push_str(&format!("{}end()\n", end_indent(depth + 1)));
            }
            out.push_str(&format!("{}end()\n", end_indent(depth)));
        }
    }
}

fn write_locstring(out: &mut String, name: &str, loc: &LocString, depth: usize) {
    let pad = indent(depth);
    out.push_str(&format!("{pad}gff.CExoLocString({name}):\n"));
    out.push_str(&format!("{}gff.Dword(strref): {}\n", indent(depth + 1), pretty_dword(loc.strref)));
    for (language_id, text) in &loc.entries {
        let lang_name = language_name(*language_id);
        out.push_str(&format!("{}gff.Language({lang_name}): \"{}\"\n", indent(depth + 1), escape_text(text)));
    }
    out.push_str(&format!("{}end()\n", end_indent(depth)));
}

fn language_name(id: LanguageId) -> &'static str {
    id.name().unwrap_or("ENGLISH")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::MagicTag;

    fn sample() -> Document {
        let mut root = Struct::new(SENTINEL);
        root.insert("HP".parse().unwrap(), Value::Short(42)).unwrap();
        let mut loc = LocString::new();
        loc.entries.insert(LanguageId(0), "Hello".into());
        root.insert("Greeting".parse().unwrap(), Value::CExoLocString(loc)).unwrap();
        Document::new(MagicTag::new("UTC"), root)
    }

    #[test]
    fn emits_two_top_level_fields() {
        let text = write(&sample());
        assert!(text.starts_with("gff.MagicTag(__type__): \"UTC \"\ngff.Struct(__root__).id(-1):\n"));
        assert!(text.ends_with("end()\n"));
    }

    #[test]
    fn end_is_indented_half_a_level() {
        let text = write(&sample());
        let loc_end = text.lines().find(|l| l.trim_start() == "end()" && l.starts_with("      ")).unwrap();
        assert_eq!(loc_end, "      end()");
    }

    #[test]
    fn escapes_quotes_and_tabs() {
        assert_eq!(escape_text("a\ttabbed \"quote\""), "a\\ttabbed \\\"quote\\\"");
    }

    #[test]
    fn pretty_prints_sentinels_as_minus_one() {
        assert_eq!(pretty_dword(SENTINEL), "-1");
        assert_eq!(pretty_struct_id(SENTINEL), "-1");
        assert_eq!(pretty_dword(7), "7");
    }
}
