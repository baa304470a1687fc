//! The `.ndugff` text codec: a line-oriented, indentation-free DSL that mirrors the
//! reference community tooling's editable dump format.

mod parser;
mod tokenizer;
mod writer;

pub use parser::parse;
pub use writer::write;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{LocString, MagicTag, Struct, Value, SENTINEL};
    use crate::language::LanguageId;

    fn sample() -> crate::value::Document {
        let mut root = Struct::new(SENTINEL);
        root.insert("Name".parse().unwrap(), Value::CExoString("Aribeth".into())).unwrap();
        root.insert("HP".parse().unwrap(), Value::Short(42)).unwrap();
        let mut loc = LocString::new();
        loc.entries.insert(LanguageId(0), "Hello".into());
        root.insert("Greeting".parse().unwrap(), Value::CExoLocString(loc)).unwrap();
        let mut nested = Struct::new(5);
        nested.insert("Power".parse().unwrap(), Value::Dword64(9)).unwrap();
        root.insert("Nested".parse().unwrap(), Value::Struct(nested)).unwrap();
        let mut item = Struct::new(0);
        item.insert("Slot".parse().unwrap(), Value::Byte(1)).unwrap();
        root.insert("Items".parse().unwrap(), Value::List(vec![item])).unwrap();
        crate::value::Document::new(MagicTag::new("UTC"), root)
    }

    #[test]
    fn round_trips_through_dsl() {
        let doc = sample();
        let text = write(&doc);
        let parsed = parse(&text).unwrap();
        assert_eq!(parsed, doc);
    }

    #[test]
    fn rejects_malformed_text() {
        assert!(parse("not a dsl file at all").is_err());
    }

    #[test]
    fn empty_root_round_trips() {
        let doc = crate::value::Document::new(MagicTag::new("UTI"), Struct::new(SENTINEL));
        let text = write(&doc);
        assert_eq!(parse(&text).unwrap(), doc);
    }
}
