//! The binary GFF codec: the wire format everything else in this crate converts to and from.

pub mod header;
mod raw;
mod reader;
mod writer;

pub use reader::read;
pub use writer::write;

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::value::{Document, LocString, MagicTag, ResRef, Struct, Value};

    fn sample_document() -> Document {
        let mut root = Struct::new(0xFFFF_FFFF);
        root.insert("Name".parse().unwrap(), Value::CExoString("Aribeth".into())).unwrap();
        root.insert("HP".parse().unwrap(), Value::Short(42)).unwrap();
        root.insert("Tag".parse().unwrap(), Value::ResRef(ResRef::new("nw_aribeth").unwrap())).unwrap();

        let mut loc = LocString::new();
        loc.entries.insert(crate::language::LanguageId(0), "Hello".into());
        root.insert("Greeting".parse().unwrap(), Value::CExoLocString(loc)).unwrap();

        let mut item1 = Struct::new(0);
        item1.insert("Slot".parse().unwrap(), Value::Byte(1)).unwrap();
        let mut item2 = Struct::new(1);
        item2.insert("Slot".parse().unwrap(), Value::Byte(2)).unwrap();
        root.insert("Items".parse().unwrap(), Value::List(vec![item1, item2])).unwrap();

        let mut nested = Struct::new(5);
        nested.insert("Power".parse().unwrap(), Value::Dword64(123_456_789_012)).unwrap();
        root.insert("Nested".parse().unwrap(), Value::Struct(nested)).unwrap();

        Document::new(MagicTag::new("UTC"), root)
    }

    #[test]
    fn round_trips_through_binary() {
        let doc = sample_document();
        let mut bytes = Vec::new();
        super::write(&doc, &mut bytes).unwrap();

        let mut cursor = Cursor::new(bytes);
        let parsed = super::read(&mut cursor).unwrap();

        assert_eq!(parsed.magic_tag.as_str().unwrap(), "UTC ");
        assert_eq!(parsed.root.get("Name"), Some(&Value::CExoString("Aribeth".into())));
        assert_eq!(parsed.root.get("HP"), Some(&Value::Short(42)));
        match parsed.root.get("Items") {
            Some(Value::List(items)) => assert_eq!(items.len(), 2),
            other => panic!("expected a list, got {other:?}"),
        }
        match parsed.root.get("Nested") {
            Some(Value::Struct(s)) => assert_eq!(s.get("Power"), Some(&Value::Dword64(123_456_789_012))),
            other => panic!("expected a struct, got {other:?}"),
        }
    }

    #[test]
    fn single_field_struct_round_trips() {
        let mut root = Struct::new(0xFFFF_FFFF);
        root.insert("Only".parse().unwrap(), Value::Int(-7)).unwrap();
        let doc = Document::new(MagicTag::new("IFO"), root);

        let mut bytes = Vec::new();
        super::write(&doc, &mut bytes).unwrap();
        let parsed = super::read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed.root.get("Only"), Some(&Value::Int(-7)));
    }

    #[test]
    fn empty_struct_round_trips() {
        let root = Struct::new(0xFFFF_FFFF);
        let doc = Document::new(MagicTag::new("IFO"), root);

        let mut bytes = Vec::new();
        super::write(&doc, &mut bytes).unwrap();
        let parsed = super::read(&mut Cursor::new(bytes)).unwrap();
        assert!(parsed.root.is_empty());
    }

    #[test]
    fn rejects_truncated_input() {
        let err = super::read(&mut Cursor::new(vec![0u8; 4]));
        assert!(err.is_err());
    }
}
