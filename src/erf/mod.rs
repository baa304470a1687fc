//! The ERF archive codec: the container format holding named GFF (and other)
//! resource blobs for modules, HAKs, and similar packages (§4.5).

mod archive;
pub mod header;
mod reader;
mod restype;
mod writer;

pub use archive::{Archive, Resource};
pub use reader::read;
pub use writer::write;

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use crate::value::MagicTag;

    use super::*;

    fn sample_archive() -> Archive {
        Archive {
            file_type: MagicTag::new("HAK"),
            resources: vec![
                Resource { name: "nw_item01.uti".into(), bytes: b"uti-bytes".to_vec() },
                Resource { name: "nw_creature.utc".into(), bytes: b"utc-bytes".to_vec() },
                Resource { name: "module.ifo".into(), bytes: b"ifo-bytes".to_vec() },
            ],
        }
    }

    #[test]
    fn round_trips_a_hak() {
        let archive = sample_archive();
        let mut bytes = Vec::new();
        write(&archive, &mut bytes).unwrap();

        let parsed = read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed.file_type.as_str().unwrap(), "HAK ");
        assert_eq!(parsed.resources.len(), 3);
        assert_eq!(parsed.get("nw_item01.uti"), Some(b"uti-bytes".as_slice()));
        assert_eq!(parsed.get("NW_CREATURE.UTC"), Some(b"utc-bytes".as_slice()));
    }

    #[test]
    fn unrecognized_magic_falls_back_to_erf() {
        let mut bytes = Vec::new();
        write(&sample_archive(), &mut bytes).unwrap();
        bytes[0..4].copy_from_slice(b"XYZ ");

        let parsed = read(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(parsed.file_type.as_str().unwrap(), "ERF ");
    }

    #[test]
    fn unknown_extension_is_rejected_on_write() {
        let archive = Archive { file_type: MagicTag::new("ERF"), resources: vec![Resource { name: "thing.zzz".into(), bytes: vec![] }] };
        assert!(write(&archive, &mut Vec::new()).is_err());
    }

    #[test]
    fn empty_archive_round_trips() {
        let archive = Archive::new(MagicTag::new("ERF"));
        let mut bytes = Vec::new();
        write(&archive, &mut bytes).unwrap();
        let parsed = read(&mut Cursor::new(bytes)).unwrap();
        assert!(parsed.resources.is_empty());
    }
}
