//! Parses a binary ERF archive into an [`Archive`].

use std::io::{Read, Seek, SeekFrom};

use crate::binary::header::{expect_version, Version};
use crate::erf::archive::{Archive, Resource, KNOWN_FILE_TYPES};
use crate::erf::header::{Header, KeyEntry, ResourceEntry};
use crate::erf::restype::extension_for_res_type;
use crate::error::{Error, Result};
use crate::value::MagicTag;

/// Parses a complete ERF archive from `reader`.
///
/// # Errors
/// Returns [`Error::MalformedBinary`] for a version mismatch, a truncated table,
/// or a resource entry whose offset/size falls outside the stream. An
/// unrecognized file-type magic is not an error: it is logged and treated as
/// plain `"ERF "` (documented legacy behavior, §4.5).
pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Archive> {
    let header = Header::read(reader)?;
    expect_version(header.version, Version::ERF_V1_0, 4)?;

    let file_type = match header.file_type.as_str() {
        Ok(tag) if KNOWN_FILE_TYPES.contains(&tag) => header.file_type,
        Ok(tag) => {
            log::warn!("unrecognized ERF file-type tag {tag:?}, falling back to \"ERF \"");
            MagicTag::new("ERF")
        }
        Err(_) => {
            log::warn!("ERF file-type tag is not ASCII, falling back to \"ERF \"");
            MagicTag::new("ERF")
        }
    };

    reader.seek(SeekFrom::Start(header.offset_to_keys as u64))?;
    let mut keys = Vec::with_capacity(header.entry_count as usize);
    for _ in 0..header.entry_count {
        keys.push(KeyEntry::read(reader)?);
    }

    reader.seek(SeekFrom::Start(header.offset_to_resources as u64))?;
    let mut entries = Vec::with_capacity(header.entry_count as usize);
    for _ in 0..header.entry_count {
        entries.push(ResourceEntry::read(reader)?);
    }

    let mut resources = Vec::with_capacity(header.entry_count as usize);
    for (key, entry) in keys.iter().zip(entries.iter()) {
        let resref = trim_resref(&key.resref);
        let name = match extension_for_res_type(key.res_type) {
            Some(ext) => format!("{resref}.{ext}"),
            None => format!("{resref}.???"),
        };
        reader.seek(SeekFrom::Start(entry.offset as u64))?;
        let mut bytes = vec![0u8; entry.size as usize];
        reader.read_exact(&mut bytes)?;
        resources.push(Resource { name, bytes });
    }

    log::debug!("read ERF archive with {} resource(s)", resources.len());
    Ok(Archive { file_type, resources })
}

fn trim_resref(bytes: &[u8; 16]) -> String {
    let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());
    String::from_utf8_lossy(&bytes[..end]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_nul_padded_resref() {
        let mut bytes = [0u8; 16];
        bytes[..7].copy_from_slice(b"nw_item");
        assert_eq!(trim_resref(&bytes), "nw_item");
    }

    #[test]
    fn full_length_resref_has_no_padding() {
        let bytes = *b"exactly_16_chars";
        assert_eq!(trim_resref(&bytes), "exactly_16_chars");
    }
}
