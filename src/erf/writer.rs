//! Serializes an [`Archive`] to the binary ERF layout.

use std::io::Write;

use crate::binary::header::Version;
use crate::erf::archive::Archive;
use crate::erf::header::{Header, KeyEntry, ResourceEntry};
use crate::erf::restype::res_type_for_extension;
use crate::error::{Error, Result};
use crate::value::{ResRef, SENTINEL};

const HEADER_LEN: u32 = 160;
const KEY_ENTRY_LEN: u32 = 24;
const RESOURCE_ENTRY_LEN: u32 = 8;

/// Serializes `archive` to `writer` as binary ERF, using format version `V1.0`.
///
/// Derives each resource's `res_type` from its name's extension and pads its
/// resref to 16 bytes, laying resource data out after the key/resource tables
/// in the order `archive.resources` lists them.
///
/// # Errors
/// Returns [`Error::UnknownType`] if a resource's name has no extension, or one
/// not present in the resource-type table.
pub fn write<W: Write>(archive: &Archive, writer: &mut W) -> Result<()> {
    let entry_count = archive.resources.len() as u32;
    let offset_to_keys = HEADER_LEN;
    let offset_to_resources = offset_to_keys + entry_count * KEY_ENTRY_LEN;
    let data_start = offset_to_resources + entry_count * RESOURCE_ENTRY_LEN;

    let mut keys = Vec::with_capacity(archive.resources.len());
    let mut entries = Vec::with_capacity(archive.resources.len());
    let mut data_offset = data_start;
    for (i, resource) in archive.resources.iter().enumerate() {
        let (stem, ext) = resource
            .name
            .rsplit_once('.')
            .ok_or_else(|| Error::UnknownType(format!("resource name {:?} has no extension", resource.name)))?;
        let res_type = res_type_for_extension(ext)
            .ok_or_else(|| Error::UnknownType(format!("no resource type mapping for extension {ext:?}")))?;
        let resref = ResRef::new(stem.to_string())?;

        let mut padded = [0u8; 16];
        padded[..resref.as_str().len()].copy_from_slice(resref.as_str().as_bytes());
        keys.push(KeyEntry { resref: padded, resource_id: i as u32, res_type });
        entries.push(ResourceEntry { offset: data_offset, size: resource.bytes.len() as u32 });
        data_offset += resource.bytes.len() as u32;
    }

    let header = Header {
        file_type: archive.file_type,
        version: Version::ERF_V1_0,
        localized_string_count: 0,
        localized_string_size: 0,
        entry_count,
        offset_to_localized_strings: HEADER_LEN,
        offset_to_keys,
        offset_to_resources,
        build_year: 0,
        build_day: 0,
        description_strref: SENTINEL,
    };

    header.write(writer)?;
    for key in &keys {
        key.write(writer)?;
    }
    for entry in &entries {
        entry.write(writer)?;
    }
    for resource in &archive.resources {
        writer.write_all(&resource.bytes)?;
    }
    log::debug!("wrote ERF archive with {entry_count} resource(s)");
    Ok(())
}
