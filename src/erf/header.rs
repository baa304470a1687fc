//! On-disk layout of an ERF archive header and its key/resource tables.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::binary::header::Version;
use crate::error::Result;
use crate::value::MagicTag;

/// The 160-byte ERF archive header (§4.5).
#[derive(Debug)]
pub struct Header {
    pub file_type: MagicTag,
    pub version: Version,
    pub localized_string_count: u32,
    pub localized_string_size: u32,
    pub entry_count: u32,
    pub offset_to_localized_strings: u32,
    pub offset_to_keys: u32,
    pub offset_to_resources: u32,
    pub build_year: u32,
    pub build_day: u32,
    pub description_strref: u32,
}

impl Header {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        let header = Header {
            file_type: MagicTag::from_bytes(tag),
            version: Version::read(reader)?,
            localized_string_count: reader.read_u32::<LE>()?,
            localized_string_size: reader.read_u32::<LE>()?,
            entry_count: reader.read_u32::<LE>()?,
            offset_to_localized_strings: reader.read_u32::<LE>()?,
            offset_to_keys: reader.read_u32::<LE>()?,
            offset_to_resources: reader.read_u32::<LE>()?,
            build_year: reader.read_u32::<LE>()?,
            build_day: reader.read_u32::<LE>()?,
            description_strref: reader.read_u32::<LE>()?,
        };
        let mut reserved = [0u8; 116];
        reader.read_exact(&mut reserved)?;
        Ok(header)
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.file_type.as_bytes())?;
        self.version.write(writer)?;
        writer.write_u32::<LE>(self.localized_string_count)?;
        writer.write_u32::<LE>(self.localized_string_size)?;
        writer.write_u32::<LE>(self.entry_count)?;
        writer.write_u32::<LE>(self.offset_to_localized_strings)?;
        writer.write_u32::<LE>(self.offset_to_keys)?;
        writer.write_u32::<LE>(self.offset_to_resources)?;
        writer.write_u32::<LE>(self.build_year)?;
        writer.write_u32::<LE>(self.build_day)?;
        writer.write_u32::<LE>(self.description_strref)?;
        writer.write_all(&[0u8; 116])?;
        Ok(())
    }
}

/// One 24-byte key-table entry.
#[derive(Debug, Clone, Copy)]
pub struct KeyEntry {
    pub resref: [u8; 16],
    pub resource_id: u32,
    pub res_type: u16,
}

impl KeyEntry {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut resref = [0u8; 16];
        reader.read_exact(&mut resref)?;
        let resource_id = reader.read_u32::<LE>()?;
        let res_type = reader.read_u16::<LE>()?;
        let _reserved = reader.read_u16::<LE>()?;
        Ok(KeyEntry { resref, resource_id, res_type })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.resref)?;
        writer.write_u32::<LE>(self.resource_id)?;
        writer.write_u16::<LE>(self.res_type)?;
        writer.write_u16::<LE>(0)?;
        Ok(())
    }
}

/// One 8-byte resource-table entry.
#[derive(Debug, Clone, Copy)]
pub struct ResourceEntry {
    pub offset: u32,
    pub size: u32,
}

impl ResourceEntry {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(ResourceEntry { offset: reader.read_u32::<LE>()?, size: reader.read_u32::<LE>()? })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LE>(self.offset)?;
        writer.write_u32::<LE>(self.size)?;
        Ok(())
    }
}
