//! On-disk layout of a GFF file header: a 4-byte type tag, a 4-byte version, and
//! six section descriptors pointing at the struct/field/label/data/index arrays.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::error::{Error, Result};
use crate::value::MagicTag;

/// The format version recorded in a GFF or ERF header, e.g. `"V3.2"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Version(pub [u8; 4]);

impl Version {
    /// The only GFF version this crate writes.
    pub const GFF_V3_2: Version = Version(*b"V3.2");
    /// The only ERF version this crate writes.
    pub const ERF_V1_0: Version = Version(*b"V1.0");

    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut bytes = [0u8; 4];
        reader.read_exact(&mut bytes)?;
        Ok(Version(bytes))
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.0)?;
        Ok(())
    }
}

/// Describes one array stored in a GFF/ERF file: its byte offset and element count.
#[derive(Debug, Default, Clone, Copy)]
pub struct Section {
    /// Byte offset from the start of the file.
    pub offset: u32,
    /// Number of elements at `offset`. Element size depends on which section this is.
    pub count: u32,
}

impl Section {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(Section { offset: reader.read_u32::<LE>()?, count: reader.read_u32::<LE>()? })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LE>(self.offset)?;
        writer.write_u32::<LE>(self.count)?;
        Ok(())
    }
}

/// The 56-byte GFF file header (§4.2).
#[derive(Debug)]
pub struct Header {
    pub magic_tag: MagicTag,
    pub version: Version,
    pub structs: Section,
    pub fields: Section,
    pub labels: Section,
    pub field_data: Section,
    pub field_indices: Section,
    pub list_indices: Section,
}

impl Header {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let mut tag = [0u8; 4];
        reader.read_exact(&mut tag)?;
        Ok(Header {
            magic_tag: MagicTag::from_bytes(tag),
            version: Version::read(reader)?,
            structs: Section::read(reader)?,
            fields: Section::read(reader)?,
            labels: Section::read(reader)?,
            field_data: Section::read(reader)?,
            field_indices: Section::read(reader)?,
            list_indices: Section::read(reader)?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_all(&self.magic_tag.as_bytes())?;
        self.version.write(writer)?;
        self.structs.write(writer)?;
        self.fields.write(writer)?;
        self.labels.write(writer)?;
        self.field_data.write(writer)?;
        self.field_indices.write(writer)?;
        self.list_indices.write(writer)
    }
}

/// Validates that `version` is the one version this crate knows how to read.
pub fn expect_version(version: Version, expected: Version, offset: u64) -> Result<()> {
    if version.0 != expected.0 {
        return Err(Error::malformed_binary(
            offset,
            format!(
                "unsupported version {:?}, expected {:?}",
                String::from_utf8_lossy(&version.0),
                String::from_utf8_lossy(&expected.0)
            ),
        ));
    }
    Ok(())
}
