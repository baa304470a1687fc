//! The fixed-size records the struct/field arrays are made of on disk.

use std::io::{Read, Write};

use byteorder::{ReadBytesExt, WriteBytesExt, LE};

use crate::error::Result;

/// One 12-byte struct-array entry.
#[derive(Debug, Clone, Copy)]
pub struct RawStruct {
    /// Opaque struct id, passed through from [`crate::value::Struct::struct_id`].
    pub struct_id: u32,
    /// Index into the field array (single field) or byte offset into the
    /// field-indices blob (multiple fields).
    pub offset: u32,
    /// Number of fields in the struct.
    pub field_count: u32,
}

impl RawStruct {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        Ok(RawStruct {
            struct_id: reader.read_u32::<LE>()?,
            offset: reader.read_u32::<LE>()?,
            field_count: reader.read_u32::<LE>()?,
        })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LE>(self.struct_id)?;
        writer.write_u32::<LE>(self.offset)?;
        writer.write_u32::<LE>(self.field_count)?;
        Ok(())
    }
}

/// One 12-byte field-array entry.
#[derive(Debug, Clone, Copy)]
pub struct RawField {
    /// Binary type tag (§4.2).
    pub type_tag: u32,
    /// Index into the label array.
    pub label_index: u32,
    /// Inline value, or an offset/index interpreted per `type_tag`.
    pub data: [u8; 4],
}

impl RawField {
    pub fn read<R: Read>(reader: &mut R) -> Result<Self> {
        let type_tag = reader.read_u32::<LE>()?;
        let label_index = reader.read_u32::<LE>()?;
        let mut data = [0u8; 4];
        reader.read_exact(&mut data)?;
        Ok(RawField { type_tag, label_index, data })
    }

    pub fn write<W: Write>(&self, writer: &mut W) -> Result<()> {
        writer.write_u32::<LE>(self.type_tag)?;
        writer.write_u32::<LE>(self.label_index)?;
        writer.write_all(&self.data)?;
        Ok(())
    }

    /// Interprets `data` as a little-endian `u32` offset/index.
    pub fn data_as_u32(&self) -> u32 {
        u32::from_le_bytes(self.data)
    }
}
