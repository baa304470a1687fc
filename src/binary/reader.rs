//! Parses a binary GFF byte stream into a [`Document`].
//!
//! Mirrors the on-disk layout the teacher crate decodes (`raw.rs`, `header.rs`) but
//! walks straight into a [`Value`] tree instead of driving a `serde::Deserializer`.

use std::io::{Cursor, Read, Seek, SeekFrom};

use byteorder::{ReadBytesExt, LE};

use crate::binary::header::{expect_version, Header, Version};
use crate::binary::raw::{RawField, RawStruct};
use crate::error::{Error, Result};
use crate::field_type::FieldType;
use crate::label::Label;
use crate::language::LanguageId;
use crate::value::{normalize_string_value, Document, LocString, ResRef, Struct, Value};

/// Parses a complete GFF document from `reader`.
///
/// # Errors
/// Returns [`Error::MalformedBinary`] for any truncated section, out-of-range
/// offset/index, or a field entry tagged with the binary-only-in-header
/// [`FieldType::MagicTag`].
pub fn read<R: Read + Seek>(reader: &mut R) -> Result<Document> {
    let header = Header::read(reader)?;
    expect_version(header.version, Version::GFF_V3_2, 4)?;

    let structs = read_section(reader, header.structs.offset, header.structs.count, RawStruct::read)?;
    let fields = read_section(reader, header.fields.offset, header.fields.count, RawField::read)?;
    let labels = read_labels(reader, header.labels.offset, header.labels.count)?;

    reader.seek(SeekFrom::Start(header.field_data.offset as u64))?;
    let mut field_data = vec![0u8; header.field_data.count as usize];
    reader.read_exact(&mut field_data)?;

    let field_indices = read_u32_array(reader, header.field_indices.offset, header.field_indices.count / 4)?;
    let list_indices = read_u32_array(reader, header.list_indices.offset, header.list_indices.count / 4)?;

    if structs.is_empty() {
        return Err(Error::malformed_binary(header.structs.offset as u64, "struct array is empty"));
    }

    let ctx = ParseCtx { structs: &structs, fields: &fields, labels: &labels, field_data: &field_data, field_indices: &field_indices, list_indices: &list_indices };
    let root = ctx.parse_struct(0)?;
    Ok(Document::new(header.magic_tag, root))
}

fn read_section<R: Read + Seek, T>(
    reader: &mut R,
    offset: u32,
    count: u32,
    read_one: impl Fn(&mut R) -> Result<T>,
) -> Result<Vec<T>> {
    reader.seek(SeekFrom::Start(offset as u64))?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(read_one(reader)?);
    }
    Ok(out)
}

fn read_labels<R: Read + Seek>(reader: &mut R, offset: u32, count: u32) -> Result<Vec<Label>> {
    reader.seek(SeekFrom::Start(offset as u64))?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut bytes = [0u8; 16];
        reader.read_exact(&mut bytes)?;
        out.push(Label::from(bytes));
    }
    Ok(out)
}

fn read_u32_array<R: Read + Seek>(reader: &mut R, offset: u32, count: u32) -> Result<Vec<u32>> {
    reader.seek(SeekFrom::Start(offset as u64))?;
    let mut out = Vec::with_capacity(count as usize);
    for _ in 0..count {
        out.push(reader.read_u32::<LE>()?);
    }
    Ok(out)
}

struct ParseCtx<'a> {
    structs: &'a [RawStruct],
    fields: &'a [RawField],
    labels: &'a [Label],
    field_data: &'a [u8],
    field_indices: &'a [u32],
    list_indices: &'a [u32],
}

impl<'a> ParseCtx<'a> {
    fn parse_struct(&self, index: usize) -> Result<Struct> {
        let raw = self.structs.get(index).ok_or_else(|| {
            Error::malformed_binary(0, format!("struct index {index} is out of range"))
        })?;

        let field_indices: Vec<u32> = match raw.field_count {
            0 => Vec::new(),
            1 => vec![raw.offset],
            n => {
                let start = (raw.offset / 4) as usize;
                let end = start + n as usize;
                self.field_indices.get(start..end).map(<[u32]>::to_vec).ok_or_else(|| {
                    Error::malformed_binary(raw.offset as u64, "field-indices range is out of bounds")
                })?
            }
        };

        let mut out = Struct::new(raw.struct_id);
        for field_index in field_indices {
            let raw_field = self.fields.get(field_index as usize).ok_or_else(|| {
                Error::malformed_binary(field_index as u64, format!("field index {field_index} is out of range"))
            })?;
            let label = *self.labels.get(raw_field.label_index as usize).ok_or_else(|| {
                Error::malformed_binary(raw_field.label_index as u64, "label index is out of range")
            })?;
            let value = self.parse_value(raw_field)?;
            out.insert(label, value).map_err(|e| Error::malformed_binary(field_index as u64, e.to_string()))?;
        }
        Ok(out)
    }

    fn parse_value(&self, field: &RawField) -> Result<Value> {
        let ty = FieldType::from_binary_tag(field.type_tag)
            .map_err(|_| Error::malformed_binary(field.type_tag as u64, format!("unknown field type tag {}", field.type_tag)))?;
        if ty == FieldType::MagicTag {
            return Err(Error::malformed_binary(field.type_tag as u64, "MagicTag is not a valid field-entry type"));
        }
        Ok(match ty {
            FieldType::Byte => Value::Byte(field.data[0]),
            FieldType::Char => Value::Char(field.data[0] as i8),
            FieldType::Word => Value::Word(u16::from_le_bytes([field.data[0], field.data[1]])),
            FieldType::Short => Value::Short(i16::from_le_bytes([field.data[0], field.data[1]])),
            FieldType::Dword => Value::Dword(field.data_as_u32()),
            FieldType::Int => Value::Int(field.data_as_u32() as i32),
            FieldType::Float => Value::Float(f32::from_le_bytes(field.data)),
            FieldType::Dword64 => Value::Dword64(self.read_u64_at(field.data_as_u32())?),
            FieldType::Int64 => Value::Int64(self.read_u64_at(field.data_as_u32())? as i64),
            FieldType::Double => Value::Double(self.read_f64_at(field.data_as_u32())?),
            FieldType::CExoString => Value::CExoString(self.read_cexostring_at(field.data_as_u32())?),
            FieldType::ResRef => Value::ResRef(self.read_resref_at(field.data_as_u32())?),
            FieldType::CExoLocString => Value::CExoLocString(self.read_locstring_at(field.data_as_u32())?),
            FieldType::Void => Value::Void(self.read_void_at(field.data_as_u32())?),
            FieldType::Struct => Value::Struct(self.parse_struct(field.data_as_u32() as usize)?),
            FieldType::List => Value::List(self.parse_list_at(field.data_as_u32())?),
            FieldType::MagicTag => unreachable!("rejected above"),
        })
    }

    fn data_slice(&self, offset: u32, len: usize) -> Result<&'a [u8]> {
        let start = offset as usize;
        self.field_data.get(start..start + len).ok_or_else(|| {
            Error::malformed_binary(offset as u64, format!("field-data range of {len} bytes is out of bounds"))
        })
    }

    fn read_u64_at(&self, offset: u32) -> Result<u64> {
        let bytes = self.data_slice(offset, 8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn read_f64_at(&self, offset: u32) -> Result<f64> {
        let bytes = self.data_slice(offset, 8)?;
        Ok(f64::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn read_cexostring_at(&self, offset: u32) -> Result<String> {
        let len_bytes = self.data_slice(offset, 4)?;
        let len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
        let text = self.data_slice(offset + 4, len)?;
        let text = String::from_utf8(text.to_vec()).map_err(|e| Error::malformed_binary(offset as u64, e.to_string()))?;
        Ok(normalize_string_value(&text))
    }

    fn read_resref_at(&self, offset: u32) -> Result<ResRef> {
        let len = *self.data_slice(offset, 1)?.first().unwrap() as usize;
        let text = self.data_slice(offset + 1, len)?;
        let text = String::from_utf8(text.to_vec()).map_err(|e| Error::malformed_binary(offset as u64, e.to_string()))?;
        ResRef::new(text)
    }

    fn read_void_at(&self, offset: u32) -> Result<Vec<u8>> {
        let len_bytes = self.data_slice(offset, 4)?;
        let len = u32::from_le_bytes(len_bytes.try_into().unwrap()) as usize;
        Ok(self.data_slice(offset + 4, len)?.to_vec())
    }

    fn read_locstring_at(&self, offset: u32) -> Result<LocString> {
        // total_size counts everything after itself: strref, string_count, and each string.
        let total_size = u32::from_le_bytes(self.data_slice(offset, 4)?.try_into().unwrap());
        let mut cursor = Cursor::new(self.data_slice(offset + 4, total_size as usize)?);
        let strref = cursor.read_u32::<LE>()?;
        let string_count = cursor.read_u32::<LE>()?;
        let mut entries = indexmap::IndexMap::new();
        for _ in 0..string_count {
            let language_id = LanguageId(cursor.read_u32::<LE>()?);
            let len = cursor.read_u32::<LE>()? as usize;
            let mut text = vec![0u8; len];
            cursor.read_exact(&mut text)?;
            let text = String::from_utf8(text).map_err(|e| Error::malformed_binary(offset as u64, e.to_string()))?;
            entries.insert(language_id, normalize_string_value(&text));
        }
        Ok(LocString { strref, entries })
    }

    fn parse_list_at(&self, offset: u32) -> Result<Vec<Struct>> {
        let start = (offset / 4) as usize;
        let count = *self.list_indices.get(start).ok_or_else(|| {
            Error::malformed_binary(offset as u64, "list-indices offset is out of bounds")
        })? as usize;
        let indices = self.list_indices.get(start + 1..start + 1 + count).ok_or_else(|| {
            Error::malformed_binary(offset as u64, "list-indices range is out of bounds")
        })?;
        indices.iter().map(|i| self.parse_struct(*i as usize)).collect()
    }
}
