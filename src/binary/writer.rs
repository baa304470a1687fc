//! Serializes a [`Document`] to the binary GFF layout.
//!
//! Builds the same intermediate per-struct/per-field representation the teacher
//! crate's `ser` module builds (`Struct::NoFields`/`OneField`/`MultiField`, an
//! `IndexSet<Label>` label pool) but walks a fully-materialized [`Value`] tree
//! instead of driving it from `serde::Serialize` callbacks, so struct field counts
//! are known up front and no placeholder-patching pass is needed.

use std::io::Write;

use byteorder::{WriteBytesExt, LE};
use indexmap::IndexSet;

use crate::binary::header::{Header, Section, Version};
use crate::binary::raw::{RawField, RawStruct};
use crate::error::Result;
use crate::field_type::FieldType;
use crate::label::Label;
use crate::value::{Document, LocString, Struct, Value};

enum RawStructIr {
    NoFields,
    OneField(u32),
    MultiField { offset: u32, field_count: u32 },
}

#[derive(Default)]
struct WriterCtx {
    struct_ids: Vec<u32>,
    struct_irs: Vec<RawStructIr>,
    fields: Vec<RawField>,
    labels: IndexSet<Label>,
    field_data: Vec<u8>,
    field_indices: Vec<u32>,
    list_indices: Vec<u32>,
}

impl WriterCtx {
    fn add_label(&mut self, label: Label) -> u32 {
        let (index, _) = self.labels.insert_full(label);
        index as u32
    }

    fn write_struct(&mut self, s: &Struct) -> Result<u32> {
        let index = self.struct_irs.len() as u32;
        self.struct_ids.push(s.struct_id);
        self.struct_irs.push(RawStructIr::NoFields);

        let count = s.len();
        let ir = if count == 0 {
            RawStructIr::NoFields
        } else if count == 1 {
            let (label, value) = s.iter().next().expect("count == 1");
            let field_index = self.write_field(*label, value)?;
            RawStructIr::OneField(field_index)
        } else {
            let mut indices = Vec::with_capacity(count);
            for (label, value) in s.iter() {
                indices.push(self.write_field(*label, value)?);
            }
            let offset = (self.field_indices.len() * 4) as u32;
            self.field_indices.extend(indices);
            RawStructIr::MultiField { offset, field_count: count as u32 }
        };
        self.struct_irs[index as usize] = ir;
        Ok(index)
    }

    fn write_field(&mut self, label: Label, value: &Value) -> Result<u32> {
        let label_index = self.add_label(label);
        let field_index = self.fields.len() as u32;
        let (type_tag, data) = self.encode_value(value)?;
        self.fields.push(RawField { type_tag, label_index, data });
        Ok(field_index)
    }

    fn push_field_data(&mut self, bytes: &[u8]) -> u32 {
        let offset = self.field_data.len() as u32;
        self.field_data.extend_from_slice(bytes);
        offset
    }

    fn encode_value(&mut self, value: &Value) -> Result<(u32, [u8; 4])> {
        let ty = value.field_type();
        let data = match value {
            Value::Byte(b) => [*b, 0, 0, 0],
            Value::Char(c) => [*c as u8, 0, 0, 0],
            Value::Word(w) => {
                let b = w.to_le_bytes();
                [b[0], b[1], 0, 0]
            }
            Value::Short(s) => {
                let b = s.to_le_bytes();
                [b[0], b[1], 0, 0]
            }
            Value::Dword(d) => d.to_le_bytes(),
            Value::Int(i) => i.to_le_bytes(),
            Value::Float(f) => f.to_le_bytes(),
            Value::Dword64(v) => {
                let mut bytes = Vec::with_capacity(8);
                bytes.write_u64::<LE>(*v)?;
                self.push_field_data(&bytes).to_le_bytes()
            }
            Value::Int64(v) => {
                let mut bytes = Vec::with_capacity(8);
                bytes.write_i64::<LE>(*v)?;
                self.push_field_data(&bytes).to_le_bytes()
            }
            Value::Double(v) => {
                let mut bytes = Vec::with_capacity(8);
                bytes.write_f64::<LE>(*v)?;
                self.push_field_data(&bytes).to_le_bytes()
            }
            Value::CExoString(text) => {
                let mut bytes = Vec::with_capacity(4 + text.len());
                bytes.write_u32::<LE>(text.len() as u32)?;
                bytes.extend_from_slice(text.as_bytes());
                self.push_field_data(&bytes).to_le_bytes()
            }
            Value::ResRef(r) => {
                let text = r.as_str();
                let mut bytes = Vec::with_capacity(1 + text.len());
                bytes.push(text.len() as u8);
                bytes.extend_from_slice(text.as_bytes());
                self.push_field_data(&bytes).to_le_bytes()
            }
            Value::Void(blob) => {
                let mut bytes = Vec::with_capacity(4 + blob.len());
                bytes.write_u32::<LE>(blob.len() as u32)?;
                bytes.extend_from_slice(blob);
                self.push_field_data(&bytes).to_le_bytes()
            }
            Value::CExoLocString(loc) => self.encode_locstring(loc)?.to_le_bytes(),
            Value::Struct(inner) => self.write_struct(inner)?.to_le_bytes(),
            Value::List(items) => self.write_list(items)?.to_le_bytes(),
        };
        Ok((ty.binary_tag(), data))
    }

    fn encode_locstring(&mut self, loc: &LocString) -> Result<u32> {
        let mut body = Vec::new();
        body.write_u32::<LE>(loc.strref)?;
        body.write_u32::<LE>(loc.entries.len() as u32)?;
        for (language_id, text) in &loc.entries {
            body.write_u32::<LE>(language_id.0)?;
            body.write_u32::<LE>(text.len() as u32)?;
            body.extend_from_slice(text.as_bytes());
        }
        let mut framed = Vec::with_capacity(4 + body.len());
        framed.write_u32::<LE>(body.len() as u32)?;
        framed.extend_from_slice(&body);
        Ok(self.push_field_data(&framed))
    }

    fn write_list(&mut self, items: &[Struct]) -> Result<u32> {
        let mut member_indices = Vec::with_capacity(items.len());
        for item in items {
            member_indices.push(self.write_struct(item)?);
        }
        let offset = (self.list_indices.len() * 4) as u32;
        self.list_indices.push(items.len() as u32);
        self.list_indices.extend(member_indices);
        Ok(offset)
    }

    fn raw_struct(&self, index: usize) -> RawStruct {
        let struct_id = self.struct_ids[index];
        match &self.struct_irs[index] {
            RawStructIr::NoFields => RawStruct { struct_id, offset: 0, field_count: 0 },
            RawStructIr::OneField(field_index) => RawStruct { struct_id, offset: *field_index, field_count: 1 },
            RawStructIr::MultiField { offset, field_count } => {
                RawStruct { struct_id, offset: *offset, field_count: *field_count }
            }
        }
    }
}

/// Serializes `doc` to `writer` as binary GFF, using format version `V3.2`.
pub fn write<W: Write>(doc: &Document, writer: &mut W) -> Result<()> {
    let mut ctx = WriterCtx::default();
    ctx.write_struct(&doc.root)?;

    let structs: Vec<RawStruct> = (0..ctx.struct_irs.len()).map(|i| ctx.raw_struct(i)).collect();
    let labels: Vec<Label> = ctx.labels.iter().copied().collect();

    let header_len = 4 + 4 + 8 * 6;
    let structs_offset = header_len as u32;
    let fields_offset = structs_offset + (structs.len() * 12) as u32;
    let labels_offset = fields_offset + (ctx.fields.len() * 12) as u32;
    let field_data_offset = labels_offset + (labels.len() * 16) as u32;
    let field_indices_offset = field_data_offset + ctx.field_data.len() as u32;
    let list_indices_offset = field_indices_offset + (ctx.field_indices.len() * 4) as u32;

    let header = Header {
        magic_tag: doc.magic_tag,
        version: Version::GFF_V3_2,
        structs: Section { offset: structs_offset, count: structs.len() as u32 },
        fields: Section { offset: fields_offset, count: ctx.fields.len() as u32 },
        labels: Section { offset: labels_offset, count: labels.len() as u32 },
        field_data: Section { offset: field_data_offset, count: ctx.field_data.len() as u32 },
        field_indices: Section { offset: field_indices_offset, count: (ctx.field_indices.len() * 4) as u32 },
        list_indices: Section { offset: list_indices_offset, count: (ctx.list_indices.len() * 4) as u32 },
    };

    header.write(writer)?;
    for s in &structs {
        s.write(writer)?;
    }
    for f in &ctx.fields {
        f.write(writer)?;
    }
    for label in &labels {
        writer.write_all(label.as_ref())?;
    }
    writer.write_all(&ctx.field_data)?;
    for i in &ctx.field_indices {
        writer.write_u32::<LE>(*i)?;
    }
    for i in &ctx.list_indices {
        writer.write_u32::<LE>(*i)?;
    }
    Ok(())
}
