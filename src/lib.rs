//! Codecs for the Aurora-derived GFF and ERF game-asset formats.
//!
//! A [`value::Document`] is the single in-memory representation every codec in
//! this crate reads into and writes out of:
//!
//! - [`binary`]: the on-disk `.gff`-family binary layout (§4.2).
//! - [`json`]: a JSON interchange shape compatible with the reference community
//!   tooling's `.json` export (§4.3).
//! - [`dsl`]: the line-oriented `.ndugff` text format (§4.4).
//! - [`erf`]: the archive container (`.erf`/`.hak`/`.mod`/`.nwm`) that holds
//!   resources of any of the above (§4.5).
//!
//! Readers preserve whatever struct-field order their source carries; only
//! [`dsl::write`] imposes the canonical field order (see [`value::canonicalize`])
//! when it serializes. [`value::Struct`] equality is order-insensitive (it
//! compares the backing `IndexMap` as a key/value set), so a [`value::Document`]
//! still compares equal regardless of which format it was read from.

pub mod binary;
pub mod dsl;
pub mod erf;
pub mod error;
pub mod field_type;
pub mod json;
pub mod label;
pub mod language;
pub mod value;

pub use error::{Error, Result};
pub use field_type::FieldType;
pub use label::Label;
pub use language::{Gender, Language, LanguageId};
pub use value::{Document, LocString, MagicTag, ResRef, Struct, Value};
