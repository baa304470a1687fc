//! Bijection between file extensions and the 16-bit resource-type codes stored in
//! an ERF archive's key table.
//!
//! The numeric IDs follow the Aurora-engine resource-type numbering used across
//! the NWN modding community's public tooling; `original_source/` only covers the
//! GFF codec and defines no such table, so this one is grounded on that wider
//! convention rather than on the reference tooling itself (see DESIGN.md).

/// `(extension, res_type)` pairs covering every extension named in §6 plus the
/// additional resource kinds a representative HAK needs to round-trip.
const TABLE: &[(&str, u16)] = &[
    ("bmp", 1),
    ("tga", 3),
    ("wav", 4),
    ("plt", 6),
    ("txt", 10),
    ("mdl", 2002),
    ("nss", 2009),
    ("ncs", 2010),
    ("are", 2012),
    ("set", 2013),
    ("ifo", 2014),
    ("bic", 2015),
    ("wok", 2016),
    ("2da", 2017),
    ("tlk", 2018),
    ("txi", 2022),
    ("git", 2023),
    ("bti", 2024),
    ("uti", 2025),
    ("btc", 2026),
    ("utc", 2027),
    ("dlg", 2029),
    ("itp", 2030),
    ("utt", 2032),
    ("dds", 2033),
    ("uts", 2035),
    ("ltr", 2036),
    ("gff", 2037),
    ("fac", 2038),
    ("gic", 2040),
    ("gui", 2041),
    ("utd", 2042),
    ("ute", 2044),
    ("utp", 2045),
    ("trn", 2046),
    ("utm", 2051),
    ("utw", 2052),
    ("jrl", 2056),
    ("ssf", 2060),
    ("fsm", 2085),
    ("trx", 2086),
    ("sef", 2087),
    ("pfx", 2088),
    ("mdb", 2089),
];

/// Looks up the resource-type code for a file extension (case-insensitive, no leading dot).
pub fn res_type_for_extension(ext: &str) -> Option<u16> {
    let ext = ext.to_ascii_lowercase();
    TABLE.iter().find(|(e, _)| *e == ext).map(|(_, t)| *t)
}

/// Looks up the file extension for a resource-type code.
pub fn extension_for_res_type(res_type: u16) -> Option<&'static str> {
    TABLE.iter().find(|(_, t)| *t == res_type).map(|(e, _)| *e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_table_entry_round_trips() {
        for (ext, res_type) in TABLE {
            assert_eq!(res_type_for_extension(ext), Some(*res_type));
            assert_eq!(extension_for_res_type(*res_type), Some(*ext));
        }
    }

    #[test]
    fn extension_lookup_is_case_insensitive() {
        assert_eq!(res_type_for_extension("UTC"), Some(2027));
    }

    #[test]
    fn unknown_extension_and_res_type_are_none() {
        assert_eq!(res_type_for_extension("xyz"), None);
        assert_eq!(extension_for_res_type(65000), None);
    }
}
