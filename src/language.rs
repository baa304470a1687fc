//! Static table of the 12 localized-string language IDs (6 languages × 2 genders).

use crate::error::Error;

/// One of the 6 languages a [`crate::value::Value::CExoLocString`] entry can be written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    /// English.
    English,
    /// French.
    French,
    /// German.
    German,
    /// Italian.
    Italian,
    /// Spanish.
    Spanish,
    /// Polish.
    Polish,
}

/// Grammatical gender a localized string is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Gender {
    /// Masculine or gender-neutral text.
    Male,
    /// Feminine text.
    Female,
}

const LANGUAGES: [Language; 6] = [
    Language::English,
    Language::French,
    Language::German,
    Language::Italian,
    Language::Spanish,
    Language::Polish,
];

/// A language/gender pair's identifier, in the range 0..=11, as stored as the map
/// key of [`crate::value::Value::CExoLocString`] and as the DSL's language name
/// (`ENGLISH`, `ENGLISH_F`, `FRENCH`, `FRENCH_F`, ...).
///
/// The numeric identity is `language_index * 2 + gender`, matching how the binary
/// format packs a GFF `CExoLocString` substring's language code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LanguageId(pub u32);

impl LanguageId {
    /// Builds a `LanguageId` from a language and gender.
    pub fn new(language: Language, gender: Gender) -> Self {
        let index = LANGUAGES.iter().position(|l| *l == language).expect("exhaustive LANGUAGES table");
        LanguageId(index as u32 * 2 + gender as u32)
    }

    /// Decomposes this id back into its language and gender, if it is one of the 12 known ids.
    pub fn parts(&self) -> Result<(Language, Gender), Error> {
        let index = (self.0 / 2) as usize;
        let gender = if self.0 % 2 == 0 { Gender::Male } else { Gender::Female };
        LANGUAGES
            .get(index)
            .map(|language| (*language, gender))
            .ok_or_else(|| Error::UnknownType(format!("language id {}", self.0)))
    }

    /// The DSL/reference-tooling name for this id, e.g. `ENGLISH_F`.
    pub fn name(&self) -> Result<&'static str, Error> {
        Ok(match self.parts()? {
            (Language::English, Gender::Male) => "ENGLISH",
            (Language::English, Gender::Female) => "ENGLISH_F",
            (Language::French, Gender::Male) => "FRENCH",
            (Language::French, Gender::Female) => "FRENCH_F",
            (Language::German, Gender::Male) => "GERMAN",
            (Language::German, Gender::Female) => "GERMAN_F",
            (Language::Italian, Gender::Male) => "ITALIAN",
            (Language::Italian, Gender::Female) => "ITALIAN_F",
            (Language::Spanish, Gender::Male) => "SPANISH",
            (Language::Spanish, Gender::Female) => "SPANISH_F",
            (Language::Polish, Gender::Male) => "POLISH",
            (Language::Polish, Gender::Female) => "POLISH_F",
        })
    }

    /// Looks up a `LanguageId` by its reference-tooling name.
    pub fn from_name(name: &str) -> Result<Self, Error> {
        for id in 0..12u32 {
            let candidate = LanguageId(id);
            if candidate.name()? == name {
                return Ok(candidate);
            }
        }
        Err(Error::UnknownType(format!("language name {name:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_twelve_ids_have_distinct_names() {
        let names: Vec<_> = (0..12).map(|id| LanguageId(id).name().unwrap()).collect();
        let mut sorted = names.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), 12);
        let _ = names;
    }

    #[test]
    fn name_round_trips_through_from_name() {
        for id in 0..12u32 {
            let name = LanguageId(id).name().unwrap();
            assert_eq!(LanguageId::from_name(name).unwrap(), LanguageId(id));
        }
    }

    #[test]
    fn thirteen_is_unknown() {
        assert!(LanguageId(12).name().is_err());
    }

    #[test]
    fn new_matches_formula() {
        assert_eq!(LanguageId::new(Language::French, Gender::Female), LanguageId(3));
    }
}
