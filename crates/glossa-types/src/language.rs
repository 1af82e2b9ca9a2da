/// Per-language data driving reflexive stripping, gender and phonetics.
///
/// Selected once per request with [`rules_for`]; adding a language is a table edit.
#[derive(Debug)]
pub struct LanguageRules {
    /// English display name ("German")
    pub name: &'static str,
    /// ISO 639-1 code ("de")
    pub code: &'static str,
    /// Dictionary tag keyword to article, checked in order
    pub gender_keywords: &'static [(&'static str, &'static str)],
    /// Leading reflexive pronouns removed before a dictionary query
    pub reflexive_prefixes: &'static [&'static str],
    /// Trailing reflexive endings and what replaces them
    pub reflexive_suffixes: &'static [(&'static str, &'static str)],
    /// Whether dictionary IPA is trusted for this language
    pub has_phonetics: bool,
}

impl LanguageRules {
    /// Rules for a language without gender, reflexive or phonetics data
    const fn plain(name: &'static str, code: &'static str) -> Self {
        Self {
            name,
            code,
            gender_keywords: &[],
            reflexive_prefixes: &[],
            reflexive_suffixes: &[],
            has_phonetics: false,
        }
    }

    pub fn has_gender(&self) -> bool {
        !self.gender_keywords.is_empty()
    }

    /// Article for a tag such as "masculine", if the language has one
    pub fn article_for(&self, keyword: &str) -> Option<&'static str> {
        let keyword = keyword.to_lowercase();
        self.gender_keywords
            .iter()
            .find(|(tag, _)| *tag == keyword)
            .map(|(_, article)| *article)
    }

    /// Whether `article` is one of this language's gender articles
    pub fn is_article(&self, article: &str) -> bool {
        let article = article.trim().to_lowercase();
        self.gender_keywords.iter().any(|(_, a)| *a == article)
    }
}

static LANGUAGES: &[LanguageRules] = &[
    LanguageRules {
        name: "English",
        code: "en",
        gender_keywords: &[],
        reflexive_prefixes: &[],
        reflexive_suffixes: &[],
        has_phonetics: true,
    },
    LanguageRules {
        name: "German",
        code: "de",
        gender_keywords: &[
            ("masculine", "der"),
            ("feminine", "die"),
            ("neuter", "das"),
        ],
        reflexive_prefixes: &["sich "],
        reflexive_suffixes: &[],
        has_phonetics: false,
    },
    LanguageRules {
        name: "French",
        code: "fr",
        gender_keywords: &[("masculine", "le"), ("feminine", "la")],
        reflexive_prefixes: &["se ", "s'", "s’"],
        reflexive_suffixes: &[],
        has_phonetics: false,
    },
    LanguageRules {
        name: "Spanish",
        code: "es",
        gender_keywords: &[("masculine", "el"), ("feminine", "la")],
        reflexive_prefixes: &[],
        reflexive_suffixes: &[("arse", "ar"), ("erse", "er"), ("irse", "ir")],
        has_phonetics: false,
    },
    LanguageRules {
        name: "Italian",
        code: "it",
        gender_keywords: &[("masculine", "il"), ("feminine", "la")],
        reflexive_prefixes: &[],
        reflexive_suffixes: &[("arsi", "are"), ("ersi", "ere"), ("irsi", "ire")],
        has_phonetics: false,
    },
    LanguageRules {
        name: "Portuguese",
        code: "pt",
        gender_keywords: &[("masculine", "o"), ("feminine", "a")],
        reflexive_prefixes: &[],
        reflexive_suffixes: &[("-se", "")],
        has_phonetics: false,
    },
    LanguageRules {
        name: "Dutch",
        code: "nl",
        gender_keywords: &[("masculine", "de"), ("feminine", "de"), ("neuter", "het")],
        reflexive_prefixes: &["zich "],
        reflexive_suffixes: &[],
        has_phonetics: false,
    },
    LanguageRules::plain("Russian", "ru"),
    LanguageRules::plain("Ukrainian", "uk"),
    LanguageRules::plain("Polish", "pl"),
    LanguageRules::plain("Czech", "cs"),
    LanguageRules::plain("Swedish", "sv"),
    LanguageRules::plain("Danish", "da"),
    LanguageRules::plain("Norwegian", "no"),
    LanguageRules::plain("Finnish", "fi"),
    LanguageRules::plain("Hungarian", "hu"),
    LanguageRules::plain("Romanian", "ro"),
    LanguageRules::plain("Greek", "el"),
    LanguageRules::plain("Turkish", "tr"),
    LanguageRules::plain("Arabic", "ar"),
    LanguageRules::plain("Hebrew", "he"),
    LanguageRules::plain("Hindi", "hi"),
    LanguageRules::plain("Indonesian", "id"),
    LanguageRules::plain("Japanese", "ja"),
    LanguageRules::plain("Korean", "ko"),
    LanguageRules::plain("Chinese", "zh"),
];

/// Look up rules by display name or ISO code, case-insensitively
pub fn rules_for(language: &str) -> Option<&'static LanguageRules> {
    let language = language.trim();
    LANGUAGES.iter().find(|rules| {
        rules.name.eq_ignore_ascii_case(language) || rules.code.eq_ignore_ascii_case(language)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rules_by_name_and_code() {
        assert_eq!(rules_for("German").map(|r| r.code), Some("de"));
        assert_eq!(rules_for("de").map(|r| r.name), Some("German"));
        assert_eq!(rules_for(" spanish ").map(|r| r.code), Some("es"));
        assert!(rules_for("Klingon").is_none());
    }

    #[test]
    fn test_plain_languages_have_no_metadata() {
        let russian = rules_for("ru").unwrap();
        assert_eq!(russian.name, "Russian");
        assert!(!russian.has_gender());
        assert!(!russian.has_phonetics);
        assert!(russian.reflexive_prefixes.is_empty());
        assert_eq!(rules_for("Japanese").map(|r| r.code), Some("ja"));
    }

    #[test]
    fn test_article_lookup() {
        let german = rules_for("de").unwrap();
        assert_eq!(german.article_for("Masculine"), Some("der"));
        assert_eq!(german.article_for("plural"), None);
        assert!(german.is_article("Die"));

        let english = rules_for("en").unwrap();
        assert!(!english.has_gender());
        assert!(english.has_phonetics);
    }
}
