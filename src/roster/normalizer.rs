use unicode_normalization::UnicodeNormalization;

const ALEF: char = '\u{0627}';
const HEH: char = '\u{0647}';
const WAW: char = '\u{0648}';
const ALEF_MAKSURA: char = '\u{0649}';

/// Tashkil marks (fathatan through the extended vowel signs) and superscript alef.
fn is_tashkil(c: char) -> bool {
    matches!(c, '\u{064B}'..='\u{065F}' | '\u{0670}')
}

/// Folds letter-shape variants that are used interchangeably in handwritten
/// and typed names. Teh marbuta (U+0629) is deliberately left alone.
fn fold_variant(c: char) -> char {
    match c {
        // alef with madda, hamza above, hamza below
        '\u{0622}' | '\u{0623}' | '\u{0625}' => ALEF,
        // heh doachashmee
        '\u{06BE}' => HEH,
        // yeh and yeh with hamza both collapse onto alef maksura
        '\u{064A}' | '\u{0626}' => ALEF_MAKSURA,
        // waw with hamza
        '\u{0624}' => WAW,
        other => other,
    }
}

fn is_arabic_block(c: char) -> bool {
    ('\u{0600}'..='\u{06FF}').contains(&c)
}

/// Whitespace for name splitting. A byte order mark left in the middle of
/// extracted text separates words too.
fn is_name_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{FEFF}'
}

/// Maps a raw name to the canonical form used for equality checks.
///
/// The input goes through NFKC first so presentation forms and ligatures
/// decompose into base letters. Diacritics are then dropped, letter variants
/// folded, anything outside the Arabic block (other than whitespace) removed,
/// and whitespace collapsed to single spaces.
///
/// Never fails: a string with no Arabic letters normalizes to `""`.
///
/// ```ignore
/// assert_eq!(normalize_name("  أَحْمَد   عَلِي "), "احمد على");
/// ```
pub fn normalize_name(input: &str) -> String {
    let folded: String = input
        .nfkc()
        .filter(|c| !is_tashkil(*c))
        .map(fold_variant)
        .filter(|c| is_arabic_block(*c) || is_name_space(*c))
        .collect();

    folded
        .split(is_name_space)
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::normalize_name;

    #[test]
    fn empty_and_non_arabic_input_normalize_to_empty() {
        assert_eq!(normalize_name(""), "");
        assert_eq!(normalize_name("abc123"), "");
        assert_eq!(normalize_name("  John Smith, 42. "), "");
    }

    #[test]
    fn strips_tashkil_and_superscript_alef() {
        assert_eq!(normalize_name("مُحَمَّد"), "محمد");
        assert_eq!(normalize_name("عَبْدُ الرَّحْمٰن"), normalize_name("عبد الرحمن"));
    }

    #[test]
    fn collapses_alef_variants() {
        let expected = "احمد";
        assert_eq!(normalize_name("أحمد"), expected);
        assert_eq!(normalize_name("إحمد"), expected);
        assert_eq!(normalize_name("آحمد"), expected);
        assert_eq!(normalize_name("احمد"), expected);
    }

    #[test]
    fn collapses_heh_variants_but_keeps_teh_marbuta() {
        assert_eq!(normalize_name("\u{06BE}ند"), "\u{0647}ند");
        assert_eq!(normalize_name("\u{0647}ند"), "\u{0647}ند");

        let fatima = normalize_name("فاطمة");
        assert!(fatima.ends_with('\u{0629}'));
        assert_ne!(fatima, normalize_name("فاطمه"));
    }

    #[test]
    fn collapses_yeh_and_hamza_carriers() {
        assert_eq!(normalize_name("علي"), "على");
        assert_eq!(normalize_name("على"), "على");
        assert_eq!(normalize_name("هانئ"), "هانى");
        assert_eq!(normalize_name("مؤمن"), "مومن");
    }

    #[test]
    fn collapses_whitespace_and_drops_foreign_characters() {
        assert_eq!(normalize_name("  محمد \t\n  احمد  "), "محمد احمد");
        assert_eq!(normalize_name("Mohamed محمد (12)"), "محمد");
    }

    #[test]
    fn byte_order_mark_separates_words() {
        assert_eq!(normalize_name("محمد\u{FEFF}احمد"), "محمد احمد");
        // beh-meem ligature, BOM, initial zah
        assert_eq!(normalize_name("\u{FC30}\u{FEFF}\u{FEC7}"), "بم ظ");
        assert_eq!(normalize_name("\u{FEFF}علي\u{FEFF}"), "على");
    }

    #[test]
    fn decomposes_presentation_forms() {
        // initial meem, medial hah, medial meem, final dal
        assert_eq!(normalize_name("\u{FEE3}\u{FEA4}\u{FEE4}\u{FEAA}"), "محمد");
    }

    #[test]
    fn normalization_is_idempotent() {
        let samples = [
            "",
            "abc123",
            "مُحَمَّد أَحْمَد",
            "إبراهيم  مؤمن   هانئ",
            "\u{FEE3}\u{FEA4}\u{FEE4}\u{FEAA} ١٢٣",
            "فاطمة الزهراء ھند",
            "آمنة\u{0670} علي",
        ];
        for sample in samples {
            let once = normalize_name(sample);
            assert_eq!(normalize_name(&once), once, "input: {sample:?}");
        }
    }

    #[test]
    fn diacritics_between_letters_do_not_change_the_result() {
        let base = "سعيد حسن";
        let base_form = normalize_name(base);
        for mark in ['\u{064B}', '\u{064E}', '\u{0650}', '\u{0651}', '\u{0652}', '\u{0670}'] {
            let marked: String = base
                .chars()
                .flat_map(|c| {
                    if c == ' ' {
                        vec![c]
                    } else {
                        vec![c, mark]
                    }
                })
                .collect();
            assert_eq!(normalize_name(&marked), base_form, "mark: U+{:04X}", mark as u32);
        }
    }
}
