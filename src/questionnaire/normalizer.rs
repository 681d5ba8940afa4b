/// Folds a dimension label down to a comparison key: invisible marks removed,
/// whitespace collapsed, typographic apostrophes and dashes unified, French
/// diacritics stripped and case lowered. "D5 - Émotions et régulation" and
/// "d5 -  emotions et regulation" share a key.
pub(crate) fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut folded = String::with_capacity(collapsed.len());
    for c in collapsed.chars() {
        match c {
            'à' | 'â' | 'ä' | 'À' | 'Â' | 'Ä' => folded.push('a'),
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => folded.push('e'),
            'î' | 'ï' | 'Î' | 'Ï' => folded.push('i'),
            'ô' | 'ö' | 'Ô' | 'Ö' => folded.push('o'),
            'ù' | 'û' | 'ü' | 'Ù' | 'Û' | 'Ü' => folded.push('u'),
            'ÿ' | 'Ÿ' => folded.push('y'),
            'ç' | 'Ç' => folded.push('c'),
            'œ' | 'Œ' => folded.push_str("oe"),
            'æ' | 'Æ' => folded.push_str("ae"),
            '\u{2019}' | '\u{2018}' | '`' | '\u{b4}' => folded.push('\''),
            '\u{2013}' | '\u{2014}' => folded.push('-'),
            // Decomposed input: the base letter was already pushed.
            '\u{0300}'..='\u{036f}' => {}
            other => folded.extend(other.to_lowercase()),
        }
    }
    folded
}

#[cfg(test)]
mod tests {
    use super::normalize_label;

    #[test]
    fn folds_accents_and_apostrophes() {
        assert_eq!(
            normalize_label("D1 - Traitement de l’information"),
            "d1 - traitement de l'information"
        );
        assert_eq!(
            normalize_label("D5 - Émotions et régulation"),
            normalize_label("D5 - Emotions et regulation")
        );
    }

    #[test]
    fn drops_combining_marks_of_decomposed_text() {
        assert_eq!(
            normalize_label("D5 - E\u{301}motions et re\u{301}gulation"),
            "d5 - emotions et regulation"
        );
        assert_eq!(normalize_label("Franc\u{327}ais"), "francais");
    }

    #[test]
    fn removes_invisible_marks_and_extra_whitespace() {
        let source = "\u{feff}D7  -  Double   exceptionnalité";
        assert_eq!(normalize_label(source), "d7 - double exceptionnalite");
    }

    #[test]
    fn unifies_typographic_dashes() {
        assert_eq!(
            normalize_label("D8 \u{2013} Temporalité et rythmes"),
            "d8 - temporalite et rythmes"
        );
    }
}
