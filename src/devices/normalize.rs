//! Header normalization for import column matching

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical form of a column header
///
/// Decomposes accented characters, drops the combining marks, trims and
/// lower-cases: `"  ENDEREÇO "` becomes `"endereco"`. Never fails.
pub fn normalize(text: &str) -> String {
    let stripped: String = text.nfd().filter(|c| !is_combining_mark(*c)).collect();
    stripped.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_examples() {
        assert_eq!(normalize("Nome"), "nome");
        assert_eq!(normalize("ENDEREÇO"), "endereco");
        assert_eq!(normalize("  Ip "), "ip");
    }

    #[test]
    fn test_normalize_precomposed_and_decomposed_agree() {
        // precomposed code points vs base letter plus combining mark
        assert_eq!(normalize("Descri\u{e7}\u{e3}o"), "descricao");
        assert_eq!(normalize("Dispositivo\u{301}"), "dispositivo");
        assert_eq!(normalize("MA\u{C7}"), normalize("MAC\u{327}"));
    }

    #[test]
    fn test_normalize_is_total() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   "), "");
        assert_eq!(normalize("Endereco_IP"), "endereco_ip");
    }
}
