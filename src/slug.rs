//! Slug Module
//!
//! 表示名からURLで安全に使える識別子（スラッグ）を生成します。

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// 表示名をスラッグに変換する
///
/// 1. Unicode正準分解（NFD）
/// 2. 結合文字（アクセント記号）を除去
/// 3. 小文字化
/// 4. 単語文字・空白・ハイフン以外を削除
/// 5. 空白とハイフンの連続を1つのハイフンにまとめる
/// 6. 先頭と末尾のハイフンを除去
///
/// 冪等（`slugify(slugify(x)) == slugify(x)`）ですが、一意性は保証しません。
///
/// # 使用例
///
/// ```rust
/// use catalogkit::slugify;
///
/// assert_eq!(slugify("Bujías y Encendido"), "bujias-y-encendido");
/// assert_eq!(slugify("  Aceites -- de Motor "), "aceites-de-motor");
/// ```
pub fn slugify(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .filter(|c| is_word_char(*c) || c.is_whitespace() || *c == '-')
        .collect();

    let mut slug = String::with_capacity(folded.len());
    let mut pending_separator = false;
    for c in folded.chars() {
        if c.is_whitespace() || c == '-' {
            pending_separator = true;
            continue;
        }
        if pending_separator && !slug.is_empty() {
            slug.push('-');
        }
        pending_separator = false;
        slug.push(c);
    }

    slug
}

/// 正規表現の`\w`相当（英数字、アンダースコア、結合文字を除くUnicode文字）
fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// アクセントを除去して小文字化する（列名の照合用）
///
/// スラッグと異なり、記号や空白はそのまま残します。
pub(crate) fn fold_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_slugify_accents() {
        assert_eq!(slugify("Bujías y Encendido"), "bujias-y-encendido");
        assert_eq!(slugify("Diagnóstico de Fallas"), "diagnostico-de-fallas");
        assert_eq!(slugify("Reparación Eléctrica"), "reparacion-electrica");
    }

    #[test]
    fn test_slugify_strips_symbols() {
        assert_eq!(slugify("Audio & Video"), "audio-video");
        assert_eq!(slugify("Aceite 5W-30 (Sintético)"), "aceite-5w-30-sintetico");
        assert_eq!(slugify("Frenos/ABS"), "frenosabs");
    }

    #[test]
    fn test_slugify_keeps_underscores() {
        assert_eq!(slugify("tipo_filtro"), "tipo_filtro");
    }

    #[test]
    fn test_slugify_trims_and_collapses() {
        assert_eq!(slugify("--Hola   --  Mundo--"), "hola-mundo");
        assert_eq!(slugify("   "), "");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_slugify_enye() {
        // ñはn + 結合チルダに分解される
        assert_eq!(slugify("Señalización"), "senalizacion");
    }

    #[test]
    fn test_fold_accents() {
        assert_eq!(fold_accents("Número de Parte"), "numero de parte");
    }

    proptest! {
        #[test]
        fn prop_slugify_is_idempotent(s in "[a-zA-Z0-9áéíóúüñÁÉÍÓÚÑ _\\-.,!&/()]{0,40}") {
            let once = slugify(&s);
            prop_assert_eq!(slugify(&once), once);
        }

        #[test]
        fn prop_slug_has_no_edge_hyphens(s in "[a-zA-ZáéíóúñÑ \\-_.,!]{0,40}") {
            let slug = slugify(&s);
            prop_assert!(!slug.starts_with('-'));
            prop_assert!(!slug.ends_with('-'));
            prop_assert!(!slug.contains("--"));
        }
    }
}
