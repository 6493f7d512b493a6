//! SqlValue Module
//!
//! `INSERT ... VALUES`句のフィールド値トークンを定義します。

/// フィールド値トークン
///
/// レコード内の1フィールドを分類した結果です。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    /// クォートなしの`null`（大文字・小文字を区別しない）
    Null,

    /// シングルクォートで囲まれた文字列リテラル
    ///
    /// 外側のクォートは除去され、バックスラッシュエスケープは解決済みです。
    Quoted(String),

    /// クォートなしのトークン（数値、真偽値など）
    ///
    /// 前後の空白を除いた文字列がそのまま入ります。
    Bare(String),
}

impl SqlValue {
    /// トリム済みの生フィールド文字列を分類する
    pub(crate) fn classify(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("null") {
            return SqlValue::Null;
        }
        if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
            return SqlValue::Quoted(unescape(&raw[1..raw.len() - 1]));
        }
        SqlValue::Bare(raw.to_string())
    }

    /// 値を`Option<String>`に変換する
    pub fn into_text(self) -> Option<String> {
        match self {
            SqlValue::Null => None,
            SqlValue::Quoted(s) | SqlValue::Bare(s) => Some(s),
        }
    }
}

/// バックスラッシュエスケープを解決する（`\x` -> `x`）
///
/// 末尾の孤立したバックスラッシュはそのまま残します。
fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some(next) => out.push(next),
                None => out.push('\\'),
            }
        } else {
            out.push(ch);
        }
    }
    out
}
