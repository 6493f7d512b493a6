//! Scanner Module
//!
//! `VALUES`句を文字単位で走査し、レコードとフィールドに分割します。
//! クォートとバックスラッシュエスケープの扱いは両方の分割で共通です。

use regex::Regex;
use std::sync::OnceLock;

use super::tokens::SqlValue;

/// クォートとエスケープの状態
///
/// `'`でクォート状態を反転し、`\`の直後の1文字はそのまま消費します。
#[derive(Debug, Default)]
struct QuoteState {
    in_quotes: bool,
    escape_pending: bool,
}

impl QuoteState {
    /// 1文字を処理し、その文字がクォート外の構造文字として扱えるかを返す
    fn step(&mut self, ch: char) -> bool {
        if self.escape_pending {
            self.escape_pending = false;
            return false;
        }
        match ch {
            '\\' => {
                self.escape_pending = true;
                false
            }
            '\'' => {
                self.in_quotes = !self.in_quotes;
                false
            }
            _ => !self.in_quotes,
        }
    }
}

/// SQL文から`VALUES`キーワード以降のテキストを取り出す
///
/// キーワードは大文字・小文字を区別しません。見つからない場合は`None`。
pub fn extract_values_clause(sql: &str) -> Option<&str> {
    static VALUES_RE: OnceLock<Regex> = OnceLock::new();
    let re = VALUES_RE
        .get_or_init(|| Regex::new(r"(?is)\bVALUES\s+(.+)").expect("VALUES pattern is valid"));
    re.captures(sql)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// `VALUES`句をトップレベルの`( ... )`グループごとのレコードに分割する
///
/// 返される各文字列は外側の括弧を含まず、内部の文字（バックスラッシュを含む）は
/// そのまま保持されます。レコード外の文字（区切りのカンマ、空白、末尾の`;`）は破棄します。
///
/// 入力末尾で閉じていないレコードは黙って破棄されます。
pub fn split_records(values: &str) -> Vec<String> {
    let mut records = Vec::new();
    let mut current = String::new();
    let mut depth: usize = 0;
    let mut state = QuoteState::default();

    for ch in values.chars() {
        let structural = state.step(ch);

        if structural && ch == '(' {
            if depth > 0 {
                current.push(ch);
            }
            depth += 1;
            continue;
        }

        if structural && ch == ')' {
            match depth {
                // レコード外の閉じ括弧は無視
                0 => {}
                1 => {
                    depth = 0;
                    records.push(std::mem::take(&mut current));
                }
                _ => {
                    depth -= 1;
                    current.push(ch);
                }
            }
            continue;
        }

        if depth > 0 {
            current.push(ch);
        }
    }

    records
}

/// 1レコードをトップレベルのカンマでフィールドに分割する
///
/// クォート内のカンマは区切りとして扱いません。最後のカンマの後ろが空の場合、
/// そのフィールドは出力しません。
pub fn split_fields(record: &str) -> Vec<SqlValue> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut state = QuoteState::default();

    for ch in record.chars() {
        let structural = state.step(ch);
        if structural && ch == ',' {
            fields.push(SqlValue::classify(&current));
            current.clear();
        } else {
            current.push(ch);
        }
    }

    if !current.trim().is_empty() {
        fields.push(SqlValue::classify(&current));
    }

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(fields: Vec<SqlValue>) -> Vec<Option<String>> {
        fields.into_iter().map(SqlValue::into_text).collect()
    }

    #[test]
    fn test_split_records_basic() {
        let records = split_records("('a', 1), ('b', 2);");
        assert_eq!(records, vec!["'a', 1", "'b', 2"]);
    }

    #[test]
    fn test_split_records_ignores_parens_in_quotes() {
        let records = split_records("('x (y', 1), ('z)', 2)");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], "'x (y', 1");
        assert_eq!(records[1], "'z)', 2");
    }

    #[test]
    fn test_split_records_nested_parens_kept() {
        let records = split_records("(now(), 'a')");
        assert_eq!(records, vec!["now(), 'a'"]);
    }

    #[test]
    fn test_split_records_escaped_quote_does_not_toggle() {
        let records = split_records(r"('it\'s (fine)', 1), ('b', 2)");
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], r"'it\'s (fine)', 1");
    }

    #[test]
    fn test_split_records_empty_input() {
        assert!(split_records("").is_empty());
    }

    #[test]
    fn test_split_records_drops_unbalanced_tail() {
        // 閉じていない最後のレコードは黙って破棄される
        let records = split_records("('a', 1), ('b', 2");
        assert_eq!(records, vec!["'a', 1"]);
    }

    #[test]
    fn test_split_records_stray_close_paren() {
        let records = split_records(") ('a')");
        assert_eq!(records, vec!["'a'"]);
    }

    #[test]
    fn test_split_fields_reference_case() {
        let fields = split_fields(r"'a, b', null, 'c\'d'");
        assert_eq!(
            texts(fields),
            vec![Some("a, b".to_string()), None, Some("c'd".to_string())]
        );
    }

    #[test]
    fn test_split_fields_bare_tokens() {
        let fields = split_fields(" 1 , true,'x'");
        assert_eq!(
            fields,
            vec![
                SqlValue::Bare("1".to_string()),
                SqlValue::Bare("true".to_string()),
                SqlValue::Quoted("x".to_string()),
            ]
        );
    }

    #[test]
    fn test_split_fields_trailing_comma() {
        assert_eq!(split_fields("'a', 'b',").len(), 2);
    }

    #[test]
    fn test_split_fields_empty_middle_field() {
        let fields = split_fields("'a',,'b'");
        assert_eq!(fields[1], SqlValue::Bare(String::new()));
    }

    #[test]
    fn test_extract_values_clause() {
        let sql = "INSERT INTO t (a) values\n  ('x');";
        assert_eq!(extract_values_clause(sql), Some("('x');"));
        assert_eq!(extract_values_clause("SELECT 1"), None);
    }
}
