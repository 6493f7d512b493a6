//! Category Row Module
//!
//! 分割済みフィールドを位置ベースでカテゴリ行に変換します。
//! 形が合わない行はノイズとして黙って除外します。

use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

use super::scanner::{extract_values_clause, split_fields, split_records};
use super::tokens::SqlValue;

/// 行として受け付ける最小フィールド数
pub const MIN_FIELDS: usize = 6;

// product_categoriesの列位置
const COL_ID: usize = 0;
const COL_NAME: usize = 2;
const COL_DESCRIPTION: usize = 3;
const COL_PARENT_ID: usize = 5;
const COL_DISPLAY_ORDER: usize = 6;

/// `product_categories`の1行
///
/// 列順は`id, business_id, name, description, icon_url, parent_category_id,
/// display_order, is_active, ...`です。ツリー構築に使わない列は保持しません。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRow {
    /// UUID形式のID
    pub id: String,
    /// 表示名（空でない）
    pub name: String,
    /// 説明（NULLの場合は空文字列）
    pub description: String,
    /// 親カテゴリのID（NULLまたは空の場合は`None`）
    pub parent_id: Option<String>,
    /// 兄弟間の並び順（欠落・非数値の場合は0）
    pub display_order: i64,
}

impl CategoryRow {
    /// 分割済みフィールドから行を構築する
    ///
    /// フィールド数が足りない、先頭がUUIDでない、名前が空の場合は`None`を返します。
    pub fn from_fields(fields: Vec<SqlValue>) -> Option<Self> {
        if fields.len() < MIN_FIELDS {
            return None;
        }

        let mut fields: Vec<Option<String>> =
            fields.into_iter().map(SqlValue::into_text).collect();

        let id = fields[COL_ID].take().filter(|id| is_uuid(id))?;
        let name = fields[COL_NAME].take().filter(|n| !n.trim().is_empty())?;
        let description = fields[COL_DESCRIPTION].take().unwrap_or_default();
        let parent_id = fields[COL_PARENT_ID]
            .take()
            .filter(|p| !p.trim().is_empty());
        let display_order = fields
            .get_mut(COL_DISPLAY_ORDER)
            .and_then(Option::take)
            .and_then(|s| s.trim().parse::<i64>().ok())
            .unwrap_or(0);

        Some(Self {
            id,
            name,
            description,
            parent_id,
            display_order,
        })
    }
}

/// 8-4-4-4-12の16進数形式かどうか（大文字・小文字を区別しない）
pub fn is_uuid(s: &str) -> bool {
    static UUID_RE: OnceLock<Regex> = OnceLock::new();
    UUID_RE
        .get_or_init(|| {
            Regex::new(r"^(?i)[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
                .expect("UUID pattern is valid")
        })
        .is_match(s)
}

/// `INSERT INTO ... VALUES`文からカテゴリ行を取り出す
///
/// 入力テキストから行のシーケンスへの純粋関数です。`VALUES`句がない場合は空を返し、
/// 形の合わない行は除外されます（エラーにはしません）。
///
/// # 使用例
///
/// ```rust
/// use catalogkit::sql::parse_category_rows;
///
/// let sql = "INSERT INTO c VALUES \
///     ('00000001-0000-0000-0000-000000000001', null, 'Motor', '', null, null, '1')";
/// let rows = parse_category_rows(sql);
/// assert_eq!(rows.len(), 1);
/// assert_eq!(rows[0].name, "Motor");
/// ```
pub fn parse_category_rows(sql: &str) -> Vec<CategoryRow> {
    let Some(values) = extract_values_clause(sql) else {
        debug!("no VALUES clause found in category SQL");
        return Vec::new();
    };

    let records = split_records(values);
    let total = records.len();
    let rows: Vec<CategoryRow> = records
        .iter()
        .filter_map(|record| {
            let row = CategoryRow::from_fields(split_fields(record));
            if row.is_none() {
                debug!(record = %record, "dropping malformed category row");
            }
            row
        })
        .collect();

    debug!(total, accepted = rows.len(), "parsed category rows");
    rows
}
