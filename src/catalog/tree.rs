//! Category Tree Module
//!
//! カテゴリ行からID→レコードのマップを構築し、階層レベルとパンくずパスを計算します。
//! 親参照の循環や未解決の親参照があっても、走査は必ず終了します。

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use crate::slug::slugify;
use crate::sql::CategoryRow;

/// パンくずパスの区切り
pub const PATH_SEPARATOR: &str = " > ";

/// カテゴリレコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryRecord {
    /// UUID形式のID
    pub id: String,
    /// 表示名
    pub name: String,
    /// 名前から生成したスラッグ
    pub slug: String,
    /// 説明
    pub description: String,
    /// 親カテゴリのID（ルートは`None`）
    pub parent_id: Option<String>,
    /// 兄弟間の並び順
    pub display_order: i64,
    /// ルートからの深さ（ルート = 0）
    pub level: usize,
}

/// カタログ出力の1行
///
/// レベル、パス、親の名前とスラッグを解決済みの状態で保持します。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: String,
    pub level: usize,
    /// ルートから自身までの名前
    pub path: Vec<String>,
    pub name: String,
    pub slug: String,
    pub description: String,
    /// 親が解決できない場合は空文字列
    pub parent_name: String,
    /// 親が解決できない場合は空文字列
    pub parent_slug: String,
    pub display_order: i64,
}

impl CatalogEntry {
    /// `"A > B > C"`形式のパス
    pub fn path_string(&self) -> String {
        self.path.join(PATH_SEPARATOR)
    }
}

/// カテゴリツリー
///
/// 構築後は変更されません。
#[derive(Debug, Clone, Default)]
pub struct CategoryTree {
    records: HashMap<String, CategoryRecord>,
}

impl CategoryTree {
    /// カテゴリ行からツリーを構築する
    ///
    /// 同じIDの行が複数ある場合は後の行が優先されます。
    pub fn build(rows: impl IntoIterator<Item = CategoryRow>) -> Self {
        let mut records: HashMap<String, CategoryRecord> = HashMap::new();
        for row in rows {
            let record = CategoryRecord {
                slug: slugify(&row.name),
                id: row.id,
                name: row.name,
                description: row.description,
                parent_id: row.parent_id,
                display_order: row.display_order,
                level: 0,
            };
            records.insert(record.id.clone(), record);
        }

        let mut tree = Self { records };
        let levels: Vec<(String, usize)> = tree
            .records
            .keys()
            .map(|id| (id.clone(), tree.ancestors(id).len()))
            .collect();
        for (id, level) in levels {
            if let Some(record) = tree.records.get_mut(&id) {
                record.level = level;
            }
        }
        tree
    }

    /// SQL文から直接ツリーを構築する
    pub fn from_sql(sql: &str) -> Self {
        Self::build(crate::sql::parse_category_rows(sql))
    }

    /// レコード数
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// レコードが空かどうか
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// IDでレコードを取得する
    pub fn get(&self, id: &str) -> Option<&CategoryRecord> {
        self.records.get(id)
    }

    /// 解決できる親のレコード
    pub fn parent_of(&self, record: &CategoryRecord) -> Option<&CategoryRecord> {
        record
            .parent_id
            .as_deref()
            .and_then(|pid| self.records.get(pid))
    }

    /// 祖先を近い順に返す
    ///
    /// 親IDが解決できない、または既に訪問したノードに戻った時点で走査を打ち切ります。
    /// そのため循環や未解決参照を含む部分木では、深さが実際より小さく報告されます。
    pub fn ancestors(&self, id: &str) -> Vec<&CategoryRecord> {
        let mut chain = Vec::new();
        let Some(mut current) = self.records.get(id) else {
            return chain;
        };

        let mut visited: HashSet<&str> = HashSet::new();
        visited.insert(current.id.as_str());

        while let Some(parent) = self.parent_of(current) {
            if !visited.insert(parent.id.as_str()) {
                break;
            }
            chain.push(parent);
            current = parent;
        }

        chain
    }

    /// レコードの深さ（ルート = 0）
    pub fn level_of(&self, id: &str) -> usize {
        self.ancestors(id).len()
    }

    /// ルートから自身までの名前のリスト
    pub fn path_of(&self, id: &str) -> Vec<String> {
        let Some(record) = self.records.get(id) else {
            return Vec::new();
        };
        let mut path: Vec<String> = self
            .ancestors(id)
            .into_iter()
            .rev()
            .map(|r| r.name.clone())
            .collect();
        path.push(record.name.clone());
        path
    }

    /// 出力用のエントリを`(level, display_order, name, id)`の昇順で返す
    ///
    /// 並び順は入力順に依存しません。
    pub fn entries(&self) -> Vec<CatalogEntry> {
        let mut entries: Vec<CatalogEntry> = self
            .records
            .values()
            .map(|record| {
                let parent = self.parent_of(record);
                CatalogEntry {
                    id: record.id.clone(),
                    level: record.level,
                    path: self.path_of(&record.id),
                    name: record.name.clone(),
                    slug: record.slug.clone(),
                    description: record.description.clone(),
                    parent_name: parent.map(|p| p.name.clone()).unwrap_or_default(),
                    parent_slug: parent.map(|p| p.slug.clone()).unwrap_or_default(),
                    display_order: record.display_order,
                }
            })
            .collect();

        entries.sort_by(compare_entries);
        entries
    }
}

fn compare_entries(a: &CatalogEntry, b: &CatalogEntry) -> Ordering {
    a.level
        .cmp(&b.level)
        .then(a.display_order.cmp(&b.display_order))
        .then_with(|| a.name.cmp(&b.name))
        .then_with(|| a.id.cmp(&b.id))
}
