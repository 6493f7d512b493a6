//! Technical Specs Module
//!
//! 技術仕様（キーと値の組）と、そのパイプ区切り表現`key1:value1|key2:value2`を扱います。
//! キーや値に含まれる`|`と`:`はエスケープしません。

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// 技術仕様
///
/// 挿入順を保持するキーと値のリストです。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TechnicalSpecs {
    entries: Vec<(String, String)>,
}

impl TechnicalSpecs {
    /// 空の技術仕様を生成
    pub fn new() -> Self {
        Self::default()
    }

    /// キーと値を追加する
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    /// ビルダー形式でキーと値を追加する
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.push(key, value);
        self
    }

    /// キーで値を検索する（最初に一致したもの）
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// すべてのエントリ
    pub fn entries(&self) -> &[(String, String)] {
        &self.entries
    }

    /// パイプ区切り表現を解析する
    ///
    /// 各ペアは最初の`:`で分割されるため、値には`:`を含められます。
    /// `:`のないペアと空のキーは無視します。
    ///
    /// # 使用例
    ///
    /// ```rust
    /// use catalogkit::TechnicalSpecs;
    ///
    /// let specs = TechnicalSpecs::parse("viscosidad:5W-30|temperatura:-30°C a 40°C");
    /// assert_eq!(specs.get("viscosidad"), Some("5W-30"));
    /// ```
    pub fn parse(s: &str) -> Self {
        let entries = s
            .split('|')
            .filter_map(|pair| {
                let (key, value) = pair.split_once(':')?;
                let key = key.trim();
                if key.is_empty() {
                    return None;
                }
                Some((key.to_string(), value.trim().to_string()))
            })
            .collect();
        Self { entries }
    }
}

/// 空の値を持つエントリを省いて`key:value|...`形式で出力する
impl fmt::Display for TechnicalSpecs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.entries {
            if value.is_empty() {
                continue;
            }
            if !first {
                f.write_str("|")?;
            }
            first = false;
            write!(f, "{}:{}", key, value)?;
        }
        Ok(())
    }
}

/// 挿入順を保ったJSONオブジェクトとして直列化する（空の値も含む）
impl Serialize for TechnicalSpecs {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for TechnicalSpecs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
