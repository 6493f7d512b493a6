//! Configuration Module
//!
//! 環境変数からの設定読み込み、入力サイズ制限、シートのスタイル定義を提供します。

use std::time::Duration;

/// OpenAIのデフォルトモデル
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";

/// 画像検索のデフォルトタイムアウト（秒）
pub const DEFAULT_IMAGE_TIMEOUT_SECS: u64 = 5;

/// AI呼び出しのデフォルトタイムアウト（秒）
pub const DEFAULT_AI_TIMEOUT_SECS: u64 = 30;

/// 環境変数名
pub mod env {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const UNSPLASH_ACCESS_KEY: &str = "UNSPLASH_ACCESS_KEY";
    pub const OPENAI_MODEL: &str = "OPENAI_MODEL";
    pub const HTTP_TIMEOUT_SECS: &str = "CATALOGKIT_HTTP_TIMEOUT_SECS";
}

/// 実行時設定
///
/// 外部サービスの認証情報とタイムアウトを保持します。
/// 空文字列の値は未設定として扱います。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// OpenAI APIキー
    pub openai_api_key: Option<String>,
    /// Unsplashアクセスキー
    pub unsplash_access_key: Option<String>,
    /// OpenAIのモデル名
    pub openai_model: String,
    /// 画像検索のタイムアウト
    pub image_timeout: Duration,
    /// AI呼び出しのタイムアウト
    pub ai_timeout: Duration,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            unsplash_access_key: None,
            openai_model: DEFAULT_OPENAI_MODEL.to_string(),
            image_timeout: Duration::from_secs(DEFAULT_IMAGE_TIMEOUT_SECS),
            ai_timeout: Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    /// 環境変数（と`.env`ファイル）から設定を読み込む
    ///
    /// `CATALOGKIT_HTTP_TIMEOUT_SECS`は画像検索とAI呼び出しの両方に適用されます。
    /// 数値として解釈できない場合はデフォルト値のままです。
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// 任意の検索関数から設定を読み込む
    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let mut settings = Self {
            openai_api_key: get(env::OPENAI_API_KEY),
            unsplash_access_key: get(env::UNSPLASH_ACCESS_KEY),
            openai_model: get(env::OPENAI_MODEL).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string()),
            ..Self::default()
        };

        match get(env::HTTP_TIMEOUT_SECS).map(|v| v.parse::<u64>()) {
            Some(Ok(secs)) if secs > 0 => {
                settings.image_timeout = Duration::from_secs(secs);
                settings.ai_timeout = Duration::from_secs(secs);
            }
            Some(_) => {
                tracing::warn!(
                    "{} is not a positive integer; using default timeouts",
                    env::HTTP_TIMEOUT_SECS
                );
            }
            None => {}
        }

        settings
    }

    /// OpenAI APIキーを上書きする（空文字列は無視）
    pub fn with_openai_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.openai_api_key = Some(key);
        }
        self
    }

    /// Unsplashアクセスキーを上書きする（空文字列は無視）
    pub fn with_unsplash_key(mut self, key: Option<String>) -> Self {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.unsplash_access_key = Some(key);
        }
        self
    }
}

/// 入力ファイルの制限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputLimits {
    /// 入力ファイルの最大サイズ（バイト）
    /// デフォルト: 256MiB
    pub max_input_file_size: u64,
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            max_input_file_size: 256 * 1024 * 1024,
        }
    }
}

/// 出力シートのスタイル
///
/// XLSX出力のヘッダー色、補足行の書式、列幅を定義します。CSV出力では使用しません。
#[derive(Debug, Clone, PartialEq)]
pub struct SheetStyle {
    /// ヘッダー背景色（RGB）
    pub header_fill: u32,
    /// ヘッダー文字色（RGB）
    pub header_font_color: u32,
    /// 補足行（記入例）の文字色（RGB）
    pub hint_font_color: u32,
    /// 補足行の文字サイズ
    pub hint_font_size: f64,
    /// 見出し（タイトル行）の文字サイズ
    pub title_font_size: f64,
    /// 表シートの列幅（文字数）
    pub column_width: f64,
    /// 要約シートのラベル列と値列の幅
    pub summary_widths: (f64, f64),
    /// 説明シートの列幅
    pub instructions_width: f64,
}

impl Default for SheetStyle {
    fn default() -> Self {
        Self {
            header_fill: 0x366092,
            header_font_color: 0xFFFFFF,
            hint_font_color: 0x666666,
            hint_font_size: 9.0,
            title_font_size: 14.0,
            column_width: 25.0,
            summary_widths: (30.0, 50.0),
            instructions_width: 100.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[]));
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.openai_model, "gpt-4o-mini");
        assert_eq!(settings.image_timeout, Duration::from_secs(5));
        assert_eq!(settings.ai_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_values_are_absent() {
        let settings = Settings::from_lookup(lookup(&[
            (env::OPENAI_API_KEY, "   "),
            (env::UNSPLASH_ACCESS_KEY, ""),
            (env::OPENAI_MODEL, ""),
        ]));
        assert_eq!(settings.openai_api_key, None);
        assert_eq!(settings.unsplash_access_key, None);
        assert_eq!(settings.openai_model, DEFAULT_OPENAI_MODEL);
    }

    #[test]
    fn test_values_from_lookup() {
        let settings = Settings::from_lookup(lookup(&[
            (env::OPENAI_API_KEY, "sk-test"),
            (env::UNSPLASH_ACCESS_KEY, "un-test"),
            (env::OPENAI_MODEL, "gpt-4o"),
            (env::HTTP_TIMEOUT_SECS, "12"),
        ]));
        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-test"));
        assert_eq!(settings.unsplash_access_key.as_deref(), Some("un-test"));
        assert_eq!(settings.openai_model, "gpt-4o");
        assert_eq!(settings.image_timeout, Duration::from_secs(12));
        assert_eq!(settings.ai_timeout, Duration::from_secs(12));
    }

    #[test]
    fn test_invalid_timeout_keeps_defaults() {
        let settings = Settings::from_lookup(lookup(&[(env::HTTP_TIMEOUT_SECS, "soon")]));
        assert_eq!(settings.image_timeout, Duration::from_secs(DEFAULT_IMAGE_TIMEOUT_SECS));

        let settings = Settings::from_lookup(lookup(&[(env::HTTP_TIMEOUT_SECS, "0")]));
        assert_eq!(settings.ai_timeout, Duration::from_secs(DEFAULT_AI_TIMEOUT_SECS));
    }

    #[test]
    fn test_cli_overrides() {
        let settings = Settings::default()
            .with_openai_key(Some("sk-cli".to_string()))
            .with_unsplash_key(Some(" ".to_string()));
        assert_eq!(settings.openai_api_key.as_deref(), Some("sk-cli"));
        assert_eq!(settings.unsplash_access_key, None);
    }

    #[test]
    fn test_input_limits_default() {
        assert_eq!(InputLimits::default().max_input_file_size, 268_435_456);
    }
}
