//! 設定の型定義

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

/// ユーザーがホストを設定するまで使われるサービスホスト
pub const DEFAULT_HOST: &str = "tr8nhub.com";

/// 設定の読み書きで発生するエラー
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Failed to access settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// tr8n サービスへの接続設定
///
/// ワークスペース直下の `.tr8n.json` に永続化される。認証情報は
/// ログイン・アプリケーション選択フローが書き込む。
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Tr8nSettings {
    /// tr8n サービスが動いているドメイン
    pub host: String,

    /// ログインで取得したアクセストークン
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// 選択中のアプリケーションキー
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app_key: Option<String>,

    /// 最後にログインに使ったメールアドレス
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Default for Tr8nSettings {
    fn default() -> Self {
        Self { host: DEFAULT_HOST.to_string(), access_token: None, app_key: None, email: None }
    }
}
