//! 設定管理を行うモジュール

use std::path::PathBuf;

use super::{
    SettingsError,
    Tr8nSettings,
    loader,
};

/// 設定管理を行う
///
/// 各フローからの書き込みは即座にワークスペースの設定ファイルへ
/// 永続化される。ワークスペースルートが無い場合はメモリ上でのみ
/// 保持する。
#[derive(Default, Debug, Clone)]
pub struct SettingsManager {
    /// 現在の設定
    current: Tr8nSettings,

    /// ワークスペースのルートパス
    workspace_root: Option<PathBuf>,
}

impl SettingsManager {
    /// 新しい設定マネージャーを作成
    #[must_use]
    pub fn new() -> Self {
        Self { current: Tr8nSettings::default(), workspace_root: None }
    }

    /// ワークスペースから設定を読み込む
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    pub fn load_settings(&mut self, workspace_root: Option<PathBuf>) -> Result<(), SettingsError> {
        tracing::debug!("Loading settings for workspace: {:?}", workspace_root);

        let settings = if let Some(root) = &workspace_root {
            loader::load_from_workspace(root)?.unwrap_or_default()
        } else {
            Tr8nSettings::default()
        };

        self.current = settings;
        self.workspace_root = workspace_root;
        tracing::debug!("Settings loaded successfully: {:?}", self.current);

        Ok(())
    }

    /// 現在の設定を取得
    #[must_use]
    pub const fn settings(&self) -> &Tr8nSettings {
        &self.current
    }

    /// ワークスペースルートを取得
    #[must_use]
    pub const fn workspace_root(&self) -> Option<&PathBuf> {
        self.workspace_root.as_ref()
    }

    /// サービスホストを設定して永続化する
    pub fn set_host(&mut self, host: String) -> Result<(), SettingsError> {
        self.current.host = host;
        self.persist()
    }

    /// アクセストークンを設定して永続化する（`None` でログアウト）
    pub fn set_access_token(&mut self, token: Option<String>) -> Result<(), SettingsError> {
        self.current.access_token = token;
        self.persist()
    }

    /// アプリケーションキーを設定して永続化する
    pub fn set_app_key(&mut self, app_key: String) -> Result<(), SettingsError> {
        self.current.app_key = Some(app_key);
        self.persist()
    }

    /// メールアドレスを設定して永続化する
    pub fn set_email(&mut self, email: String) -> Result<(), SettingsError> {
        self.current.email = Some(email);
        self.persist()
    }

    /// 現在の設定をワークスペースへ書き込む
    fn persist(&self) -> Result<(), SettingsError> {
        match &self.workspace_root {
            Some(root) => loader::save_to_workspace(root, &self.current),
            None => {
                tracing::debug!("No workspace root, keeping settings in memory only");
                Ok(())
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;
    use crate::config::DEFAULT_HOST;

    /// new: デフォルト値で作成される
    #[rstest]
    fn test_new_creates_default_settings() {
        let manager = SettingsManager::new();

        assert_eq!(manager.settings().host, DEFAULT_HOST);
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: workspace_root が None の場合
    #[rstest]
    fn test_load_settings_without_workspace() {
        let mut manager = SettingsManager::new();

        let result = manager.load_settings(None);

        assert!(result.is_ok());
        assert_eq!(manager.settings().host, DEFAULT_HOST);
        assert!(manager.workspace_root().is_none());
    }

    /// load_settings: 設定ファイルがある場合
    #[rstest]
    fn test_load_settings_with_settings_file() {
        let temp_dir = TempDir::new().unwrap();
        let content = r#"{"host": "tr8n.example.com"}"#;
        fs::write(temp_dir.path().join(".tr8n.json"), content).unwrap();

        let mut manager = SettingsManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.settings().host, "tr8n.example.com");
        assert!(manager.workspace_root().is_some());
    }

    /// load_settings: 設定ファイルがない場合はデフォルト値
    #[rstest]
    fn test_load_settings_without_settings_file() {
        let temp_dir = TempDir::new().unwrap();

        let mut manager = SettingsManager::new();
        let result = manager.load_settings(Some(temp_dir.path().to_path_buf()));

        assert!(result.is_ok());
        assert_eq!(manager.settings().host, DEFAULT_HOST);
    }

    /// 書き込みは即座にファイルへ反映され、読み戻せる
    #[rstest]
    fn test_writes_persist_to_workspace() {
        let temp_dir = TempDir::new().unwrap();
        let mut manager = SettingsManager::new();
        manager.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        manager.set_access_token(Some("tok-1".to_string())).unwrap();
        manager.set_app_key("app-1".to_string()).unwrap();

        let mut reloaded = SettingsManager::new();
        reloaded.load_settings(Some(temp_dir.path().to_path_buf())).unwrap();

        assert_eq!(reloaded.settings().access_token.as_deref(), Some("tok-1"));
        assert_eq!(reloaded.settings().app_key.as_deref(), Some("app-1"));
    }

    /// ログアウトでトークンが消える
    #[rstest]
    fn test_clearing_token_removes_it() {
        let mut manager = SettingsManager::new();
        manager.set_access_token(Some("tok-1".to_string())).unwrap();

        manager.set_access_token(None).unwrap();

        assert!(manager.settings().access_token.is_none());
    }

    /// ワークスペースが無くてもメモリ上では値が変わる
    #[rstest]
    fn test_writes_without_workspace_stay_in_memory() {
        let mut manager = SettingsManager::new();

        manager.set_host("tr8n.example.com".to_string()).unwrap();

        assert_eq!(manager.settings().host, "tr8n.example.com");
    }
}
