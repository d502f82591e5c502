//! 設定ファイルの読み込みと書き込み

use std::path::Path;

use super::{
    SettingsError,
    Tr8nSettings,
};

/// ワークスペース直下の設定ファイル名
const SETTINGS_FILE: &str = ".tr8n.json";

/// ワークスペースから設定を読み込む
///
/// # Returns
/// - `Ok(Some(settings))`: 設定ファイルが見つかり、読み込みに成功
/// - `Ok(None)`: 設定ファイルが見つからない
/// - `Err(SettingsError)`: ファイル読み込みまたはパースエラー
pub(super) fn load_from_workspace(
    workspace_root: &Path,
) -> Result<Option<Tr8nSettings>, SettingsError> {
    let settings_path = workspace_root.join(SETTINGS_FILE);

    if !settings_path.exists() {
        tracing::debug!("Settings file not found: {:?}", settings_path);
        return Ok(None);
    }

    tracing::debug!("Loading settings from: {:?}", settings_path);

    let content = std::fs::read_to_string(&settings_path)?;
    let settings: Tr8nSettings = serde_json::from_str(&content)?;

    Ok(Some(settings))
}

/// 設定をワークスペースへ書き込む
pub(super) fn save_to_workspace(
    workspace_root: &Path,
    settings: &Tr8nSettings,
) -> Result<(), SettingsError> {
    let settings_path = workspace_root.join(SETTINGS_FILE);

    tracing::debug!("Saving settings to: {:?}", settings_path);

    let content = serde_json::to_string_pretty(settings)?;
    std::fs::write(&settings_path, content)?;

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::fs;

    use rstest::rstest;
    use tempfile::TempDir;

    use super::*;

    /// `load_from_workspace`: 設定ファイルが存在する場合
    #[rstest]
    fn test_load_from_workspace_with_valid_settings() {
        let temp_dir = TempDir::new().unwrap();
        let content = r#"{"host": "tr8n.example.com", "access_token": "tok-1"}"#;
        fs::write(temp_dir.path().join(".tr8n.json"), content).unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_ok());
        let settings = result.unwrap().unwrap();
        assert_eq!(settings.host, "tr8n.example.com");
        assert_eq!(settings.access_token.as_deref(), Some("tok-1"));
    }

    /// `load_from_workspace`: 設定ファイルが存在しない場合
    #[rstest]
    fn test_load_from_workspace_no_settings_file() {
        let temp_dir = TempDir::new().unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_ok());
        assert!(result.unwrap().is_none());
    }

    /// `load_from_workspace`: JSON パースエラー
    #[rstest]
    fn test_load_from_workspace_invalid_json() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(".tr8n.json"), "invalid json").unwrap();

        let result = load_from_workspace(temp_dir.path());

        assert!(result.is_err());
    }

    /// 保存した設定はそのまま読み戻せる
    #[rstest]
    fn test_save_then_load_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let settings = Tr8nSettings {
            host: "tr8n.example.com".to_string(),
            access_token: Some("tok-1".to_string()),
            app_key: Some("app-1".to_string()),
            email: Some("translator@example.com".to_string()),
        };

        save_to_workspace(temp_dir.path(), &settings).unwrap();
        let loaded = load_from_workspace(temp_dir.path()).unwrap();

        assert_eq!(loaded, Some(settings));
    }
}
