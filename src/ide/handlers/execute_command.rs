//! Execute Command ハンドラー
//!
//! `workspace/executeCommand` リクエストを処理し、tr8n の各フローを
//! 実行します。選択肢の描画や入力プロンプトはホストエディタ側の責務で、
//! サーバーは選択肢リストを世代タグ付きで返し、エディタが選んだ
//! インデックスを `apply` 系コマンドで受け取ります。

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{
    Value,
    json,
};
use std::collections::HashMap;
use tower_lsp::jsonrpc::Result;
use tower_lsp::lsp_types::{
    ExecuteCommandParams,
    MessageType,
    Range,
    Url,
    WorkspaceEdit,
};

use super::super::backend::Backend;
use super::super::{
    apply,
    state::EditTarget,
};
use crate::api::ApiClient;
use crate::ir::{
    Application,
    TranslationKey,
};
use crate::syntax::TranslationCall;
use crate::types::SourceRange;

/// サーバーが公開するコマンド名
const COMMANDS: [&str; 9] = [
    "tr8n.lookupKey",
    "tr8n.applyKey",
    "tr8n.registerKey",
    "tr8n.selectApplication",
    "tr8n.applyApplication",
    "tr8n.login",
    "tr8n.changeHost",
    "tr8n.logout",
    "tr8n.help",
];

/// 選択やカーソル位置から翻訳テキストが得られなかったときの案内
const NO_TEXT_MESSAGE: &str = "Please select some text or be inside a tr function call.";

/// `initialize` で公開するコマンド一覧
pub fn command_names() -> Vec<String> {
    COMMANDS.iter().map(ToString::to_string).collect()
}

/// `workspace/executeCommand` リクエストを処理
pub async fn handle_execute_command(
    backend: &Backend,
    params: ExecuteCommandParams,
) -> Result<Option<Value>> {
    tracing::debug!(command = %params.command, "Execute Command request");

    let arguments = params.arguments;
    match params.command.as_str() {
        "tr8n.lookupKey" => handle_lookup_key(backend, arguments).await,
        "tr8n.applyKey" => handle_apply_key(backend, arguments).await,
        "tr8n.registerKey" => handle_register_key(backend, arguments).await,
        "tr8n.selectApplication" => handle_select_application(backend).await,
        "tr8n.applyApplication" => handle_apply_application(backend, arguments).await,
        "tr8n.login" => handle_login(backend, arguments).await,
        "tr8n.changeHost" => handle_change_host(backend, arguments).await,
        "tr8n.logout" => handle_logout(backend).await,
        "tr8n.help" => Ok(Some(help_catalog())),
        _ => {
            tracing::warn!("Unknown command: {}", params.command);
            Ok(None)
        }
    }
}

/// 先頭の引数を型付きでパースする
fn parse_args<T: DeserializeOwned>(arguments: Vec<Value>) -> Option<T> {
    let first = arguments.into_iter().next()?;
    match serde_json::from_value(first) {
        Ok(args) => Some(args),
        Err(error) => {
            tracing::warn!("Invalid command arguments: {}", error);
            None
        }
    }
}

/// 選択テキスト、またはカーソル周辺の翻訳呼び出しからラベルと適用先を
/// 導出する
///
/// 選択が空の場合はカーソル行を走査し、見つかった呼び出しのスパンを
/// 適用先として使う。どちらも得られなければ `None`。
async fn resolve_query(
    backend: &Backend,
    uri: &Url,
    selection: SourceRange,
) -> Option<(String, EditTarget)> {
    let documents = backend.state.documents.lock().await;
    let document = documents.get(uri)?;

    if !selection.is_empty() {
        if let Some(text) = document.slice(selection) {
            if !text.is_empty() {
                return Some((text.to_string(), EditTarget { uri: uri.clone(), range: selection }));
            }
        }
    }

    let line_number = selection.start.line;
    let line = document.line(line_number)?;
    let call = TranslationCall::locate(line, selection.start.character as usize)?;

    #[allow(clippy::cast_possible_truncation)] // 行の長さが u32 を超えることはない
    let range =
        SourceRange::single_line(line_number, call.start() as u32, call.end() as u32);
    Some((call.label(line).to_string(), EditTarget { uri: uri.clone(), range }))
}

/// 設定されたホストで API クライアントを作る
async fn api_client(backend: &Backend) -> Option<ApiClient> {
    let host = backend.state.settings.lock().await.settings().host.clone();
    match ApiClient::new(&host) {
        Ok(client) => Some(client),
        Err(error) => {
            tracing::error!("failed to build API client: {}", error);
            backend.client.show_message(MessageType::ERROR, error.to_string()).await;
            None
        }
    }
}

/// `tr8n.lookupKey` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupKeyArgs {
    /// 対象ドキュメントの URI
    uri: Url,
    /// 現在の選択範囲（キャレットの場合は空範囲）
    range: Range,
}

/// `tr8n.lookupKey` コマンドを実行
///
/// 選択テキストまたはカーソル周辺の翻訳呼び出しを検索クエリとして、
/// 一致する翻訳キーの一覧を返す。
async fn handle_lookup_key(backend: &Backend, arguments: Vec<Value>) -> Result<Option<Value>> {
    let Some(args) = parse_args::<LookupKeyArgs>(arguments) else {
        return Ok(None);
    };

    let Some((query, target)) = resolve_query(backend, &args.uri, args.range.into()).await else {
        backend.client.show_message(MessageType::ERROR, NO_TEXT_MESSAGE).await;
        return Ok(None);
    };

    let generation = backend.state.lookup_results.lock().await.begin();
    backend.client.log_message(MessageType::INFO, "Tr8n: Looking up translation key...").await;

    let Some(client) = api_client(backend).await else {
        return Ok(None);
    };
    let keys = match client.lookup(&query).await {
        Ok(keys) => keys,
        Err(error) => {
            tracing::error!("lookup failed: {}", error);
            backend.client.show_message(MessageType::ERROR, error.to_string()).await;
            return Ok(None);
        }
    };

    if keys.is_empty() {
        backend
            .client
            .show_message(MessageType::INFO, "Tr8n: No translation keys have been found")
            .await;
        return Ok(None);
    }

    let options: Vec<Vec<String>> = keys.iter().map(TranslationKey::option).collect();
    if !backend.state.lookup_results.lock().await.fill(generation, keys, Some(target)) {
        tracing::warn!(generation, "discarding stale lookup results");
        return Ok(None);
    }

    backend
        .client
        .log_message(MessageType::INFO, format!("Tr8n: Found {} translation keys", options.len()))
        .await;
    Ok(Some(json!({ "generation": generation, "options": options })))
}

/// `apply` 系コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplyArgs {
    /// 結果リストの世代
    generation: u64,
    /// 選択されたインデックス
    index: usize,
}

/// `tr8n.applyKey` コマンドを実行
///
/// 選ばれた翻訳キーで、検索時に記録した領域を上書きする。
async fn handle_apply_key(backend: &Backend, arguments: Vec<Value>) -> Result<Option<Value>> {
    let Some(args) = parse_args::<ApplyArgs>(arguments) else {
        return Ok(None);
    };

    let chosen = backend.state.lookup_results.lock().await.get(args.generation, args.index);
    let Some((key, Some(target))) = chosen else {
        tracing::warn!(generation = args.generation, "stale or unknown key selection, ignoring");
        return Ok(None);
    };

    let edit = apply::edit_for(&target, &key);

    // 次の全文同期が来るまで、ローカルのバッファも合わせておく
    {
        let mut documents = backend.state.documents.lock().await;
        if let Some(document) = documents.get_mut(&target.uri) {
            if !document.replace(target.range, &edit.new_text) {
                tracing::warn!(uri = %target.uri, "replacement target no longer in range");
            }
        }
    }

    let mut changes = HashMap::new();
    changes.insert(target.uri.clone(), vec![edit]);
    let applied = backend
        .client
        .apply_edit(WorkspaceEdit { changes: Some(changes), ..WorkspaceEdit::default() })
        .await;
    if let Err(error) = applied {
        tracing::error!("Failed to apply workspace edit: {}", error);
    }

    Ok(None)
}

/// `tr8n.registerKey` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterKeyArgs {
    /// 対象ドキュメントの URI
    uri: Url,
    /// 現在の選択範囲
    range: Range,
    /// 登録するラベル（省略時は選択または翻訳呼び出しから導出）
    label: Option<String>,
    /// 翻訳者向けの説明
    description: Option<String>,
}

/// `tr8n.registerKey` コマンドを実行
///
/// 認証情報が無い場合は失敗ではなく、前提フローへの誘導を返す。
async fn handle_register_key(backend: &Backend, arguments: Vec<Value>) -> Result<Option<Value>> {
    let Some(args) = parse_args::<RegisterKeyArgs>(arguments) else {
        return Ok(None);
    };

    let (access_token, app_key) = {
        let settings = backend.state.settings.lock().await;
        (settings.settings().access_token.clone(), settings.settings().app_key.clone())
    };
    let Some(access_token) = access_token else {
        backend
            .client
            .show_message(MessageType::WARNING, "Tr8n: Please login to the translation service")
            .await;
        return Ok(Some(json!({ "requires": "login" })));
    };
    let Some(app_key) = app_key else {
        backend
            .client
            .show_message(MessageType::WARNING, "Tr8n: Please select an application first")
            .await;
        return Ok(Some(json!({ "requires": "selectApplication" })));
    };

    let label = match args.label {
        Some(label) if !label.is_empty() => label,
        _ => match resolve_query(backend, &args.uri, args.range.into()).await {
            Some((label, _)) => label,
            None => {
                backend.client.show_message(MessageType::ERROR, NO_TEXT_MESSAGE).await;
                return Ok(None);
            }
        },
    };
    let description = args.description.unwrap_or_default();

    backend.client.log_message(MessageType::INFO, "Tr8n: Registering translation key...").await;

    let Some(client) = api_client(backend).await else {
        return Ok(None);
    };
    match client.register(&access_token, &app_key, &label, &description).await {
        Ok(()) => {
            backend
                .client
                .show_message(MessageType::INFO, "Tr8n: Translation key has been registered")
                .await;
            Ok(Some(json!({ "registered": label })))
        }
        Err(error) => {
            tracing::error!("register failed: {}", error);
            backend.client.show_message(MessageType::ERROR, error.to_string()).await;
            Ok(None)
        }
    }
}

/// `tr8n.selectApplication` コマンドを実行
async fn handle_select_application(backend: &Backend) -> Result<Option<Value>> {
    let access_token = backend.state.settings.lock().await.settings().access_token.clone();
    let Some(access_token) = access_token else {
        backend
            .client
            .show_message(MessageType::WARNING, "Tr8n: Please login to the translation service")
            .await;
        return Ok(Some(json!({ "requires": "login" })));
    };

    fetch_applications(backend, &access_token).await
}

/// アプリケーション一覧を取得して結果バッファへ保存する
///
/// ログイン直後の自動遷移と `tr8n.selectApplication` の両方から呼ばれる。
async fn fetch_applications(backend: &Backend, access_token: &str) -> Result<Option<Value>> {
    let generation = backend.state.application_results.lock().await.begin();

    let Some(client) = api_client(backend).await else {
        return Ok(None);
    };
    let applications = match client.applications(access_token).await {
        Ok(applications) => applications,
        Err(error) => {
            tracing::error!("application listing failed: {}", error);
            backend.client.show_message(MessageType::ERROR, error.to_string()).await;
            return Ok(None);
        }
    };

    if applications.is_empty() {
        backend
            .client
            .show_message(MessageType::INFO, "Tr8n: No applications have been found")
            .await;
        return Ok(None);
    }

    let options: Vec<Vec<String>> = applications.iter().map(Application::option).collect();
    if !backend.state.application_results.lock().await.fill(generation, applications, None) {
        tracing::warn!(generation, "discarding stale application results");
        return Ok(None);
    }

    backend
        .client
        .log_message(MessageType::INFO, format!("Tr8n: Found {} application(s)", options.len()))
        .await;
    Ok(Some(json!({
        "flow": "selectApplication",
        "generation": generation,
        "options": options,
    })))
}

/// `tr8n.applyApplication` コマンドを実行
///
/// 選ばれたアプリケーションのキーを設定へ永続化する。
async fn handle_apply_application(
    backend: &Backend,
    arguments: Vec<Value>,
) -> Result<Option<Value>> {
    let Some(args) = parse_args::<ApplyArgs>(arguments) else {
        return Ok(None);
    };

    let chosen = backend.state.application_results.lock().await.get(args.generation, args.index);
    let Some((application, _)) = chosen else {
        tracing::warn!(
            generation = args.generation,
            "stale or unknown application selection, ignoring"
        );
        return Ok(None);
    };

    let persisted =
        backend.state.settings.lock().await.set_app_key(application.key.clone());
    if let Err(error) = persisted {
        tracing::error!("failed to persist application key: {}", error);
        backend
            .client
            .show_message(MessageType::ERROR, format!("Failed to save settings: {error}"))
            .await;
        return Ok(None);
    }

    backend
        .client
        .show_message(
            MessageType::INFO,
            format!("Tr8n: You have selected {} application", application.name),
        )
        .await;
    Ok(None)
}

/// `tr8n.login` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LoginArgs {
    email: String,
    password: String,
}

/// `tr8n.login` コマンドを実行
///
/// 認証に成功するとトークンを永続化し、続けてアプリケーション選択
/// フローを自動で開始する。
async fn handle_login(backend: &Backend, arguments: Vec<Value>) -> Result<Option<Value>> {
    let Some(args) = parse_args::<LoginArgs>(arguments) else {
        return Ok(None);
    };

    // メールアドレスは認証前に保存する（認証失敗時も次回の初期値になる）
    if let Err(error) = backend.state.settings.lock().await.set_email(args.email.clone()) {
        tracing::warn!("failed to persist email: {}", error);
    }

    let Some(client) = api_client(backend).await else {
        return Ok(None);
    };
    let token = match client.authorize(&args.email, &args.password).await {
        Ok(token) => token,
        Err(error) => {
            tracing::error!("authorize failed: {}", error);
            backend.client.show_message(MessageType::ERROR, error.to_string()).await;
            return Ok(None);
        }
    };

    if let Err(error) = backend.state.settings.lock().await.set_access_token(Some(token.clone())) {
        tracing::error!("failed to persist access token: {}", error);
        backend
            .client
            .show_message(MessageType::ERROR, format!("Failed to save settings: {error}"))
            .await;
        return Ok(None);
    }

    backend.client.show_message(MessageType::INFO, "Tr8n: You have been logged in").await;

    // ログイン後は自動でアプリケーション選択へ
    fetch_applications(backend, &token).await
}

/// `tr8n.changeHost` コマンドの引数
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeHostArgs {
    /// tr8n サービスが動いているドメイン
    host: String,
}

/// `tr8n.changeHost` コマンドを実行
async fn handle_change_host(backend: &Backend, arguments: Vec<Value>) -> Result<Option<Value>> {
    let Some(args) = parse_args::<ChangeHostArgs>(arguments) else {
        return Ok(None);
    };

    if let Err(error) = backend.state.settings.lock().await.set_host(args.host) {
        tracing::error!("failed to persist host: {}", error);
        backend
            .client
            .show_message(MessageType::ERROR, format!("Failed to save settings: {error}"))
            .await;
        return Ok(None);
    }

    backend.client.show_message(MessageType::INFO, "Tr8n: Settings have been updated").await;
    Ok(None)
}

/// `tr8n.logout` コマンドを実行
async fn handle_logout(backend: &Backend) -> Result<Option<Value>> {
    if let Err(error) = backend.state.settings.lock().await.set_access_token(None) {
        tracing::error!("failed to clear access token: {}", error);
        backend
            .client
            .show_message(MessageType::ERROR, format!("Failed to save settings: {error}"))
            .await;
        return Ok(None);
    }

    backend.client.show_message(MessageType::INFO, "Tr8n: You have been logged out").await;
    Ok(None)
}

/// `tr8n.help` が返すコマンドカタログ
///
/// ラベルと推奨キーコード、対応するコマンド ID の一覧。
fn help_catalog() -> Value {
    let entries = [
        ("Tr8n: Help", "[cmd+ctrl+t, cmd+ctrl+t]", "tr8n.help"),
        ("Tr8n: Change service host", "[cmd+ctrl+t, cmd+ctrl+h]", "tr8n.changeHost"),
        ("Tr8n: Lookup translation key", "[cmd+ctrl+t, cmd+ctrl+l]", "tr8n.lookupKey"),
        ("Tr8n: Login to translation service", "[cmd+ctrl+t, cmd+ctrl+i]", "tr8n.login"),
        ("Tr8n: Select application", "[cmd+ctrl+t, cmd+ctrl+a]", "tr8n.selectApplication"),
        ("Tr8n: Register translation key", "[cmd+ctrl+t, cmd+ctrl+r]", "tr8n.registerKey"),
        ("Tr8n: Logout", "[cmd+ctrl+t, cmd+ctrl+o]", "tr8n.logout"),
    ];

    let options: Vec<Value> = entries
        .iter()
        .map(|(label, keys, command)| {
            json!({ "label": label, "keys": keys, "command": command })
        })
        .collect();
    json!({ "options": options })
}
