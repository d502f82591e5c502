//! LSP サーバーの共有状態

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;
use tower_lsp::lsp_types::Url;

use crate::config::SettingsManager;
use crate::document::Document;
use crate::ir::{
    Application,
    TranslationKey,
};
use crate::types::SourceRange;

/// 選択結果の適用先となるドキュメント上の領域
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditTarget {
    pub uri: Url,
    pub range: SourceRange,
}

/// 世代タグ付きの結果バッファ
///
/// フローの開始ごとに世代を進める。古い世代のフローが後から完了しても
/// `fill` で破棄されるため、遅れて届いた結果が新しい一覧を上書きする
/// ことはない。
#[derive(Debug)]
pub struct ResultsBuffer<T> {
    /// 現在の世代
    generation: u64,
    /// 現在の世代の結果
    items: Vec<T>,
    /// 結果を適用する領域（適用を伴わないフローでは None）
    target: Option<EditTarget>,
}

impl<T> Default for ResultsBuffer<T> {
    fn default() -> Self {
        Self { generation: 0, items: Vec::new(), target: None }
    }
}

impl<T: Clone> ResultsBuffer<T> {
    /// 新しいフローを開始する。世代を進め、前回の結果を破棄する
    pub fn begin(&mut self) -> u64 {
        self.generation += 1;
        self.items.clear();
        self.target = None;
        self.generation
    }

    /// 指定世代の結果を保存する
    ///
    /// 世代が現在のものでなければ結果を破棄して `false` を返す。
    pub fn fill(&mut self, generation: u64, items: Vec<T>, target: Option<EditTarget>) -> bool {
        if generation != self.generation {
            return false;
        }
        self.items = items;
        self.target = target;
        true
    }

    /// 指定世代のアイテムと適用先を取得する
    ///
    /// 世代が一致しない、またはインデックスが範囲外の場合は `None`。
    #[must_use]
    pub fn get(&self, generation: u64, index: usize) -> Option<(T, Option<EditTarget>)> {
        if generation != self.generation {
            return None;
        }
        self.items.get(index).map(|item| (item.clone(), self.target.clone()))
    }
}

/// LSP サーバーの共有状態
///
/// `Backend` から状態管理の責務を分離し、ハンドラー間で共有可能にします。
#[derive(Debug, Clone)]
pub struct ServerState {
    /// 開いているドキュメント（URI → バッファ）
    pub documents: Arc<Mutex<HashMap<Url, Document>>>,
    /// 設定管理
    pub settings: Arc<Mutex<SettingsManager>>,
    /// 翻訳キー検索フローの結果
    pub lookup_results: Arc<Mutex<ResultsBuffer<TranslationKey>>>,
    /// アプリケーション一覧フローの結果
    pub application_results: Arc<Mutex<ResultsBuffer<Application>>>,
}

impl ServerState {
    /// 新しい `ServerState` を作成
    #[must_use]
    pub fn new() -> Self {
        Self {
            documents: Arc::new(Mutex::new(HashMap::new())),
            settings: Arc::new(Mutex::new(SettingsManager::new())),
            lookup_results: Arc::new(Mutex::new(ResultsBuffer::default())),
            application_results: Arc::new(Mutex::new(ResultsBuffer::default())),
        }
    }
}

impl Default for ServerState {
    fn default() -> Self {
        Self::new()
    }
}
