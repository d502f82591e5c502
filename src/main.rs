//! Entry point for the Language Server Protocol implementation.

use tower_lsp::{
    LspService,
    Server,
};
use tr8n_language_server::Backend;

#[tokio::main]
async fn main() {
    // stdout は LSP プロトコルが使うため、ログはファイルへ出力する
    let file_appender =
        tracing_appender::rolling::daily(std::env::temp_dir(), "tr8n-language-server.log");
    let (writer, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(writer)
        .with_ansi(false)
        .init();

    let (stdin, stdout) = (tokio::io::stdin(), tokio::io::stdout());
    let (service, socket) = LspService::new(Backend::new);
    Server::new(stdin, stdout, socket).serve(service).await;
}
