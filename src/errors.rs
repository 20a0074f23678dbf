//! エラー型の定義（回復可能なエンジンエラーと起動時の致命的エラー）。

use thiserror::Error;

/// 動的呼び出しエンジンが 1 行の処理中に報告しうるエラー種別。
///
/// どの変種も回復可能であり、REPL ドライバは `ERROR:` 接頭辞付きの
/// 1 行診断として出力した後、次のプロンプトへ戻る。
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("関数名には識別子を指定してください")]
    FunctionNameExpected,
    #[error("引数トークンが不正です: {text}")]
    BadArgument { text: String },
    #[error("関数 {name} が見つかりません")]
    UnknownSymbol { name: String },
    #[error("呼び出し記述子を構築できません: {detail}")]
    DescriptorRejected { detail: String },
    #[error("引数領域が不足しています (引数が多すぎるか、文字列が大きすぎます)")]
    ArenaExhausted,
    #[error("引数の個数が記述子と一致しません (期待 {expected}, 実際 {actual})")]
    ArityMismatch { expected: usize, actual: usize },
}

/// 共有ライブラリの読み込みで発生する致命的エラー。
///
/// REPL 開始前にのみ起こり、プロセスは非ゼロ終了する。
#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("モジュールを読み込めません: {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: libloading::Error,
    },
}
