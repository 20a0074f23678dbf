// パス: src/lib.rs
// 役割: Crate root wiring modules and exports
// 意図: Expose minimal API surface for the invocation engine
// 関連ファイル: src/repl/mod.rs, src/descriptor.rs, src/errors.rs
//! dlrepl ルートモジュール
//!
//! 目的:
//! - 読み込み済み共有ライブラリのエクスポート関数を、コンパイルなしに
//!   1 行のテキストから呼び出す対話ツールを提供する。
//! - 実装は読みやすさと変更容易性を最優先。
//!
//! 方針:
//! - コメント/ドキュメントは日本語、識別子は英語。
//! - 生ポインタを扱う推論は descriptor / invoke の 2 モジュールに閉じ込め、
//!   他はすべて所有権と境界検査のある安全なデータで動かす。
//! - パブリックAPIは最小限。

pub mod arena;
pub mod descriptor;
pub mod errors;
pub mod invoke;
pub mod lexer;
pub mod loader;
pub mod marshal;
pub mod repl;

// 便利な再エクスポート（必要最小限: 利用側からエンジンの素材を直接参照可）
pub use crate::errors::{EngineError, LoaderError};
pub use crate::loader::{FnAddr, LoadedModule, SymbolSource};
