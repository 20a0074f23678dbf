// パス: src/loader.rs
// 役割: 共有ライブラリの読み込みとシンボル解決の協調インタフェース
// 意図: 動的ローダ依存を 1 モジュールに隔離し、テストでは差し替え可能にする
// 関連ファイル: src/invoke.rs, src/repl/driver.rs, tests/module_load.rs
//! モジュールローダとシンボル解決
//!
//! 実体は `libloading` による dlopen / dlsym の薄いラッパ。エンジン本体は
//! `SymbolSource` トレイト越しにしか解決を行わないため、テストでは
//! プロセス内関数のテーブルで代替できる。解決済みアドレスはモジュールの
//! 寿命の間のみ有効で、エンジンはイテレーションを跨いでキャッシュしない。

use std::ffi::CString;
use std::os::raw::c_void;
use std::path::Path;

use libloading::{Library, Symbol};

use crate::errors::LoaderError;

/// 解決済み関数アドレス。エンジンは所有せず、モジュールハンドル側が所有する。
#[derive(Debug, Clone, Copy)]
pub struct FnAddr(*const c_void);

impl FnAddr {
    /// 生アドレスから構築する。アドレスの有効性は呼び出し側が保証する。
    pub fn from_raw(ptr: *const c_void) -> Self {
        Self(ptr)
    }

    /// 保持しているアドレスを返す。
    pub fn as_ptr(self) -> *const c_void {
        self.0
    }
}

/// 名前から関数アドレスを引く協調インタフェース。
///
/// 見つからない場合は `None`。本番実装は読み込み済み共有ライブラリ、
/// テスト実装はプロセス内関数のテーブルとなる。
pub trait SymbolSource {
    /// エクスポート名を解決する。
    fn resolve(&self, name: &str) -> Option<FnAddr>;
    /// 解決元の説明 (モジュールパスなど) を返す。
    fn origin(&self) -> &str;
}

/// 読み込み済みの共有ライブラリ。
#[derive(Debug)]
pub struct LoadedModule {
    library: Library,
    path: String,
}

impl LoadedModule {
    /// パスを指定して共有ライブラリを読み込む。
    ///
    /// 失敗は致命的エラーとして報告され、REPL は開始されない。
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoaderError> {
        let path = path.as_ref();
        let library = unsafe { Library::new(path) }.map_err(|source| LoaderError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            library,
            path: path.display().to_string(),
        })
    }

    /// 読み込んだモジュールのパス。
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl SymbolSource for LoadedModule {
    /// シンボルテーブルから関数アドレスを引く。行ごとに毎回呼ばれる。
    fn resolve(&self, name: &str) -> Option<FnAddr> {
        let c_name = CString::new(name).ok()?;
        // シグネチャはこの時点では不明。アドレス取得のためのダミー型で引く。
        type OpaqueFn = unsafe extern "C" fn();
        let symbol: Symbol<'_, OpaqueFn> =
            unsafe { self.library.get(c_name.as_bytes_with_nul()) }.ok()?;
        Some(FnAddr::from_raw(*symbol as *const c_void))
    }

    fn origin(&self) -> &str {
        &self.path
    }
}
