// パス: src/arena.rs
// 役割: 1 イテレーション分の引数格納域を提供するバンプアロケータ
// 意図: 呼び出しごとのヒープ確保を避けつつ、古いデータの持ち越しを構造的に防ぐ
// 関連ファイル: src/marshal.rs, src/repl/driver.rs, tests/arena.rs
//! 呼び出し単位のアリーナ
//!
//! REPL ドライバは毎イテレーションの先頭で `rewind` を呼び、前回の
//! 割り当てをまとめて無効化する。巻き戻しは O(1) で、背後のチャンクは
//! 容量を保持したまま再利用される。容量上限を超えた割り当ては未定義動作
//! ではなく回復可能な `ArenaExhausted` として報告する。

use std::alloc::Layout;
use std::os::raw::{c_char, c_void};
use std::ptr;

use bumpalo::Bump;

use crate::errors::EngineError;

/// 既定のアリーナ容量 (バイト)。1 行分の引数には十分大きい。
pub const DEFAULT_ARENA_CAPACITY: usize = 64 * 1024;

/// 1 回の呼び出しに必要な引数ストレージを貸し出すアリーナ。
///
/// 割り当てられたセルへの参照は生ポインタとしてのみ持ち出される。
/// `rewind` 後のポインタを読むことは許されない (ドライバの責務)。
pub struct CallArena {
    bump: Bump,
}

impl CallArena {
    /// 指定容量のアリーナを構築する。容量は上限としても機能し、
    /// 超過した割り当て要求は失敗する (アリーナは成長しない)。
    pub fn with_capacity(capacity: usize) -> Self {
        let bump = Bump::with_capacity(capacity);
        bump.set_allocation_limit(Some(capacity));
        Self { bump }
    }

    /// 既定容量のアリーナを構築する。
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_ARENA_CAPACITY)
    }

    /// 割り当てカーソルを先頭マークまで巻き戻し、これまでの割り当てを
    /// すべて無効化する。メモリはゼロ化されず、容量は保持される。
    pub fn rewind(&mut self) {
        self.bump.reset();
    }

    /// デコード済み整数を保持する 4 バイトセルを割り当てる。
    pub fn alloc_int32(&self, value: i32) -> Result<*mut c_void, EngineError> {
        let cell = self
            .bump
            .try_alloc(value)
            .map_err(|_| EngineError::ArenaExhausted)?;
        Ok(cell as *mut i32 as *mut c_void)
    }

    /// 文字列コピーのアドレスを保持するポインタ幅セルを割り当てる。
    pub fn alloc_pointer_cell(&self, target: *const c_char) -> Result<*mut c_void, EngineError> {
        let cell = self
            .bump
            .try_alloc(target)
            .map_err(|_| EngineError::ArenaExhausted)?;
        Ok(cell as *mut *const c_char as *mut c_void)
    }

    /// バイト列を NUL 終端付きでアリーナへ複製し、その先頭を返す。
    pub fn copy_c_string(&self, bytes: &[u8]) -> Result<*const c_char, EngineError> {
        let layout = Layout::from_size_align(bytes.len() + 1, 1)
            .map_err(|_| EngineError::ArenaExhausted)?;
        let dst = self
            .bump
            .try_alloc_layout(layout)
            .map_err(|_| EngineError::ArenaExhausted)?;
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), dst.as_ptr(), bytes.len());
            *dst.as_ptr().add(bytes.len()) = 0;
        }
        Ok(dst.as_ptr() as *const c_char)
    }
}

impl Default for CallArena {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::CallArena;
    use std::ffi::CStr;

    #[test]
    /// 文字列コピーが NUL 終端されることを確認する。
    fn copy_c_string_appends_nul() {
        let arena = CallArena::with_capacity(256);
        let ptr = arena.copy_c_string(b"Hello").unwrap();
        let copied = unsafe { CStr::from_ptr(ptr) };
        assert_eq!(copied.to_bytes(), b"Hello");
    }

    #[test]
    /// 容量を超える割り当てが回復可能なエラーになることを確認する。
    fn over_capacity_allocation_fails() {
        let arena = CallArena::with_capacity(64);
        let big = vec![b'x'; 4096];
        assert!(arena.copy_c_string(&big).is_err());
    }
}
