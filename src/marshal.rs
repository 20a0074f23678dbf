// パス: src/marshal.rs
// 役割: 引数トークン列を型記述子とアリーナ上の値ポインタの並びへ変換する
// 意図: 呼び出し形状の確定に必要な 2 本の平行配列を 1 パスで構築する
// 関連ファイル: src/lexer.rs, src/arena.rs, src/descriptor.rs, tests/marshal.rs
//! 引数マーシャラ
//!
//! 関数名の直後に位置づけられたトークン列を消費し、`(型記述子列, 値ポインタ列)`
//! の組を構築する。整数・文字列以外のトークンに遭遇した時点で行全体を
//! 破棄する (部分的な呼び出しは決して行わない)。収集済み引数ゼロ個での
//! 正常終了は有効で、無引数呼び出しを意味する。

use std::os::raw::c_void;

use crate::arena::CallArena;
use crate::errors::EngineError;
use crate::lexer::{Token, Tokenizer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// 引数の型記述子。リテラル文法が表せる形はこの 2 種で閉じている。
pub enum ArgType {
    /// 符号付き 32bit 整数。
    Int32,
    /// バイト列へのポインタ (NUL 終端文字列)。
    Pointer,
}

/// マーシャル結果を受けるバッファ。
///
/// ドライバが 1 つだけ所有し、イテレーションごとに `clear` で長さのみ
/// リセットして使い回す (容量は保持される)。2 本の列は常に同じ長さで、
/// 位置がそのままネイティブ呼び出しの引数位置に対応する。
#[derive(Debug, Default)]
pub struct ArgBuffer {
    types: Vec<ArgType>,
    values: Vec<*mut c_void>,
}

impl ArgBuffer {
    /// 空のバッファを構築する。
    pub fn new() -> Self {
        Self::default()
    }

    /// 長さを 0 に戻す。確保済み容量は再利用のため保持する。
    pub fn clear(&mut self) {
        self.types.clear();
        self.values.clear();
    }

    /// 型記述子の並びを返す。
    pub fn types(&self) -> &[ArgType] {
        &self.types
    }

    /// 値ポインタの並びを可変スライスとして返す (呼び出し時に使用)。
    pub fn values_mut(&mut self) -> &mut [*mut c_void] {
        &mut self.values
    }

    /// 収集済みの引数個数。
    pub fn len(&self) -> usize {
        debug_assert_eq!(self.types.len(), self.values.len());
        self.types.len()
    }

    /// 引数がひとつも無いかどうか。
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    fn push(&mut self, ty: ArgType, value: *mut c_void) {
        self.types.push(ty);
        self.values.push(value);
    }
}

/// 関数名の後ろに続くトークン列を引数列へマーシャルする。
///
/// 失敗時は収集途中の内容ごと破棄される前提で、即座にエラーを返す。
pub fn marshal_args(
    tokens: &mut Tokenizer<'_>,
    arena: &CallArena,
    out: &mut ArgBuffer,
) -> Result<(), EngineError> {
    loop {
        match tokens.next_token() {
            Token::IntegerLiteral(value) => {
                let cell = arena.alloc_int32(value)?;
                out.push(ArgType::Int32, cell);
            }
            Token::StringLiteral(text) => {
                let copy = arena.copy_c_string(text.as_bytes())?;
                let cell = arena.alloc_pointer_cell(copy)?;
                out.push(ArgType::Pointer, cell);
            }
            Token::EndOfInput => return Ok(()),
            Token::Identifier(text) | Token::Invalid(text) => {
                return Err(EngineError::BadArgument { text });
            }
        }
    }
}
