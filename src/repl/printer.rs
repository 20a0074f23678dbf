// パス: src/repl/printer.rs
// 役割: Helpers for rendering REPL help and diagnostics
// 意図: Keep interactive messaging consistent across the session
// 関連ファイル: src/repl/driver.rs, src/errors.rs
//! REPL で用いるヘルプメッセージと診断出力を集約したモジュール。
//! 表示形式を一箇所にまとめ、対話時の出力を統一する。

use std::fmt::Display;
use std::io::{self, Write};

const HELP_TEXT: &str = concat!(
    "利用可能なコマンド:\n",
    "  :help / :h         ヘルプ（本メッセージ）\n",
    "  :lib               読み込み中のモジュールパスを表示\n",
    "  :quit / :q         終了（EOF と同じ）\n",
    "\n",
    "呼び出し:\n",
    "  関数名と引数リテラルを 1 行で入力する。\n",
    "  引数は 10 進整数と \"文字列\" のみ。戻り値は破棄される。\n",
    "\n",
    "例:\n",
    "  > InitWindow 800 600 \"Hello\"\n",
    "  > greet \"world\"\n",
    "  > ping\n",
);

/// ヘルプメッセージを任意のライターへ描画する。
pub(crate) fn render_help<W: Write>(out: &mut W) -> io::Result<()> {
    out.write_all(HELP_TEXT.as_bytes())
}

/// 回復可能な失敗を `ERROR:` 接頭辞付きの 1 行診断として書き出す。
pub(crate) fn write_error<W: Write>(out: &mut W, err: &impl Display) -> io::Result<()> {
    writeln!(out, "ERROR: {}", err)
}
