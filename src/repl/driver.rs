// パス: src/repl/driver.rs
// 役割: REPL loop, meta-command parsing, and per-line pipeline orchestration
// 意図: Drive interactive usage by wiring tokenizer, marshaller, and invoker
// 関連ファイル: src/lexer.rs, src/marshal.rs, src/invoke.rs, src/repl/input.rs
//! REPL ドライバ
//!
//! 1 イテレーションの状態遷移は
//! `Prompt → Read → Tokenize → ResolveName → MarshalArgs → BuildDescriptor → Invoke → Prompt`。
//! 空行・未知シンボル・不正トークン・非対応形状のいずれでも早期に
//! プロンプトへ戻り、次イテレーション冒頭のアリーナ巻き戻しによって
//! 失敗した行の部分状態は一切持ち越されない。Read の EOF (または `:quit`)
//! だけが終端遷移で、セッション全体を正常終了させる。

use std::io::{self, Write};

use crate::arena::CallArena;
use crate::descriptor::CallDescriptor;
use crate::errors::EngineError;
use crate::invoke::invoke;
use crate::lexer::{Token, Tokenizer};
use crate::loader::{LoadedModule, SymbolSource};
use crate::marshal::{marshal_args, ArgBuffer};

use super::input::{ReadResult, StdinLineSource};
use super::printer::{render_help, write_error};

/// 読み込み済みモジュールに対する対話セッションを開始する。
///
/// # Examples
/// ```no_run
/// # fn main() -> Result<(), dlrepl::errors::LoaderError> {
/// let module = dlrepl::loader::LoadedModule::load("libdemo_native.so")?;
/// dlrepl::repl::run_repl(&module);
/// # Ok(())
/// # }
/// ```
pub fn run_repl(module: &LoadedModule) {
    let mut input = StdinLineSource::new();
    let mut stdout = io::stdout();
    let mut stderr = io::stderr();
    if let Err(err) = run_repl_with(&mut input, module, &mut stdout, &mut stderr) {
        let _ = writeln!(stderr, "REPL 実行中に入出力エラーが発生しました: {}", err);
    }
}

pub(crate) trait ReplLineSource {
    fn read_line(&mut self) -> io::Result<ReadResult>;
}

impl ReplLineSource for StdinLineSource {
    fn read_line(&mut self) -> io::Result<ReadResult> {
        StdinLineSource::read_line(self)
    }
}

/// 入力源・シンボル解決・出力先を差し替え可能にした REPL 本体。
pub(crate) fn run_repl_with<L, S, W, E>(
    lines: &mut L,
    symbols: &S,
    out: &mut W,
    err: &mut E,
) -> io::Result<()>
where
    L: ReplLineSource,
    S: SymbolSource,
    W: Write,
    E: Write,
{
    let mut arena = CallArena::new();
    let mut args = ArgBuffer::new();

    loop {
        // 前イテレーションの引数格納域をまとめて無効化する。
        arena.rewind();
        args.clear();

        write!(out, "> ")?;
        out.flush()?;

        let line = match lines.read_line() {
            Ok(ReadResult::Line(line)) => line,
            Ok(ReadResult::Eof) => break,
            Err(e) => {
                writeln!(err, "入力エラー: {}", e)?;
                break;
            }
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // 先頭が ':' の行はメタコマンド。識別子は ':' で始まれないため
        // 呼び出し対象と衝突しない。
        if line.starts_with(':') {
            match parse_repl_command(line) {
                ReplCommand::Help => render_help(out)?,
                ReplCommand::Lib => writeln!(out, "{}", symbols.origin())?,
                ReplCommand::Quit => break,
                ReplCommand::Invalid(text) => {
                    write_error(out, &format!("コマンド形式が不正です: {}", text))?;
                }
            }
            continue;
        }

        if let Err(e) = eval_line(line, symbols, &arena, &mut args) {
            write_error(out, &e)?;
        }
    }

    writeln!(out, "Quit")?;
    Ok(())
}

/// 1 行を字句解析から呼び出しまで一気に処理する。
///
/// 成功時は対象関数が 1 回呼ばれ、戻り値は破棄される。失敗時は収集途中の
/// 引数ごと行全体が破棄され、呼び出しは試行されない。
pub fn eval_line<S: SymbolSource>(
    line: &str,
    symbols: &S,
    arena: &CallArena,
    args: &mut ArgBuffer,
) -> Result<(), EngineError> {
    let mut tokens = Tokenizer::new(line);
    let name = match tokens.next_token() {
        Token::Identifier(name) => name,
        Token::EndOfInput => return Ok(()),
        _ => return Err(EngineError::FunctionNameExpected),
    };
    // 行ごとに毎回解決する。アドレスのキャッシュは行わない。
    let Some(address) = symbols.resolve(&name) else {
        return Err(EngineError::UnknownSymbol { name });
    };
    marshal_args(&mut tokens, arena, args)?;
    let descriptor = CallDescriptor::build(args.types())?;
    invoke(&descriptor, address, args.values_mut())
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// REPL が解釈できるメタコマンドの集合。
pub(crate) enum ReplCommand {
    /// `:help` / `:h` でヘルプメッセージを表示する。
    Help,
    /// `:quit` / `:q` でセッションを終了する (EOF と同じ扱い)。
    Quit,
    /// `:lib` で読み込み中のモジュールパスを表示する。
    Lib,
    /// 認識できなかったコマンド入力。
    Invalid(String),
}

/// `:` で始まる入力行を `ReplCommand` 列挙に解析する。
pub(crate) fn parse_repl_command(input: &str) -> ReplCommand {
    match input.trim() {
        ":help" | ":h" => ReplCommand::Help,
        ":quit" | ":q" => ReplCommand::Quit,
        ":lib" => ReplCommand::Lib,
        other => ReplCommand::Invalid(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io;
    use std::os::raw::{c_int, c_void};
    use std::sync::Mutex;

    use super::{
        eval_line, parse_repl_command, run_repl_with, ReplCommand, ReplLineSource,
    };
    use crate::arena::CallArena;
    use crate::loader::{FnAddr, SymbolSource};
    use crate::marshal::ArgBuffer;
    use crate::repl::input::ReadResult;

    /// record2 が受け取った引数の記録。単一のテストだけが参照する。
    static RECORDED: Mutex<Vec<(i32, i32)>> = Mutex::new(Vec::new());

    extern "C" fn record2(a: c_int, b: c_int) {
        RECORDED.lock().unwrap().push((a, b));
    }

    /// guard が受け取った引数の記録。中断テスト専用。
    static GUARDED: Mutex<Vec<(i32, i32)>> = Mutex::new(Vec::new());

    extern "C" fn guard(a: c_int, b: c_int) {
        GUARDED.lock().unwrap().push((a, b));
    }

    /// プロセス内関数のテーブルで代替したシンボル解決。
    struct TableSource {
        table: HashMap<&'static str, FnAddr>,
    }

    impl TableSource {
        fn with_probes() -> Self {
            let record2_fn: unsafe extern "C" fn(c_int, c_int) = record2;
            let guard_fn: unsafe extern "C" fn(c_int, c_int) = guard;
            let mut table = HashMap::new();
            table.insert("record2", FnAddr::from_raw(record2_fn as *const c_void));
            table.insert("guard", FnAddr::from_raw(guard_fn as *const c_void));
            Self { table }
        }
    }

    impl SymbolSource for TableSource {
        fn resolve(&self, name: &str) -> Option<FnAddr> {
            self.table.get(name).copied()
        }

        fn origin(&self) -> &str {
            "table://test"
        }
    }

    /// 事前に与えた行を順番に返すテスト用入力源。
    struct ScriptedLineSource {
        lines: std::collections::VecDeque<&'static str>,
    }

    impl ScriptedLineSource {
        fn new(lines: impl IntoIterator<Item = &'static str>) -> Self {
            Self {
                lines: lines.into_iter().collect(),
            }
        }
    }

    impl ReplLineSource for ScriptedLineSource {
        fn read_line(&mut self) -> io::Result<ReadResult> {
            match self.lines.pop_front() {
                Some(line) => Ok(ReadResult::Line(line.to_string())),
                None => Ok(ReadResult::Eof),
            }
        }
    }

    fn run_script(lines: impl IntoIterator<Item = &'static str>) -> (String, String) {
        let mut script = ScriptedLineSource::new(lines);
        let symbols = TableSource::with_probes();
        let mut out = Vec::new();
        let mut err = Vec::new();
        run_repl_with(&mut script, &symbols, &mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    /// 代表的なコマンドが想定した `ReplCommand` に分類されるかを確認する。
    fn parse_repl_command_variants() {
        assert_eq!(parse_repl_command(":help"), ReplCommand::Help);
        assert_eq!(parse_repl_command(":h"), ReplCommand::Help);
        assert_eq!(parse_repl_command(":quit"), ReplCommand::Quit);
        assert_eq!(parse_repl_command(":q"), ReplCommand::Quit);
        assert_eq!(parse_repl_command(":lib"), ReplCommand::Lib);
        match parse_repl_command(":browse") {
            ReplCommand::Invalid(text) => assert_eq!(text, ":browse"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    /// 空行と空白行が診断なしで再プロンプトされることを確認する。
    fn empty_lines_reprompt_silently() {
        let (out, err) = run_script(["", "   ", ":quit"]);
        assert_eq!(out.matches("> ").count(), 3);
        assert!(!out.contains("ERROR:"));
        assert!(out.ends_with("Quit\n"));
        assert!(err.is_empty());
    }

    #[test]
    /// 未知シンボルが ERROR 1 行で報告され、セッションが継続することを確認する。
    fn unknown_symbol_reports_and_continues() {
        let (out, _) = run_script(["missing_fn 1", ":quit"]);
        assert_eq!(out.matches("ERROR:").count(), 1);
        assert!(out.contains("missing_fn"));
        // エラー後も次のプロンプトが現れている。
        assert_eq!(out.matches("> ").count(), 2);
        assert!(out.ends_with("Quit\n"));
    }

    #[test]
    /// 関数名の位置に識別子以外が来た行が中断されることを確認する。
    fn non_identifier_head_is_rejected() {
        let (out, _) = run_script(["+record2 1 2", ":quit"]);
        assert_eq!(out.matches("ERROR:").count(), 1);
        assert!(out.contains("識別子"));
    }

    #[test]
    /// 不正な引数トークンで呼び出しが行われないことを確認する。
    fn invalid_argument_aborts_without_call() {
        let (out, _) = run_script(["guard 1 +", ":quit"]);
        assert_eq!(out.matches("ERROR:").count(), 1);
        assert!(GUARDED.lock().unwrap().is_empty());
    }

    #[test]
    /// 同じ行を 2 回発行すると 2 回呼び出され、値が混ざらないことを確認する。
    fn repeated_lines_invoke_with_fresh_storage() {
        let (out, _) = run_script(["record2 1 2", "record2 3 4", ":quit"]);
        assert!(!out.contains("ERROR:"));
        assert_eq!(*RECORDED.lock().unwrap(), vec![(1, 2), (3, 4)]);
    }

    #[test]
    /// `:help` と `:lib` の出力、および `:quit` での終了を確認する。
    fn meta_commands_render_expected_output() {
        let (out, _) = run_script([":help", ":lib", ":unknown", ":quit"]);
        assert!(out.contains("利用可能なコマンド"));
        assert!(out.contains("table://test"));
        assert!(out.contains("ERROR: コマンド形式が不正です: :unknown"));
        assert!(out.ends_with("Quit\n"));
    }

    #[test]
    /// `eval_line` 単体でも空行が無害に成功することを確認する。
    fn eval_line_accepts_empty_input() {
        let symbols = TableSource::with_probes();
        let arena = CallArena::new();
        let mut args = ArgBuffer::new();
        assert!(eval_line("", &symbols, &arena, &mut args).is_ok());
        assert!(args.is_empty());
    }
}
