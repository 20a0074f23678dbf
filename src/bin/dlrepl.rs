// パス: src/bin/dlrepl.rs
// 役割: Binary entrypoint that loads a module and launches the REPL
// 意図: Offer a CLI executable for interactive native-function calls
// 関連ファイル: src/repl/mod.rs, src/loader.rs, src/lib.rs
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use dlrepl::loader::LoadedModule;

#[derive(Parser)]
#[command(
    name = "dlrepl",
    version,
    about = "共有ライブラリのエクスポート関数を対話的に呼び出す"
)]
struct Cli {
    /// 読み込む共有ライブラリのパス (.so / .dylib / .dll)
    module: PathBuf,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let module = match LoadedModule::load(&cli.module) {
        Ok(module) => module,
        Err(err) => {
            eprintln!("ERROR: {}", err);
            return ExitCode::FAILURE;
        }
    };
    dlrepl::repl::run_repl(&module);
    ExitCode::SUCCESS
}
