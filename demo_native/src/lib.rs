//! dlrepl 動作確認用のデモ共有ライブラリ
//!
//! `cargo build -p demo_native` で生成される cdylib を dlrepl に読み込ませ、
//! 対話的な関数呼び出しを試すためのエクスポート群を提供する。
//! `noop` 系は受け取った引数を記録するだけの関数で、ローダ経由の
//! 結合テストからも参照される。

#![allow(clippy::missing_safety_doc)]

use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::sync::Mutex;

/// `noop` が最後に受け取った引数の記録。
static LAST_NOOP: Mutex<Option<(i32, i32, Vec<u8>)>> = Mutex::new(None);

/// 3 引数 (int, int, char*) を受け取り、値を記録するだけの関数。
///
/// # Safety
/// `title` は NUL 終端された有効な文字列を指していること。
#[no_mangle]
pub unsafe extern "C" fn noop(width: c_int, height: c_int, title: *const c_char) {
    let bytes = if title.is_null() {
        Vec::new()
    } else {
        CStr::from_ptr(title).to_bytes().to_vec()
    };
    *LAST_NOOP.lock().unwrap() = Some((width, height, bytes));
}

/// 直近の `noop` 呼び出しの第 1 引数を返す。未呼び出しなら -1。
#[no_mangle]
pub extern "C" fn noop_last_width() -> c_int {
    LAST_NOOP
        .lock()
        .unwrap()
        .as_ref()
        .map(|(w, _, _)| *w)
        .unwrap_or(-1)
}

/// 直近の `noop` 呼び出しの第 2 引数を返す。未呼び出しなら -1。
#[no_mangle]
pub extern "C" fn noop_last_height() -> c_int {
    LAST_NOOP
        .lock()
        .unwrap()
        .as_ref()
        .map(|(_, h, _)| *h)
        .unwrap_or(-1)
}

/// 直近の `noop` 呼び出しで受け取った文字列の長さを返す。未呼び出しなら -1。
#[no_mangle]
pub extern "C" fn noop_last_title_len() -> c_int {
    LAST_NOOP
        .lock()
        .unwrap()
        .as_ref()
        .map(|(_, _, t)| t.len() as c_int)
        .unwrap_or(-1)
}

/// 直近の `noop` 呼び出しで受け取った文字列の `idx` 番目のバイトを返す。
/// 範囲外なら -1。
#[no_mangle]
pub extern "C" fn noop_last_title_byte(idx: c_int) -> c_int {
    let guard = LAST_NOOP.lock().unwrap();
    let Some((_, _, bytes)) = guard.as_ref() else {
        return -1;
    };
    if idx < 0 {
        return -1;
    }
    bytes
        .get(idx as usize)
        .map(|b| *b as c_int)
        .unwrap_or(-1)
}

/// 文字列を 1 つ受け取り挨拶を表示する。対話デモ用。
#[no_mangle]
pub unsafe extern "C" fn greet(name: *const c_char) {
    if name.is_null() {
        println!("Hello, anonymous!");
        return;
    }
    let name = CStr::from_ptr(name).to_string_lossy();
    println!("Hello, {}!", name);
}

/// 3 つの整数の和を表示する。対話デモ用。
#[no_mangle]
pub extern "C" fn sum3(a: c_int, b: c_int, c: c_int) {
    println!("{}", a + b + c);
}
