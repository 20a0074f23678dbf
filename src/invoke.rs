// パス: src/invoke.rs
// 役割: 検証済み記述子と解決済みアドレスで実際のネイティブ呼び出しを行う
// 意図: 生ポインタ越しの制御移転をこの 1 箇所に閉じ込める
// 関連ファイル: src/descriptor.rs, src/loader.rs, tests/invoke_e2e.rs
//! 呼び出し実行器 (Invoker)
//!
//! 各引数値を呼び出し規約が割り当てるスロット (レジスタまたはスタック) へ
//! 配置し、対象アドレスへ制御を移し、復帰後は戻り値を破棄する。
//! 記述子が検証済みである限り、呼び出しそのものはこの層では失敗しない。
//! 呼び出された関数内部のクラッシュはエンジンの管理外である。

use std::os::raw::c_void;

use libffi::low::{call, CodePtr};

use crate::descriptor::CallDescriptor;
use crate::errors::EngineError;
use crate::loader::FnAddr;

/// 記述子どおりの形でネイティブ関数を 1 回呼び出す。
///
/// 事前条件は `values.len() == descriptor.arg_count()`。呼び出し側の責務
/// だが、破られた場合も未定義動作に入る前に防御的に拒否する。
pub fn invoke(
    descriptor: &CallDescriptor,
    address: FnAddr,
    values: &mut [*mut c_void],
) -> Result<(), EngineError> {
    if values.len() != descriptor.arg_count() {
        return Err(EngineError::ArityMismatch {
            expected: descriptor.arg_count(),
            actual: values.len(),
        });
    }
    unsafe {
        call::<()>(
            descriptor.cif_ptr(),
            CodePtr::from_ptr(address.as_ptr()),
            values.as_mut_ptr(),
        );
    }
    Ok(())
}
