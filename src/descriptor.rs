// パス: src/descriptor.rs
// 役割: 型記述子列から呼び出し規約に沿った呼び出し記述子を構築する
// 意図: ABI 上の引数分類 (レジスタ/スタック) の計算を libffi に委ね、結果を検証付きで保持する
// 関連ファイル: src/marshal.rs, src/invoke.rs, tests/descriptor.rs
//! 呼び出し記述子ビルダ
//!
//! `ffi_prep_cif` 相当の処理で、引数型列と固定の void 戻り値から
//! プラットフォーム既定 ABI の呼び出し記述子を組み立てる。型列と引数個数
//! だけから決まる純粋で決定的な計算であり、I/O も副作用も持たない。
//! 表現できない形状は誤った記述子を黙って返す代わりに
//! `DescriptorRejected` として拒否する。

use std::ptr;

use libffi::low::{ffi_abi_FFI_DEFAULT_ABI, ffi_cif, ffi_type, prep_cif, types};

use crate::errors::EngineError;
use crate::marshal::ArgType;

/// 構築済みの呼び出し記述子。
///
/// 一度構築したら変更しない。次の呼び出しでは破棄して作り直す。
/// `arg_types` は `cif` が内部で参照し続けるため、記述子と同寿命で保持する。
pub struct CallDescriptor {
    cif: ffi_cif,
    #[allow(dead_code)]
    arg_types: Vec<*mut ffi_type>,
    nargs: usize,
}

impl CallDescriptor {
    /// 型記述子列から記述子を構築する。戻り値型は常に void。
    pub fn build(arg_types: &[ArgType]) -> Result<Self, EngineError> {
        let mut ffi_args: Vec<*mut ffi_type> = arg_types.iter().map(|t| ffi_type_of(*t)).collect();
        let mut cif: ffi_cif = Default::default();
        let status = unsafe {
            prep_cif(
                &mut cif,
                ffi_abi_FFI_DEFAULT_ABI,
                ffi_args.len(),
                ptr::addr_of_mut!(types::void),
                ffi_args.as_mut_ptr(),
            )
        };
        status.map_err(|e| EngineError::DescriptorRejected {
            detail: format!("{:?}", e),
        })?;
        Ok(Self {
            cif,
            arg_types: ffi_args,
            nargs: arg_types.len(),
        })
    }

    /// 記述子が表す引数の個数。
    pub fn arg_count(&self) -> usize {
        self.nargs
    }

    /// libffi へ渡す生の記述子ポインタ。呼び出し側 (Invoker) 専用。
    pub(crate) fn cif_ptr(&self) -> *mut ffi_cif {
        // ffi_call は記述子を書き換えない。const 性の欠落は C API 側の都合。
        &self.cif as *const ffi_cif as *mut ffi_cif
    }
}

/// 型記述子を対応する libffi の型オブジェクトへ写像する。
fn ffi_type_of(ty: ArgType) -> *mut ffi_type {
    match ty {
        ArgType::Int32 => unsafe { ptr::addr_of_mut!(types::sint32) },
        ArgType::Pointer => unsafe { ptr::addr_of_mut!(types::pointer) },
    }
}
