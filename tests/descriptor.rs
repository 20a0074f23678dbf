// パス: tests/descriptor.rs
// 役割: Call descriptor builder contract tests
// 意図: 固定 void 戻り値のもとで形状検証と引数個数の一致を保証する
// 関連ファイル: src/descriptor.rs, src/invoke.rs, tests/invoke_e2e.rs
use dlrepl::descriptor::CallDescriptor;
use dlrepl::marshal::ArgType;

#[test]
fn empty_shape_builds_with_zero_arguments() {
    let descriptor = CallDescriptor::build(&[]).unwrap();
    assert_eq!(descriptor.arg_count(), 0);
}

#[test]
fn mixed_shape_builds_with_matching_count() {
    let descriptor =
        CallDescriptor::build(&[ArgType::Int32, ArgType::Pointer, ArgType::Int32]).unwrap();
    assert_eq!(descriptor.arg_count(), 3);
}

// レジスタ渡しの上限を超える個数でも記述子は構築できる。
// 実際のレジスタ/スタック分類の正しさは tests/invoke_e2e.rs の
// 8 引数呼び出しで挙動として検証する。
#[test]
fn shapes_beyond_register_count_still_build() {
    let types = vec![ArgType::Int32; 12];
    let descriptor = CallDescriptor::build(&types).unwrap();
    assert_eq!(descriptor.arg_count(), 12);
}

#[test]
fn descriptor_is_rebuilt_per_call_shape() {
    let a = CallDescriptor::build(&[ArgType::Int32]).unwrap();
    let b = CallDescriptor::build(&[ArgType::Pointer]).unwrap();
    assert_eq!(a.arg_count(), 1);
    assert_eq!(b.arg_count(), 1);
}
