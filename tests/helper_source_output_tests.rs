// Printed Java source of synthesized helpers, per reference kind

mod common;

use decaf::ast::{AstArena, AstPrinter};
use decaf::config::{major_versions, Config};
use decaf::symbols::{HandleKind, MetadataParser, MethodHandle};
use decaf::TransformPipeline;

fn rewrite_and_print(handle: MethodHandle, config: Config) -> String {
    let mut arena = AstArena::new();
    let (unit, class) = common::unit_with_class(&mut arena, "p/C");
    common::add_placeholder_site(&mut arena, class, "m0", &handle);
    let parser = MetadataParser::new();
    TransformPipeline::new(config)
        .transform_unit(&mut arena, unit, Some(&parser))
        .unwrap();
    AstPrinter::new(&arena).print(unit)
}

fn assert_contains(source: &str, fragments: &[&str]) {
    for fragment in fragments {
        assert!(source.contains(fragment), "missing `{fragment}` in:\n{source}");
    }
}

#[test]
fn static_invoke_helper_source() {
    let handle =
        MethodHandle::new(HandleKind::InvokeStatic, "p/C", "m", "(I)Ljava/lang/String;");
    let source = rewrite_and_print(handle, Config::default());
    assert_contains(
        &source,
        &[
            "// This helper class was generated by decaf to approximate the behavior of a",
            "// MethodHandle constant that cannot (currently) be represented in Java code.",
            "private static final class DecafConstantHelper_0 {",
            "static final MethodHandle HANDLE;",
            "static {",
            "final MethodType type = MethodType.methodType(String.class, int.class);",
            "MethodHandle handle;",
            "private static final MethodHandles.Lookup __DECAF__LOOKUP_0__ = MethodHandles.lookup();",
            "try {",
            "handle = __DECAF__LOOKUP_0__.findStatic(C.class, \"m\", type);",
            "catch (final ReflectiveOperationException e) {",
            "handle = MethodHandles.permuteArguments(MethodHandles.insertArguments(MethodHandles.throwException(type.returnType(), e.getClass()), 0, e), type);",
            "DecafConstantHelper_0.HANDLE = handle;",
            "/* ldc_method_handle(!) */ DecafConstantHelper_0.HANDLE;",
        ],
    );
}

#[test]
fn type_variable_precedes_handle_variable() {
    let handle = MethodHandle::new(HandleKind::InvokeStatic, "p/C", "m", "()V");
    let source = rewrite_and_print(handle, Config::default());
    let type_at = source.find("final MethodType type =").unwrap();
    let handle_at = source.find("MethodHandle handle;").unwrap();
    assert!(type_at < handle_at, "{source}");
}

#[test]
fn virtual_and_interface_invokes_use_find_virtual() {
    for kind in [HandleKind::InvokeVirtual, HandleKind::InvokeInterface] {
        let handle = MethodHandle::new(kind, "p/C", "m", "(J)I");
        let source = rewrite_and_print(handle, Config::default());
        assert_contains(
            &source,
            &[
                "findVirtual(C.class, \"m\", type)",
                "final MethodType type = MethodType.methodType(int.class, long.class);",
            ],
        );
    }
}

#[test]
fn special_invoke_passes_special_caller() {
    let handle = MethodHandle::new(HandleKind::InvokeSpecial, "p/C", "m", "()V");
    let source = rewrite_and_print(handle, Config::default());
    assert_contains(&source, &["findSpecial(C.class, \"m\", type, C.class)"]);
}

#[test]
fn constructor_handle_uses_raw_constructor_type() {
    let handle = MethodHandle::new(HandleKind::NewInvokeSpecial, "p/C", "<init>", "(I)V");
    let source = rewrite_and_print(handle, Config::default());
    assert_contains(
        &source,
        &[
            // The handle's own type yields the new instance...
            "final MethodType type = MethodType.methodType(C.class, int.class);",
            // ...but findConstructor takes the (params)V descriptor type
            "findConstructor(C.class, MethodType.methodType(void.class, int.class))",
        ],
    );
}

#[test]
fn field_kinds_map_to_accessor_factories() {
    let cases = [
        (HandleKind::GetField, "findGetter"),
        (HandleKind::GetStatic, "findStaticGetter"),
        (HandleKind::PutField, "findSetter"),
        (HandleKind::PutStatic, "findStaticSetter"),
    ];
    for (kind, factory) in cases {
        let handle = MethodHandle::new(kind, "p/C", "f", "I");
        let source = rewrite_and_print(handle, Config::default());
        let expected = format!("{factory}(C.class, \"f\", int.class)");
        assert_contains(&source, &[&expected]);
    }
}

#[test]
fn getter_helper_type_reflects_accessor_shape() {
    let handle = MethodHandle::new(HandleKind::GetField, "p/C", "f", "Ljava/lang/String;");
    let source = rewrite_and_print(handle, Config::default());
    assert_contains(
        &source,
        &["final MethodType type = MethodType.methodType(String.class, C.class);"],
    );
}

#[test]
fn private_lookup_source_has_no_captured_field() {
    let handle = MethodHandle::new(HandleKind::InvokeStatic, "p/C", "m", "()V");
    let source = rewrite_and_print(handle, Config::new(major_versions::JAVA_11));
    assert_contains(
        &source,
        &["MethodHandles.privateLookupIn(C.class, MethodHandles.lookup()).findStatic(C.class, \"m\", type)"],
    );
    assert!(!source.contains("MethodHandles.Lookup __DECAF__LOOKUP_"), "{source}");
}
