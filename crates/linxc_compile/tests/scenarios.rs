//! End-to-end compile scenarios, driven through the same `Session` API
//! a CLI or editor integration would use.

use std::fs;
use std::path::PathBuf;

use linxc_compile::Session;

#[test]
fn hello_world_emits_a_namespaced_void_function() {
    let mut session = Session::new();
    session.parse_file(
        PathBuf::from("main.lx"),
        "main.lx".to_string(),
        "#include <stdio.h>\nnamespace demo { void run() { printf(\"hi\"); } }",
    );
    let out = tempfile::tempdir().unwrap();
    session.compile(out.path()).expect("hello world should compile cleanly");

    let header = fs::read_to_string(out.path().join("main.h")).unwrap();
    assert!(header.contains("#include <stdio.h>"));
    assert!(header.contains("void demo_run(void);"));

    let source = fs::read_to_string(out.path().join("main.c")).unwrap();
    assert!(source.contains("void demo_run(void) {"));
    assert!(source.contains("printf(\"hi\")"));
}

#[test]
fn struct_member_access_and_method_emit_this_pointer_arithmetic() {
    let mut session = Session::new();
    session.parse_file(
        PathBuf::from("point.lx"),
        "point.lx".to_string(),
        "struct Point { i32 x; i32 y; i32 sum() { return x + y; } };",
    );
    let out = tempfile::tempdir().unwrap();
    session.compile(out.path()).expect("struct with a method should compile cleanly");

    let header = fs::read_to_string(out.path().join("point.h")).unwrap();
    assert!(header.contains("typedef struct {"));
    assert!(header.contains("int x;"));
    assert!(header.contains("int y;"));
    assert!(header.contains("} Point;"));
    assert!(header.contains("int Point_sum(Point * this);"));

    let source = fs::read_to_string(out.path().join("point.c")).unwrap();
    assert!(source.contains("int Point_sum(Point * this) {"));
    assert!(source.contains("return (this->x + this->y);"));
}

#[test]
fn narrowing_assignment_fails_the_whole_compile() {
    let mut session = Session::new();
    session.parse_file(PathBuf::from("main.lx"), "main.lx".to_string(), "void f() { i64 a = 3; i32 b = a; }");
    let out = tempfile::tempdir().unwrap();
    let result = session.compile(out.path());
    let errors = result.expect_err("narrowing without an explicit cast should fail compilation");
    assert!(errors.iter().any(|e| e.message.contains("explicit cast")));
    assert!(!out.path().join("main.h").exists());
}

#[test]
fn operator_overload_dispatches_through_the_synthesized_function() {
    let mut session = Session::new();
    session.parse_file(
        PathBuf::from("vec.lx"),
        "vec.lx".to_string(),
        "struct V { i32 x; i32 operator+(V other) { return x + other.x; } }; \
         void f() { V a; V b; i32 c = a + b; }",
    );
    let out = tempfile::tempdir().unwrap();
    session.compile(out.path()).expect("operator overload usage should compile cleanly");

    let header = fs::read_to_string(out.path().join("vec.h")).unwrap();
    assert!(header.contains("int V_operator_add(V * this, V other);"));

    let source = fs::read_to_string(out.path().join("vec.c")).unwrap();
    assert!(source.contains("int V_operator_add(V * this, V other) {"));
    assert!(source.contains("V_operator_add(a, b)"));
}

#[test]
fn a_file_with_no_errors_still_compiles_alongside_one_that_has_errors_failing_the_batch() {
    let mut session = Session::new();
    session.parse_file(PathBuf::from("good.lx"), "good.lx".to_string(), "i32 main() { return 0; }");
    session.parse_file(PathBuf::from("bad.lx"), "bad.lx".to_string(), "void f() { u8* p = \"hi\"; }");
    let out = tempfile::tempdir().unwrap();
    let result = session.compile(out.path());
    let errors = result.expect_err("one erroring file should fail the whole batch");
    assert!(errors.iter().any(|e| e.message.contains("String literals may only be assigned to const u8*")));
}
