//! WAT emitter tests
//!
//! Module shape, instruction selection, control flow and the constructs the
//! backend refuses to lower.

use azalea_codegen::{emit_wat, CodegenError};

fn wat(source: &str) -> String {
    let program = azalea_lang::compile(source).expect("source should compile");
    emit_wat(&program).expect("program should lower to WAT")
}

fn wat_error(source: &str) -> CodegenError {
    let program = azalea_lang::compile(source).expect("source should compile");
    emit_wat(&program).expect_err("program should be rejected")
}

// ===== Module Shape =====

#[test]
fn test_empty_program_has_preamble() {
    let out = wat("");
    assert!(out.starts_with("(module\n"));
    assert!(out.ends_with(")\n"));
    assert!(out.contains(r#"(import "env" "log" (func $log (param i32)))"#));
    assert!(out.contains(r#"(import "env" "createBox" (func $createBox (result i32)))"#));
    assert!(out.contains(r#"(export "memory" (memory $memory))"#));
}

#[test]
fn test_function_signature_and_default_result() {
    let out = wat("fn add(a, b):\n    return a + b\n");
    assert!(out.contains("(func $add (param $p0 i32) (param $p1 i32) (result i32)"));

    let body = [
        "    local.get $p0",
        "    local.get $p1",
        "    i32.add",
        "    return",
        "    i32.const 0",
        "  )",
    ]
    .join("\n");
    assert!(out.contains(&body), "unexpected body:\n{out}");
}

#[test]
fn test_main_is_exported() {
    let out = wat("fn main():\n    print(42)\n");
    assert!(out.contains(r#"(export "main" (func $main))"#));
    assert!(out.contains("i32.const 42\n    call $log\n    i32.const 0\n    drop"));
}

#[test]
fn test_other_functions_are_not_exported() {
    let out = wat("fn helper():\n    return 1\n");
    assert!(!out.contains("(export \"main\""));
    assert!(!out.contains("(export \"helper\""));
}

#[test]
fn test_top_level_statements_are_not_emitted() {
    let out = wat("print(7)\nfn one():\n    return 1\n");
    assert!(!out.contains("i32.const 7"));
    assert!(out.contains("(func $one (result i32)"));
}

// ===== Instructions =====

#[test]
fn test_operator_instructions() {
    let out = wat(concat!(
        "fn ops(a, b):\n",
        "    print(a - b)\n",
        "    print(a * b)\n",
        "    print(a / b)\n",
        "    print(a < b)\n",
        "    print(a > b)\n",
        "    print(a == b)\n",
        "    print(a != b)\n",
    ));
    for instruction in ["i32.sub", "i32.mul", "i32.div_s", "i32.lt_s", "i32.gt_s", "i32.eq", "i32.ne"] {
        assert!(out.contains(instruction), "missing {instruction}");
    }
}

#[test]
fn test_call_pushes_arguments_in_order() {
    let out = wat(concat!(
        "fn add(a, b):\n",
        "    return a + b\n",
        "fn main():\n",
        "    return add(1, 2)\n",
    ));
    assert!(out.contains("i32.const 1\n    i32.const 2\n    call $add\n    return"));
}

#[test]
fn test_bare_return_yields_zero() {
    let out = wat("fn stop():\n    return\n");
    assert!(out.contains("    i32.const 0\n    return\n"));
}

#[test]
fn test_ui_primitives_call_host() {
    let out = wat("fn main():\n    box:\n        text(\"hello\")\n        button\n");
    assert!(out.contains("call $createBox"));
    assert!(out.contains("i32.const 0\n    i32.const 0\n    call $createText\n    drop"));
    assert!(out.contains("call $createButton"));
}

// ===== Control Flow =====

#[test]
fn test_if_else() {
    let out = wat(concat!(
        "fn pick(a):\n",
        "    if a > 1:\n",
        "        return 1\n",
        "    else:\n",
        "        return 2\n",
    ));
    let expected = [
        "    local.get $p0",
        "    i32.const 1",
        "    i32.gt_s",
        "    if",
        "      i32.const 1",
        "      return",
        "    else",
        "      i32.const 2",
        "      return",
        "    end",
    ]
    .join("\n");
    assert!(out.contains(&expected), "unexpected if lowering:\n{out}");
}

#[test]
fn test_while_uses_block_and_loop() {
    let out = wat("fn spin(n):\n    while n > 0:\n        print(n)\n");
    let expected = [
        "    block $break",
        "      loop $continue",
        "        local.get $p0",
        "        i32.const 0",
        "        i32.gt_s",
        "        i32.eqz",
        "        br_if $break",
    ]
    .join("\n");
    assert!(out.contains(&expected), "unexpected loop header:\n{out}");
    assert!(out.contains("        br $continue\n      end\n    end\n"));
}

#[test]
fn test_ai_statements_become_comments() {
    let out = wat("fn main():\n    ai.search \"rust\"\n    ai \"tidy up\"\n");
    assert!(out.contains(";; ai.search: not compiled"));
    assert!(out.contains(";; ai statement: not compiled"));
}

// ===== Rejected Constructs =====

#[test]
fn test_rejects_local_variable_reads() {
    let err = wat_error("fn main():\n    var x = 1\n    print(x)\n");
    assert_eq!(
        err,
        CodegenError::unsupported("wat", "read of variable 'x'")
    );
}

#[test]
fn test_rejects_strings_outside_ui() {
    let err = wat_error("fn main():\n    print(\"hi\")\n");
    assert!(matches!(err, CodegenError::Unsupported { backend: "wat", .. }));
    assert!(err.to_string().contains("string literal"));
}

#[test]
fn test_rejects_undeclared_call() {
    let err = wat_error("fn main():\n    missing(1)\n");
    assert_eq!(
        err.to_string(),
        "Unsupported by the wat backend: call to undeclared function 'missing'"
    );
}

#[test]
fn test_rejects_wrong_arity() {
    let err = wat_error("fn one(a):\n    return a\nfn main():\n    one(1, 2)\n");
    assert!(err.to_string().contains("expected 1"));
}

#[test]
fn test_rejects_nested_function() {
    let err = wat_error("fn outer():\n    fn inner():\n        return 1\n");
    assert!(err.to_string().contains("nested function 'inner'"));
}
