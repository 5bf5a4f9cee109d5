mod common;

use azalea_lang::error::{AzaleaError, CompileError, LexError, RuntimeError};
use azalea_lang::evaluator::collaborator::Completion;
use azalea_lang::evaluator::renderer::{RecordingRenderer, RenderCall};
use azalea_lang::evaluator::value::Value;
use azalea_lang::parser::ast::Stmt;
use azalea_lang::{EvalConfig, Interpreter};
use common::{interpreter, output_of, parse, run_with, MockCollaborator, Request};

// ===== Core semantics =====

#[test]
fn runs_main_with_if_else_and_renders_once() {
    let source = concat!(
        "fn main():\n",
        "    var x = 10\n",
        "    if x > 5:\n",
        "        text(\"big\")\n",
        "    else:\n",
        "        text(\"small\")\n",
    );

    let program = parse(source);
    assert_eq!(program.body.len(), 1);
    match &program.body[0] {
        Stmt::FunctionDeclaration(decl) => {
            assert_eq!(decl.name, "main");
            assert!(matches!(decl.body[0], Stmt::VariableDeclaration { .. }));
            assert!(matches!(decl.body[1], Stmt::If { alternate: Some(_), .. }));
        }
        other => panic!("expected function declaration, found {:?}", other),
    }

    let (interpreter, result) = run_with(source, &[]);
    result.expect("program runs");
    assert_eq!(interpreter.renderer().calls, vec![RenderCall::Text("big".into())]);
}

#[test]
fn script_mode_runs_top_level_statements_in_order() {
    assert_eq!(output_of("var a = 2\nvar b = 3\nprint(a + b)"), vec!["5"]);
}

#[test]
fn undefined_variable_stops_the_script() {
    let (interpreter, result) = run_with("print(z)\nprint(1)\n", &[]);
    assert_eq!(result, Err(RuntimeError::UndefinedVariable("z".into())));
    assert_eq!(interpreter.output(), &["Runtime Error: Variable z not defined"]);
}

#[test]
fn functions_cannot_see_caller_locals() {
    let source = concat!(
        "fn f():\n",
        "    text(y)\n",
        "fn main():\n",
        "    var y = 1\n",
        "    f()\n",
    );
    let (interpreter, result) = run_with(source, &[]);
    assert_eq!(result, Err(RuntimeError::UndefinedVariable("y".into())));
    assert!(interpreter.renderer().calls.is_empty());
}

#[test]
fn mismatched_dedent_is_a_lex_error() {
    let mut interpreter = interpreter(&[]);
    let err = interpreter
        .run_source("fn main():\n    var x = 1\n  var y = 2\n")
        .expect_err("indentation error");

    match err {
        AzaleaError::Compile(CompileError::Lex(LexError::IndentMismatch {
            expected,
            found,
            line,
            ..
        })) => {
            assert_eq!((expected, found, line), (0, 2, 3));
        }
        other => panic!("expected indentation error, found {:?}", other),
    }
    assert!(interpreter.output().is_empty());
}

#[test]
fn functions_see_globals_and_parameters() {
    let source = concat!(
        "var greeting = \"hello\"\n",
        "fn greet(name):\n",
        "    print(greeting + \" \" + name)\n",
        "greet(\"azalea\")\n",
    );
    assert_eq!(output_of(source), vec!["hello azalea"]);
}

#[test]
fn recursion_returns_values() {
    let source = concat!(
        "fn fact(n):\n",
        "    if n < 2:\n",
        "        return 1\n",
        "    return n * fact(n - 1)\n",
        "print(fact(5))\n",
    );
    assert_eq!(output_of(source), vec!["120"]);
}

#[test]
fn while_loop_rebinds_with_var() {
    let source = concat!(
        "var i = 0\n",
        "while i < 3:\n",
        "    print(i)\n",
        "    var i = i + 1\n",
        "print(\"done\")\n",
    );
    assert_eq!(output_of(source), vec!["0", "1", "2", "done"]);
}

#[test]
fn return_inside_loop_leaves_the_function() {
    let source = concat!(
        "fn first_over(limit):\n",
        "    var n = 0\n",
        "    while 1:\n",
        "        if n > limit:\n",
        "            return n\n",
        "        var n = n + 3\n",
        "print(first_over(7))\n",
    );
    assert_eq!(output_of(source), vec!["9"]);
}

#[test]
fn missing_arguments_and_missing_return_are_undefined() {
    let source = concat!(
        "fn show(a, b):\n",
        "    print(a, b)\n",
        "print(show(1))\n",
    );
    assert_eq!(output_of(source), vec!["1 undefined", "undefined"]);
}

#[test]
fn var_without_initialiser_and_bare_return_are_null() {
    let source = concat!(
        "var empty\n",
        "fn nothing():\n",
        "    return\n",
        "print(empty, nothing())\n",
    );
    assert_eq!(output_of(source), vec!["null null"]);
}

#[test]
fn main_replaces_script_mode() {
    let source = "print(\"top\")\nfn main():\n    print(\"main\")\n";
    assert_eq!(output_of(source), vec!["main"]);
}

#[test]
fn top_level_return_ends_the_script() {
    assert_eq!(output_of("print(1)\nreturn\nprint(2)\n"), vec!["1"]);
}

#[test]
fn nested_function_declaration_is_registered_when_executed() {
    let source = concat!(
        "fn outer():\n",
        "    fn inner():\n",
        "        return 7\n",
        "    return inner()\n",
        "print(outer())\n",
        "print(inner())\n",
    );
    assert_eq!(output_of(source), vec!["7", "7"]);
}

// ===== Operators =====

#[test]
fn operator_semantics() {
    let source = concat!(
        "print(7 / 2)\n",
        "print(\"n = \" + 4)\n",
        "print(1 == 1, 1 != 1, \"a\" == 1)\n",
        "print(\"apple\" < \"banana\", 3 > 4)\n",
        "print(2 + 3 * 4 - 6 / 2)\n",
    );
    assert_eq!(
        output_of(source),
        vec!["3.5", "n = 4", "true false false", "true false", "11"]
    );
}

#[test]
fn arithmetic_on_text_is_a_type_error() {
    let (_, result) = run_with("print(\"a\" - 1)\n", &[]);
    assert_eq!(
        result,
        Err(RuntimeError::Type {
            op: "-".into(),
            left: "text",
            right: "number",
        })
    );
}

#[test]
fn division_by_zero_fails() {
    let (_, result) = run_with("print(1 / 0)\n", &[]);
    assert_eq!(result, Err(RuntimeError::DivisionByZero));
}

#[test]
fn unknown_function_fails() {
    let (interpreter, result) = run_with("missing(1)\n", &[]);
    assert_eq!(result, Err(RuntimeError::FunctionNotFound("missing".into())));
    assert_eq!(interpreter.output(), &["Runtime Error: Function missing not found"]);
}

#[test]
fn unbounded_recursion_hits_the_call_depth_limit() {
    let program = parse("fn spin(n):\n    return spin(n + 1)\nspin(0)\n");
    let mut interpreter = Interpreter::with_config(
        MockCollaborator::default(),
        RecordingRenderer::new(),
        EvalConfig::quiet().with_max_call_depth(16),
    );
    assert_eq!(
        interpreter.evaluate(&program),
        Err(RuntimeError::CallDepthExceeded(16))
    );
}

/// Run `source` with the default configuration on a thread with the stack
/// size test threads and typical embedders get.
fn run_on_small_stack(source: &'static str) -> Result<(), RuntimeError> {
    std::thread::Builder::new()
        .stack_size(2 * 1024 * 1024)
        .spawn(move || {
            let program = parse(source);
            let mut interpreter = Interpreter::with_config(
                MockCollaborator::default(),
                RecordingRenderer::new(),
                EvalConfig::quiet(),
            );
            interpreter.evaluate(&program)
        })
        .expect("spawn evaluator thread")
        .join()
        .expect("evaluator thread should not overflow its stack")
}

#[test]
fn default_call_depth_limit_trips_before_the_stack_runs_out() {
    let limit = EvalConfig::new().max_call_depth;
    let source = concat!(
        "fn spin(n):\n",
        "    if n > 0 - 1:\n",
        "        var y = n * 2\n",
        "        return spin(n + 1)\n",
        "spin(0)\n",
    );
    assert_eq!(
        run_on_small_stack(source),
        Err(RuntimeError::CallDepthExceeded(limit))
    );
}

#[test]
fn default_call_depth_limit_holds_through_nested_blocks() {
    let limit = EvalConfig::new().max_call_depth;
    let source = concat!(
        "fn spin(n):\n",
        "    while n > 0 - 1:\n",
        "        if n == n:\n",
        "            var y = spin(n + 1) + n * 2\n",
        "            return y\n",
        "spin(0)\n",
    );
    assert_eq!(
        run_on_small_stack(source),
        Err(RuntimeError::CallDepthExceeded(limit))
    );
}

// ===== UI primitives =====

#[test]
fn ui_children_render_in_order() {
    let source = concat!(
        "box:\n",
        "    text(\"title\")\n",
        "    box:\n",
        "        button(\"ok\")\n",
        "    button\n",
        "text\n",
    );
    let (interpreter, result) = run_with(source, &[]);
    result.expect("program runs");
    assert_eq!(
        interpreter.renderer().calls,
        vec![
            RenderCall::Box,
            RenderCall::Text("title".into()),
            RenderCall::Box,
            RenderCall::Button("ok".into()),
            RenderCall::Button("Button".into()),
        ]
    );
}

#[test]
fn ui_arguments_are_evaluated_before_rendering() {
    let source = "var n = 2\ntext(\"count: \" + n)\n";
    let (interpreter, _) = run_with(source, &[]);
    assert_eq!(interpreter.renderer().texts(), vec!["count: 2"]);
}

// ===== AI statements =====

#[test]
fn generate_registers_returned_functions() {
    let source = concat!(
        "generate fn double(x): description \"Doubles a number\"\n",
        "print(double(21))\n",
    );
    let (interpreter, result) = run_with(source, &["fn double(x):\n    return x * 2\n"]);
    result.expect("program runs");

    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::GenerateFunction {
            name: "double".into(),
            params: vec!["x".into()],
            description: "Doubles a number".into(),
        }]
    );
    assert_eq!(
        interpreter.output(),
        &[
            "[AI] Generating function 'double'...",
            "[AI] Generated:\nfn double(x):\n    return x * 2\n",
            "[AI] Function 'double' registered.",
            "42",
        ]
    );
}

#[test]
fn generate_accepts_streamed_fenced_code() {
    let program = parse("generate function hello(): description \"Greets\"\nhello()\n");
    let mut collaborator = MockCollaborator::default();
    collaborator.push(Completion::from_chunks([
        "```azalea\nfn hel",
        "lo():\n    print(\"hi\")\n",
        "fn helper():\n    return 1\n```",
    ]));
    let mut interpreter =
        Interpreter::with_config(collaborator, RecordingRenderer::new(), EvalConfig::quiet());

    interpreter.evaluate(&program).expect("program runs");
    assert!(interpreter.has_function("hello"));
    assert!(interpreter.has_function("helper"));
    assert_eq!(interpreter.output().last().map(String::as_str), Some("hi"));
}

#[test]
fn optimize_sends_printed_block_and_runs_result_in_current_scope() {
    let source = concat!(
        "fn main():\n",
        "    var x = 3\n",
        "    ai.optimize:\n",
        "        var y = x + x\n",
        "        print(y)\n",
        "    print(y)\n",
    );
    let (interpreter, result) = run_with(source, &["var y = x * 2\nprint(y)"]);
    result.expect("program runs");

    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::OptimizeBlock("var y = x + x\nprint(y)".into())]
    );
    let output = interpreter.output();
    assert_eq!(output[0], "[AI] Optimizing block...");
    assert_eq!(output[1], "[AI] Optimized Code:\nvar y = x * 2\nprint(y)");
    assert_eq!(&output[2..], &["6", "6"]);
}

#[test]
fn instruction_carries_context_and_remembered_facts() {
    let source = concat!(
        "ai_remember(\"user likes green\")\n",
        "ai \"paint it\":\n",
        "    text(\"hello\")\n",
    );
    let (interpreter, result) = run_with(source, &["print(\"painted\")"]);
    result.expect("program runs");

    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::Process {
            instruction: "paint it\n[Memory]: user likes green".into(),
            context: "text(\"hello\")".into(),
        }]
    );
    assert_eq!(
        interpreter.output(),
        &[
            "[AI Memory]: Remembered \"user likes green\"",
            "[AI] Instruction: \"paint it\"",
            "[AI] Result:\nprint(\"painted\")",
            "painted",
        ]
    );
    // The original block is context only.
    assert!(interpreter.renderer().calls.is_empty());
    assert_eq!(interpreter.facts(), &["user likes green"]);
}

#[test]
fn bare_ai_uses_default_instruction_and_ignores_blank_result() {
    let (interpreter, result) = run_with("ai\nprint(\"after\")\n", &["   \n"]);
    result.expect("program runs");

    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::Process {
            instruction: "Improve this code".into(),
            context: String::new(),
        }]
    );
    assert_eq!(interpreter.output().last().map(String::as_str), Some("after"));
}

#[test]
fn import_runs_module_and_merges_functions() {
    let module = "fn square(x):\n    return x * x\nprint(\"loaded\")\n";
    let (interpreter, result) = run_with("ai.import geometry\nprint(square(4))\n", &[module]);
    result.expect("program runs");

    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::GenerateModule("geometry".into())]
    );
    assert_eq!(
        interpreter.output(),
        &["[AI] Importing module 'geometry'...", "loaded", "16"]
    );
}

#[test]
fn search_passes_facts_and_prints_answer() {
    let source = "ai_remember(\"the sky is blue\")\nai.search \"sky colour\"\n";
    let (interpreter, result) = run_with(source, &["Blue."]);
    result.expect("program runs");

    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::RagSearch {
            query: "sky colour".into(),
            facts: vec!["the sky is blue".into()],
        }]
    );
    assert_eq!(interpreter.output().last().map(String::as_str), Some("[AI Search]: Blue."));
}

#[test]
fn inspect_evaluates_its_target() {
    let (interpreter, result) = run_with("var data = 40 + 2\nai.inspect data\n", &["A number."]);
    result.expect("program runs");

    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::Inspect(Value::Number(42.0))]
    );
    assert_eq!(interpreter.output(), &["[AI Inspect]: A number."]);
}

#[test]
fn ai_ask_returns_the_answer_as_text() {
    let (interpreter, result) = run_with("var answer = ai_ask(\"2 + 2?\")\nprint(answer + \"!\")\n", &["4"]);
    result.expect("program runs");
    assert_eq!(interpreter.output(), &["[AI Asking]: 2 + 2?", "4!"]);
}

#[test]
fn generated_code_can_trigger_nested_generation() {
    let helper = "fn helper():\n    ai \"say hi\"\n    print(\"after\")\n";
    let source = concat!(
        "generate fn helper(): description \"Asks for a greeting\"\n",
        "helper()\n",
        "print(\"done\")\n",
    );
    let (interpreter, result) = run_with(source, &[helper, "print(\"nested\")"]);
    result.expect("program runs");

    let output = interpreter.output();
    let tail: Vec<&str> = output
        .iter()
        .map(String::as_str)
        .filter(|line| !line.starts_with("[AI]"))
        .collect();
    assert_eq!(tail, vec!["nested", "after", "done"]);
}

#[test]
fn malformed_generated_code_is_a_compile_error() {
    let (interpreter, result) = run_with("ai \"break things\"\nprint(1)\n", &["var = )"]);
    assert!(matches!(
        result,
        Err(RuntimeError::Compile(CompileError::Parse(_)))
    ));
    assert!(!interpreter.output().contains(&"1".to_string()));
    assert!(interpreter
        .output()
        .last()
        .is_some_and(|line| line.starts_with("Runtime Error: ")));
}

#[test]
fn deeply_nested_generated_code_is_a_parse_error() {
    let deep = format!("print({}1{})", "(".repeat(5000), ")".repeat(5000));
    let source = "ai.optimize:\n    print(1)\nprint(2)\n";
    let (interpreter, result) = run_with(source, &[deep.as_str()]);
    match result {
        Err(RuntimeError::Compile(CompileError::Parse(err))) => {
            assert!(err.message.starts_with("Nesting too deep"));
        }
        other => panic!("expected a parse error, found {:?}", other),
    }
    assert!(!interpreter.output().contains(&"2".to_string()));
}

#[test]
fn unavailable_collaborator_is_a_runtime_error() {
    let (_, result) = run_with("ai.search \"anything\"\n", &[]);
    assert!(matches!(result, Err(RuntimeError::Collaborator(_))));
}

// ===== Failure reporting =====

#[test]
fn failure_asks_for_a_fix_suggestion() {
    let program = parse("print(z)\n");
    let mut interpreter = Interpreter::with_config(
        MockCollaborator::new(&["Declare z before using it."]),
        RecordingRenderer::new(),
        EvalConfig::new(),
    );

    assert!(interpreter.evaluate(&program).is_err());
    assert_eq!(
        interpreter.collaborator().requests,
        vec![Request::Process {
            instruction: "Fix this error: Variable z not defined".into(),
            context: String::new(),
        }]
    );
    assert_eq!(
        interpreter.output(),
        &[
            "Runtime Error: Variable z not defined",
            "[AI Debugger] Analyzing error...",
            "[AI Suggestion]:\nDeclare z before using it.",
        ]
    );
}

#[test]
fn failed_fix_request_is_reported() {
    let program = parse("print(z)\n");
    let mut interpreter = Interpreter::with_config(
        MockCollaborator::default(),
        RecordingRenderer::new(),
        EvalConfig::new(),
    );

    assert!(interpreter.evaluate(&program).is_err());
    assert_eq!(
        interpreter.output().last().map(String::as_str),
        Some("[AI Debugger] No suggestion available: no scripted response left for process")
    );
}

// ===== Interpreter state =====

#[test]
fn macros_see_the_caller_frame() {
    let body = parse("print(local)\n").body;
    let mut interpreter = interpreter(&[]);
    interpreter.define_macro("show_local", Vec::new(), body);

    interpreter
        .run_source("fn main():\n    var local = \"visible\"\n    show_local()\n")
        .expect("macro sees caller locals");
    assert_eq!(interpreter.take_output(), vec!["visible"]);

    // The same body as a function cannot.
    let err = interpreter
        .run_source("fn peek():\n    print(local)\nfn main():\n    var local = 1\n    peek()\n")
        .expect_err("functions do not see caller locals");
    assert_eq!(
        err,
        AzaleaError::Runtime(RuntimeError::UndefinedVariable("local".into()))
    );
}

#[test]
fn macro_parameters_bind_positionally() {
    let body = parse("print(prefix + name)\n").body;
    let mut interpreter = interpreter(&[]);
    interpreter.define_macro("tag", vec!["name".into()], body);

    interpreter
        .run_source("var prefix = \"#\"\ntag(\"azalea\")\n")
        .expect("program runs");
    assert_eq!(interpreter.output(), &["#azalea"]);
}

#[test]
fn state_persists_across_runs_until_reset() {
    let mut interpreter = interpreter(&[]);
    interpreter
        .run_source("var base = 10\nfn add(n):\n    return base + n\nai_remember(\"fact\")\n")
        .expect("first run");
    interpreter.run_source("print(add(5))\n").expect("second run");

    assert_eq!(interpreter.global("base"), Some(&Value::Number(10.0)));
    assert_eq!(interpreter.output().last().map(String::as_str), Some("15"));

    interpreter.reset();
    assert!(interpreter.output().is_empty());
    assert!(interpreter.facts().is_empty());
    assert!(interpreter.has_function("add"));
}

#[test]
fn compile_errors_leave_state_untouched() {
    let mut interpreter = interpreter(&[]);
    let err = interpreter.run_source("var x = 1\nvar = 2\n").expect_err("parse error");
    assert!(matches!(err, AzaleaError::Compile(CompileError::Parse(_))));
    assert!(interpreter.global("x").is_none());
    assert!(interpreter.output().is_empty());
}
