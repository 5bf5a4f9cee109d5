use azalea_lang::lexer::Lexer;
use azalea_lang::parser::printer::print_program;
use azalea_lang::parser::Parser;
use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

const FIBONACCI: &str = "fn fib(n):\n    if n < 2:\n        return n\n    return fib(n - 1) + fib(n - 2)\nprint(fib(10))\n";

const UI: &str = "box:\n    text(\"Welcome\")\n    box:\n        button(\"Start\")\n        button(\"Quit\")\n";

const AI: &str = "ai.import math\ngenerate fn area(w, h): description \"Area of a rectangle\"\nai.optimize:\n    var x = 1 + 2 * 3\n    print(x)\nai \"tidy up\":\n    print(area(2, 3))\n";

/// A larger program made of many copies of the fixtures above.
fn large_source() -> String {
    let mut source = String::new();
    for _ in 0..50 {
        source.push_str(FIBONACCI);
        source.push_str(UI);
        source.push_str(AI);
    }
    source
}

fn bench_lexer(c: &mut Criterion) {
    c.bench_function("lexer_function", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(FIBONACCI));
            let _ = black_box(lexer.tokenize());
        });
    });

    let large = large_source();
    c.bench_function("lexer_large", |b| {
        b.iter(|| {
            let mut lexer = Lexer::new(black_box(&large));
            let _ = black_box(lexer.tokenize());
        });
    });
}

fn bench_parser(c: &mut Criterion) {
    for (name, source) in [("parser_ui", UI), ("parser_ai", AI)] {
        let Ok(tokens) = Lexer::new(source).tokenize() else {
            return;
        };
        c.bench_function(name, |b| {
            b.iter(|| {
                let mut parser = Parser::new(black_box(tokens.clone()));
                let _ = black_box(parser.parse());
            });
        });
    }
}

fn bench_round_trip(c: &mut Criterion) {
    let large = large_source();
    let Ok(program) = azalea_lang::compile(&large) else {
        return;
    };
    c.bench_function("printer_large", |b| {
        b.iter(|| black_box(print_program(black_box(&program))));
    });
    c.bench_function("compile_print_compile", |b| {
        b.iter(|| {
            let printed = print_program(black_box(&program));
            let _ = black_box(azalea_lang::compile(&printed));
        });
    });
}

criterion_group!(benches, bench_lexer, bench_parser, bench_round_trip);
criterion_main!(benches);
