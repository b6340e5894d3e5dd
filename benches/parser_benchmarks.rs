//! Benchmarks for the ZScript front end.
//!
//! - Scanner alone, over the core fixtures
//! - Push parser over generated scripts of increasing size
//! - A full session: manifest, parse, compile

use bumpalo::Bump;
use criterion::{Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use zscript::{
    Archive, ArchiveSet, DeclarationCompiler, Diagnostics, ManifestEntry, ParseState, PushParser,
    ScriptParser, Session, SessionOptions, SourceLoc, parse_file,
};
use zscript_parser::{Lexer, Terminal, TokenKind, TokenValue};

const CONSTANTS: &str = include_str!("../test_scripts/core/zscript/constants.zs");
const ACTOR: &str = include_str!("../test_scripts/core/zscript/actor.zs");

/// `copies` renamed copies of the actor fixture.
fn generated(copies: usize) -> String {
    let mut text = String::with_capacity(ACTOR.len() * copies);
    for i in 0..copies {
        text.push_str(&ACTOR.replace("class Thinker", &format!("class Thinker{i}")));
        text.push('\n');
    }
    text
}

fn parse_text(text: &str) -> usize {
    let archives = ArchiveSet::new().with(Archive::new("bench").with_lump("bench.zs", text));
    let entry = ManifestEntry {
        name: "bench.zs".to_owned(),
        loc: SourceLoc::point(1, 1),
    };
    let bump = Bump::new();
    let mut state = ParseState::new(&bump);
    let mut parser = ScriptParser::new();
    let mut diags = Diagnostics::new();
    parse_file(&archives, &entry, "bench", &mut parser, &mut state, &mut diags);
    parser.step(Terminal::EndOfInput, TokenValue::end(SourceLoc::default()), &mut state, &mut diags);
    state.ast().len()
}

fn scanner_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");
    for (name, text) in [("constants", CONSTANTS), ("actor", ACTOR)] {
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut lexer = Lexer::new(black_box(text));
                let mut count = 0usize;
                while lexer.next_token().kind != TokenKind::Eof {
                    count += 1;
                }
                black_box(count)
            });
        });
    }
    group.finish();
}

fn size_based_benchmarks(c: &mut Criterion) {
    let mut group = c.benchmark_group("parser/file_sizes");
    for copies in [1, 10, 50] {
        let text = generated(copies);
        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_function(format!("actor_x{copies}"), |b| {
            b.iter(|| black_box(parse_text(black_box(&text))));
        });
    }
    group.finish();
}

fn session_benchmarks(c: &mut Criterion) {
    let archives = ArchiveSet::new().with(
        Archive::new("core")
            .with_lump("zscript.txt", "zscript/constants.zs\nzscript/actor.zs")
            .with_lump("zscript/constants.zs", CONSTANTS)
            .with_lump("zscript/actor.zs", ACTOR),
    );
    c.bench_function("session/core", |b| {
        b.iter(|| {
            let mut session =
                Session::new(&archives, DeclarationCompiler::new(), SessionOptions::default());
            black_box(session.parse_scripts().map(|reports| reports.len()))
        });
    });
}

criterion_group!(
    benches,
    scanner_benchmarks,
    size_based_benchmarks,
    session_benchmarks
);
criterion_main!(benches);
