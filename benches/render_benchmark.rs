//! Benchmarks for abstractdoc rendering performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks render synthetic records without touching the disk.

use abstractdoc::template::full_columns as col;
use abstractdoc::{render, Assembler, Record, RenderOptions, TemplateKind};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates full-layout records with a few authors, paragraphs and references.
fn create_records(count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| {
            Record::new(
                i + 1,
                [
                    (col::TITLE, format!("Imaging of Ca<sup>2+</sup> waves in <i>Danio rerio</i> #{}", i)),
                    (col::NAME, "Ada Lovelace (1)(2)\nCharles Babbage (2)\nAlan Turing".to_string()),
                    (col::AFFILIATION, "(1)Analytical Society\n(2)Royal Institution".to_string()),
                    (col::EMAIL, "ada@example.org".to_string()),
                    (col::DOI, format!("10.12751/incf.ni2016.{:04}", i)),
                    (
                        col::ABSTRACT,
                        "Benchmark body paragraph with H<sub>2</sub>O and <i>in vivo</i> markup.\n"
                            .repeat(6),
                    ),
                    (col::REFERENCES, "First reference.\nSecond reference.\nThird reference.".to_string()),
                    (col::ACKNOWLEDGEMENT, "We thank the benchmark harness.".to_string()),
                    (col::FUNDING, String::new()),
                    (col::PROGRAM_LONG, format!("P{:03}", i)),
                ],
            )
        })
        .collect()
}

/// Benchmark inline markup tokenizing.
fn bench_markup(c: &mut Criterion) {
    let text = "Ca<sup>2+</sup> in <i>Danio rerio</i> and H<sub>2</sub>O, ".repeat(20);

    c.bench_function("tokenize_markup", |b| {
        b.iter(|| abstractdoc::tokenize(black_box(&text)).count());
    });

    c.bench_function("strip_markup", |b| {
        b.iter(|| abstractdoc::strip_markup(black_box(&text)));
    });
}

/// Benchmark assembling and packaging at various record counts.
fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let assembler = Assembler::new(RenderOptions::new().with_template(TemplateKind::Aini2016));

    for count in [1, 10, 50].iter() {
        let records = create_records(*count);

        group.bench_function(format!("assemble_{}_records", count), |b| {
            b.iter(|| assembler.assemble(black_box(&records)).unwrap());
        });

        let doc = assembler.assemble(&records).unwrap();
        group.bench_function(format!("docx_{}_records", count), |b| {
            b.iter(|| render::to_docx_bytes(black_box(&doc), None).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_markup, bench_render);
criterion_main!(benches);
