//! Benchmarks for the convert → normalize → export pipeline.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Cursor;

/// Creates a synthetic DOCX with a heading every ten paragraphs and a
/// table of contents pointing at them.
fn create_test_docx(paragraph_count: usize) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));

    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Stored);

    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        br#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="xml" ContentType="application/xml"/>
  <Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>
</Types>"#,
    )
    .unwrap();

    let mut content = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">
  <w:body>
    <w:p><w:r><w:t>Table of Contents</w:t></w:r></w:p>"#,
    );

    let sections = paragraph_count.div_ceil(10);
    for s in 0..sections {
        content.push_str(&format!(
            r#"
    <w:p><w:hyperlink w:anchor="_Toc{s}"><w:r><w:t>Section {s}</w:t></w:r></w:hyperlink></w:p>"#
        ));
    }

    for i in 0..paragraph_count {
        if i % 10 == 0 {
            content.push_str(&format!(
                r#"
    <w:p><w:pPr><w:pStyle w:val="Heading1"/></w:pPr><w:r><w:t>Section {}</w:t></w:r></w:p>"#,
                i / 10
            ));
        }
        content.push_str(&format!(
            r#"
    <w:p><w:r><w:rPr><w:b/></w:rPr><w:t>Paragraph {}</w:t></w:r><w:r><w:t xml:space="preserve"> with some test content for benchmarking purposes.</w:t></w:r></w:p>"#,
            i
        ));
    }

    content.push_str(
        r#"
  </w:body>
</w:document>"#,
    );

    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(content.as_bytes()).unwrap();

    zip.finish().unwrap();
    buffer
}

/// Benchmark DOCX → HTML conversion at various sizes.
fn bench_convert(c: &mut Criterion) {
    let mut group = c.benchmark_group("convert");

    for para_count in [10, 100, 500, 1000].iter() {
        let data = create_test_docx(*para_count);
        let size = data.len() as u64;

        group.throughput(Throughput::Bytes(size));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &data,
            |b, data| {
                b.iter(|| {
                    let _ = redoc::convert(black_box(data));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark HTML normalization, including TOC resolution.
fn bench_normalize(c: &mut Criterion) {
    let mut group = c.benchmark_group("normalize");

    for para_count in [10, 100, 500].iter() {
        let html = redoc::convert(&create_test_docx(*para_count)).unwrap();

        group.throughput(Throughput::Bytes(html.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &html,
            |b, html| {
                b.iter(|| {
                    let _ = redoc::normalize(black_box(html));
                });
            },
        );
    }

    group.finish();
}

/// Benchmark Word-compatible export.
fn bench_export(c: &mut Criterion) {
    let mut group = c.benchmark_group("export_doc");

    for para_count in [10, 100, 500].iter() {
        let mut session = redoc::DocumentSession::new();
        session
            .import("bench.docx", None, &create_test_docx(*para_count))
            .unwrap();

        group.bench_with_input(
            BenchmarkId::new("paragraphs", para_count),
            &session,
            |b, session| {
                b.iter(|| {
                    let _ = black_box(session).export(redoc::ExportFormat::Doc);
                });
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_convert, bench_normalize, bench_export);
criterion_main!(benches);
