//! Benchmarks for pdfsed parsing performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks use synthetic djvused pages and pdfsed scripts.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Creates a synthetic djvused page with the given number of lines.
fn create_test_page(line_count: usize) -> String {
    let mut content = String::new();
    content.push_str("(page 0 0 2480 3508\n  (column 100 100 2380 3400\n    (para 100 100 2380 3400\n");

    for i in 0..line_count {
        let y = 3400 - (i as u32 % 60) * 55;
        content.push_str(&format!("      (line 100 {} 2380 {}\n", y - 50, y));
        for w in 0..12u32 {
            let x = 100 + w * 190;
            content.push_str(&format!(
                "        (word {} {} {} {} \"word{}\\t{}\")\n",
                x,
                y - 50,
                x + 170,
                y,
                i,
                w
            ));
        }
        content.push_str("      )\n");
    }

    content.push_str(")))\n");
    content
}

/// Creates a pdfsed script drawing the given number of pages.
fn create_test_script(page_count: usize) -> String {
    let mut script = String::from("set title \"Benchmark\" author \"pdfsed\" ;\n");
    for i in 0..page_count {
        script.push_str(&format!(
            "create page size 595.28 841.89 ;\n\
             draw image \"scans/p{i}.png\" dpi 300 mask 0xffffff ;\n\
             draw text \"ocr/p{i}.djvused\" dpi 300 pos 0 0 scale 1.0 ;\n"
        ));
    }
    script
}

/// Benchmark input format detection.
fn bench_format_detection(c: &mut Criterion) {
    let page = create_test_page(1);
    let text = b"Not a layout at all, just random text content";

    c.bench_function("detect_djvused", |b| {
        b.iter(|| pdfsed::detect_format_from_bytes(black_box(page.as_bytes())));
    });

    c.bench_function("detect_text", |b| {
        b.iter(|| pdfsed::detect_format_from_bytes(black_box(text)));
    });
}

/// Benchmark djvused parsing at various sizes.
fn bench_djvused_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("djvused_parsing");

    for line_count in [10, 100, 1000].iter() {
        let data = create_test_page(*line_count);

        group.bench_function(format!("{}_lines_raw", line_count), |b| {
            b.iter(|| {
                let options = pdfsed::ParseOptions::new().raw();
                pdfsed::parse_bytes_with_options(black_box(data.as_bytes()), options).unwrap()
            });
        });

        group.bench_function(format!("{}_lines_scaled", line_count), |b| {
            b.iter(|| {
                let options = pdfsed::ParseOptions::new().with_scale(0.24);
                pdfsed::parse_bytes_with_options(black_box(data.as_bytes()), options).unwrap()
            });
        });
    }

    group.finish();
}

/// Benchmark the writers on a parsed page.
fn bench_rendering(c: &mut Criterion) {
    let tree = pdfsed::parse_str(&create_test_page(100)).unwrap();
    let options = pdfsed::RenderOptions::default();

    c.bench_function("render_djvused", |b| {
        b.iter(|| pdfsed::render::to_djvused(black_box(&tree), &options).unwrap());
    });

    c.bench_function("render_hocr", |b| {
        b.iter(|| pdfsed::render::to_hocr(black_box(&tree), &options).unwrap());
    });
}

/// Benchmark script reading.
fn bench_script_reading(c: &mut Criterion) {
    let script = create_test_script(100);

    c.bench_function("read_script_100_pages", |b| {
        b.iter(|| {
            pdfsed::script::read_script(
                black_box(script.as_bytes()),
                pdfsed::ScriptOptions::default(),
            )
            .unwrap()
        });
    });
}

/// Benchmark builder pattern overhead.
fn bench_builder_creation(c: &mut Criterion) {
    c.bench_function("builder_creation", |b| {
        b.iter(|| {
            let _builder = pdfsed::Pdfsed::new()
                .lenient()
                .with_scale(0.5)
                .with_title("Benchmark");
        });
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_djvused_parsing,
    bench_rendering,
    bench_script_reading,
    bench_builder_creation,
);
criterion_main!(benches);
