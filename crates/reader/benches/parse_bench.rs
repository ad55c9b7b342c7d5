use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sheetstream_reader::{parse_decimal, CellCoercer, HeaderMode, ReaderSettings, WorkbookParser};
use sheetstream_workbook::{CachedResult, Cell, DateSystem, Numeric, Sheet, Workbook};

fn build_workbook(rows: usize) -> Workbook {
    let mut data = vec![vec![
        Cell::text("id"),
        Cell::text("name"),
        Cell::text("amount"),
        Cell::text("when"),
        Cell::text("double"),
    ]];
    for i in 0..rows {
        let value = i as f64;
        data.push(vec![
            Cell::number(value),
            Cell::text(format!("item-{i}")),
            Cell::number(value * 1.25),
            Cell::date(44562.0 + value),
            Cell::formula("C2*2", CachedResult::Numeric(Numeric::new(value * 2.5))),
        ]);
    }
    Workbook::new()
        .with_sheet(Sheet::from_data("Data", data))
        .unwrap()
}

fn bench_parse_rows(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_rows");
    let settings = ReaderSettings::builder()
        .with_header(HeaderMode::WithHeader)
        .build();

    for size in [100, 1000, 10000].iter() {
        let book = build_workbook(*size);
        group.bench_with_input(BenchmarkId::new("with_header", size), size, |b, _| {
            b.iter(|| {
                let parser = WorkbookParser::new(settings.clone(), book.clone(), "0").unwrap();
                black_box(parser.filter_map(Result::ok).count())
            })
        });
    }

    group.finish();
}

fn bench_resume(c: &mut Criterion) {
    let mut group = c.benchmark_group("resume");
    let settings = ReaderSettings::default();
    let book = build_workbook(10000);

    group.bench_function("seek_last_row", |b| {
        b.iter(|| {
            WorkbookParser::new(settings.clone(), book.clone(), black_box("Data::10000")).unwrap()
        })
    });

    group.finish();
}

fn bench_coercion(c: &mut Criterion) {
    let mut group = c.benchmark_group("coerce");
    let coercer = CellCoercer::new(DateSystem::Excel1900);

    let number = Cell::number(1234.5678);
    let date = Cell::date(44562.5);
    let text = Cell::text("hello");

    group.bench_function("number", |b| b.iter(|| coercer.coerce(black_box(&number))));
    group.bench_function("date", |b| b.iter(|| coercer.coerce(black_box(&date))));
    group.bench_function("text", |b| b.iter(|| coercer.coerce(black_box(&text))));
    group.bench_function("parse_decimal", |b| {
        b.iter(|| parse_decimal(black_box("(1,234,567.89)")))
    });

    group.finish();
}

criterion_group!(benches, bench_parse_rows, bench_resume, bench_coercion);
criterion_main!(benches);
