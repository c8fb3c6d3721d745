//! Benchmarks for the designer hot paths: rebuilding the canvas after an
//! edit and validating a filled preview.

use benefit_console::form::fill::FillState;
use benefit_console::form::{ComponentLibrary, Designer, DesignerMode, FieldKind, FormDocument};
use benefit_console::utils::validation::is_money;
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A designer holding every component kind once.
///
fn populated_designer() -> Designer {
    let library = ComponentLibrary::standard();
    let mut designer = Designer::new(DesignerMode::Form, FormDocument::empty(DesignerMode::Form));
    for item in library.items() {
        if designer.add_library_item(item).is_err() {
            break;
        }
    }
    designer
}

fn bench_canvas_views(c: &mut Criterion) {
    let designer = populated_designer();
    c.bench_function("canvas_views_all_kinds", |b| {
        b.iter(|| black_box(designer.canvas_views()))
    });
}

fn bench_fill_validation(c: &mut Criterion) {
    let designer = populated_designer();
    let document = designer.document();
    let mut fill = FillState::new();
    for field in document.fields() {
        if field.kind() == FieldKind::Text || field.kind() == FieldKind::Money {
            fill.set_text(&field.id, "3,000.00".to_string());
        }
    }
    c.bench_function("validate_all_kinds", |b| {
        b.iter(|| black_box(fill.validate(black_box(document))))
    });
}

fn bench_money_format(c: &mut Criterion) {
    c.bench_function("is_money_with_separators", |b| {
        b.iter(|| is_money(black_box("¥1,234,567.89"), black_box("¥")))
    });
}

criterion_group!(benches, bench_canvas_views, bench_fill_validation, bench_money_format);
criterion_main!(benches);
