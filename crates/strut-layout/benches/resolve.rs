//! Layout benchmarks.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use strut_constraint::Constraint;
use strut_core::{Attribute, Bounds, BoxId, Relation};
use strut_layout::{LayoutNode, LayoutOptions, LayoutTree};

/// A form: a column of rows, each row a container with a label and a field.
fn form(rows: usize) -> (LayoutTree, BoxId) {
    let mut tree = LayoutTree::new();
    let root = tree.next_id();
    tree.add_root(LayoutNode::container(root).with_bounds(Bounds::new(0, 0, 1024, 768)));

    let mut previous: Option<BoxId> = None;
    for _ in 0..rows {
        let row = tree.next_id();
        tree.add_child(root, LayoutNode::container(row).fitting_content())
            .unwrap();
        let label = tree.next_id();
        tree.add_child(row, LayoutNode::new(label).with_preferred_size(120, 20))
            .unwrap();
        let field = tree.next_id();
        tree.add_child(row, LayoutNode::new(field).with_preferred_size(200, 24))
            .unwrap();

        let top = match previous {
            Some(above) => Constraint::equal(row, Attribute::Top, above, Attribute::Bottom, 8),
            None => Constraint::equal(row, Attribute::Top, root, Attribute::Top, 8),
        };
        tree.add_constraints(
            root,
            [
                top,
                Constraint::equal(row, Attribute::Leading, root, Attribute::Leading, 16),
            ],
        )
        .unwrap();
        tree.add_constraints(
            row,
            [
                Constraint::equal(label, Attribute::Leading, row, Attribute::Leading, 0),
                Constraint::equal(label, Attribute::Top, row, Attribute::Top, 2),
                Constraint::equal(field, Attribute::Leading, label, Attribute::Trailing, 8),
                Constraint::equal(field, Attribute::Top, row, Attribute::Top, 0),
                Constraint::size(field, Attribute::Width, Relation::GreaterThanOrEqual, 160),
            ],
        )
        .unwrap();
        previous = Some(row);
    }

    (tree, root)
}

fn layout_small(c: &mut Criterion) {
    let (mut tree, root) = form(8);
    c.bench_function("layout_form_8", |b| {
        b.iter(|| tree.layout(black_box(root), &LayoutOptions::default()))
    });
}

fn layout_large(c: &mut Criterion) {
    let (mut tree, root) = form(256);
    c.bench_function("layout_form_256", |b| {
        b.iter(|| tree.layout(black_box(root), &LayoutOptions::default()))
    });
}

criterion_group!(benches, layout_small, layout_large);
criterion_main!(benches);
