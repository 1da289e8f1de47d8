use criterion::{criterion_group, criterion_main, Criterion};
use overlaykit_core::{ElementData, ElementId, OverlayElement, Placement, Position};
use overlaykit_state::{
    apply_action, ensure_state_consistency, replay_actions, undo, Action, Document,
};

fn element(n: usize) -> OverlayElement {
    OverlayElement::new(
        ElementId::new(format!("el-{n}")),
        Position::new(n as f64, 0.0),
        ElementData::Text {
            content: format!("element {n}"),
            font_size: 12.0,
            color: "#ffffff".to_string(),
        },
    )
}

fn populated(count: usize) -> Document {
    let mut doc = Document::new();
    for n in 0..count {
        doc = apply_action(&doc, Action::add_element(element(n)));
    }
    doc
}

fn bench_dispatch(c: &mut Criterion) {
    let doc = populated(100);
    c.bench_function("dispatch_transform_100_elements", |b| {
        let action = Action::transform(
            &doc,
            &ElementId::new("el-50"),
            Placement::new(Position::new(500.0, 500.0), 45.0),
        )
        .unwrap();
        b.iter(|| apply_action(&doc, action.clone()))
    });
}

fn bench_undo(c: &mut Criterion) {
    let doc = populated(100);
    c.bench_function("undo_100_elements", |b| b.iter(|| undo(&doc)));
}

fn bench_replay(c: &mut Criterion) {
    let initial = Document::new();
    let mut live = initial.clone();
    let mut actions = Vec::new();
    for n in 0..100 {
        let action = Action::add_element(element(n));
        live = action.execute(&live);
        actions.push(action);
    }
    c.bench_function("replay_100_actions", |b| {
        b.iter(|| replay_actions(&initial, &actions))
    });
}

fn bench_repair(c: &mut Criterion) {
    let mut doc = populated(100);
    doc.z_order.push(ElementId::new("orphan"));
    c.bench_function("repair_100_elements", |b| {
        b.iter(|| ensure_state_consistency(&doc))
    });
}

criterion_group!(benches, bench_dispatch, bench_undo, bench_replay, bench_repair);
criterion_main!(benches);
