use criterion::{Criterion, black_box, criterion_group, criterion_main};
use lostfound_explorer::{
    InteractionController, MapProjector, Record, RecordStore, SelectionEvent, filter,
};
use std::sync::Arc;

fn synthetic_store(records: usize, stations: usize) -> RecordStore {
    let item_types = ["Bagagerie", "Téléphone", "Clés", "Portefeuille", "Vêtements"];
    let records = (0..records)
        .map(|i| {
            let station = i % stations;
            Record::new(
                format!("Gare {:03}", station),
                item_types[i % item_types.len()],
            )
            .with_coordinates(
                42.0 + (station as f64 * 0.07) % 9.0,
                -4.5 + (station as f64 * 0.11) % 12.0,
            )
        })
        .collect();
    RecordStore::new(records)
}

fn bench_filter(c: &mut Criterion) {
    let store = synthetic_store(100_000, 300);

    c.bench_function("filter_unfiltered", |b| {
        b.iter(|| filter(black_box(store.records()), None))
    });

    c.bench_function("filter_single_station", |b| {
        b.iter(|| filter(black_box(store.records()), Some(black_box("Gare 042"))))
    });
}

fn bench_controller(c: &mut Criterion) {
    let store = Arc::new(synthetic_store(100_000, 300));
    let mut controller = InteractionController::new(store, MapProjector::default());

    c.bench_function("controller_select_and_clear", |b| {
        b.iter(|| {
            controller.handle(SelectionEvent::Select("Gare 007".to_string()));
            controller.handle(SelectionEvent::Clear)
        })
    });
}

criterion_group!(benches, bench_filter, bench_controller);
criterion_main!(benches);
