use criterion::{Criterion, criterion_group, criterion_main};
use counter_store::InMemoryCounterStore;
use reservation::{ReservationGate, ReservationProcessor, SeatCounter};

fn bench_reserve_single_seat(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("reservation/reserve_single_seat", |b| {
        b.iter(|| {
            rt.block_on(async {
                let seats = SeatCounter::new(InMemoryCounterStore::new());
                seats.write_seats(1).await.unwrap();
                let processor = ReservationProcessor::new(seats, ReservationGate::new());
                processor.reserve().await.unwrap();
            });
        });
    });
}

fn bench_drain_fifty_seats(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("reservation/drain_50_seats", |b| {
        b.iter(|| {
            rt.block_on(async {
                let seats = SeatCounter::new(InMemoryCounterStore::new());
                seats.write_seats(50).await.unwrap();
                let processor = ReservationProcessor::new(seats, ReservationGate::new());
                for _ in 0..50 {
                    processor.reserve().await.unwrap();
                }
                assert!(processor.reserve().await.is_err());
            });
        });
    });
}

criterion_group!(benches, bench_reserve_single_seat, bench_drain_fifty_seats);
criterion_main!(benches);
