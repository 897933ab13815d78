use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use nsk_requests::{
    ApiRequest, AvailabilitySearchRequest, CardDetails, PassengerTypeCount,
    PaymentProcessRequest, SeatAssignment, SeatAssignmentRequest, TripCriterion,
    VoucherSearchRequest,
};
use rand::{seq::SliceRandom, thread_rng, Rng};

const STATIONS: [&str; 6] = ["JFK", "LAX", "FLL", "ORD", "DEN", "lax"];

// Mix of valid and invalid searches so both the fast-fail and full paths run
fn random_searches(count: usize) -> Vec<AvailabilitySearchRequest> {
    let mut rng = thread_rng();
    (0..count)
        .map(|_| {
            let origin = STATIONS.choose(&mut rng).unwrap();
            let destination = STATIONS.choose(&mut rng).unwrap();
            let passengers = vec![
                PassengerTypeCount::adults(rng.gen_range(1..=6)),
                PassengerTypeCount::new("CHD", rng.gen_range(1..=4)),
            ];
            let departure =
                format!("2030-{:02}-{:02}", rng.gen_range(1..=12), rng.gen_range(1..=28));
            let mut request = AvailabilitySearchRequest::new(
                passengers,
                vec![TripCriterion::new(*origin, *destination, departure)],
            );
            if rng.gen_bool(0.5) {
                request = request.with_currency("USD");
            }
            request
        })
        .collect()
}

fn random_seat_batch(size: usize) -> SeatAssignmentRequest {
    let mut rng = thread_rng();
    let assignments = (0..size)
        .map(|i| {
            SeatAssignment::new(
                format!("passenger_{:04}", i),
                format!("segment_{:04}", rng.gen_range(0..3)),
                format!("{}{}", rng.gen_range(1..=40), ['A', 'B', 'C', 'D', 'E', 'F'][i % 6]),
            )
        })
        .collect();
    SeatAssignmentRequest::new(assignments)
}

pub fn validation_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_validation");

    let searches = random_searches(256);
    group.bench_function("availability_search", |b| {
        b.iter(|| {
            for request in &searches {
                let _ = black_box(request.validated_payload());
            }
        })
    });

    for size in [1usize, 10, 50].iter() {
        let request = random_seat_batch(*size);
        group.bench_with_input(BenchmarkId::new("seat_assignment", size), size, |b, _| {
            b.iter(|| black_box(request.validate()))
        });
    }

    let card = CardDetails {
        account_number: "4111 1111 1111 1111".to_string(),
        expiration_month: 12,
        expiration_year: 2099,
        cvv: "123".to_string(),
        holder_name: "Ada Lovelace".to_string(),
    };
    let payment = PaymentProcessRequest::credit_card(120.5, "USD", &card);
    group.bench_function("credit_card_payment", |b| {
        b.iter(|| black_box(payment.validated_payload()))
    });

    let voucher_search = VoucherSearchRequest::by_market("JFK", "LAX", "2030-06-01").page(50, 0);
    group.bench_function("voucher_search_query", |b| {
        b.iter(|| black_box(nsk_requests::client::query_pairs(&voucher_search.to_payload())))
    });

    group.finish();
}

criterion_group!(benches, validation_benchmark);
criterion_main!(benches);
