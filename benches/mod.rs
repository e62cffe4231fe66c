use criterion::{criterion_group, criterion_main};

mod network;

criterion_group!(
    benches,
    network::http::bench_encode_request,
    network::http::bench_parse_response,
    network::http::bench_read_to_end,
    network::tcp::bench_loopback_round_trip
);
criterion_main!(benches);
