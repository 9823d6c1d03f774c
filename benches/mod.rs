use criterion::{criterion_group, criterion_main};

mod cli;

criterion_group!(
    benches,
    cli::engine::bench_tokenize,
    cli::engine::bench_process_line,
    cli::engine::bench_byte_at_a_time,
    cli::engine::bench_telnet_filter
);
criterion_main!(benches);
