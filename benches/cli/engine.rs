use criterion::{BatchSize, Criterion, Throughput};
use libcli::cli::{CliEngine, CommandArgs, CommandDefinition, Status, tokenize};
use libcli::io::CliIo;
use libcli::io::telnet::{FramingFilter, Telnet};
use std::hint::black_box;

/// Replays a fixed input and discards output.
struct ReplayIo {
    input: &'static [u8],
    pos: usize,
    max_read: usize,
    written: usize,
}

impl ReplayIo {
    fn new(input: &'static [u8], max_read: usize) -> Self {
        Self {
            input,
            pos: 0,
            max_read,
            written: 0,
        }
    }
}

impl CliIo for ReplayIo {
    fn put_byte(&mut self, _byte: u8) {
        self.written += 1;
    }

    fn put_bytes(&mut self, data: &[u8]) {
        self.written += data.len();
    }

    fn get_byte(&mut self) -> Option<u8> {
        let byte = self.input.get(self.pos).copied()?;
        self.pos += 1;
        Some(byte)
    }

    fn byte_available(&mut self) -> bool {
        self.pos < self.input.len()
    }

    fn get_bytes(&mut self, buffer: &mut [u8]) -> usize {
        let len = buffer
            .len()
            .min(self.max_read)
            .min(self.input.len() - self.pos);
        buffer[..len].copy_from_slice(&self.input[self.pos..self.pos + len]);
        self.pos += len;
        len
    }
}

fn set(args: &CommandArgs, ctx: &mut u32, io: &mut dyn CliIo) {
    if let Some(value) = args.get(2).and_then(|v| v.parse::<u32>().ok()) {
        *ctx = value;
    }
    io.printf(format_args!("{} = {}\r\n", args.get(1).unwrap_or("?"), ctx));
}

fn noop(_args: &CommandArgs, _ctx: &mut u32, _io: &mut dyn CliIo) {}

static COMMANDS: &[CommandDefinition<u32>] = &[
    CommandDefinition::new("status", noop, "Show status"),
    CommandDefinition::new("reset", noop, "Reset the device"),
    CommandDefinition::new("set", set, "Set a value"),
];

const SCRIPT: &[u8] = b"set rate 9600\r\nstatus\r\nhelp\r\nbogus arg\r\nset x\x08y 1\r\n";

fn run_script(max_read: usize) -> usize {
    let mut ctx = 0u32;
    let mut io = ReplayIo::new(SCRIPT, max_read);
    let mut cli = CliEngine::new(&mut io, &mut ctx, COMMANDS);
    while cli.process_input() != Status::Idle {}
    drop(cli);
    io.written
}

pub fn bench_tokenize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tokenize");
    let line = "set  verylongargumentname  value extra1 extra2 extra3";
    group.throughput(Throughput::Bytes(line.len() as u64));
    group.bench_function("tokenize", |b| b.iter(|| tokenize(black_box(line))));
    group.finish();
}

pub fn bench_process_line(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_input");
    group.throughput(Throughput::Bytes(SCRIPT.len() as u64));
    group.bench_function("chunked", |b| b.iter(|| run_script(black_box(32))));
    group.finish();
}

pub fn bench_byte_at_a_time(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_input");
    group.throughput(Throughput::Bytes(SCRIPT.len() as u64));
    group.bench_function("byte_at_a_time", |b| b.iter(|| run_script(black_box(1))));
    group.finish();
}

pub fn bench_telnet_filter(c: &mut Criterion) {
    let mut group = c.benchmark_group("telnet_filter");
    let mut packet = [0u8; 32];
    for (i, byte) in packet.iter_mut().enumerate() {
        *byte = if i % 8 == 0 { 0xFF } else { b'a' + (i % 26) as u8 };
    }
    group.throughput(Throughput::Bytes(packet.len() as u64));
    group.bench_function("filter_inbound", |b| {
        b.iter_batched_ref(
            || (Telnet::new(), packet),
            |(filter, data)| filter.filter_inbound(black_box(data)),
            BatchSize::SmallInput,
        )
    });
    group.finish();
}
