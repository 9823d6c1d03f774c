//! Telnet console on a development host.
//!
//! Serves one telnet client at a time on `0.0.0.0:2323` (or the address
//! given as the first argument) and runs the same polling loop a firmware
//! main loop would. Connect with `telnet localhost 2323`.

use std::net::TcpStream;
use std::thread;
use std::time::{Duration, Instant};

use libcli::cli::{CliEngine, CommandArgs, CommandDefinition, Status};
use libcli::io::CliIo;
use libcli::io::stream::{StdDelay, StreamIo};
use libcli::io::telnet::Telnet;
use libcli::network::tcp::TcpServer;

const DEFAULT_ADDRESS: &str = "0.0.0.0:2323";
const POLL_INTERVAL: Duration = Duration::from_millis(10);

struct Board {
    led: bool,
    started: Instant,
}

fn led(args: &CommandArgs, board: &mut Board, io: &mut dyn CliIo) {
    match args.get(1) {
        Some("on") => board.led = true,
        Some("off") => board.led = false,
        Some(_) => {
            io.print_line("Usage: led <on|off>");
            return;
        }
        None => {}
    }
    io.printf(format_args!("LED is {}\r\n", if board.led { "ON" } else { "OFF" }));
}

fn echo(args: &CommandArgs, _board: &mut Board, io: &mut dyn CliIo) {
    for (i, param) in args.params().enumerate() {
        if i > 0 {
            io.print(" ");
        }
        io.print(param);
    }
    io.println();
}

fn uptime(_args: &CommandArgs, board: &mut Board, io: &mut dyn CliIo) {
    let elapsed = board.started.elapsed();
    io.printf(format_args!(
        "up {}.{:03} s\r\n",
        elapsed.as_secs(),
        elapsed.subsec_millis()
    ));
}

fn clear(_args: &CommandArgs, _board: &mut Board, io: &mut dyn CliIo) {
    io.clear_screen();
}

static COMMANDS: &[CommandDefinition<Board>] = &[
    CommandDefinition::new("led", led, "Show or switch the LED (on/off)"),
    CommandDefinition::new("echo", echo, "Print the arguments"),
    CommandDefinition::new("uptime", uptime, "Time since start"),
    CommandDefinition::new("clear", clear, "Clear the screen"),
];

fn main() {
    let address = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ADDRESS.to_string());

    let mut server = TcpServer::new();
    let mut board = Board {
        led: false,
        started: Instant::now(),
    };
    let io: StreamIo<TcpStream, Telnet, StdDelay> =
        StreamIo::with_delay(Telnet::new(), StdDelay);
    let mut cli = CliEngine::new(io, &mut board, COMMANDS);

    println!("host-telnet: serving on {address}");
    loop {
        if !cli.io().is_connected() {
            let _ = cli.io_mut().close();
            if let Err(e) = cli.io_mut().accept(&mut server, &address) {
                eprintln!("host-telnet: accept failed: {e:?}");
                thread::sleep(Duration::from_secs(1));
                continue;
            }
            println!("host-telnet: client #{} connected", server.accepted());
            cli.reset_session();
            cli.io_mut()
                .print_line("Connected. Type 'help' for available commands.");
        }

        match cli.process_input() {
            Status::Idle => thread::sleep(POLL_INTERVAL),
            Status::Disconnected => println!("host-telnet: client disconnected"),
            Status::Pending | Status::Executed | Status::NotFound => {}
        }
    }
}
