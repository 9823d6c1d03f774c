use libcli::cli::{CliEngine, CommandArgs, CommandDefinition, Status};
use libcli::io::CliIo;
use embedded_hal::delay::DelayNs;
use libcli::io::stream::{AcceptError, DEFAULT_WRITE_RETRIES, StreamError, StreamIo};
use libcli::io::telnet::{IAC, OPT_ECHO, OPT_SUPPRESS_GO_AHEAD, Raw, Telnet, WILL};
use libcli::network::error::Error;
use libcli::network::*;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;

/// What the mock does when written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WriteMode {
    /// Accept everything.
    Accept,
    /// Accept at most this many bytes per call.
    Partial(usize),
    /// Report `WouldBlock` forever.
    Blocked,
    /// From the given write call on, report `WouldBlock` until the clock
    /// has advanced by `for_ns`, then accept everything.
    Stall { from_call: usize, for_ns: u64 },
    /// Fail hard.
    Broken,
}

#[derive(Debug)]
struct MockConnection {
    reads: VecDeque<Result<Vec<u8>, Error>>,
    written: Vec<u8>,
    write_calls: usize,
    write_mode: WriteMode,
    flush_result: Result<(), Error>,
    clock: Rc<Cell<u64>>,
    stall_started: Option<u64>,
}

impl MockConnection {
    fn new() -> Self {
        Self {
            reads: VecDeque::new(),
            written: Vec::new(),
            write_calls: 0,
            write_mode: WriteMode::Accept,
            flush_result: Ok(()),
            clock: Rc::new(Cell::new(0)),
            stall_started: None,
        }
    }

    fn with_reads(reads: &[&[u8]]) -> Self {
        let mut conn = Self::new();
        for data in reads {
            conn.reads.push_back(Ok(data.to_vec()));
        }
        conn
    }
}

impl Read for MockConnection {
    type Error = Error;

    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match self.reads.pop_front() {
            None => Err(Error::WouldBlock),
            Some(Err(e)) => Err(e),
            Some(Ok(mut data)) => {
                let len = data.len().min(buf.len());
                buf[..len].copy_from_slice(&data[..len]);
                if len < data.len() {
                    self.reads.push_front(Ok(data.split_off(len)));
                }
                Ok(len)
            }
        }
    }
}

impl Write for MockConnection {
    type Error = Error;

    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        self.write_calls += 1;
        match self.write_mode {
            WriteMode::Accept => {
                self.written.extend_from_slice(buf);
                Ok(buf.len())
            }
            WriteMode::Partial(max) => {
                let len = buf.len().min(max);
                self.written.extend_from_slice(&buf[..len]);
                Ok(len)
            }
            WriteMode::Stall { from_call, for_ns } => {
                if self.write_calls >= from_call {
                    let now = self.clock.get();
                    let started = *self.stall_started.get_or_insert(now);
                    if now - started < for_ns {
                        return Err(Error::WouldBlock);
                    }
                }
                self.written.extend_from_slice(buf);
                Ok(buf.len())
            }
            WriteMode::Blocked => Err(Error::WouldBlock),
            WriteMode::Broken => Err(Error::WriteError),
        }
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        self.flush_result
    }
}

impl Close for MockConnection {
    type Error = Error;

    fn close(self) -> Result<(), Self::Error> {
        Ok(())
    }
}

impl Connection for MockConnection {}

/// Hands out prepared connections, one per `bind`.
struct MockServer {
    pending: VecDeque<MockConnection>,
}

impl Bind for MockServer {
    type Connection = MockConnection;
    type Error = Error;

    fn bind(&mut self, _local: &str) -> Result<Self::Connection, Self::Error> {
        self.pending.pop_front().ok_or(Error::ConnectionRefused)
    }
}

/// Advances a simulated clock, in nanoseconds, instead of sleeping.
#[derive(Debug)]
struct MockDelay {
    clock: Rc<Cell<u64>>,
    waits: usize,
}

impl MockDelay {
    fn new(clock: &Rc<Cell<u64>>) -> Self {
        Self {
            clock: Rc::clone(clock),
            waits: 0,
        }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.waits += 1;
        self.clock.set(self.clock.get() + u64::from(ns));
    }
}

fn written<F, D>(io: &StreamIo<MockConnection, F, D>) -> &[u8] {
    &io.connection().unwrap().written
}

#[test]
fn test_new_adapter_is_disconnected() {
    let mut io: StreamIo<MockConnection> = StreamIo::default();
    assert!(!io.is_connected());
    assert!(!io.byte_available());
    io.print("dropped");
    assert!(io.connection().is_none());
}

#[test]
fn test_attach_sends_telnet_negotiation() {
    let mut io = StreamIo::new(Telnet::new());
    io.attach(MockConnection::new()).unwrap();
    assert!(io.is_connected());
    assert_eq!(
        written(&io),
        &[IAC, WILL, OPT_ECHO, IAC, WILL, OPT_SUPPRESS_GO_AHEAD]
    );
}

#[test]
fn test_raw_attach_sends_nothing() {
    let mut io = StreamIo::new(Raw);
    io.attach(MockConnection::new()).unwrap();
    assert!(written(&io).is_empty());
}

#[test]
fn test_handshake_failure_disconnects() {
    let mut conn = MockConnection::new();
    conn.write_mode = WriteMode::Broken;
    let mut io = StreamIo::new(Telnet::new());
    assert_eq!(
        io.attach(conn),
        Err(StreamError::Transport(Error::WriteError))
    );
    assert!(!io.is_connected());
}

#[test]
fn test_accept_through_binder() {
    let mut server = MockServer {
        pending: VecDeque::from([MockConnection::new()]),
    };
    let mut io: StreamIo<MockConnection, Telnet> = StreamIo::default();
    io.accept(&mut server, "0.0.0.0:23").unwrap();
    assert!(io.is_connected());

    io.detach();
    assert_eq!(
        io.accept(&mut server, "0.0.0.0:23"),
        Err(AcceptError::Bind(Error::ConnectionRefused))
    );
    assert!(!io.is_connected());
}

#[test]
fn test_inbound_control_bytes_are_filtered() {
    let conn = MockConnection::with_reads(&[&[IAC, 0xFD, 0x01, b'o', b'k', IAC, 0xFD, 0x03]]);
    let mut io = StreamIo::new(Telnet::new());
    io.attach(conn).unwrap();

    let mut buf = [0u8; 16];
    assert_eq!(io.get_bytes(&mut buf), 2);
    assert_eq!(&buf[..2], b"ok");
    assert_eq!(io.filter().stripped(), 6);
}

#[test]
fn test_would_block_is_not_a_disconnect() {
    let mut io = StreamIo::new(Raw);
    io.attach(MockConnection::new()).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(io.get_bytes(&mut buf), 0);
    assert!(io.is_connected());
}

#[test]
fn test_zero_read_means_peer_closed() {
    let conn = MockConnection::with_reads(&[&[]]);
    let mut io = StreamIo::new(Raw);
    io.attach(conn).unwrap();
    let mut buf = [0u8; 8];
    assert_eq!(io.get_bytes(&mut buf), 0);
    assert!(!io.is_connected());
}

#[test]
fn test_read_error_disconnects() {
    let mut conn = MockConnection::new();
    conn.reads.push_back(Err(Error::ConnectionClosed));
    let mut io = StreamIo::new(Raw);
    io.attach(conn).unwrap();
    assert!(!io.byte_available());
    assert!(!io.is_connected());
}

#[test]
fn test_byte_level_reads_use_lookahead() {
    let conn = MockConnection::with_reads(&[b"ab"]);
    let mut io = StreamIo::new(Raw);
    io.attach(conn).unwrap();

    assert!(io.byte_available());
    assert_eq!(io.get_byte(), Some(b'a'));

    // The rest of the lookahead is served before the transport is read again.
    let mut buf = [0u8; 8];
    assert_eq!(io.get_bytes(&mut buf), 1);
    assert_eq!(buf[0], b'b');
    assert_eq!(io.get_byte(), None);
    assert!(io.is_connected());
}

#[test]
fn test_partial_writes_are_completed() {
    let mut conn = MockConnection::new();
    conn.write_mode = WriteMode::Partial(3);
    let mut io = StreamIo::new(Raw);
    io.attach(conn).unwrap();

    io.print("hello world");
    assert!(io.is_connected());
    assert_eq!(written(&io), b"hello world");
    assert_eq!(io.connection().unwrap().write_calls, 4);
}

#[test]
fn test_stalled_writes_disconnect_after_retries() {
    let mut io = StreamIo::new(Raw);
    io.attach(MockConnection::new()).unwrap();
    io.connection_mut().unwrap().write_mode = WriteMode::Blocked;

    io.print("x");
    assert!(!io.is_connected());
    assert_eq!(
        io.connection().unwrap().write_calls,
        DEFAULT_WRITE_RETRIES + 1
    );

    // Further output is dropped without touching the transport.
    io.print("y");
    assert_eq!(
        io.connection().unwrap().write_calls,
        DEFAULT_WRITE_RETRIES + 1
    );
}

#[test]
fn test_stalled_writes_wait_between_attempts() {
    let clock = Rc::new(Cell::new(0));
    let mut io = StreamIo::with_delay(Raw, MockDelay::new(&clock));
    io.set_write_retries(3);
    io.set_retry_delay_us(250);
    io.attach(MockConnection::new()).unwrap();
    io.connection_mut().unwrap().write_mode = WriteMode::Blocked;

    io.print("x");
    assert!(!io.is_connected());
    assert_eq!(io.connection().unwrap().write_calls, 4);
    assert_eq!(clock.get(), 3 * 250_000);
}

#[test]
fn test_short_write_stall_is_ridden_out() {
    let clock = Rc::new(Cell::new(0));
    let mut conn = MockConnection::with_reads(&[b"help\r\n"]);
    conn.clock = Rc::clone(&clock);
    conn.write_mode = WriteMode::Stall {
        from_call: 10,
        for_ns: 2_000_000,
    };
    let mut io = StreamIo::with_delay(Telnet::new(), MockDelay::new(&clock));
    io.attach(conn).unwrap();

    let mut user = "admin";
    let mut cli = CliEngine::with_prompt(&mut io, &mut user, COMMANDS, "> ");
    let mut statuses = Vec::new();
    for _ in 0..4 {
        statuses.push(cli.process_input());
    }
    assert!(statuses.contains(&Status::Executed));
    assert!(!statuses.contains(&Status::Disconnected));
    drop(cli);

    assert!(io.is_connected());
    assert!(clock.get() >= 2_000_000);
    let output = String::from_utf8_lossy(&written(&io)[6..]).into_owned();
    assert!(output.starts_with("> help\r\n"));
    assert!(output.contains("whoami"));
    assert!(output.contains("Print the user name"));
    assert!(output.ends_with("> "));
}

#[test]
fn test_custom_write_retries() {
    let mut io = StreamIo::new(Raw);
    io.set_write_retries(0);
    io.attach(MockConnection::new()).unwrap();
    io.connection_mut().unwrap().write_mode = WriteMode::Partial(0);
    io.put_byte(b'z');
    assert!(!io.is_connected());
    assert_eq!(io.connection().unwrap().write_calls, 1);
}

#[test]
fn test_flush_error_disconnects() {
    let mut io = StreamIo::new(Raw);
    io.attach(MockConnection::new()).unwrap();

    io.connection_mut().unwrap().flush_result = Err(Error::WouldBlock);
    io.flush();
    assert!(io.is_connected());

    io.connection_mut().unwrap().flush_result = Err(Error::NotOpen);
    io.flush();
    assert!(!io.is_connected());
}

#[test]
fn test_close_detaches() {
    let mut io = StreamIo::new(Raw);
    io.attach(MockConnection::new()).unwrap();
    assert_eq!(io.close(), Ok(()));
    assert!(io.connection().is_none());
    assert!(!io.is_connected());
    assert_eq!(io.close(), Ok(()));
}

fn whoami(_args: &CommandArgs, user: &mut &'static str, io: &mut dyn CliIo) {
    io.print_line(user);
}

static COMMANDS: &[CommandDefinition<&'static str>] =
    &[CommandDefinition::new("whoami", whoami, "Print the user name")];

#[test]
fn test_telnet_session_end_to_end() {
    let conn = MockConnection::with_reads(&[
        &[IAC, 0xFD, 0x01, IAC, 0xFD, 0x03],
        b"who",
        b"ami\r\n",
    ]);
    let mut io = StreamIo::new(Telnet::new());
    io.attach(conn).unwrap();

    let mut user = "admin";
    let mut cli = CliEngine::with_prompt(&mut io, &mut user, COMMANDS, "> ");
    let mut statuses = Vec::new();
    for _ in 0..6 {
        statuses.push(cli.process_input());
    }
    assert!(statuses.contains(&Status::Executed));
    drop(cli);

    let output = String::from_utf8_lossy(&written(&io)[6..]).into_owned();
    assert_eq!(output, "> whoami\r\nadmin\r\n> ");
}

#[test]
fn test_telnet_enter_as_cr_nul() {
    let conn = MockConnection::with_reads(&[b"whoami\r\0", b"whoami\r", b"\0"]);
    let mut io = StreamIo::new(Telnet::new());
    io.attach(conn).unwrap();

    let mut user = "admin";
    let mut cli = CliEngine::with_prompt(&mut io, &mut user, COMMANDS, "> ");
    let mut statuses = Vec::new();
    for _ in 0..6 {
        statuses.push(cli.process_input());
    }
    assert_eq!(
        statuses.iter().filter(|s| **s == Status::Executed).count(),
        2
    );
    assert!(!statuses.contains(&Status::NotFound));
    drop(cli);

    let output = String::from_utf8_lossy(&written(&io)[6..]).into_owned();
    assert_eq!(output, "> whoami\r\nadmin\r\n> whoami\r\nadmin\r\n> ");
}

#[test]
fn test_session_reset_after_reconnect() {
    let mut io = StreamIo::new(Raw);
    io.attach(MockConnection::with_reads(&[b"who", b""])).unwrap();

    let mut user = "admin";
    let mut cli = CliEngine::with_prompt(&mut io, &mut user, COMMANDS, "> ");
    assert_eq!(cli.process_input(), Status::Pending);
    assert_eq!(cli.process_input(), Status::Disconnected);
    assert_eq!(cli.process_input(), Status::Disconnected);

    cli.io_mut()
        .attach(MockConnection::with_reads(&[b"whoami\n"]))
        .unwrap();
    cli.reset_session();
    assert_eq!(cli.process_input(), Status::Executed);
    drop(cli);

    assert_eq!(written(&io), b"> whoami\r\nadmin\r\n");
}
