//! Reference help for every nwtest topic
//!
//! Each topic is rendered by a pure method of [`HelpSystem`] that reads its
//! numbers from the [`HelpConfig`] and the socket buffer probe at call time.
//! [`HelpSystem::display`] writes the version banner and the topic text to any
//! sink and returns the [`HelpExit`] status the process must end with.

use super::topic::Topic;
use crate::{
    logging::Logger,
    models::HelpConfig,
    platform::{SocketBufferProbe, SystemSocketBuffer},
    HELP_EXIT_CODE,
};
use std::io::Write;

/// Multipliers for the `k` and `m` size suffixes
const KILOBYTE: u64 = 1024;
const MEGABYTE: u64 = 1_048_576;

/// Exit signal produced by every help display
#[must_use = "help display ends the process; call `exit()` or return the code"]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HelpExit {
    code: i32,
}

impl HelpExit {
    /// Status for a completed (or attempted) help display
    pub const fn displayed() -> Self {
        Self { code: HELP_EXIT_CODE }
    }

    pub fn code(self) -> i32 {
        self.code
    }

    /// Terminate the process with the help status
    pub fn exit(self) -> ! {
        std::process::exit(self.code)
    }
}

/// Help renderer and dispatcher
pub struct HelpSystem {
    config: HelpConfig,
    probe: Box<dyn SocketBufferProbe>,
    logger: Logger,
}

impl HelpSystem {
    /// Create a help system that queries the running OS for socket limits
    pub fn new(config: HelpConfig) -> Self {
        Self {
            config,
            probe: Box::new(SystemSocketBuffer),
            logger: Logger::new("help"),
        }
    }

    /// Replace the socket buffer probe
    pub fn with_probe<P: SocketBufferProbe + 'static>(mut self, probe: P) -> Self {
        self.probe = Box::new(probe);
        self
    }

    /// Replace the diagnostics logger
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    /// Write the banner and topic text, then report the help exit status
    ///
    /// `None` stands for a topic that could not be resolved and silently renders
    /// the usage text. Write failures are logged and otherwise ignored.
    pub fn display<W: Write>(&self, topic: Option<Topic>, out: &mut W) -> HelpExit {
        self.logger.debug("Displaying help")
            .field("topic", topic.unwrap_or(Topic::Usage).name())
            .log();

        let result = out.write_all(self.banner().as_bytes())
            .and_then(|_| out.write_all(self.render(topic).as_bytes()))
            .and_then(|_| out.flush());

        if let Err(e) = result {
            self.logger.warn("Help output could not be written")
                .field("error", e.to_string())
                .log();
        }

        HelpExit::displayed()
    }

    /// Resolve a raw topic token and display it; unresolved tokens show usage
    pub fn display_token<W: Write>(&self, token: Option<&str>, out: &mut W) -> HelpExit {
        self.display(token.and_then(Topic::from_token), out)
    }

    /// Display on stdout and terminate the process
    pub fn show_and_exit(&self, topic: Option<Topic>) -> ! {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        self.display(topic, &mut handle).exit()
    }

    /// One-line version banner preceding every topic
    pub fn banner(&self) -> String {
        format!("\nVersion {}\n", self.config.version)
    }

    /// Text of a topic without the banner
    pub fn render(&self, topic: Option<Topic>) -> String {
        match topic {
            Some(Topic::Help) => self.help(),
            Some(Topic::General) => self.general(),
            Some(Topic::Server) => self.server(),
            Some(Topic::Client) => self.client(),
            Some(Topic::Metrics) => self.metrics(),
            Some(Topic::Full) => self.full(),
            Some(Topic::Usage) | None => self.usage(),
        }
    }

    /// Command syntax for every subcommand
    pub fn usage(&self) -> String {
        let mut usage = String::from("\nUsage:\n\n");

        usage.push_str("    nwtest h[elp] { h[elp] | u[sage] | g[eneral] | c[lient] |\n");
        usage.push_str("                    s[erver] | m[etrics] | f[ull] }\n\n");

        usage.push_str("    nwtest s[erver] <port> [ -4 | -6 ] [ -h[ost] <h> ] [ -m[sgsz] <m> ]\n");
        usage.push_str("                    [ -c[onn] <c> ] [ -l[og] <logpath> ]\n\n");

        usage.push_str("    nwtest c[lient] <host> <port> [ -s[rc] <srcaddr>] [ -4 | -6 ] [ -a[sync] ]\n");
        usage.push_str(&self.client_options(20));

        usage
    }

    /// The help subcommand itself
    pub fn help(&self) -> String {
        concat!(
            "\n",
            "nwtest h[elp] { u[sage] | g[eneral] | c[lient] | s[erver] | m[etrics] | f[ull] }\n\n",
            "Display help on the specified topic.\n\n",
        )
        .to_string()
    }

    /// What the tool measures and how the two modes work
    pub fn general(&self) -> String {
        GENERAL_TEXT.to_string()
    }

    pub fn server(&self) -> String {
        let sizes = self.config.limits.message_size.server();
        let conns = self.config.limits.server_connections;

        let mut help = String::from("\n");
        help.push_str("nwtest s[erver] <port> [ -4 | -6 ] [ -h[ost] <h> ] [ -m[sgsz] <m> ]\n");
        help.push_str("                       [ -c[onn] <c> ] [ -l[og] <logpath> ]\n\n");

        help.push_str(concat!(
            "Run as a server on local port <port>. If a specific host is specified (<h>)\n",
            "then bind to the address(es) for that host, otherwise bind to INADDR[6]_ANY.\n",
            "The host can be specified as a hostname or an IP address (IPv4 or IPv6);\n",
            "the address specified must be an address for an interface on the local system.\n",
            "If a hostname is specified then you can use the '-4' or '-6' options to limit\n",
            "communication to only IPv4 or IPv6.\n\n",
        ));

        help.push_str(&format!(
            "The maximum message size, in bytes, that the server will accept is specified\n\
             by <m> where {} <= <m> <= {}. Connections requesting a message size\n\
             larger than this will be rejected. The default is {}. This size\n\
             represents the size of the user data; it excludes network protocol overheads\n\
             (ethernet, IPv4/6 etc.). The size may be specified using a suffix of 'k' to\n\
             represent KB ({} bytes) or 'm' to represent MB ({} bytes).\n\n",
            grouped(sizes.min), grouped(sizes.max), grouped(sizes.default),
            KILOBYTE, MEGABYTE,
        ));

        help.push_str(&format!(
            "The maximum number of concurrent connections that the server will allow is set\n\
             using <c> where {} <= <c> <= {}. Connections that exceed this number will\n\
             be rejected. The default is {}.\n\n",
            conns.min, conns.max, conns.default,
        ));

        help.push_str(LOG_OPTION_TEXT);
        help
    }

    pub fn client(&self) -> String {
        let limits = &self.config.limits;
        let features = self.config.features;
        let sizes = limits.message_size.client();
        let conns = limits.client_connections;

        let mut help = String::from("\n");
        help.push_str("nwtest c[lient] <host> <port> [ -s[rc] <srcaddr>] [ -4 | -6 ] [ -a[sync] ]\n");
        help.push_str(&self.client_options(16));

        help.push_str(CLIENT_ADDRESSING_TEXT);

        help.push_str(&format!(
            "The measurement part of the test will run for <d> seconds with a ramp-up/down\n\
             of <r> seconds. {} <= <d> <= {} with a default of {} and {} <= <r> <= {}\n\
             with a default of {}.\n\n",
            limits.duration.min, limits.duration.max, limits.duration.default,
            limits.ramp.min, limits.ramp.max, limits.ramp.default,
        ));

        help.push_str(&format!(
            "The message size used for the test is specified by <m> where {} <= <m> <=\n\
             {} with a default of {}. This size represents the size of the user\n\
             data; it excludes network protocol overheads (ethernet, IPv4/6 etc.). The\n\
             size may be specified using a suffix of 'k' to represent KB ({} bytes) or\n\
             'm' to represent MB ({} bytes).\n\n",
            grouped(sizes.min), grouped(sizes.max), grouped(sizes.default),
            KILOBYTE, MEGABYTE,
        ));

        help.push_str(&format!(
            "The number of concurrent connections used is specified by <c> where {} <=\n\
             <c> <= {} with a default of {}.\n\n",
            conns.min, conns.max, conns.default,
        ));

        help.push_str(LOG_OPTION_TEXT);

        if features.buffer_size {
            help.push_str(&format!(
                "Normally the OS will allocate the sizes for the socket send and receive\n\
                 buffers, and these sizes will be reported in the connection messages. If\n\
                 you want to specify different values for the socket send and receive buffer\n\
                 sizes then you can do so using '-bsz' (sets size for both send and receive\n\
                 buffers), '-sbsz' (sets size for the send buffer) and '-rbsz' (sets size\n\
                 for receive buffer). These values are specified in bytes and each must be\n\
                 between {} and {}. Also, the total of the sizes must be <= {}.\n\
                 Explicitly specified values will be sent to, and used by, the server. The\n\
                 size may be specified using a suffix of 'k' to represent KB ({} bytes) or\n\
                 'm' to represent MB ({} bytes).\n\n",
                grouped(limits.buffer_size.min),
                grouped(limits.buffer_size.max),
                grouped(self.probe.max_socket_buffer()),
                KILOBYTE, MEGABYTE,
            ));
        }

        if features.no_delay {
            help.push_str(concat!(
                "If '-nodelay' is specified then the TCP_NODELAY option is enabled on all\n",
                "sockets used for data transfer in both the client and the server.\n\n",
            ));
        }

        help.push_str(concat!(
            "Normally only aggregate performance metrics are displayed, but if '-verbose'\n",
            "is specified then per connection metrics are also displayed. If '-brief'\n",
            "is specified then just key metrics are displayed on a single line.\n\n",
        ));

        help
    }

    /// Every metric the measurement engine reports, plus protocol overheads
    pub fn metrics(&self) -> String {
        METRICS_TEXT.to_string()
    }

    /// General, Usage, Help, Server, Client and Metrics back to back
    pub fn full(&self) -> String {
        let mut full = self.general();
        full.push_str(&self.usage());
        full.push_str(&self.help());
        full.push_str(&self.server());
        full.push_str(&self.client());
        full.push_str(&self.metrics());
        full
    }

    /// Client option lines after the first, continuation-indented by `indent`
    fn client_options(&self, indent: usize) -> String {
        let pad = " ".repeat(indent);
        let mut options = format!("{pad}[ -c[onn] <c> ] [ -d[ur] <d> ] [ -r[amp] <r> ]\n");
        options.push_str(&format!("{pad}[ -m[sgsz] <m> ] [ -l[og] <logpath> ]\n"));

        if self.config.features.buffer_size {
            options.push_str(&format!("{pad}[ -bsz <bsz> | [ -sbsz <sbsz> ] [ -rbsz <rbsz> ] ]\n"));
        }

        if self.config.features.no_delay {
            options.push_str(&format!("{pad}[ -n[odelay] ] [ -b[rief] | -v[erbose] ]\n\n"));
        } else {
            options.push_str(&format!("{pad}[ -b[rief] | -v[erbose] ]\n\n"));
        }

        options
    }
}

/// Format with `,` between groups of three digits
fn grouped(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);

    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }

    out
}

const LOG_OPTION_TEXT: &str = concat!(
    "Normally all output goes to stdout/stderr, but if '-log' is specified\n",
    "then after initial argument parsing any subsequent messages will be\n",
    "written only to <logpath> with microsecond resolution timestamps. A\n",
    "<logpath> of '-' equates to 'stdout' and '--' equates to 'stderr'.\n\n",
);

const CLIENT_ADDRESSING_TEXT: &str = r#"Run as a client connecting to a server at host <host> and port <port>. The
host can be specified as either a host name or an IP address (IPv4 or IPv6).
If a hostname is specified then you can use the '-4' or '-6' options to limit
communication to only IPv4 or IPv6.

Normally the OS will determine the local source IP address (interface) to use
for the outgoing connection, but this can be overridden by specifying an
explicit local address using the '-src' option. This value must be an IP
address, not a hostname, and it must correspond to the address of an
interface on the local system. If <host> has been specified using an IP
address then the address type (IPv4 or IPv6) for <srcaddr> must be the same
as that of <host>. Furthermore, if the allowed connection type has been
restricted by way of '-4' or '-6' then the value of <srcaddr> must be of
the selected type.

If '-sync' is specified then the test is performed in request/response mode,
whereas if '-async' is specified the test is performed in streaming mode. The
default is '-sync'.

"#;

const GENERAL_TEXT: &str = r#"
This program implements a network response time and throughput test.

The client opens one or more connections to a server and exchanges messages
of a given size with the server for a given period of time. At the end of the
test various performance metrics are displayed.

The size of the messages exchanged, the duration of the test measurement phase,
the amount of load ramp-up and ramp-down time and the number of connections
(and hence threads) are all configurable.

The test can run in two modes. In synchronous (request/response) mode, each
connection has a single thread in both the client and the server. Once the
connection is established the client sends a message to the server and waits
for a response. As soon as the server receives a message it sends it straight
back to the client. This sequence is repeated until the test ends.

In asynchronous (streaming) mode, each connection has two threads in both the
client and the server. Once the connection is established the client sends a
continuous stream of messages to the server and the server simultaneously
sends a continuous stream of messages to the client.

"#;

const METRICS_TEXT: &str = r#"
For each connection successfully established, the client and server will
report the TCP MSS (maxseg) value and the size of the socket send and
receive buffers (sndbsz and rcvbsz).

The metrics measured and reported by this program for each test mode are
as follows.

All modes
---------

Elapsed time      - The wall clock elapsed time for the test including
                    ramp up/down time.

User CPU time     - The amount of user CPU time consumed during the
                    elapsed time.

System CPU time   - The amount of system CPU time consumed during the
                    elapsed time.

Total CPU time    - User time plus system time.

Process CPU usage - The average CPU usage for the nwtest process during
                    the test interval, expressed as a percentage of one
                    CPU core.

System CPU usage  - The average CPU usage for the nwtest process during
                    the test interval, expressed as a percentage of total
                    available system CPU resources.

Sync (request/response) mode
----------------------------

Total messages    - The total number of data messages sent during the
                    measurement period. The number of received messages
                    is the same.

Total data        - The total number of bytes sent during the measurement
                    period. The number of received bytes is the same.

Avg measure time  - The average measurement time across all threads (µs).

Start variance    - The maximum difference between the start times of all
                    the threads (µs). Only displayed if connections > 1.

Run variance      - The maximum difference between the measurement times of
                    all the threads (µs). Only displayed if connections > 1.

Throughput        - The send throughput (application data) aggregated across
                    all connections during the measurement period (bytes/
                    second).

Minimum R/T       - The lowest round trip time across all connections during
                    the measurement period (µs).

Average R/T       - The average round trip time across all threads during the
                    measurement period (µs).

Maximum R/T       - The highest round trip time across all threads during the
                    measurement period (µs).

In brief mode the output consists of a single line as follows:

info: results S,<nconn>,<throughput>,<minrt>,<avgrt>,<maxrt>,<proccpu>,<syscpu>

Async (streaming) mode
----------------------

Total msg sent    - The total number of messages sent during the measurement
                    period.

Total msg rcvd    - The total number of messages received during the measurement
                    period.

Total data sent   - The total number of bytes sent during the measurement
                    period.

Total data rcvd   - The total number of bytes received during the measurement
                    period.

Avg measure time  - The average measurement time across all threads (µs).

Start variance    - The maximum difference between the start times of all
                    the threads (µs).

Run variance      - The maximum difference between the measurement times of
                    all the threads (µs).

Send throughput   - The send throughput (application data) aggregated across
                    all connections during the measurement period (bytes/
                    second).

Recv throughput   - The receive throughput (application data) aggregated across
                    all connections during the measurement period (bytes/
                    second).

In brief mode the output consists of a single line as follows:

info: results A,<nconn>,<sendthroughput>,<recvthroughput>,<proccpu>,<syscpu>

Network overheads
-----------------

The message size that you specify defines the size of the 'application data'
in each message sent or received. The actual amount of data for each message
will be larger than this due to various network protocol related overheads.

For IPv4, there is at least 28 bytes of overhead per message and in unusual
cases this may be as much as 36 bytes. In addition the TCPv4 header is another
24 bytes. In most cases for this program the IPv4 packet size will therefore
be <message size> + 52 bytes.

For IPv6/TCP, there is at least 72 bytes of overhead per message and in unusual
cases this may be more due to additional header fields (each is 8 bytes). In
most cases for this program the IPv6 packet size will be <message size> + 72
bytes.

For Ethernet the Maximum Transmission Unit (MTU) is 1500 bytes. Each IP packet
will be sent as a sequence of one or more Ethernet frames. Each frame has some
overhead; normally this is 38 bytes but if 802.1q VLANs are used it will be 42
bytes.

For WiFi the Maximum Transmission Unit (MTU) is 1500 bytes. Each IP packet
will be sent as a sequence of one or more WiFi frames. Each frame has some
overhead; normally this is 36 bytes but it may be as much as 44 bytes.

To give this some context, with a message size of 1024 bytes the IPv4
packet size will be 1076 bytes and the IPv6 packet size will be 1096 bytes.
Both will therefore fit into a single Ethernet/WiFi frame. The associated
Ethernet frame will be 1114 bytes for IPv4 and 1134 bytes for IPv6. With a
1 Gb Ethernet network the maximum theoretical throughput will therefore be
112,208 frames/s for IPv4 and 110,229 frames/s for IPv6. This translates to
a theoretical maximum application data rate of 109.5 Mbyte/s for IPv4 and
107.6 Mbyte/s for IPv6.

"#;
