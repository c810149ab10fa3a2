#[macro_use]
extern crate log;

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use clap::Parser;
use reqline::{ParserConfig, ReaderConfig};
use tracing::Level;

use reqlisten::server::tcp::TcpAcceptor;
use reqlisten::{serve, Error, ListenConfig, Mode};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "0.0.0.0:4200")]
    addr: String,

    /// What to print for each connection
    #[arg(short, long, value_enum, default_value_t = Mode::RequestLine)]
    mode: Mode,

    /// Max bytes per read from a connection
    #[arg(long, default_value_t = 1024)]
    chunk_size: usize,

    /// Reject request-lines longer than this
    #[arg(long)]
    max_line_len: Option<usize>,

    /// Drop connections that send nothing for this many seconds
    #[arg(long)]
    read_timeout: Option<u64>,

    /// Reject methods that are not all uppercase
    #[arg(long)]
    require_upper_method: bool,

    /// More logging, repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Args {
    fn listen_config(&self) -> ListenConfig {
        let mut parser = ParserConfig::default().require_upper_method(self.require_upper_method);
        parser.max_line_len = self.max_line_len;

        ListenConfig {
            mode: self.mode,
            reader: ReaderConfig::default()
                .chunk_size(self.chunk_size)
                .parser(parser),
            read_timeout: self.read_timeout.map(Duration::from_secs),
        }
    }
}

fn main() -> Result<(), Error> {
    let args = Args::parse();

    let level = match args.verbose {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };

    // Logs go to stderr, stdout is for the printed lines.
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    let config = args.listen_config();
    debug!("Config: {:?}", config);

    let acceptor = TcpAcceptor::bind(&args.addr, config.read_timeout)?;
    info!("Listening on {}", acceptor.local_addr()?);

    let out = Arc::new(Mutex::new(io::stdout()));

    serve(acceptor, &config, out)
}
