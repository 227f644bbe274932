use clap::{Parser, Subcommand};
use client::game::{self, ClientConfig};
use client::Session;
use log::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    mode: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run the relay that forwards frames between players
    Relay {
        /// IP address to bind to
        #[arg(short = 'H', long, default_value = "0.0.0.0")]
        host: String,
        /// Port to listen on
        #[arg(short, long, default_value = "8080")]
        port: u16,
    },
    /// Join a relay as a player
    Play {
        /// Player id, unique among everyone on the relay
        #[arg(short, long)]
        id: String,
        /// Relay address to connect to
        #[arg(short, long, default_value = "127.0.0.1:8080")]
        relay: String,
        /// Seed stationary target dummies into the local world
        #[arg(long)]
        dummies: bool,
    },
}

/// Parses the command line and runs either the relay or a player window.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let runtime = tokio::runtime::Runtime::new()?;

    match args.mode {
        Mode::Relay { host, port } => {
            let address = format!("{}:{}", host, port);
            runtime.block_on(server::relay::run(&address))
        }
        Mode::Play { id, relay, dummies } => {
            let mut config = ClientConfig::new(&id, &relay);
            config.dummies = dummies;

            info!("Connecting to relay at {}", config.relay_addr);
            let session = Session::connect(runtime.handle(), &config.relay_addr, config.world())?;

            macroquad::Window::from_config(game::window_conf(), game::run(session, config));
            Ok(())
        }
    }
}
