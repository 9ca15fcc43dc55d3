//! `inversa` — HTTP service computing symbolic inverses of single
//! variable functions, with plot points and a qualitative study.

mod http;
mod pipeline;
mod server;

use std::process::exit;
use std::sync::Arc;

use clap::Parser;

use inversa_analysis::{AnalysisClient, Analyze, UnconfiguredAnalyzer};
use inversa_config::AnalysisConfig;

use crate::server::Server;

#[derive(Parser, Debug)]
#[command(name = "inversa", version, about = "Inverse-function calculator service")]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to listen on
    #[arg(long, default_value_t = 8000)]
    port: u16,
}

fn main() {
    env_logger::init();
    let args = Args::parse();

    // A missing credential does not prevent startup: the server still
    // answers, and each analysis request reports the configuration
    // error instead of touching the network.
    let analyzer: Arc<dyn Analyze> = match AnalysisConfig::from_env() {
        Ok(config) => match AnalysisClient::new(&config) {
            Ok(client) => Arc::new(client),
            Err(e) => {
                eprintln!("inversa: failed to build analysis client: {}", e);
                exit(1);
            }
        },
        Err(e) => {
            log::warn!("analysis disabled: {}", e);
            Arc::new(UnconfiguredAnalyzer::new(e))
        }
    };

    let addr = format!("{}:{}", args.host, args.port);
    let server = match Server::bind(&addr, analyzer) {
        Ok(server) => server,
        Err(e) => {
            eprintln!("inversa: failed to bind {}: {}", addr, e);
            exit(1);
        }
    };

    match server.local_addr() {
        Ok(local) => log::info!("listening on http://{}", local),
        Err(_) => log::info!("listening on http://{}", addr),
    }

    if let Err(e) = server.run() {
        eprintln!("inversa: server error: {}", e);
        exit(1);
    }
}
