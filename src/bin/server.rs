use clap::Parser;
use ferrodis::server::{self, Config};
use ferrodis::Error;

const PORT: u16 = 6379;

#[derive(Parser, Debug)]
struct Args {
    /// The port to listen on
    #[arg(short, long, default_value_t = PORT)]
    port: u16,

    /// The address to bind
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Keyspace shard count, rounded up to a power of two
    #[arg(long, default_value_t = 16)]
    shards: usize,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    let args = Args::parse();

    server::run(Config {
        bind: args.bind,
        port: args.port,
        shards: args.shards,
    })
    .await
}
