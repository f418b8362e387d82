use clap::Parser;
use lp_rewards::cli::CliCmd;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    if let Err(err) = lp_rewards::run(CliCmd::parse()).await {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
