use clap::Parser;
use deploy_scripts::{cli::Cli, errors::ScriptError, network::EnvSecrets};
use dotenv::dotenv;

#[tokio::main]
async fn main() -> Result<(), ScriptError> {
    // Load .env file
    dotenv().ok();

    let Cli {
        network,
        rpc_url,
        command,
    } = Cli::parse();

    tracing_subscriber::fmt().pretty().init();

    let secrets = EnvSecrets::from_env();

    command.run(&network, rpc_url, &secrets).await
}
