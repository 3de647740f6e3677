use anyhow::Result;
use clap::Parser;
use userbot::{load_config, run_bot, Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run { token } => {
            let config = load_config(token)?;
            run_bot(config).await
        }
        Commands::Check { token } => {
            let config = load_config(token)?;
            config.validate()?;
            println!("config ok: owner {}, model {}", config.owner_user_id(), config.llm().model);
            Ok(())
        }
    }
}
