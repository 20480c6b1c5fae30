use anyhow::Result;
use homeschool_hub_client::{logger, App, Command, Config};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::load()?;
    logger::init_with(config.verbose_logging);

    let command = Command::parse(std::env::args().skip(1))?;

    App::initialize(config).await?.run(command).await
}
