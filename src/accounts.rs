use anyhow::Result;
use clap::ArgMatches;

use crate::display::print_accounts;
use crate::settings::Settings;
use crate::upstream::{bbva::Source, AccountSource};

#[tracing::instrument(skip(settings))]
async fn print(settings: Settings) -> Result<()> {
    let upstream = Source::connect(&settings).await?;
    let accounts = upstream.accounts().await?;

    print_accounts(std::io::stdout(), &accounts)
}

pub(crate) async fn run(_matches: &ArgMatches, settings: Settings) -> Result<()> {
    print(settings).await
}
