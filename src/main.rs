mod accounts;
mod display;
mod settings;
mod txn;
mod upstream;

use anyhow::Result;
use clap::{arg, Command};
use tracing_subscriber::{
    filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

use crate::settings::Settings;

static CLIENT_NAME: &str = "netcash";

async fn run() -> Result<()> {
    let app = Command::new(CLIENT_NAME)
        .about("The netcash utility logs in to BBVA net cash and prints the \
         accounts and transactions of the configured user.")
        .version("0.1.0")
        .subcommand_required(true)
        .allow_external_subcommands(false)
        .arg(arg!(CONFIG: -c --config [FILE] "Sets a custom config file"))
        .arg(arg!(verbose: -v --verbose "Enables logging to stderr"))
        .subcommand(Command::new("accounts").about("Prints every account of the configured user."))
        .subcommand(Command::new("transactions")
            .about("Prints the transactions of every account, or of the selected one.")
            .arg(arg!(begin: --begin [DATE] "The first day of transactions to pull (YYYY-MM-DD), defaults to 30 days before today. Start date is inclusive."))
            .arg(arg!(until: --until [DATE] "The last day of transactions to pull (YYYY-MM-DD), defaults to today. End date is inclusive."))
            .arg(arg!(account: -a --account [ACCOUNT] "Only pull transactions for the account with this IBAN or reference.")));

    let matches = app.get_matches();

    if matches.is_present("verbose") {
        tracing_subscriber::registry()
            .with(
                EnvFilter::builder()
                    .with_default_directive(LevelFilter::INFO.into())
                    .from_env_lossy(),
            )
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let settings = Settings::new(matches.value_of("CONFIG"))?;
    match matches.subcommand() {
        Some(("accounts", sub_matches)) => accounts::run(sub_matches, settings).await?,
        Some(("transactions", sub_matches)) => txn::run(sub_matches, settings).await?,
        None => unreachable!("subcommand is required"),
        _ => unreachable!(),
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        println!("{:#}", err);
        std::process::exit(1);
    }
}
