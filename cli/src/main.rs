use clap::Parser as _;
use color_eyre::eyre::{Result, WrapErr as _};
use modem_drivers::{DriverRegistry, ModemConfig};
use std::time::Duration;
use tracing_subscriber::{
    layer::SubscriberExt as _, util::SubscriberInitExt as _, EnvFilter,
};

mod args;
mod config;
mod output;

use args::{Args, Command, ConnAction, SmsCommand};

/// The config file sets the baseline verbosity; `RUST_LOG` overrides it.
fn init_tracing(logging: &config::LoggingSection) {
    let default_filter = format!(
        "error,mcli={},modem_drivers={}",
        logging.general, logging.driver
    );
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    let config = config::load()?;
    init_tracing(&config.logging);
    run(args, config).await
}

async fn run(args: Args, config: config::CliConfig) -> Result<()> {
    let color = !args.no_color;
    let model = args.model.unwrap_or(config.modem.model);
    let host = args
        .host
        .map(|ip| ip.to_string())
        .unwrap_or(config.modem.host);

    let modem_config = ModemConfig {
        host,
        timeout: Duration::from_secs(config.modem.cmd_ttl),
        interface: args.interface.or(config.modem.interface),
    };

    let registry = DriverRegistry::with_builtin();
    let modem = registry
        .resolve(&model, modem_config)
        .wrap_err_with(|| format!("failed to initialize the {model:?} driver"))?;

    match args.command {
        Command::Conn { action } => {
            let cell = modem.cell()?;
            match action {
                ConnAction::Up => {
                    cell.connect_cell().await?;
                    println!("Connection requested");
                }
                ConnAction::Down => {
                    cell.disconnect_cell().await?;
                    println!("Disconnect requested");
                }
                ConnAction::Status => {
                    output::print_status(cell.cell_link_status().await?, color)
                }
            }
        }
        Command::Sms(SmsCommand::Send { number, message }) => {
            modem.sms()?.send_sms(&number, &message).await?;
            println!("Message sent");
        }
        Command::Sms(SmsCommand::Read) => {
            let messages = modem.sms()?.read_all_sms().await?;
            output::print_messages(&messages, color);
        }
    }

    Ok(())
}
