use clap::{Parser, Subcommand, ValueEnum};
use std::net::Ipv4Addr;

#[derive(Debug, Parser)]
#[command(name = "mcli", version, about = "Control USB modems over their HTTP management API")]
pub struct Args {
    /// Override the configured device address
    #[arg(long, value_name = "ADDR", global = true)]
    pub host: Option<Ipv4Addr>,

    /// Override the configured modem model
    #[arg(long, value_name = "MODEL", global = true)]
    pub model: Option<String>,

    /// Dial the device from this local network interface
    #[arg(long, value_name = "IFACE", global = true)]
    pub interface: Option<String>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the cell connection
    Conn {
        #[arg(value_enum)]
        action: ConnAction,
    },
    /// Manage SMS
    #[command(subcommand)]
    Sms(SmsCommand),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ConnAction {
    /// Bring the cellular link up
    Up,
    /// Take the cellular link down
    Down,
    /// Report the current link status
    Status,
}

#[derive(Debug, Subcommand)]
pub enum SmsCommand {
    /// Send a message
    Send {
        /// Receiver's phone number (E.164)
        #[arg(short = 'n', long = "number", value_parser = parse_e164)]
        number: String,

        /// Message text
        #[arg(short = 'm', long = "message")]
        message: String,
    },
    /// List all messages stored on the device
    Read,
}

/// E.164: a '+' followed by up to 15 digits, no separators.
fn parse_e164(value: &str) -> Result<String, String> {
    let digits = value
        .strip_prefix('+')
        .ok_or_else(|| "number must start with '+'".to_owned())?;
    if digits.is_empty() || digits.len() > 15 {
        return Err("number must have 1 to 15 digits".to_owned());
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err("number may only contain digits after '+'".to_owned());
    }
    Ok(value.to_owned())
}
