use modem_drivers::{LinkStatus, SmsMessage};
use owo_colors::OwoColorize as _;

pub fn print_status(status: LinkStatus, color: bool) {
    if !color {
        println!("Status: {status}");
        return;
    }
    match status {
        LinkStatus::Up => println!("Status: {}", "up".green().bold()),
        LinkStatus::Down => println!("Status: {}", "down".red().bold()),
        LinkStatus::Connecting => {
            println!("Status: {}", "connecting".yellow().bold())
        }
        LinkStatus::Disconnecting => {
            println!("Status: {}", "disconnecting".truecolor(0xfa, 0x81, 0x00).bold())
        }
    }
}

pub fn print_messages(messages: &[SmsMessage], color: bool) {
    if messages.is_empty() {
        println!("No messages");
        return;
    }
    for message in messages {
        let stamp = message.time.format("%Y-%m-%d %H:%M:%S %:z");
        if color {
            println!("[{stamp}] {}", message.sender.bold());
        } else {
            println!("[{stamp}] {}", message.sender);
        }
        println!("  {}", message.body);
    }
}
