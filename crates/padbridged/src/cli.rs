use clap::Parser;
use clap::Subcommand;

#[derive(Debug, Subcommand, PartialEq)]
pub(crate) enum Command {
    /// Run the bridge in the foreground.
    Run,
    /// Capture a new button mapping and print it as yaml.
    Map,
    /// Probe for controllers once and report which backend would be used.
    Probe,
}

/// Gamepad input bridge: one active controller, mapped buttons, mouse mode.
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub(crate) struct Cli {
    /// Turn debugging information on
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Config file path, defaults to ~/.config/padbridge/padbridge.yaml
    #[arg(short, long)]
    pub config: Option<String>,

    /// The command to run
    #[clap(subcommand)]
    pub command: Command,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_and_command() {
        let cli = Cli::parse_from(["padbridged", "-v", "--config", "pad.yaml", "map"]);
        assert!(cli.verbose);
        assert!(!cli.no_color);
        assert_eq!(cli.config.as_deref(), Some("pad.yaml"));
        assert_eq!(cli.command, Command::Map);
    }

    #[test]
    fn command_is_required() {
        assert!(Cli::try_parse_from(["padbridged"]).is_err());
    }
}
