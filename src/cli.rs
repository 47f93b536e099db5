//! Command-line arguments.

use clap::Parser;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather_mcp_server", version, about = "Weather and travel MCP server")]
pub struct Cli {
    /// Serve over stdin/stdout instead of the network.
    #[arg(long)]
    pub local: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_flag() {
        let cli = Cli::try_parse_from(["weather_mcp_server", "--local"]).unwrap();
        assert!(cli.local);

        let cli = Cli::try_parse_from(["weather_mcp_server"]).unwrap();
        assert!(!cli.local);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = Cli::try_parse_from(["weather_mcp_server", "--locl"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
