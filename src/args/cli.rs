use clap::Parser;

use super::parsers::{parse_header, parse_variable};

#[derive(Debug, Parser, Clone)]
#[clap(
    name = "moya",
    version,
    about = "Send requests for named API routes described in a TOML or JSON file, through plugins, with optional stubbing."
)]
pub struct MoyaArgs {
    /// Route to call, as named in the config file
    pub route: Option<String>,

    /// Path to config file (TOML or JSON); defaults to moya.toml or moya.json
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Overrides the base URL from the config file
    #[arg(long = "base-url")]
    pub base_url: Option<String>,

    /// Template variable used in paths, parameters and data (name=value)
    #[arg(long = "var", value_parser = parse_variable)]
    pub vars: Vec<(String, String)>,

    /// Extra header for the request (Key: Value)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Answer with the route's sample data instead of sending the request
    #[arg(long)]
    pub stub: bool,

    /// Delay stubbed responses by this many milliseconds
    #[arg(long = "stub-delay-ms", requires = "stub")]
    pub stub_delay_ms: Option<u64>,

    /// Token for routes that declare an auth type
    #[arg(long, env = "MOYA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Print request and response details to stderr
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Include request and response bodies in the request log
    #[arg(long = "log-body")]
    pub log_body: bool,

    /// Disable colored log output
    #[arg(long = "no-color")]
    pub no_color: bool,

    /// List the routes in the config file and exit
    #[arg(long)]
    pub list: bool,
}
