use clap::{ArgAction, Parser};

#[derive(Parser, Debug, Clone)]
#[command(
    name = "recipe-feed",
    version,
    about = "resilient WordPress recipe listing",
    long_about = "recipe-feed fetches one page of the Postman Oil recipe listing from a WordPress REST API, trying each endpoint variant in order and falling back to placeholder recipes when none answers.\n\nExamples:\n  recipe-feed\n  recipe-feed -n 2 --site https://postmanoil.com\n  recipe-feed --route '/recipes?page=3' -o recipes.html\n\nTip: Use --init-config to write ~/.recipe-feed/config.yml and keep invocations short."
)]
pub struct CliArgs {
    #[arg(
        short = 'v',
        long = "vb",
        visible_alias = "verbose",
        action = ArgAction::Count,
        help_heading = "Output",
        help = "Increase log verbosity (-v, -vv)."
    )]
    pub verbose: u8,

    #[arg(
        short = 'c',
        long = "clr",
        visible_alias = "color",
        help_heading = "Output",
        help = "Enable colored output (overrides --no-color)."
    )]
    pub color: bool,

    #[arg(
        long = "nc",
        visible_alias = "no-color",
        help_heading = "Output",
        help = "Disable colored output."
    )]
    pub no_color: bool,

    #[arg(
        short = 'o',
        long = "out",
        visible_alias = "output",
        value_name = "FILE",
        help_heading = "Output",
        help = "Write the rendered page to a file instead of stdout."
    )]
    pub output: Option<String>,

    #[arg(
        short = 'f',
        long = "of",
        visible_alias = "output-format",
        value_name = "FORMAT",
        help_heading = "Output",
        help = "Output file format: text, json or html (inferred from the file extension when omitted)."
    )]
    pub output_format: Option<String>,

    #[arg(
        short = 's',
        long = "st",
        visible_alias = "site",
        value_name = "URL",
        help_heading = "Source",
        help = "WordPress site root serving the recipe posts."
    )]
    pub site: Option<String>,

    #[arg(
        short = 'p',
        long = "pfx",
        visible_alias = "prefix",
        value_name = "PATH",
        action = ArgAction::Append,
        help_heading = "Source",
        help = "API path prefix to try, in order (repeatable; use '' for the site root)."
    )]
    pub prefix: Vec<String>,

    #[arg(
        short = 'n',
        long = "pg",
        visible_alias = "page",
        value_name = "N",
        help_heading = "Listing",
        help = "Page number to fetch (overrides the page in --route)."
    )]
    pub page: Option<u32>,

    #[arg(
        short = 'r',
        long = "rt",
        visible_alias = "route",
        value_name = "ROUTE",
        help_heading = "Listing",
        help = "Listing route; its `page` query parameter selects the page."
    )]
    pub route: Option<String>,

    #[arg(
        short = 'e',
        long = "em",
        visible_alias = "error-mode",
        value_name = "MODE",
        help_heading = "Listing",
        help = "On total fetch failure: 'fallback' shows placeholder recipes, 'surface' shows the error with a retry."
    )]
    pub error_mode: Option<String>,

    #[arg(
        short = 't',
        long = "to",
        visible_alias = "timeout",
        value_name = "SECONDS",
        help_heading = "HTTP",
        help = "Per-request timeout in seconds."
    )]
    pub timeout: Option<usize>,

    #[arg(
        short = 'x',
        long = "px",
        visible_alias = "proxy",
        value_name = "URL",
        help_heading = "HTTP",
        help = "Proxy for all requests."
    )]
    pub proxy: Option<String>,

    #[arg(
        short = 'H',
        long = "hdr",
        visible_alias = "header",
        value_name = "HEADER",
        help_heading = "HTTP",
        help = "Extra request header in 'Key: Value' form."
    )]
    pub header: Option<String>,

    #[arg(
        short = 'C',
        long = "cfg",
        visible_alias = "config",
        value_name = "FILE",
        help_heading = "Config",
        help = "Path to config file (defaults to ~/.recipe-feed/config.yml)."
    )]
    pub config: Option<String>,

    #[arg(
        long = "ic",
        visible_alias = "init-config",
        help_heading = "Config",
        help = "Write a commented default config file and exit."
    )]
    pub init_config: bool,
}
