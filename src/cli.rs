use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use crate::accumulator::MergeRule;

#[derive(Parser)]
#[command(name = "chars")]
#[command(about = "Browse and search a paginated character API", version)]
#[command(after_help = "EXAMPLES:
    chars list                        Show the first page
    chars list --pages 3              Show the first three pages
    chars search rick                 Search characters by name
    chars browse                      Interactive load-more/search session")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress status messages
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Show debug logging and detailed error information
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Collection endpoint (overrides CHARS_ENDPOINT and the config file)
    #[arg(long, global = true)]
    pub endpoint: Option<String>,

    /// Request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// How fetched pages are merged into the result list
    #[arg(long, global = true, value_enum)]
    pub merge_rule: Option<MergeRule>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List characters, following `next` links
    #[command(after_help = "EXAMPLES:
    chars list
    chars list --pages 5
    chars list --all --json")]
    List(PageArgs),
    /// Search characters by name
    #[command(after_help = "EXAMPLES:
    chars search rick
    chars search \"mr. poopybutthole\" --all")]
    Search(SearchArgs),
    /// Browse interactively
    #[command(after_help = "COMMANDS (inside the session):
    more, m             Load the next page
    search <q>, s <q>   Replace results with a name search
    show                Print the current results again
    help                List commands
    quit, q             Leave")]
    Browse,
    /// Generate shell completions
    #[command(after_help = "EXAMPLES:
    chars completions bash > ~/.bash_completion.d/chars
    chars completions zsh > ~/.zfunc/_chars")]
    Completions {
        /// Shell to generate completions for
        shell: Shell,
    },
    /// Initialize configuration file interactively
    Init,
}

#[derive(Args, Clone)]
pub struct PageArgs {
    /// Number of pages to load (default: 1)
    #[arg(long, short, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub pages: u32,

    /// Load every page (may be slow for large collections)
    #[arg(long, conflicts_with = "pages")]
    pub all: bool,
}

impl PageArgs {
    /// Page limit, or `None` to follow `next` until it runs out.
    pub fn limit(&self) -> Option<u32> {
        if self.all {
            None
        } else {
            Some(self.pages)
        }
    }
}

#[derive(Args, Clone)]
pub struct SearchArgs {
    /// Name to search for
    pub query: String,

    #[command(flatten)]
    pub pages: PageArgs,
}
