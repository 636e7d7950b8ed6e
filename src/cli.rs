use clap::Parser;
use std::path::PathBuf;

/// lazytree – browse a directory as an incrementally loaded tree
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Root to browse (defaults to CWD)
    #[arg(value_name = "DIR", default_value = ".")]
    pub root: PathBuf,

    /// Include files ignored by .gitignore
    #[arg(long)]
    pub include_ignored: bool,

    /// Show hidden files
    #[arg(long)]
    pub hidden: bool,

    /// Log verbosity on stderr (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
