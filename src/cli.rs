use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Look up icon candidates for a website.
    /// Prints them best first; each one is saved as a png file.
    Favicon {
        /// A url
        #[clap(allow_hyphen_values = true)]
        url: String,

        /// Delete the candidate files after printing
        #[clap(long, default_value = "false")]
        discard: bool,
    },
    /// List installed web apps
    List {},
    /// Delete a web app
    Delete {
        /// Codename of the web app (see `list`)
        codename: String,

        /// Auto confirm
        #[clap(short, long, default_value = "false")]
        yes: bool,
    },
}
