use clap::Parser;
use error_stack::Result;

mod server;

pub use server::StartServerError;

/// Command line options for ripple.
#[derive(Debug, Parser)]
#[command(about = "Utility suite for the ripple backend", version, author)]
pub struct Cli {
    #[clap(subcommand)]
    pub subcommand: Subcommand,
}

impl Cli {
    pub fn run(self) -> Result<(), StartServerError> {
        match self.subcommand {
            Subcommand::Server(args) => self::server::run(args),
        }
    }
}

#[derive(Debug, Parser)]
pub enum Subcommand {
    Server(self::server::ServerCommand),
}
