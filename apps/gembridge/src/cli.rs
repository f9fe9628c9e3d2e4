use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "gembridge",
    about = "Probe an enterprise generative-content gateway through the gembridge shim"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// One generateContent round trip.
    Generate {
        #[arg(long)]
        prompt: String,
        /// Optional system instruction, promoted to a role-tagged block.
        #[arg(long)]
        system: Option<String>,
    },
    /// streamGenerateContent; degrades to a single chunk on gateways without
    /// incremental delivery.
    Stream {
        #[arg(long)]
        prompt: String,
    },
    /// countTokens, optionally against a different model.
    Count {
        #[arg(long)]
        prompt: String,
        #[arg(long)]
        model: Option<String>,
    },
    /// embedContent for a single text.
    Embed {
        #[arg(long)]
        text: String,
    },
}
