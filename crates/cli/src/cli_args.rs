use clap::{Parser, Subcommand};

/// Command line arguments for the catalog browser
#[derive(Parser, Debug)]
#[clap(
    name = "mdk",
    about = "Browse, filter, and inspect the models.dev model catalog"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Catalog endpoint to fetch from
    #[arg(long, default_value = modeldeck::catalog::API_URL)]
    pub api_url: String,

    /// Bypass the on-disk session cache
    #[arg(long)]
    pub no_cache: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List models matching the given filters (the default command)
    List {
        /// Free-text search over model name, id, family, and provider name
        #[arg(short, long)]
        search: Option<String>,

        /// Restrict to one provider id
        #[arg(short, long)]
        provider: Option<String>,

        /// Required capabilities, comma-separated
        /// (reasoning, tool_call, structured_output, attachment, open_weights)
        #[arg(long)]
        caps: Option<String>,

        /// Required input modalities, comma-separated (e.g. text,image)
        #[arg(long = "input")]
        input_modality: Option<String>,

        /// Required output modalities, comma-separated
        #[arg(long = "output")]
        output_modality: Option<String>,

        /// Sort order (lastUpdated, releaseDate, name, nameDesc, contextSize,
        /// inputCost, inputCostDesc, outputCost, outputCostDesc)
        #[arg(long)]
        sort: Option<String>,

        /// Page number, 1-based
        #[arg(long, default_value_t = 1)]
        page: usize,

        /// A shared deep-link query string; overrides the other filter flags
        #[arg(short, long)]
        query: Option<String>,

        /// Emit the page as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Show the detail view for one model id
    Show {
        model_id: String,

        #[arg(long)]
        json: bool,
    },
    /// List available providers
    Providers,
}
