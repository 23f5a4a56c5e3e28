use clap::Parser;

// CLI argument structure
#[derive(Parser, Debug, Clone)]
#[command(name = "rankgap")]
#[command(about = "SEO content gap analysis API backed by a chat-completions model")]
pub struct Args {
    // Port to run the server on
    #[arg(short, long, default_value_t = 8080)]
    pub port: u16,

    // Base URL of the chat-completions host
    #[arg(long, default_value = "https://api.openai.com")]
    pub api_base: String,

    // Model name sent upstream
    #[arg(short, long, default_value = "gpt-4o-mini")]
    pub model: String,

    // Cache TTL in seconds
    #[arg(short, long, default_value_t = 300)]
    pub cache_ttl: u64,

    // Rate limit max requests per window
    #[arg(long, default_value_t = 20)]
    pub rate_limit: usize,

    // Rate limit window in seconds
    #[arg(long, default_value_t = 3600)]
    pub rate_window: u64,
}

impl Args {
    /// API key comes from the environment, never the command line.
    /// Absence is surfaced per request, not at startup, so health probes
    /// keep working on a misconfigured instance.
    pub fn api_key() -> Option<String> {
        std::env::var("OPENAI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
    }
}
