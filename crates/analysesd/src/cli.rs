//! Command-line arguments for analysesd

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Parser)]
#[command(name = "analysesd")]
#[command(author, version, about = "Analyses server daemon")]
pub struct Cli {
    /// Configuration file (TOML)
    #[arg(short, long, env = "ANALYSES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Store base URL (e.g. https://project.supabase.co)
    #[arg(long, env = "SUPABASE_URL")]
    pub store_url: Option<String>,

    /// Privileged store key
    #[arg(long, env = "SUPABASE_SERVICE_ROLE_KEY", hide_env_values = true)]
    pub service_key: Option<String>,

    /// Table holding the analysis records
    #[arg(long, env = "ANALYSES_TABLE")]
    pub table: Option<String>,

    /// Store request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Address to bind
    #[arg(long, env = "ANALYSES_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, env = "PORT")]
    pub port: Option<u16>,

    /// Serve from an in-process store instead of the REST backend
    #[arg(long)]
    pub memory: bool,

    /// JSON array of records to preload into the in-process store
    #[arg(long, requires = "memory")]
    pub seed: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn env_of(id: &str) -> Option<String> {
        Cli::command()
            .get_arguments()
            .find(|arg| arg.get_id() == id)
            .and_then(|arg| arg.get_env())
            .map(|env| env.to_string_lossy().into_owned())
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_env_fallbacks() {
        assert_eq!(env_of("port").as_deref(), Some("PORT"));
        assert_eq!(env_of("store_url").as_deref(), Some("SUPABASE_URL"));
        assert_eq!(
            env_of("service_key").as_deref(),
            Some("SUPABASE_SERVICE_ROLE_KEY")
        );
        assert_eq!(env_of("memory"), None);
    }
}
