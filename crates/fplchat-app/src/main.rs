mod boot;
mod cli;
mod repl;

use std::path::PathBuf;

use tracing_subscriber::EnvFilter;

use fplchat_agent::ConversationStore;
use fplchat_common::SessionId;

/// Split a `KEY=VALUE` line, ignoring blanks, comments and an `export ` prefix.
fn parse_dotenv_line(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, value) = line.split_once('=')?;
    let key = key.trim();
    if key.is_empty() {
        return None;
    }
    Some((key, value.trim().trim_matches('"').trim_matches('\'')))
}

/// Load a .env file without overriding variables already set.
fn load_dotenv() {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let candidates = [PathBuf::from(".env"), manifest_dir.join("..").join("..").join(".env")];

    for path in &candidates {
        if let Ok(contents) = std::fs::read_to_string(path) {
            for (key, value) in contents.lines().filter_map(parse_dotenv_line) {
                if std::env::var_os(key).is_none() {
                    std::env::set_var(key, value);
                }
            }
            return;
        }
    }
}

fn init_logging(directive: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(directive))
        .unwrap_or_else(|_| EnvFilter::new("fplchat=info"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

#[tokio::main]
async fn main() -> fplchat_common::Result<()> {
    load_dotenv();
    let args = cli::parse();

    let config = fplchat_config::load_config(args.config.as_deref())?;
    let directive = args
        .log_level
        .as_deref()
        .map(|level| format!("fplchat={level}"))
        .unwrap_or_else(|| config.logging.level.directive().to_string());
    init_logging(&directive);

    tracing::info!("fplchat v{} starting", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        tracing::info!("Using config override: {}", path.display());
    }

    let store = ConversationStore::new(boot::agent_factory(&config)?);
    let context = args.context();

    match &args.message {
        Some(message) => {
            let reply = store.run(&SessionId::new(), message, context.as_ref()).await;
            repl::print_reply(&reply, false);
        }
        None => repl::run(&store, context.as_ref()).await?,
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dotenv_lines() {
        assert_eq!(parse_dotenv_line("ANTHROPIC_API_KEY=abc"), Some(("ANTHROPIC_API_KEY", "abc")));
        assert_eq!(parse_dotenv_line("export LEAGUE_ID = \"14204\""), Some(("LEAGUE_ID", "14204")));
        assert_eq!(parse_dotenv_line("MCP_URL='http://localhost:8080/mcp'"), Some(("MCP_URL", "http://localhost:8080/mcp")));
        assert_eq!(parse_dotenv_line("# comment"), None);
        assert_eq!(parse_dotenv_line("   "), None);
        assert_eq!(parse_dotenv_line("=value"), None);
        assert_eq!(parse_dotenv_line("NOEQUALS"), None);
    }
}
