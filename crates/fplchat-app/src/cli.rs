use std::path::PathBuf;

use clap::Parser;

use fplchat_agent::TurnContext;

/// fplchat: ask questions about your fantasy football draft league.
#[derive(Parser, Debug)]
#[command(name = "fplchat", version, about)]
pub struct Args {
    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error).
    #[arg(long)]
    pub log_level: Option<String>,

    /// League id for every turn.
    #[arg(long)]
    pub league_id: Option<i64>,

    /// Your team's entry id for every turn.
    #[arg(long)]
    pub entry_id: Option<i64>,

    /// Gameweek in focus for every turn.
    #[arg(long)]
    pub gw: Option<i64>,

    /// Answer one message and exit instead of starting a prompt.
    #[arg(short = 'm', long)]
    pub message: Option<String>,
}

impl Args {
    /// Turn context from the command-line flags, if any were given.
    pub fn context(&self) -> Option<TurnContext> {
        let ctx = TurnContext {
            league_id: self.league_id.filter(|v| *v > 0),
            entry_id: self.entry_id.filter(|v| *v > 0),
            entry_name: None,
            gameweek: self.gw.filter(|v| *v > 0),
        };
        (ctx != TurnContext::default()).then_some(ctx)
    }
}

pub fn parse() -> Args {
    Args::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_become_turn_context() {
        let args = Args::parse_from(["fplchat", "--league-id", "14204", "--gw", "7", "-m", "standings"]);
        let ctx = args.context().unwrap();
        assert_eq!(ctx.league_id, Some(14204));
        assert_eq!(ctx.gameweek, Some(7));
        assert_eq!(ctx.entry_id, None);
        assert_eq!(args.message.as_deref(), Some("standings"));
    }

    #[test]
    fn no_flags_no_context() {
        let args = Args::parse_from(["fplchat", "--entry-id", "0"]);
        assert!(args.context().is_none());
    }
}
