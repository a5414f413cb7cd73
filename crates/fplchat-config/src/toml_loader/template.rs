//! Default TOML config template with inline documentation comments.

pub(crate) fn default_config_toml() -> String {
    r##"# fplchat configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[league]
# league_id = 14204      # used when neither the message nor the session names a league
# entry_id = 0           # your own team; 0 = unset

[agent]
# history_limit = 6      # 1-50 exchanges remembered per conversation
# max_steps = 6          # 1-20 LLM round-trips per message
# max_candidates = 8     # 2-20 teams listed when a name is ambiguous
# tool_result_chars = 6000
# narrate_league_summary = false

[tools]
# url = "http://localhost:8080/mcp"
# api_key = ""           # or FPL_MCP_API_KEY
# timeout_secs = 30      # 1-600

[llm]
# provider = "claude"    # claude, openai, none
# model = ""             # empty = client default
# max_tokens = 1024
# temperature = 0.2

[memory]
# enabled = true
# reports_dir = "reports"
# summary_dir = "data/derived/summary"
# max_docs = 120
# max_chars = 2000
# refresh_secs = 60

[players]
# bootstrap_path = "data/raw/bootstrap/bootstrap-static.json"

[logging]
# level = "info"         # trace, debug, info, warn, error
"##
    .to_string()
}
