//! Line-oriented prompt over stdin.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use fplchat_agent::{AgentReply, ConversationStore, TurnContext};
use fplchat_common::{FplChatError, SessionId};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    Quit,
    Reset,
    ToggleEvents,
    Unknown(String),
    Message(String),
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    match line {
        "/quit" | "/exit" => Command::Quit,
        "/reset" => Command::Reset,
        "/events" => Command::ToggleEvents,
        _ if line.starts_with('/') => Command::Unknown(line.to_string()),
        _ => Command::Message(line.to_string()),
    }
}

pub fn print_reply(reply: &AgentReply, show_events: bool) {
    if show_events {
        for event in &reply.tool_events {
            match serde_json::to_string(event) {
                Ok(json) => println!("  · {json}"),
                Err(e) => tracing::warn!("unprintable tool event: {e}"),
            }
        }
    }
    println!("{}\n", reply.content);
}

pub async fn run(store: &ConversationStore, context: Option<&TurnContext>) -> Result<(), FplChatError> {
    let session = SessionId::new();
    let mut show_events = false;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    println!("fplchat: ask about your league. /reset clears context, /events shows tool calls, /quit exits.\n");
    loop {
        stdout.write_all(b"> ").await?;
        stdout.flush().await?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        match parse_command(&line) {
            Command::Quit => break,
            Command::Reset => {
                store.reset(&session).await;
                println!("Conversation cleared.\n");
            }
            Command::ToggleEvents => {
                show_events = !show_events;
                println!("Tool events {}.\n", if show_events { "on" } else { "off" });
            }
            Command::Unknown(cmd) => println!("Unknown command {cmd}. Try /reset, /events or /quit.\n"),
            Command::Message(text) if text.is_empty() => {}
            Command::Message(text) => {
                let reply = store.run(&session, &text, context).await;
                print_reply(&reply, show_events);
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_commands() {
        assert_eq!(parse_command("/quit"), Command::Quit);
        assert_eq!(parse_command(" /reset "), Command::Reset);
        assert_eq!(parse_command("/events"), Command::ToggleEvents);
        assert_eq!(parse_command("/help"), Command::Unknown("/help".into()));
        assert_eq!(parse_command("standings gw 5"), Command::Message("standings gw 5".into()));
    }
}
