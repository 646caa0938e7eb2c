//! Terminal front end for the chat service.
//!
//! Type a question and press Enter. `/source N` shows citation `N` of the
//! latest answer, `/quit` exits.

use std::env;
use std::io::Write;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};

use ragchat_backend::ui::{
    render_message, tokenize_citations, ChatClient, Conversation, HttpChatClient, Message, Role,
    Segment, SourceDialog, WELCOME_DESCRIPTION, WELCOME_TITLE,
};

const DEFAULT_URL: &str = "http://127.0.0.1:8787/api/chat";

enum Command {
    Quit,
    Source(String),
    Ask(String),
    Empty,
}

fn parse_command(line: &str) -> Command {
    let line = line.trim();
    if line == "/quit" {
        Command::Quit
    } else if line == "/source" {
        Command::Source(String::new())
    } else if let Some(rest) = line.strip_prefix("/source ") {
        Command::Source(rest.trim().to_string())
    } else if line.is_empty() {
        Command::Empty
    } else {
        Command::Ask(line.to_string())
    }
}

fn print_message(message: &Message) {
    let speaker = match message.role {
        Role::User => "you",
        Role::Assistant => "assistant",
    };
    let mut rendered = String::new();
    for segment in render_message(message) {
        match segment {
            Segment::Text(text) => rendered.push_str(text),
            Segment::Citation { label, .. } => {
                rendered.push_str(&format!("[{}]", label));
            }
        }
    }
    println!("{}> {}", speaker, rendered);
    if let Some(sources) = &message.sources {
        for (i, source) in sources.iter().enumerate() {
            println!("    [{}] page {} ({:.3})", i + 1, source.page, source.similarity);
        }
    }
}

fn show_source(conversation: &Conversation, dialog: &mut SourceDialog, label: &str) {
    let Some(message) = conversation.last_assistant() else {
        println!("No answer to cite yet.");
        return;
    };
    let marker = format!("[{}]", label);
    let segments = tokenize_citations(&marker);
    let [segment @ Segment::Citation { .. }] = segments.as_slice() else {
        println!("Usage: /source N");
        return;
    };

    if !dialog.open_citation(message.sources(), segment) {
        println!("No source [{}] in the latest answer.", label);
        return;
    }
    if let Some(detail) = dialog.current() {
        println!("--- {} ---", detail.title);
        println!("similarity: {}", detail.similarity);
        println!("{}", detail.content);
        println!("---");
    }
    dialog.close();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();

    let _ = dotenvy::dotenv();
    let url = env::var("RAG_CHAT_URL").unwrap_or_else(|_| DEFAULT_URL.to_string());
    let client = HttpChatClient::new(url);
    let mut conversation = Conversation::new();
    let mut dialog = SourceDialog::default();

    println!("Connected to {} (/source N, /quit)", client.url());
    if conversation.show_welcome() {
        println!("{}", WELCOME_TITLE);
        println!("{}", WELCOME_DESCRIPTION);
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("> ");
        std::io::stdout().flush().context("Failed to flush stdout")?;

        let Some(line) = lines.next_line().await.context("Failed to read stdin")? else {
            break;
        };

        match parse_command(&line) {
            Command::Quit => break,
            Command::Empty => continue,
            Command::Source(label) => show_source(&conversation, &mut dialog, &label),
            Command::Ask(text) => {
                conversation.set_draft(text);
                let Some(query) = conversation.begin_submit() else {
                    continue;
                };
                if conversation.show_typing_indicator() {
                    println!("assistant is typing...");
                }
                let outcome = client.send(&query).await;
                conversation.settle(outcome);

                for notification in conversation.take_notifications() {
                    println!("! {}: {}", notification.title, notification.description);
                }
                if let Some(message) = conversation.messages().last() {
                    if message.role == Role::Assistant {
                        print_message(message);
                    }
                }
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_command_needs_exact_keyword() {
        assert!(matches!(parse_command("/source 2"), Command::Source(n) if n == "2"));
        assert!(matches!(parse_command("  /source  "), Command::Source(n) if n.is_empty()));
        assert!(matches!(parse_command("/sourcefoo"), Command::Ask(q) if q == "/sourcefoo"));
    }

    #[test]
    fn quit_and_blank_lines() {
        assert!(matches!(parse_command("/quit"), Command::Quit));
        assert!(matches!(parse_command("   "), Command::Empty));
        assert!(matches!(parse_command("what is zinc?"), Command::Ask(_)));
    }
}
