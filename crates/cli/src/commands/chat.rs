//! `numina chat`: interactive or single-message chat in the terminal.
//!
//! Plain lines are typed text. Lines starting with `/` pick a quick reply
//! by number (`/1`) or run a command (`/new`, `/history [window]`,
//! `/switch <id>`, `/quit`).

use std::io::Write;

use numina_chatbot::{Chatbot, HistoryWindow, TypingDelay};
use numina_config::AppConfig;
use numina_core::{ConversationId, Message, Role};
use tokio::io::{self, AsyncBufReadExt, BufReader};

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatInput {
    Text(String),
    /// 1-based index into the offered quick replies
    QuickReply(usize),
    New,
    History(Option<String>),
    Switch(String),
    Help,
    Quit,
    Unknown(String),
    Empty,
}

pub fn parse_line(line: &str) -> ChatInput {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    if matches!(line, "exit" | "quit") {
        return ChatInput::Quit;
    }

    let Some(command) = line.strip_prefix('/') else {
        return ChatInput::Text(line.to_string());
    };

    let mut parts = command.split_whitespace();
    let name = parts.next().unwrap_or_default();
    let arg = parts.next().map(str::to_string);

    if let Ok(n) = name.parse::<usize>() {
        return ChatInput::QuickReply(n);
    }

    match (name, arg) {
        ("new", _) => ChatInput::New,
        ("history", window) => ChatInput::History(window),
        ("switch", Some(id)) => ChatInput::Switch(id),
        ("help", _) => ChatInput::Help,
        ("quit" | "exit" | "q", _) => ChatInput::Quit,
        _ => ChatInput::Unknown(line.to_string()),
    }
}

fn print_message(message: &Message) {
    let prefix = match message.role {
        Role::User => "  You    >",
        Role::Bot => "  Numina >",
        Role::Referral => "  Numina 👩‍💼>",
        Role::Disclaimer => "  ⚠️     >",
    };
    for line in message.content.lines() {
        println!("{prefix} {line}");
    }
    for (i, reply) in message.quick_replies.iter().enumerate() {
        println!("           [/{}] {}", i + 1, reply.label);
    }
    println!();
}

fn print_help() {
    println!("  /<n>              pick quick reply n");
    println!("  /new              start a new conversation");
    println!("  /history [window] list saved conversations (week, 2weeks, month, 6months, year)");
    println!("  /switch <id>      resume a saved conversation");
    println!("  /quit             leave");
    println!();
}

fn print_history(chatbot: &Chatbot, window: HistoryWindow) {
    let conversations = chatbot.history(window);
    if conversations.is_empty() {
        println!("  No conversations in the last {window}.\n");
        return;
    }
    for conversation in conversations {
        let marker = if &conversation.id == chatbot.session().active_id() { "*" } else { " " };
        println!(
            "  {marker} {}  {}  ({} messages)",
            conversation.id,
            conversation.preview(),
            conversation.messages.len()
        );
    }
    println!();
}

/// Run one line against the chatbot. Returns `false` when the user quits.
async fn handle(
    chatbot: &mut Chatbot,
    input: ChatInput,
    default_window: HistoryWindow,
) -> Result<bool, Box<dyn std::error::Error>> {
    match input {
        ChatInput::Empty => {}
        ChatInput::Quit => return Ok(false),
        ChatInput::Help => print_help(),
        ChatInput::Text(text) => {
            if let Some(reply) = chatbot.submit(&text).await? {
                print_message(&reply);
            }
        }
        ChatInput::QuickReply(n) => {
            let value = n
                .checked_sub(1)
                .and_then(|i| chatbot.pending_quick_replies().get(i))
                .map(|r| r.value.clone());
            match value {
                Some(value) => {
                    println!("  You    > {value}\n");
                    let reply = chatbot.quick_reply(&value).await?;
                    print_message(&reply);
                }
                None => println!("  No quick reply /{n} right now.\n"),
            }
        }
        ChatInput::New => {
            let id = chatbot.start_new();
            println!("  Started {id}\n");
            for message in chatbot.visible_messages() {
                print_message(message);
            }
        }
        ChatInput::History(window) => {
            let window = match window {
                Some(w) => match w.parse::<HistoryWindow>() {
                    Ok(w) => w,
                    Err(e) => {
                        println!("  {e}\n");
                        return Ok(true);
                    }
                },
                None => default_window,
            };
            print_history(chatbot, window);
        }
        ChatInput::Switch(id) => match chatbot.switch_to(&ConversationId::from(id.as_str())) {
            Ok(()) => {
                println!("  Switched to {id}\n");
                for message in chatbot.visible_messages() {
                    print_message(message);
                }
            }
            Err(e) => println!("  {e}\n"),
        },
        ChatInput::Unknown(line) => println!("  Unknown command: {line} (try /help)\n"),
    }
    Ok(true)
}

pub async fn run(local: bool, message: Option<String>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;
    let default_window = config
        .chatbot
        .history_window
        .parse::<HistoryWindow>()
        .unwrap_or_default();

    let mut chatbot = if local {
        Chatbot::local_only(TypingDelay::new(
            config.chatbot.typing_delay_min_ms,
            config.chatbot.typing_delay_max_ms,
        ))
    } else {
        let gateway = numina_providers::build_from_config(&config)?;
        Chatbot::from_config(&config.chatbot, gateway)
    };

    if let Some(msg) = message {
        // Single message mode
        if let Some(reply) = chatbot.submit(&msg).await? {
            println!("{}", reply.content);
        }
        return Ok(());
    }

    println!();
    println!("  ╔══════════════════════════════════════════════╗");
    println!("  ║          Numina — Financial Education        ║");
    println!("  ╚══════════════════════════════════════════════╝");
    println!();
    println!("  Free text:  {}", chatbot.free_text_strategy());
    println!("  Type a message, pick a quick reply with /1, /2, ...");
    println!("  Type /help for commands, /quit to leave.");
    println!();

    for message in chatbot.visible_messages() {
        print_message(message);
    }
    chatbot.dismiss_disclaimer();

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        print!("  You    > ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break; // EOF (Ctrl+D)
        };
        println!();

        if !handle(&mut chatbot, parse_line(&line), default_window).await? {
            break;
        }
    }

    println!();
    println!("  Goodbye! 👋");
    println!();

    Ok(())
}
