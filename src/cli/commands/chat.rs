//! Interactive question session over one indexed video.

use super::ask::print_answer;
use super::index::{index_with_spinner, prepare};
use crate::cli::preflight::Operation;
use crate::cli::Output;
use crate::config::Settings;
use anyhow::Result;
use console::style;
use std::io::{self, BufRead, Write};

/// One line typed at the chat prompt.
#[derive(Debug, PartialEq, Eq)]
enum ChatInput<'a> {
    Empty,
    Exit,
    ToggleContext,
    Index(&'a str),
    Question(&'a str),
}

fn parse_input(line: &str) -> ChatInput<'_> {
    let line = line.trim();
    if line.is_empty() {
        return ChatInput::Empty;
    }
    if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
        return ChatInput::Exit;
    }
    if line == ":context" {
        return ChatInput::ToggleContext;
    }
    if let Some(video) = line.strip_prefix(":index") {
        if video.is_empty() || video.starts_with(char::is_whitespace) {
            return ChatInput::Index(video.trim());
        }
    }
    ChatInput::Question(line)
}

/// Run the interactive chat command.
pub async fn run_chat(video: Option<String>, model: Option<String>, mut settings: Settings) -> Result<()> {
    if let Some(model) = model {
        settings.answer.model = model;
    }

    let orchestrator = prepare(settings, Operation::Ask)?;

    println!("\n{}", style("tubeqa chat").bold().cyan());
    println!(
        "{}\n",
        style("Ask questions about the video. ':index <video>' switches video, ':context' toggles sources, 'exit' quits.").dim()
    );

    match video.as_deref().map(str::trim) {
        Some(video) if !video.is_empty() => {
            // A failed initial index is reported and the session continues.
            let _ = index_with_spinner(&orchestrator, video).await;
        }
        _ => Output::info("No video yet. Use ':index <video>' to load one."),
    }

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut show_context = false;

    loop {
        print!("{} ", style("You:").green().bold());
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match parse_input(&line) {
            ChatInput::Empty => continue,
            ChatInput::Exit => {
                Output::info("Goodbye!");
                break;
            }
            ChatInput::ToggleContext => {
                show_context = !show_context;
                Output::info(if show_context {
                    "Showing retrieved context."
                } else {
                    "Hiding retrieved context."
                });
            }
            ChatInput::Index(video) => {
                let _ = index_with_spinner(&orchestrator, video).await;
            }
            ChatInput::Question(question) => {
                let spinner = Output::spinner("Thinking...");
                let result = orchestrator.ask(question).await;
                spinner.finish_and_clear();

                match result {
                    Ok(answer) => print_answer(&answer, show_context),
                    Err(e) => Output::error(&format!("Error: {}", e)),
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
    fn test_parse_input() {
        assert_eq!(parse_input("  \n"), ChatInput::Empty);
        assert_eq!(parse_input("QUIT"), ChatInput::Exit);
        assert_eq!(parse_input(":context"), ChatInput::ToggleContext);
        assert_eq!(
            parse_input(":index https://youtu.be/abc12345678\n"),
            ChatInput::Index("https://youtu.be/abc12345678")
        );
        assert_eq!(parse_input(":index"), ChatInput::Index(""));
        assert_eq!(parse_input(":indexes?"), ChatInput::Question(":indexes?"));
        assert_eq!(
            parse_input("What is mental strength?"),
            ChatInput::Question("What is mental strength?")
        );
    }
}
