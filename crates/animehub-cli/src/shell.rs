//! Interactive loop: one command per line, edit mode kept between lines.

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use crate::cli::{ShellCommand, ShellLine};
use crate::commands::{self, Context};

const PROMPT_LOCKED: &str = "animehub> ";
const PROMPT_EDITING: &str = "animehub*> ";

pub async fn run(ctx: &mut Context) -> std::io::Result<()> {
    println!("Type `help` for commands, `exit` to leave.");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let prompt = if ctx.session.is_editing() {
            PROMPT_EDITING
        } else {
            PROMPT_LOCKED
        };
        print!("{prompt}");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let words = match split_words(&line) {
            Ok(words) if words.is_empty() => continue,
            Ok(words) => words,
            Err(e) => {
                println!("error: {e}");
                continue;
            }
        };

        let parsed = match ShellLine::try_parse_from(words) {
            Ok(parsed) => parsed,
            Err(e) => {
                // Help and usage errors both land here.
                let _ = e.print();
                continue;
            }
        };

        match parsed.command {
            ShellCommand::Exit => break,
            ShellCommand::Filter { filter } => {
                ctx.session.set_filter(filter);
                println!("Showing {filter}.");
            }
            ShellCommand::App(command) => {
                // No single command failure ends the session.
                if let Err(e) = commands::execute(ctx, command).await {
                    tracing::warn!(error = %e, "Command failed");
                    println!("error: {e}");
                }
            }
        }
    }

    Ok(())
}

/// Split a line into words, honoring single and double quotes.
pub fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                in_word = true;
            }
            None if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            None => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".into());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain() {
        assert_eq!(
            split_words("  bump   local-1 ").unwrap(),
            vec!["bump", "local-1"]
        );
        assert!(split_words("   ").unwrap().is_empty());
    }

    #[test]
    fn test_split_quoted() {
        assert_eq!(
            split_words(r#"add "Made in Abyss" --tags 'dark, adventure'"#).unwrap(),
            vec!["add", "Made in Abyss", "--tags", "dark, adventure"]
        );
        assert_eq!(split_words(r#"profile set --avatar """#).unwrap().len(), 4);
    }

    #[test]
    fn test_split_unterminated() {
        assert!(split_words("add \"oops").is_err());
    }
}
