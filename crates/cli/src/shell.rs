//! Interactive shell.
//!
//! Reads one command per line from stdin and runs it against a single
//! [`Store`], so a login lasts until the shell exits.

use std::io::Write;

use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use ecompro_storefront::Store;

use crate::commands::Commands;
use crate::output;

const PROMPT: &str = "ecompro> ";

#[derive(Parser)]
#[command(no_binary_name = true)]
struct Line {
    #[command(subcommand)]
    command: Commands,
}

/// Split a line into words. Single and double quotes group words.
fn split_words(line: &str) -> Result<Vec<String>, String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut quote: Option<char> = None;

    for c in line.chars() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '"' | '\'') => {
                quote = Some(c);
                in_word = true;
            }
            (None, c) if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            (None, c) => {
                current.push(c);
                in_word = true;
            }
        }
    }

    if quote.is_some() {
        return Err("unterminated quote".to_string());
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

#[allow(clippy::print_stdout)]
fn prompt() -> std::io::Result<()> {
    print!("{PROMPT}");
    std::io::stdout().flush()
}

/// Run one shell line. Returns `false` when the shell should exit.
#[allow(clippy::print_stdout)]
async fn run_line(store: &mut Store, line: &str) -> bool {
    let words = match split_words(line) {
        Ok(words) => words,
        Err(e) => {
            println!("error: {e}");
            return true;
        }
    };

    match words.first().map(String::as_str) {
        None => return true,
        Some("exit" | "quit") => return false,
        _ => {}
    }

    let command = match Line::try_parse_from(&words) {
        Ok(parsed) => parsed.command,
        Err(e) => {
            // Also covers --help output.
            println!("{e}");
            return true;
        }
    };

    let section = store.config().section;
    let Some(request) = command.into_store_command(section) else {
        println!("already in the shell");
        return true;
    };

    match store.dispatch(request).await {
        Ok(outcome) => output::render(&outcome),
        Err(e) => println!("error: {}", e.report()),
    }
    true
}

/// Run the shell until `exit` or end of input.
///
/// # Errors
///
/// Returns an error if stdin or stdout fail.
pub async fn run(store: &mut Store) -> std::io::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        prompt()?;
        let Some(line) = lines.next_line().await? else {
            break;
        };
        if !run_line(store, &line).await {
            break;
        }
    }

    tracing::debug!("Shell closed");
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_split_plain_words() {
        assert_eq!(
            split_words("  cart   add 7 --qty 2 ").unwrap(),
            ["cart", "add", "7", "--qty", "2"]
        );
        assert!(split_words("   ").unwrap().is_empty());
    }

    #[test]
    fn test_split_quoted_words() {
        assert_eq!(
            split_words(r#"product-add --title "Linen Shirt" --category 'Apparel'"#).unwrap(),
            ["product-add", "--title", "Linen Shirt", "--category", "Apparel"]
        );
        assert_eq!(split_words(r#"login bob """#).unwrap(), ["login", "bob", ""]);
    }

    #[test]
    fn test_split_unterminated_quote() {
        assert!(split_words(r#"products -q "oops"#).is_err());
    }

    #[test]
    fn test_line_parses_commands() {
        let parsed = Line::try_parse_from(["cart", "remove", "a"]).unwrap();
        assert!(matches!(parsed.command, Commands::Cart { .. }));
    }
}
