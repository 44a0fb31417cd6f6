//! Terminal input and output for the client.

use std::io::Write;

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

const PROMPT: &str = "syncwatch> ";

/// Redisplay the prompt after printing asynchronous output
pub fn redisplay_prompt() {
    print!("{}", PROMPT);
    std::io::stdout().flush().ok();
}

/// Print lines produced while the user may be typing, then restore the prompt
pub fn print_output(lines: &[String]) {
    if lines.is_empty() {
        return;
    }
    for line in lines {
        print!("{}", line);
    }
    redisplay_prompt();
}

/// Read lines on a dedicated thread (rustyline blocks) and forward them.
///
/// The channel closes when the user presses Ctrl+C or Ctrl+D, which ends the
/// client.
pub fn spawn_input_thread(input_tx: mpsc::UnboundedSender<String>) {
    std::thread::spawn(move || {
        let mut rl = match DefaultEditor::new() {
            Ok(rl) => rl,
            Err(e) => {
                eprintln!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match rl.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if !line.is_empty() {
                        rl.add_history_entry(line).ok();
                        if input_tx.send(line.to_string()).is_err() {
                            break;
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    tracing::info!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    tracing::info!("EOF");
                    break;
                }
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });
}
