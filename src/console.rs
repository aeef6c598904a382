//! Prompt/print boundary for the interactive tools.

use std::io::{self, BufRead, Write};

/// Where prompts are shown and answers are read from.
pub trait Console {
    /// Shows `message` and returns one line of input without its line ending.
    /// End of input yields an empty answer.
    fn prompt(&mut self, message: &str) -> io::Result<String>;

    /// Prints one block of text followed by a newline.
    fn say(&mut self, text: &str);
}

/// Console over the process's stdin and stdout.
#[derive(Debug, Default)]
pub struct StdConsole;

impl Console for StdConsole {
    fn prompt(&mut self, message: &str) -> io::Result<String> {
        print!("{}", message);
        io::stdout().flush()?;

        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim_end_matches(['\r', '\n']).to_string())
    }

    fn say(&mut self, text: &str) {
        println!("{}", text);
    }
}
