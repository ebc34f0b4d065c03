use std::io::{BufRead, Write};

use crate::error::Result;
use crate::report::format_table;
use crate::settings::load_settings;

use super::summary::print_footer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Show,
    Refresh,
    Quit,
}

fn parse_action(line: &str) -> Option<Action> {
    match line.trim().to_ascii_lowercase().as_str() {
        "" => Some(Action::Show),
        "r" | "refresh" => Some(Action::Refresh),
        "q" | "quit" | "exit" => Some(Action::Quit),
        _ => None,
    }
}

/// Serve the summary from one in-process cache until the user quits.
pub fn run() -> Result<()> {
    let settings = load_settings();
    let service = super::service(&settings);
    let stdin = std::io::stdin();
    let mut action = Action::Show;

    loop {
        let summary = service.get_summary(action == Action::Refresh);
        println!("{}", format_table(&summary.rows));
        if let Some(e) = &summary.error {
            eprintln!("Error: {e}");
        }
        print_footer(&summary);

        action = loop {
            print!("[Enter] show  [r] refresh  [q] quit > ");
            std::io::stdout().flush()?;
            let mut line = String::new();
            if stdin.lock().read_line(&mut line)? == 0 {
                break Action::Quit;
            }
            match parse_action(&line) {
                Some(a) => break a,
                None => println!("Unknown command: {}", line.trim()),
            }
        };
        if action == Action::Quit {
            return Ok(());
        }
    }
}
