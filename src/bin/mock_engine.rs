//! Mock engine binary for integration testing
//!
//! Speaks the same line protocol as the real engine closely enough to drive
//! the regression runner without building it:
//!
//! - `clearboard` forgets all played moves
//! - `play <move>` records a move
//! - `solve` prints a noise line, then
//!   `= <commands> calls, length <moves played>:<moves, newest first>`
//! - `say <text>` prints the text verbatim
//! - `hang` prints nothing
//! - `quit` exits

use std::io::{BufRead, BufReader, Write};

fn main() {
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let reader = BufReader::new(stdin.lock());
    let mut writer = stdout.lock();

    let mut state = MockState::default();

    for line in reader.lines() {
        let Ok(line) = line else { break };
        state.commands += 1;

        let (command, rest) = match line.trim().split_once(' ') {
            Some((command, rest)) => (command.to_string(), rest.trim().to_string()),
            None => (line.trim().to_string(), String::new()),
        };

        let reply = match command.as_str() {
            "clearboard" => {
                state.moves.clear();
                Some(answer(""))
            }
            "play" if !rest.is_empty() => {
                state.moves.push(rest);
                Some(answer(""))
            }
            "solve" => Some(state.solve()),
            "say" => Some(format!("{rest}\n")),
            "hang" => None,
            "quit" => {
                send(&mut writer, &answer(""));
                break;
            }
            _ => Some("? unknown command\n\n".to_string()),
        };

        if let Some(reply) = reply {
            send(&mut writer, &reply);
        }
    }
}

fn answer(text: &str) -> String {
    format!("= {text}\n\n")
}

fn send<W: Write>(writer: &mut W, reply: &str) {
    writer.write_all(reply.as_bytes()).ok();
    writer.flush().ok();
}

#[derive(Default)]
struct MockState {
    commands: u64,
    moves: Vec<String>,
}

impl MockState {
    fn solve(&self) -> String {
        let moves: String = self.moves.iter().rev().map(String::as_str).collect();
        format!(
            "searching {} moves\n= {} calls, length {}:{}\n\n",
            self.moves.len(),
            self.commands,
            self.moves.len(),
            moves
        )
    }
}
