use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::engine::protocol::{AgeUp, Presenter};
use crate::model::character::Character;
use crate::model::stats::{StatKey, StatValue};

pub const AGE_UP_COMMAND: &str = "/age";
pub const STATS_COMMAND: &str = "/stats";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleEvent {
    Line(String),
    ShowStats,
}

/// Sorts one raw stdin line. Age-ups go straight to the game loop's
/// signal channel; blank lines are dropped.
pub fn route_line(line: &str, age_tx: &Sender<AgeUp>) -> Option<ConsoleEvent> {
    let line = line.trim();
    match line {
        "" => None,
        AGE_UP_COMMAND => {
            let _ = age_tx.send(AgeUp);
            None
        }
        STATS_COMMAND => Some(ConsoleEvent::ShowStats),
        _ => Some(ConsoleEvent::Line(line.to_string())),
    }
}

/// Terminal presenter. Stdin is read on a background thread so an age-up
/// typed while the generator is busy is queued rather than lost.
pub struct ConsolePresenter<W: Write> {
    events: Receiver<ConsoleEvent>,
    out: W,
    stat_sheet: String,
}

impl ConsolePresenter<io::Stdout> {
    pub fn spawn() -> (Self, Receiver<AgeUp>) {
        let (event_tx, event_rx) = mpsc::channel();
        let (age_tx, age_rx) = mpsc::channel();

        thread::spawn(move || {
            let stdin = io::stdin();
            for line in stdin.lock().lines() {
                let Ok(line) = line else { break };
                if let Some(event) = route_line(&line, &age_tx) {
                    if event_tx.send(event).is_err() {
                        break;
                    }
                }
            }
            log::debug!("stdin closed");
        });

        (ConsolePresenter::new(event_rx, io::stdout()), age_rx)
    }
}

impl<W: Write> ConsolePresenter<W> {
    pub fn new(events: Receiver<ConsoleEvent>, out: W) -> Self {
        Self {
            events,
            out,
            stat_sheet: String::new(),
        }
    }

    pub fn into_output(self) -> W {
        self.out
    }

    fn write_block(&mut self, text: &str) {
        self.write_raw(&format!("{}\n\n", text));
    }

    fn write_raw(&mut self, text: &str) {
        if let Err(e) = self
            .out
            .write_all(text.as_bytes())
            .and_then(|_| self.out.flush())
        {
            log::warn!("failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> Presenter for ConsolePresenter<W> {
    fn display(&mut self, text: &str) {
        self.write_block(text);
    }

    fn await_input(&mut self) -> Option<String> {
        loop {
            self.write_raw("> ");
            match self.events.recv().ok()? {
                ConsoleEvent::Line(line) => {
                    self.write_raw("\n");
                    return Some(line);
                }
                ConsoleEvent::ShowStats => {
                    self.write_raw("\n");
                    let sheet = self.stat_sheet.clone();
                    self.write_block(&sheet);
                }
            }
        }
    }

    fn refresh_stats(&mut self, character: &Character) {
        self.stat_sheet = render_stat_sheet(character);
    }
}

pub fn render_stat_sheet(character: &Character) -> String {
    let stats = character.stats();
    let mut sheet = String::from("STATS:\n");
    sheet.push_str(&format!("- Age: {}\n", character.age()));

    for key in StatKey::ALL {
        let value = match (key, stats.get(key)) {
            (StatKey::NetWorth, StatValue::Number(n)) => format!("${}", n),
            (StatKey::Income, StatValue::Number(n)) => format!("${}/year", n),
            (_, value) => value.to_string(),
        };
        sheet.push_str(&format!("- {}: {}\n", key.label(), value));
    }

    sheet.push_str("ACHIEVEMENTS:");
    for achievement in character.achievements() {
        sheet.push_str(&format!("\n- {}", achievement));
    }
    sheet
}
