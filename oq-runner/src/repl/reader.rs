use std::ops::ControlFlow;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::warn;

const PROMPT: &str = ">> ";

pub enum ReadOutput {
    ControlFlow(ControlFlow<()>),
    Value(String),
}

pub struct Reader {
    rl: DefaultEditor,
}

impl Reader {
    pub fn new(rl: DefaultEditor) -> Self {
        Self { rl }
    }

    pub fn read(&mut self) -> ReadOutput {
        match self.rl.readline(PROMPT) {
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                ReadOutput::ControlFlow(ControlFlow::Continue(()))
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                ReadOutput::ControlFlow(ControlFlow::Break(()))
            }
            Err(err) => {
                println!("Error: {:?}", err);
                ReadOutput::ControlFlow(ControlFlow::Break(()))
            }
            Ok(line) => {
                if let Err(err) = self.rl.add_history_entry(&line) {
                    warn!(%err, "could not record history entry");
                }
                ReadOutput::Value(line)
            }
        }
    }
}
