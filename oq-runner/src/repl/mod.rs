mod evaluator;
mod printer;
mod reader;

use std::ops::ControlFlow;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use evaluator::{Evaluator, InterpreterEvaluator};
use printer::{InterpreterPrinter, Printer};
use reader::{ReadOutput, Reader};

use crate::Settings;

struct Repl<E: Evaluator, P: Printer> {
    reader: Reader,
    evaluator: E,
    printer: P,
}

impl<O, E: Evaluator<Object = O>, P: Printer<Object = O>> Repl<E, P> {
    fn run(mut self) {
        loop {
            match self.reader.read() {
                ReadOutput::ControlFlow(ControlFlow::Break(())) => break,
                ReadOutput::ControlFlow(ControlFlow::Continue(())) => continue,
                ReadOutput::Value(line) => {
                    let result = self.evaluator.evaluate(&line);
                    self.printer.print(result)
                }
            }
        }
    }
}

pub fn start(settings: Settings) -> Result<(), ReadlineError> {
    let rl = DefaultEditor::new()?;

    Repl {
        reader: Reader::new(rl),
        evaluator: InterpreterEvaluator::new(settings),
        printer: InterpreterPrinter::new(std::io::stdout()),
    }
    .run();

    Ok(())
}
