use std::io::Write;

use tracing::warn;

use super::evaluator::LineOutcome;

pub trait Printer {
    type Object;

    fn print(&mut self, object: Self::Object);
}

pub struct InterpreterPrinter<W: Write> {
    out: W,
}

impl<W: Write> InterpreterPrinter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn write_outcome(&mut self, outcome: LineOutcome) -> std::io::Result<()> {
        match outcome {
            LineOutcome::Evaluated(Ok(Some(object))) => writeln!(self.out, "{}", object),
            LineOutcome::Evaluated(Ok(None)) => Ok(()),
            LineOutcome::Evaluated(Err(err)) => writeln!(self.out, "ERROR: {}", err),
            LineOutcome::ParseErrors(errors) => {
                writeln!(self.out, "parser errors:")?;
                for error in errors {
                    writeln!(self.out, "\t{}", error)?;
                }
                Ok(())
            }
        }
    }
}

impl<W: Write> Printer for InterpreterPrinter<W> {
    type Object = LineOutcome;

    fn print(&mut self, object: Self::Object) {
        if let Err(err) = self.write_outcome(object) {
            warn!(%err, "could not write repl output");
        }
    }
}
