//! Line-oriented question prompt.
use std::io::{self, BufRead, Write};

use tracing::warn;

use crate::answer::composer::Answer;
use crate::error::RagError;

const PROMPT: &str = "Question > ";
const EXIT_WORDS: &[&str] = &["exit", "quit", "q"];

fn is_exit(line: &str) -> bool {
    EXIT_WORDS.iter().any(|w| line.eq_ignore_ascii_case(w))
}

/// Reads one question per line until EOF or an exit word.
///
/// A failed question is reported on `output` and the loop keeps going.
/// Returns how many questions were answered.
pub fn run_loop<R, W, F>(input: R, output: &mut W, mut answer: F) -> io::Result<usize>
where
    R: BufRead,
    W: Write,
    F: FnMut(&str) -> Result<Answer, RagError>,
{
    writeln!(output, "\nAsk a question (or 'exit'):\n")?;

    let mut answered = 0;
    let mut lines = input.lines();
    loop {
        write!(output, "{PROMPT}")?;
        output.flush()?;

        let Some(line) = lines.next() else {
            writeln!(output)?;
            break;
        };
        let line = line?;
        let question = line.trim();

        if question.is_empty() {
            continue;
        }
        if is_exit(question) {
            break;
        }

        match answer(question) {
            Ok(a) => {
                writeln!(output, "\n{a}")?;
                answered += 1;
            }
            Err(e) => {
                warn!("Question failed: {e}");
                writeln!(output, "\nError: {e}\n")?;
            }
        }
    }

    Ok(answered)
}
