//! Interactive line-oriented front end.

use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use tracing::debug;

use super::display::{render_display, render_history, render_keypad};
use super::session::Session;
use crate::ai::{Solver, parse_trigger};
use crate::calculator::{Intent, copy_display, looks_like_keypad_input, parse_keys};

const PROMPT: &str = "> ";

const HELP: &str = "\
Type keypad input such as `12.5 * 4 =` or `16 sqrt`.
Keys: 0-9 00 . + - * / ^ = % sin cos tan sqrt ln log sq, c (clear), del (backspace)

Commands:
  !ai <question>   ask the AI solver (also `? <question>`)
  history          show calculation history
  history clear    forget all history
  use <n>          recall the n-th most recent result
  sci              toggle the scientific keypad
  copy             copy the display value to the clipboard
  help             show this help
  quit             leave";

/// What the loop should do after a line.
enum Flow {
    Continue,
    Quit,
}

/// Read lines from `input` until EOF or `quit`, rendering to `output`.
pub async fn run<S, R, W>(
    session: &mut Session<S>,
    input: R,
    output: &mut W,
    width: usize,
) -> Result<()>
where
    S: Solver,
    R: BufRead,
    W: Write,
{
    writeln!(output, "{}", render_display(session.state(), width))?;

    let mut lines = input.lines();
    loop {
        write!(output, "{}", PROMPT)?;
        output.flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read input")?;

        if let Flow::Quit = handle_line(session, line.trim(), output, width).await? {
            break;
        }
    }

    writeln!(output)?;
    Ok(())
}

async fn handle_line<S, W>(
    session: &mut Session<S>,
    line: &str,
    output: &mut W,
    width: usize,
) -> Result<Flow>
where
    S: Solver,
    W: Write,
{
    debug!(line, "input");

    match line {
        "" => return Ok(Flow::Continue),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        "help" => {
            writeln!(output, "{}", HELP)?;
            writeln!(output, "\n{}", render_keypad(session.state().is_scientific()))?;
            return Ok(Flow::Continue);
        }
        "history" => {
            writeln!(output, "{}", render_history(session.state().history()))?;
            return Ok(Flow::Continue);
        }
        "history clear" => {
            session.dispatch(Intent::ClearHistory);
            writeln!(output, "History cleared")?;
            return Ok(Flow::Continue);
        }
        "sci" => {
            session.dispatch(Intent::ToggleScientific);
            writeln!(output, "{}", render_keypad(session.state().is_scientific()))?;
        }
        "copy" => {
            match copy_display(session.state()) {
                Ok(text) => writeln!(output, "Copied {}", text)?,
                Err(err) => writeln!(output, "{}", err)?,
            }
            return Ok(Flow::Continue);
        }
        _ => {
            if let Some(question) = parse_trigger(line) {
                writeln!(output, "Thinking...")?;
                if let Err(err) = session.ask(question).await {
                    writeln!(output, "AI error: {}", err)?;
                    return Ok(Flow::Continue);
                }
            } else if let Some(position) = line.strip_prefix("use ") {
                let recalled = position
                    .trim()
                    .parse::<usize>()
                    .is_ok_and(|n| session.select_history(n));
                if !recalled {
                    writeln!(output, "No history item {}", position.trim())?;
                    return Ok(Flow::Continue);
                }
            } else {
                match parse_keys(line) {
                    Ok(intents) => session.dispatch_all(intents),
                    Err(err) => {
                        writeln!(output, "{}", err)?;
                        if !looks_like_keypad_input(line) {
                            writeln!(output, "To ask a question, start the line with !ai")?;
                        }
                        return Ok(Flow::Continue);
                    }
                }
            }
        }
    }

    writeln!(output, "{}", render_display(session.state(), width))?;
    Ok(Flow::Continue)
}
