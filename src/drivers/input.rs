use std::collections::VecDeque;
use std::io::BufRead;
use crate::types::ButtonCode;
/// Button driver polled by the controller loop.
pub trait InputSource {
    /// False once the device is shutting down.
    fn is_working(&self) -> bool;
    /// Block until the next button event; `None` means nothing was pressed.
    fn read_button(&mut self) -> Option<ButtonCode>;
}
/// Replays a fixed list of presses, then stops.
pub struct ScriptedInput {
    presses: VecDeque<ButtonCode>,
}
impl ScriptedInput {
    pub fn new(presses: impl IntoIterator<Item = ButtonCode>) -> Self {
        Self {
            presses: presses.into_iter().collect(),
        }
    }
}
impl InputSource for ScriptedInput {
    fn is_working(&self) -> bool {
        !self.presses.is_empty()
    }
    fn read_button(&mut self) -> Option<ButtonCode> {
        self.presses.pop_front()
    }
}
/// Reads one button code per line; blank or unparsable lines count as no press.
pub struct LineInput<R: BufRead> {
    reader: R,
    open: bool,
}
impl<R: BufRead> LineInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader, open: true }
    }
}
impl<R: BufRead> InputSource for LineInput<R> {
    fn is_working(&self) -> bool {
        self.open
    }
    fn read_button(&mut self) -> Option<ButtonCode> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => {
                self.open = false;
                None
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    return None;
                }
                match trimmed.parse::<ButtonCode>() {
                    Ok(code) => Some(code),
                    Err(_) => {
                        log::warn!("ignoring input line {trimmed:?}");
                        None
                    }
                }
            }
            Err(err) => {
                log::error!("button input failed: {err}");
                self.open = false;
                None
            }
        }
    }
}
