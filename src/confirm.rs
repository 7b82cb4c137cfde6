//! Interactive confirmation for destructive commands.

use std::io::{self, BufRead, Write};

/// Asks the user to confirm an action, unless told to assume yes.
pub struct Confirm {
    assume_yes: bool,
}

impl Confirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    /// Returns true when the user answers "y" (or the prompt is bypassed).
    pub fn ask(&self, message: &str) -> io::Result<bool> {
        if self.assume_yes {
            return Ok(true);
        }

        print!("{} [y/N]: ", message);
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        Ok(answer.trim().eq_ignore_ascii_case("y"))
    }
}
