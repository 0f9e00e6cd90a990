//! Line-oriented prompts shared by the interactive commands.

use std::io::{self, BufRead, IsTerminal, StdinLock, Stdout, Write};

/// Typed at any prompt to go back one step.
pub const BACK: &str = ":back";

#[derive(Debug, PartialEq, Eq)]
pub enum Answer<T> {
    Value(T),
    /// Empty line: leave the current value alone.
    Keep,
    Back,
}

/// Prompt input and output.
///
/// Ordinary answers are trimmed. Secrets keep every character except the
/// line terminator, and are read without echo when attached to a terminal.
pub struct Console<R, W> {
    input: R,
    out: W,
    hide_secrets: bool,
}

impl Console<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin = io::stdin();
        let hide_secrets = stdin.is_terminal();
        Self {
            input: stdin.lock(),
            out: io::stdout(),
            hide_secrets,
        }
    }
}

impl<R: BufRead, W: Write> Console<R, W> {
    /// Scripted console; secrets are read from `input` like any other line.
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            hide_secrets: false,
        }
    }

    pub fn out(&mut self) -> &mut W {
        &mut self.out
    }

    #[cfg(test)]
    pub fn into_output(self) -> W {
        self.out
    }

    /// Read one trimmed line. End of input is an error so loops always end.
    pub fn read_line(&mut self) -> io::Result<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input closed"));
        }
        Ok(line.trim().to_string())
    }

    /// Read one secret line verbatim, minus the line terminator.
    pub fn read_secret(&mut self) -> io::Result<String> {
        if self.hide_secrets {
            rpassword::read_password()
        } else {
            rpassword::read_password_from_bufread(&mut self.input).map_err(|e| {
                if e.kind() == io::ErrorKind::UnexpectedEof {
                    io::Error::new(io::ErrorKind::UnexpectedEof, "input closed")
                } else {
                    e
                }
            })
        }
    }

    /// Ask for a secret with no keep/back handling.
    pub fn password(&mut self, label: &str) -> io::Result<String> {
        write!(self.out, "{label}: ")?;
        self.out.flush()?;
        self.read_secret()
    }

    /// Ask for free text. `current` is shown as the default; secrets are
    /// masked.
    pub fn ask(&mut self, label: &str, current: &str, secret: bool) -> io::Result<Answer<String>> {
        match (current.is_empty(), secret) {
            (true, _) => write!(self.out, "{label}: ")?,
            (false, true) => write!(self.out, "{label} [unchanged]: ")?,
            (false, false) => write!(self.out, "{label} [{current}]: ")?,
        }
        self.out.flush()?;

        let line = if secret {
            self.read_secret()?
        } else {
            self.read_line()?
        };
        Ok(match line.as_str() {
            BACK => Answer::Back,
            "" => Answer::Keep,
            _ => Answer::Value(line),
        })
    }

    /// Ask until `parse` accepts the answer, or it is empty or `:back`.
    pub fn ask_choice<T, E>(
        &mut self,
        label: &str,
        current: Option<&T>,
        parse: impl Fn(&str) -> Result<T, E>,
    ) -> io::Result<Answer<T>>
    where
        T: ToString,
        E: std::fmt::Display,
    {
        let shown = current.map(ToString::to_string).unwrap_or_default();
        loop {
            match self.ask(label, &shown, false)? {
                Answer::Value(raw) => match parse(&raw) {
                    Ok(value) => return Ok(Answer::Value(value)),
                    Err(e) => writeln!(self.out, "{e}")?,
                },
                Answer::Keep => return Ok(Answer::Keep),
                Answer::Back => return Ok(Answer::Back),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fittrack_core::signup::Gender;
    use std::io::Cursor;

    fn console(script: &str) -> Console<Cursor<String>, Vec<u8>> {
        Console::new(Cursor::new(script.to_string()), Vec::new())
    }

    #[test]
    fn ask_shows_current_and_keeps_on_empty() {
        let mut c = console("\n");
        assert_eq!(c.ask("Email", "a@b.c", false).unwrap(), Answer::Keep);
        assert_eq!(String::from_utf8(c.into_output()).unwrap(), "Email [a@b.c]: ");
    }

    #[test]
    fn plain_answers_are_trimmed() {
        let mut c = console("  Jane  \n");
        assert_eq!(c.ask("First Name", "", false).unwrap(), Answer::Value("Jane".into()));
    }

    #[test]
    fn secrets_keep_surrounding_spaces() {
        let mut c = console(" my pass phrase \n\t tab\r\n");
        assert_eq!(
            c.ask("Password", "old", true).unwrap(),
            Answer::Value(" my pass phrase ".into())
        );
        assert_eq!(c.password("Password").unwrap(), "\t tab");
        assert!(!String::from_utf8(c.into_output()).unwrap().contains("old"));
    }

    #[test]
    fn back_and_eof() {
        let mut c = console(":back\n");
        assert_eq!(c.ask("x", "", false).unwrap(), Answer::Back);
        let err = c.ask("x", "", false).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
        let err = c.ask("x", "", true).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn choice_reprompts_on_garbage() {
        let mut c = console("robot\nfemale\n");
        let answer = c.ask_choice("Gender", None, str::parse::<Gender>).unwrap();
        assert_eq!(answer, Answer::Value(Gender::Female));
        assert!(String::from_utf8(c.into_output()).unwrap().contains("'robot'"));
    }
}
