use std::io::{self, BufRead, Write};

use crate::model::settings::RuntimeTag;

/// What the user is being asked about.
#[derive(Debug, Clone)]
pub struct SetupRequest {
    pub tag: RuntimeTag,
    pub env_name: String,
    /// Executable file name to look for when picking a path by hand.
    pub executable_hint: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SetupChoice {
    Install,
    ManualPathChosen(String),
    Cancelled,
}

/// Interactive decisions made during environment setup.
pub trait Prompter {
    fn choose(&mut self, request: &SetupRequest) -> SetupChoice;

    fn report_failure(&mut self, message: &str);
}

/// Headless policy: always install, failures are only logged.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoInstall;

impl Prompter for AutoInstall {
    fn choose(&mut self, _request: &SetupRequest) -> SetupChoice {
        SetupChoice::Install
    }

    /// Setup already logs the failure; there is nobody to tell.
    fn report_failure(&mut self, _message: &str) {}
}

/// Line-based prompts over any reader/writer pair.
pub struct TerminalPrompter<R, W> {
    input: R,
    output: W,
}

impl TerminalPrompter<io::StdinLock<'static>, io::Stdout> {
    pub fn stdio() -> Self {
        Self::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim().to_string()),
        }
    }
}

impl<R: BufRead, W: Write> Prompter for TerminalPrompter<R, W> {
    fn choose(&mut self, request: &SetupRequest) -> SetupChoice {
        let name = &request.env_name;
        let _ = write!(
            self.output,
            "You have installed {} plugins, which require {name} to run.\n\
             Download {name} now? Answer no if it is already installed \
             and you will be asked for its executable. [Y/n] ",
            request.tag
        );
        let _ = self.output.flush();

        let Some(answer) = self.read_line() else {
            return SetupChoice::Cancelled;
        };
        if !answer.eq_ignore_ascii_case("n") && !answer.eq_ignore_ascii_case("no") {
            return SetupChoice::Install;
        }

        match &request.executable_hint {
            Some(hint) => {
                let _ = write!(self.output, "Path to the {name} executable ({hint}, empty to cancel): ");
            }
            None => {
                let _ = write!(self.output, "Path to the {name} executable (empty to cancel): ");
            }
        }
        let _ = self.output.flush();

        match self.read_line() {
            Some(path) if !path.is_empty() => SetupChoice::ManualPathChosen(path),
            _ => SetupChoice::Cancelled,
        }
    }

    fn report_failure(&mut self, message: &str) {
        let _ = writeln!(self.output, "{message}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SetupRequest {
        SetupRequest {
            tag: RuntimeTag::new("python"),
            env_name: "Python".to_string(),
            executable_hint: Some("pythonw.exe".to_string()),
        }
    }

    fn answer(input: &str) -> SetupChoice {
        let mut output = Vec::new();
        let mut prompter = TerminalPrompter::new(input.as_bytes(), &mut output);
        prompter.choose(&request())
    }

    #[test]
    fn default_answer_installs() {
        assert_eq!(answer("\n"), SetupChoice::Install);
        assert_eq!(answer("y\n"), SetupChoice::Install);
    }

    #[test]
    fn no_then_path_is_manual() {
        assert_eq!(
            answer("n\n/usr/bin/python3\n"),
            SetupChoice::ManualPathChosen("/usr/bin/python3".to_string())
        );
    }

    #[test]
    fn manual_prompt_names_the_executable() {
        let mut output = Vec::new();
        TerminalPrompter::new(&b"n\n\n"[..], &mut output).choose(&request());
        let shown = String::from_utf8(output).unwrap();
        assert!(shown.contains("Path to the Python executable (pythonw.exe, empty to cancel)"));
    }

    #[test]
    fn no_then_empty_is_cancelled() {
        assert_eq!(answer("no\n\n"), SetupChoice::Cancelled);
        assert_eq!(answer(""), SetupChoice::Cancelled);
    }

    #[test]
    fn failure_is_written_out() {
        let mut output = Vec::new();
        TerminalPrompter::new(&b""[..], &mut output).report_failure("boom");
        assert_eq!(String::from_utf8(output).unwrap(), "boom\n");
    }
}
