//! REPL (Read-Eval-Print Loop) for trying out coercions

use crate::coerce::Coercer;
use crate::error::report_error;
use crate::group::GroupId;
use crate::host::HostTables;
use crate::value::Value;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use std::path::PathBuf;

const PROMPT: &str = "wsv> ";
const HISTORY_FILE: &str = ".wscoerce_history";

/// What a line of input asks for
#[derive(Debug, PartialEq)]
enum Input<'a> {
    Command(&'a str),
    Coerce { group: GroupId, text: &'a str },
    Invalid(&'static str),
}

/// Split `<group> <literal>`; the group may be a name or a numeric index
fn parse_input(line: &str) -> Input<'_> {
    if line.starts_with(':') {
        return Input::Command(line);
    }
    let Some((group, text)) = line.split_once(char::is_whitespace) else {
        return Input::Invalid("expected `<group> <value>`");
    };
    let text = text.trim();
    if text.is_empty() {
        return Input::Invalid("missing value after group");
    }
    let group = match group.parse::<usize>() {
        Ok(index) => GroupId::Index(index),
        Err(_) => GroupId::from(group),
    };
    Input::Coerce { group, text }
}

/// REPL state
pub struct Repl<'h> {
    editor: DefaultEditor,
    coercer: Coercer<'h>,
    history_path: Option<PathBuf>,
}

impl<'h> Repl<'h> {
    /// Create a new REPL over a host session
    pub fn new(host: &'h HostTables) -> RlResult<Self> {
        let editor = DefaultEditor::new()?;
        let history_path = dirs_home().map(|h| h.join(HISTORY_FILE));

        let mut repl = Repl {
            editor,
            coercer: Coercer::new(host),
            history_path,
        };

        if let Some(ref path) = repl.history_path {
            let _ = repl.editor.load_history(path);
        }

        Ok(repl)
    }

    /// Run the REPL
    pub fn run(&mut self) -> RlResult<()> {
        println!("wscoerce {}", env!("CARGO_PKG_VERSION"));
        println!("Enter `<group> <value>`, :help for help, :quit to exit.\n");

        loop {
            match self.editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    let _ = self.editor.add_history_entry(line);
                    if self.handle_line(line) {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("^C");
                    continue;
                }
                Err(ReadlineError::Eof) => break,
                Err(err) => {
                    eprintln!("Error: {err}");
                    break;
                }
            }
        }

        if let Some(ref path) = self.history_path {
            let _ = self.editor.save_history(path);
        }

        Ok(())
    }

    /// Returns true when the REPL should exit
    fn handle_line(&mut self, line: &str) -> bool {
        match parse_input(line) {
            Input::Command(cmd) => self.handle_command(cmd),
            Input::Coerce { group, text } => {
                match self.coercer.coerce(&group, Value::Text(text.to_string())) {
                    Ok(coerced) => println!("{}: {coerced}", coerced.kind()),
                    Err(err) => report_error("<repl>", text, &err),
                }
                false
            }
            Input::Invalid(reason) => {
                eprintln!("{reason}");
                false
            }
        }
    }

    /// Handle REPL commands (starting with :)
    fn handle_command(&mut self, cmd: &str) -> bool {
        match cmd {
            ":quit" | ":q" | ":exit" => true,
            ":help" | ":h" | ":?" => {
                self.print_help();
                false
            }
            ":groups" => {
                for (i, group) in self.coercer.host().groups().iter().enumerate() {
                    println!("{i:>4}  {}", group.name);
                }
                false
            }
            _ => {
                println!("Unknown command: {cmd}");
                println!("Type :help for help.");
                false
            }
        }
    }

    fn print_help(&self) {
        println!("Commands:");
        println!("  :help, :h, :?   Show this help");
        println!("  :groups         List the group table with indices");
        println!("  :quit, :q       Exit the REPL");
        println!();
        println!("Coercions:");
        println!("  Vector [1, 2, 3]");
        println!("  Index 42");
        println!("  Tensor3 [[1.0, 2.0]]");
        println!("  10 [[1, 2], [3, 4]]     (group by table index)");
    }
}

/// Get home directory
fn dirs_home() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE").ok().map(PathBuf::from)
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME").ok().map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_input_named_group() {
        assert_eq!(
            parse_input("Vector [1, 2]"),
            Input::Coerce {
                group: GroupId::from("Vector"),
                text: "[1, 2]"
            }
        );
    }

    #[test]
    fn test_parse_input_indexed_group() {
        assert_eq!(
            parse_input("3\t 7"),
            Input::Coerce {
                group: GroupId::Index(3),
                text: "7"
            }
        );
    }

    #[test]
    fn test_parse_input_command() {
        assert_eq!(parse_input(":groups"), Input::Command(":groups"));
    }

    #[test]
    fn test_parse_input_missing_value() {
        assert!(matches!(parse_input("Vector"), Input::Invalid(_)));
        assert!(matches!(parse_input("Vector   "), Input::Invalid(_)));
    }
}
