//! Debugger command parsing.

use crate::cpu::memory::Memory;
use crate::word::{parse_word, Word};
use thiserror::Error;

/// Something `print` and `set` can address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `%acc`
    Acc,
    /// `%pc`
    Pc,
    /// A memory cell, always 0-25.
    Cell(usize),
}

impl Target {
    fn parse(text: &str) -> Result<Self, UsageError> {
        match text {
            "%acc" => Ok(Target::Acc),
            "%pc" => Ok(Target::Pc),
            _ => parse_address(text).map(Target::Cell),
        }
    }
}

/// One debugger command line, parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// End the session.
    Exit,
    /// Load a decimal dump file.
    Load(String),
    /// Run from an address (0 if omitted).
    Go(Option<usize>),
    /// Resume from the current program counter.
    Continue,
    /// Execute one instruction.
    Step,
    /// Show one register or cell, or the whole machine.
    Print(Option<Target>),
    /// Overwrite a register or cell.
    Set(Target, Word),
    /// Zero memory and registers.
    Reset,
    /// Disassemble memory.
    List,
    /// Save memory as a decimal dump.
    Save(String),
    /// Show the command summary.
    Help,
}

/// Command summary shown by `help`.
pub const HELP: &[&str] = &[
    "exit                          end the session",
    "load|l <file>                 load a decimal dump",
    "go|g [<addr>]                 run from <addr> (default 0)",
    "continue|c                    resume from the current pc",
    "step|s                        execute one instruction",
    "print|p [%acc|%pc|<addr>]     show a register, a cell, or everything",
    "set <%acc|%pc|<addr>> <value> overwrite a register or a cell",
    "reset                         zero memory, pc and accumulator",
    "list                          disassemble memory",
    "save <file>                   write memory as a decimal dump",
    "help                          show this summary",
];

impl Command {
    /// Parse a command line. Blank lines parse to `None`.
    pub fn parse(line: &str) -> Result<Option<Self>, UsageError> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = words.split_first() else {
            return Ok(None);
        };

        let command = match (name, args) {
            ("exit", []) => Command::Exit,
            ("exit", _) => return Err(UsageError::Usage("exit")),

            ("load" | "l", [file]) => Command::Load(file.to_string()),
            ("load" | "l", _) => return Err(UsageError::Usage("load <filename>")),

            ("go" | "g", []) => Command::Go(None),
            ("go" | "g", [addr]) => Command::Go(Some(parse_address(addr)?)),
            ("go" | "g", _) => return Err(UsageError::Usage("go [<address>]")),

            ("continue" | "c", []) => Command::Continue,
            ("continue" | "c", _) => return Err(UsageError::Usage("continue")),

            ("step" | "s", []) => Command::Step,
            ("step" | "s", _) => return Err(UsageError::Usage("step")),

            ("print" | "p", []) => Command::Print(None),
            ("print" | "p", [target]) => Command::Print(Some(Target::parse(target)?)),
            ("print" | "p", _) => return Err(UsageError::Usage("print [%acc|%pc|<address>]")),

            ("set", [target, value]) => {
                let target = Target::parse(target)?;
                let value = match target {
                    Target::Pc => {
                        let addr = parse_address(value)?;
                        Word::wrapping_from(addr as i64)
                    }
                    _ => parse_value(value)?,
                };
                Command::Set(target, value)
            }
            ("set", _) => return Err(UsageError::Usage("set <%acc|%pc|<address>> <value>")),

            ("reset", []) => Command::Reset,
            ("reset", _) => return Err(UsageError::Usage("reset")),

            ("list", []) => Command::List,
            ("list", _) => return Err(UsageError::Usage("list")),

            ("save", [file]) => Command::Save(file.to_string()),
            ("save", _) => return Err(UsageError::Usage("save <filename>")),

            ("help" | "?", _) => Command::Help,

            (other, _) => return Err(UsageError::UnknownCommand(other.to_string())),
        };

        Ok(Some(command))
    }
}

fn parse_value(text: &str) -> Result<Word, UsageError> {
    parse_word(text).map_err(|e| UsageError::BadValue(e.to_string()))
}

fn parse_address(text: &str) -> Result<usize, UsageError> {
    let value = parse_value(text)?.value();
    if Memory::contains(value as i64) {
        Ok(value as usize)
    } else {
        Err(UsageError::BadAddress(text.to_string()))
    }
}

/// Errors in the shape of a command line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UsageError {
    #[error("{0}: unknown command")]
    UnknownCommand(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("{0}: address out of range (0-25)")]
    BadAddress(String),

    #[error("{0}")]
    BadValue(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Result<Option<Command>, UsageError> {
        Command::parse(line)
    }

    #[test]
    fn test_blank_line() {
        assert_eq!(parse(""), Ok(None));
        assert_eq!(parse("   \t"), Ok(None));
    }

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("exit"), Ok(Some(Command::Exit)));
        assert_eq!(parse("continue"), Ok(Some(Command::Continue)));
        assert_eq!(parse("c"), Ok(Some(Command::Continue)));
        assert_eq!(parse("step"), Ok(Some(Command::Step)));
        assert_eq!(parse("reset"), Ok(Some(Command::Reset)));
        assert_eq!(parse("list"), Ok(Some(Command::List)));
        assert_eq!(parse("help"), Ok(Some(Command::Help)));
    }

    #[test]
    fn test_load_and_alias() {
        assert_eq!(parse("load prog.dd"), Ok(Some(Command::Load("prog.dd".into()))));
        assert_eq!(parse("l prog.dd"), Ok(Some(Command::Load("prog.dd".into()))));
        assert_eq!(parse("load"), Err(UsageError::Usage("load <filename>")));
        assert_eq!(parse("load a b"), Err(UsageError::Usage("load <filename>")));
    }

    #[test]
    fn test_go() {
        assert_eq!(parse("go"), Ok(Some(Command::Go(None))));
        assert_eq!(parse("go 5"), Ok(Some(Command::Go(Some(5)))));
        assert_eq!(parse("g 25"), Ok(Some(Command::Go(Some(25)))));
        assert_eq!(parse("go 30"), Err(UsageError::BadAddress("30".into())));
        assert_eq!(parse("go -01"), Err(UsageError::BadAddress("-01".into())));
        assert_eq!(parse("go 1 2"), Err(UsageError::Usage("go [<address>]")));
        assert!(matches!(parse("go x"), Err(UsageError::BadValue(_))));
    }

    #[test]
    fn test_print() {
        assert_eq!(parse("print"), Ok(Some(Command::Print(None))));
        assert_eq!(parse("print %acc"), Ok(Some(Command::Print(Some(Target::Acc)))));
        assert_eq!(parse("p %pc"), Ok(Some(Command::Print(Some(Target::Pc)))));
        assert_eq!(parse("print 25"), Ok(Some(Command::Print(Some(Target::Cell(25))))));
        assert_eq!(parse("print 26"), Err(UsageError::BadAddress("26".into())));
    }

    #[test]
    fn test_set() {
        assert_eq!(
            parse("set %acc -1"),
            Ok(Some(Command::Set(Target::Acc, Word::new(9).unwrap())))
        );
        assert_eq!(
            parse("set 3 01004"),
            Ok(Some(Command::Set(Target::Cell(3), Word::new(1004).unwrap())))
        );
        assert_eq!(
            parse("set %pc"),
            Err(UsageError::Usage("set <%acc|%pc|<address>> <value>"))
        );
        assert!(matches!(parse("set %acc 123456"), Err(UsageError::BadValue(_))));
        assert!(matches!(parse("set %sp 1"), Err(UsageError::BadValue(_))));
        assert_eq!(
            parse("set %pc 3"),
            Ok(Some(Command::Set(Target::Pc, Word::new(3).unwrap())))
        );
        assert_eq!(parse("set %pc 26"), Err(UsageError::BadAddress("26".into())));
    }

    #[test]
    fn test_unknown_command() {
        assert_eq!(parse("frob 1"), Err(UsageError::UnknownCommand("frob".into())));
        assert_eq!(
            UsageError::UnknownCommand("frob".into()).to_string(),
            "frob: unknown command"
        );
    }
}
