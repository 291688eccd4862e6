use crate::interpreter::{self, Interpreter};
use ansi_term::Colour::Red;
use linefeed::{DefaultTerminal, Interface, ReadResult, Terminal};
use std::fmt;
use std::io::{self, Read};
use std::path::PathBuf;

#[derive(Debug)]
pub enum Error {
    IO(io::Error),
    Interpreter(interpreter::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IO(e) => write!(f, "io error: {}", e),
            Error::Interpreter(e) => write!(f, "{}", e),
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Self::IO(e)
    }
}

impl From<interpreter::Error> for Error {
    fn from(e: interpreter::Error) -> Self {
        Self::Interpreter(e)
    }
}

pub fn setup() -> io::Result<Interface<DefaultTerminal>> {
    let interface = linefeed::Interface::new("knob")?;
    interface.set_prompt(">>> ")?;
    if let Some(path) = history_path() {
        interface.load_history(path).ok();
    };
    Ok(interface)
}

fn history_path() -> Option<PathBuf> {
    match dirs::data_dir() {
        Some(mut path) => {
            path.push(".knob_history");
            Some(path)
        }
        None => None,
    }
}

pub fn save_history<T: Terminal>(interface: &Interface<T>) -> io::Result<()> {
    match history_path() {
        Some(path) => interface.save_history(path),
        None => Ok(()),
    }
}

fn describe_error(e: &interpreter::Error) -> String {
    let message = format!("error: {}", e);
    match atty::is(atty::Stream::Stdout) {
        true => Red.paint(message).to_string(),
        false => message,
    }
}

pub fn repl<T: Terminal>(interface: &Interface<T>, interpreter: &mut Interpreter) {
    loop {
        match interface.read_line() {
            Ok(ReadResult::Eof) => break,
            Ok(ReadResult::Signal(sig)) => {
                writeln!(interface, "Received signal {:?}", sig).ok();
            }
            Ok(ReadResult::Input(line)) => {
                if line.trim().is_empty() {
                    continue;
                }
                interface.add_history_unique(line.clone());
                match interpreter.rep(&line) {
                    Ok(Some(text)) => writeln!(interface, "{}", text).ok(),
                    Ok(None) => None,
                    Err(e) => writeln!(interface, "{}", describe_error(&e)).ok(),
                };
            }
            Err(e) => {
                writeln!(interface, "Error: {}", e).ok();
                break;
            }
        }
    }
}

pub fn run_source(source: &str, interpreter: &mut Interpreter) -> Result<(), Error> {
    interpreter.run(source)?;
    Ok(())
}

pub fn run_file(path: &str, interpreter: &mut Interpreter) -> Result<(), Error> {
    log::info!("running {}", path);
    let source = std::fs::read_to_string(path)?;
    run_source(&source, interpreter)
}

/// `knob FILE` runs a file, piped stdin is run as a file, and a terminal gets
/// the interactive loop.
pub fn launch(args: Vec<String>) -> Result<(), Error> {
    let mut interpreter = Interpreter::new();
    if let Some(path) = args.get(1) {
        return run_file(path, &mut interpreter);
    }
    if !atty::is(atty::Stream::Stdin) {
        let mut source = String::new();
        io::stdin().read_to_string(&mut source)?;
        return run_source(&source, &mut interpreter);
    }
    let interface = setup()?;
    repl(&interface, &mut interpreter);
    save_history(&interface)?;
    Ok(())
}
