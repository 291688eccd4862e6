use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use knob::interpreter;
use knob::{Interpreter, Value};

/// Collects everything `print` writes so tests can inspect it.
#[derive(Clone, Default)]
pub struct SharedBuffer(Rc<RefCell<Vec<u8>>>);

impl SharedBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

pub fn setup() -> (Interpreter, SharedBuffer) {
    // Integration tests will call this method multiple times; ignore the error.
    if let Err(_err) = pretty_env_logger::try_init() {}

    let buffer = SharedBuffer::default();
    let interpreter = Interpreter::with_output(Box::new(buffer.clone()));
    (interpreter, buffer)
}

pub fn result<S: AsRef<str>>(source: S) -> Value {
    let (mut interpreter, _) = setup();
    interpreter
        .run(source.as_ref())
        .unwrap_or_else(|e| panic!("{:?} failed: {}", source.as_ref(), e))
}

pub fn error<S: AsRef<str>>(source: S) -> interpreter::Error {
    let (mut interpreter, _) = setup();
    match interpreter.run(source.as_ref()) {
        Ok(value) => panic!("{:?} succeeded with {}", source.as_ref(), value),
        Err(e) => e,
    }
}

pub fn output<S: AsRef<str>>(source: S) -> String {
    let (mut interpreter, buffer) = setup();
    interpreter
        .run(source.as_ref())
        .unwrap_or_else(|e| panic!("{:?} failed: {}", source.as_ref(), e));
    buffer.contents()
}
