//! Character transport for the command shell
//!
//! The shell and the `test` handlers write to the same port: the shell
//! echoes input and prints prompts and errors, the handlers stream their
//! output directly so it is not bounded by the shell's response buffer.

use core::cell::RefCell;
use core::fmt::{self, Write};

use nut_shell::CharIo;

/// Non-blocking byte input plus text output
pub trait Port: fmt::Write {
    fn read_byte(&mut self) -> Option<u8>;
}

/// `CharIo` over a port shared with the command handlers
pub struct SharedIo<'a, P> {
    port: &'a RefCell<P>,
}

impl<'a, P: Port> SharedIo<'a, P> {
    pub fn new(port: &'a RefCell<P>) -> Self {
        Self { port }
    }
}

impl<P: Port> CharIo for SharedIo<'_, P> {
    type Error = fmt::Error;

    fn get_char(&mut self) -> Result<Option<char>, fmt::Error> {
        let mut port = self.port.try_borrow_mut().map_err(|_| fmt::Error)?;
        Ok(port.read_byte().map(char::from))
    }

    fn put_char(&mut self, c: char) -> Result<(), fmt::Error> {
        let mut port = self.port.try_borrow_mut().map_err(|_| fmt::Error)?;
        port.write_char(c)
    }

    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        let mut port = self.port.try_borrow_mut().map_err(|_| fmt::Error)?;
        port.write_str(s)
    }
}
