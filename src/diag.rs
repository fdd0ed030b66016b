//! `test` commands for poking at the running target from a debugger
//!
//! The host side reads the printed addresses and uses them for memory
//! reads, watchpoints and breakpoints, so the output formats are fixed.

use core::cell::{RefCell, UnsafeCell};
use core::fmt::{self, Write};
use core::ptr;

use nut_shell::{
    CliError, CommandHandler, CommandKind, CommandMeta, Directory, Node, Response, Shell,
    ShellConfig,
};

use crate::config::{ShellSettings, DUMP_WORDS, DUMP_WORDS_PER_LINE};
use crate::io::{Port, SharedIo};
use crate::parse::parse_long;

/// i32 aligned so debuggers can use it for word access and watchpoints
#[repr(C, align(16))]
pub struct DiagVar {
    value: UnsafeCell<i32>,
}

impl DiagVar {
    pub const fn new() -> Self {
        Self {
            value: UnsafeCell::new(0),
        }
    }

    // volatile: the debugger writes this behind the program's back
    pub fn get(&self) -> i32 {
        unsafe { ptr::read_volatile(self.value.get()) }
    }

    pub fn set(&self, value: i32) {
        unsafe { ptr::write_volatile(self.value.get(), value) }
    }

    pub fn address(&self) -> usize {
        self.value.get() as usize
    }
}

impl Default for DiagVar {
    fn default() -> Self {
        Self::new()
    }
}

/// State behind the `test` commands
#[derive(Default)]
pub struct Shelf {
    var: DiagVar,
}

impl Shelf {
    pub const fn new() -> Self {
        Self {
            var: DiagVar::new(),
        }
    }

    pub fn var(&self) -> &DiagVar {
        &self.var
    }
}

type Handler = fn(&Shelf, &mut dyn Write, &[&str]) -> fmt::Result;

fn cmd_test_dump(_: &Shelf, out: &mut dyn Write, _: &[&str]) -> fmt::Result {
    for first in (0..DUMP_WORDS).step_by(DUMP_WORDS_PER_LINE as usize) {
        let last = (first + DUMP_WORDS_PER_LINE).min(DUMP_WORDS);
        for word in first..last {
            if word != first {
                out.write_char(' ')?;
            }
            write!(out, "0x{:08x}", word)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

fn cmd_test_var(shelf: &Shelf, out: &mut dyn Write, _: &[&str]) -> fmt::Result {
    writeln!(out, "int 'var' address: 0x{:08x}", shelf.var.address())?;
    writeln!(out, "int 'var' value: {}", shelf.var.get())
}

fn cmd_test_setvar(shelf: &Shelf, out: &mut dyn Write, args: &[&str]) -> fmt::Result {
    let value = match parse_long(args[0]) {
        Ok(value) => value,
        Err(e) => {
            log_warn!(
                "setvar: {} in '{}', storing {}",
                e,
                args[0],
                e.lenient_value()
            );
            e.lenient_value()
        }
    };

    shelf.var.set(value);
    writeln!(out, "new 'var' value: {}", shelf.var.get())
}

fn cmd_test_fn(_: &Shelf, out: &mut dyn Write, _: &[&str]) -> fmt::Result {
    let address = cmd_test_fn as *const () as usize;
    writeln!(out, "fn address: 0x{:08x}", address)
}

/// Access levels of the command tree; every command is open
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, nut_shell::AccessLevel)]
pub enum Access {
    User = 0,
}

const fn test_command(
    id: &'static str,
    name: &'static str,
    description: &'static str,
    args: usize,
) -> CommandMeta<Access> {
    CommandMeta {
        id,
        name,
        description,
        access_level: Access::User,
        kind: CommandKind::Sync,
        min_args: args,
        max_args: args,
    }
}

const TEST_DUMP: CommandMeta<Access> = test_command(
    "test_dump",
    "dump",
    "dump large amount of data to shell",
    0,
);
const TEST_VAR: CommandMeta<Access> = test_command(
    "test_var",
    "var",
    "print address and value of an i32 variable",
    0,
);
const TEST_SETVAR: CommandMeta<Access> = test_command(
    "test_setvar",
    "setvar",
    "set the value of an i32 variable",
    1,
);
const TEST_FN: CommandMeta<Access> = test_command(
    "test_fn",
    "fn",
    "print address of the called function",
    0,
);

/// Subcommands of `test`, resolved by the `test` handler so that
/// `test dump` works on one line
pub static TEST: Directory<Access> = Directory {
    name: "test",
    children: &[
        Node::Command(&TEST_DUMP),
        Node::Command(&TEST_VAR),
        Node::Command(&TEST_SETVAR),
        Node::Command(&TEST_FN),
    ],
    access_level: Access::User,
};

const TEST_GROUP: CommandMeta<Access> = CommandMeta {
    id: "test",
    name: "test",
    description: "test commands",
    access_level: Access::User,
    kind: CommandKind::Sync,
    min_args: 0,
    // subcommands check their own counts
    max_args: ShellSettings::MAX_ARGS,
};

pub static ROOT: Directory<Access> = Directory {
    name: "/",
    children: &[Node::Command(&TEST_GROUP)],
    access_level: Access::User,
};

fn lookup(id: &str) -> Option<Handler> {
    let handler: Handler = match id {
        "test_dump" => cmd_test_dump,
        "test_var" => cmd_test_var,
        "test_setvar" => cmd_test_setvar,
        "test_fn" => cmd_test_fn,
        _ => return None,
    };
    Some(handler)
}

fn print_test_help(out: &mut dyn Write) -> fmt::Result {
    for child in TEST.children {
        if let Node::Command(cmd) = child {
            writeln!(out, "  {:<6}  - {}", cmd.name, cmd.description)?;
        }
    }
    Ok(())
}

/// Runs the `test` commands against the shelf, writing to the shell's port
pub struct DiagHandlers<'a, P> {
    shelf: &'a Shelf,
    out: &'a RefCell<P>,
}

impl<'a, P: Write> DiagHandlers<'a, P> {
    pub fn new(shelf: &'a Shelf, out: &'a RefCell<P>) -> Self {
        Self { shelf, out }
    }

    fn stream<C: ShellConfig>(
        &self,
        body: impl FnOnce(&mut dyn Write) -> fmt::Result,
    ) -> Result<Response<C>, CliError> {
        let mut out = self.out.try_borrow_mut().map_err(|_| CliError::IoError)?;
        // the shell has only echoed the command line so far
        writeln!(out)
            .and_then(|_| body(&mut *out))
            .map_err(|_| CliError::IoError)?;
        Ok(Response::success("").inline().without_postfix_newline())
    }
}

impl<P: Write, C: ShellConfig> CommandHandler<C> for DiagHandlers<'_, P> {
    fn execute_sync(&self, id: &str, args: &[&str]) -> Result<Response<C>, CliError> {
        if id != TEST_GROUP.id {
            return Err(CliError::CommandNotFound);
        }
        let Some((name, rest)) = args.split_first() else {
            return self.stream(print_test_help);
        };

        let cmd = match TEST.find_child(name) {
            Some(Node::Command(cmd)) => cmd,
            _ => return Err(CliError::CommandNotFound),
        };
        if rest.len() < cmd.min_args || rest.len() > cmd.max_args {
            return Err(CliError::InvalidArgumentCount {
                expected_min: cmd.min_args,
                expected_max: cmd.max_args,
                received: rest.len(),
            });
        }
        let handler = lookup(cmd.id).ok_or(CliError::CommandNotFound)?;

        log_debug!("test {}", cmd.name);
        self.stream(|out| handler(self.shelf, out, rest))
    }
}

/// Shell serving the `test` commands over a shared port
pub type DiagShell<'a, P> =
    Shell<'static, Access, SharedIo<'a, P>, DiagHandlers<'a, P>, ShellSettings>;

pub fn diag_shell<'a, P: Port>(shelf: &'a Shelf, port: &'a RefCell<P>) -> DiagShell<'a, P> {
    Shell::new(&ROOT, DiagHandlers::new(shelf, port), SharedIo::new(port))
}
