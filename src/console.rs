//! Shell transport over the RTT terminal channels

use core::fmt;

use heapless::String;
use rtt_target::{DownChannel, UpChannel};

use crate::io::Port;

const LINE_SIZE: usize = 128;

/// Line-buffered writer on an RTT up-channel with `\r\n` line endings,
/// plus the matching down-channel for input
pub struct RttConsole {
    up: UpChannel,
    down: DownChannel,
    line: String<LINE_SIZE>,
    after_cr: bool,
}

impl RttConsole {
    pub fn new(up: UpChannel, down: DownChannel) -> Self {
        Self {
            up,
            down,
            line: String::new(),
            after_cr: false,
        }
    }

    /// Hands the buffered text to the up-channel. The channel is non-blocking,
    /// so this never waits on the host.
    pub fn flush(&mut self) {
        if !self.line.is_empty() {
            self.up.write(self.line.as_bytes());
            self.line.clear();
        }
    }

    fn push(&mut self, c: char) {
        if self.line.push(c).is_err() {
            self.flush();
            self.line.push(c).ok();
        }
    }
}

impl Port for RttConsole {
    fn read_byte(&mut self) -> Option<u8> {
        let mut byte = [0u8];
        (self.down.read(&mut byte) == 1).then_some(byte[0])
    }
}

impl fmt::Write for RttConsole {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        for c in s.chars() {
            // the shell sends "\r\n", handlers send "\n"
            if c == '\n' && !self.after_cr {
                self.push('\r');
            }
            self.push(c);
            if c == '\n' {
                self.flush();
            }
            self.after_cr = c == '\r';
        }
        Ok(())
    }
}
