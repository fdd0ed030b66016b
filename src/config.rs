use nut_shell::ShellConfig;

/// PWM period handed to every set call, in nanoseconds (10 kHz)
pub const FADE_PERIOD_NS: u32 = 100_000;
/// Number of ticks for one ramp from off to full brightness
pub const FADE_STEPS: u32 = 50;
/// Fade timer interval
pub const FADE_TICK_MS: u64 = 25;

pub const SHELL_POLL_MS: u64 = 10;

/// `test dump` prints the integers 0..DUMP_WORDS, DUMP_WORDS_PER_LINE per line
pub const DUMP_WORDS: u32 = 400;
pub const DUMP_WORDS_PER_LINE: u32 = 8;

/// Holds a full `test dump` (about 4.5 KB) while the host is not reading
pub const RTT_TERMINAL_SIZE: usize = 8192;
pub const RTT_DEFMT_SIZE: usize = 1024;
pub const RTT_INPUT_SIZE: usize = 64;

/// Command shell limits and messages
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct ShellSettings;

impl ShellConfig for ShellSettings {
    const MAX_INPUT: usize = 128;
    const MAX_PATH_DEPTH: usize = 4;
    const MAX_ARGS: usize = 8;
    const MAX_PROMPT: usize = 32;
    const MAX_RESPONSE: usize = 256;
    const HISTORY_SIZE: usize = 10;

    const MSG_WELCOME: &'static str = "fade_shell: type 'test' for diagnostics, '?' for help";
    const MSG_LOGIN_PROMPT: &'static str = "Login> ";
    const MSG_LOGIN_SUCCESS: &'static str = "Logged in";
    const MSG_LOGIN_FAILED: &'static str = "Login failed";
    const MSG_LOGOUT: &'static str = "Logged out";
    const MSG_INVALID_LOGIN_FORMAT: &'static str = "Invalid format. Use name:pass";
}
