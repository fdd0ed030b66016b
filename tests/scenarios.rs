use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use fade_shell::config::{FADE_PERIOD_NS, FADE_STEPS, FADE_TICK_MS, RTT_TERMINAL_SIZE};
use fade_shell::{diag_shell, DiagShell, Error, FadeController, FadeState, Port, PwmError};
use fade_shell::{PwmOutput, Shelf};

/// PWM stub: records every set call, starts failing on call `fail_on`
#[derive(Default)]
struct StubPwm {
    calls: Vec<u32>,
    fail_on: Option<usize>,
}

impl PwmOutput for StubPwm {
    fn is_ready(&self) -> bool {
        true
    }

    fn set_pulse(&mut self, period_ns: u32, pulse_ns: u32) -> Result<(), PwmError> {
        assert_eq!(period_ns, FADE_PERIOD_NS);
        self.calls.push(pulse_ns);
        match self.fail_on {
            Some(k) if self.calls.len() >= k => Err(PwmError::Device(-5)),
            _ => Ok(()),
        }
    }
}

fn pulse_sequence(ticks: usize) -> Vec<u32> {
    let mut pwm = StubPwm::default();
    let mut fade =
        FadeController::start(&mut pwm, FADE_PERIOD_NS, FADE_STEPS, FADE_TICK_MS).unwrap();
    for _ in 0..ticks {
        fade.on_tick().unwrap();
    }
    drop(fade);
    pwm.calls
}

#[test]
fn pulse_width_stays_within_period() {
    let mut state = FadeState::new(FADE_PERIOD_NS, FADE_STEPS);
    for _ in 0..1000 {
        state.advance();
        assert!(state.pulse_width() <= FADE_PERIOD_NS);
        assert_eq!(state.step().unsigned_abs(), FADE_PERIOD_NS / FADE_STEPS);
    }
}

#[test]
fn waveform_repeats_every_hundred_ticks() {
    let seq = pulse_sequence(300);

    assert_eq!(seq[0], 0);
    assert_eq!(seq[50], FADE_PERIOD_NS);
    assert_eq!(seq[100], 0);
    for i in 0..200 {
        assert_eq!(seq[i], seq[i + 100], "tick {}", i);
    }
    // linear ramp up and down
    for pair in seq[..51].windows(2) {
        assert_eq!(pair[1] - pair[0], 2000);
    }
    for pair in seq[50..101].windows(2) {
        assert_eq!(pair[0] - pair[1], 2000);
    }
}

#[test]
fn boundaries_are_hit_exactly_once_per_turn() {
    let seq = pulse_sequence(200);
    let tops = seq.iter().filter(|&&p| p == FADE_PERIOD_NS).count();
    let bottoms = seq.iter().filter(|&&p| p == 0).count();
    assert_eq!(tops, 2);
    assert_eq!(bottoms, 2);
}

#[test]
fn failing_pwm_disarms_the_controller() {
    let k = 7;
    let mut pwm = StubPwm {
        fail_on: Some(k),
        ..Default::default()
    };
    let mut fade =
        FadeController::start(&mut pwm, FADE_PERIOD_NS, FADE_STEPS, FADE_TICK_MS).unwrap();

    let mut results = Vec::new();
    for _ in 0..20 {
        results.push(fade.on_tick());
    }
    assert!(!fade.is_armed());
    drop(fade);

    assert!(results[..k - 1].iter().all(|r| r.is_ok()));
    assert_eq!(results[k - 1], Err(Error::Pwm(PwmError::Device(-5))));
    assert!(results[k..].iter().all(|r| *r == Err(Error::Disarmed)));
    assert_eq!(pwm.calls.len(), k);
}

/// Host end of the shell link: queued keystrokes in, everything printed out
#[derive(Default)]
struct Terminal {
    keys: VecDeque<u8>,
    screen: String,
}

impl fmt::Write for Terminal {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.screen.push_str(s);
        Ok(())
    }
}

impl Port for Terminal {
    fn read_byte(&mut self) -> Option<u8> {
        self.keys.pop_front()
    }
}

const PROMPT: &str = "@/> ";

fn open<'a>(shelf: &'a Shelf, term: &'a RefCell<Terminal>) -> DiagShell<'a, Terminal> {
    let mut shell = diag_shell(shelf, term);
    shell.activate().unwrap();
    shell
}

/// Types `line` and Enter, returns the reply between the echo and the next prompt
fn run(shell: &mut DiagShell<'_, Terminal>, term: &RefCell<Terminal>, line: &str) -> String {
    term.borrow_mut().screen.clear();
    for c in line.chars().chain(['\r']) {
        shell.process_char(c).unwrap();
    }

    let screen = term.borrow().screen.replace("\r\n", "\n");
    let reply = screen.strip_prefix(line).and_then(|s| s.strip_prefix('\n'));
    let reply = reply.and_then(|s| s.strip_suffix(PROMPT));
    reply.unwrap_or_else(|| panic!("{:?}", screen)).to_string()
}

#[test]
fn dump_prints_fifty_lines_of_eight_words() {
    let shelf = Shelf::new();
    let term = RefCell::new(Terminal::default());
    let mut shell = open(&shelf, &term);
    let out = run(&mut shell, &term, "test dump");

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 50);
    for (i, line) in lines.iter().enumerate() {
        let expected: Vec<String> = (0..8).map(|j| format!("0x{:08x}", 8 * i + j)).collect();
        assert_eq!(*line, expected.join(" "));
    }
}

#[test]
fn full_dump_fits_the_terminal_buffer() {
    let shelf = Shelf::new();
    let term = RefCell::new(Terminal::default());
    let mut shell = open(&shelf, &term);
    let out = run(&mut shell, &term, "test dump");

    // sent with \r\n line endings, plus the echo and the prompt
    let on_wire = out.len() + out.lines().count() + "test dump\r\n".len() + PROMPT.len();
    assert!(on_wire <= RTT_TERMINAL_SIZE, "{} bytes", on_wire);
}

#[test]
fn setvar_then_var_round_trip() {
    let shelf = Shelf::new();
    let term = RefCell::new(Terminal::default());
    let mut shell = open(&shelf, &term);

    assert_eq!(
        run(&mut shell, &term, "test setvar 42"),
        "new 'var' value: 42\n"
    );
    let out = run(&mut shell, &term, "test var");
    assert!(out.starts_with("int 'var' address: 0x"));
    assert!(out.ends_with("int 'var' value: 42\n"));

    run(&mut shell, &term, "test setvar 0");
    assert_eq!(
        run(&mut shell, &term, "test setvar 0x2A"),
        "new 'var' value: 42\n"
    );
    assert!(run(&mut shell, &term, "test var").ends_with("int 'var' value: 42\n"));
}

#[test]
fn var_address_is_stable() {
    let shelf = Shelf::new();
    let term = RefCell::new(Terminal::default());
    let mut shell = open(&shelf, &term);

    let first = run(&mut shell, &term, "test var");
    run(&mut shell, &term, "test setvar 5");
    let second = run(&mut shell, &term, "test var");
    assert_eq!(first.lines().next(), second.lines().next());
    assert_eq!(shelf.var().get(), 5);
}

#[test]
fn fn_address_is_stable() {
    let shelf = Shelf::new();
    let term = RefCell::new(Terminal::default());
    let mut shell = open(&shelf, &term);

    let first = run(&mut shell, &term, "test fn");
    let second = run(&mut shell, &term, "test fn");
    assert!(first.starts_with("fn address: 0x"));
    assert_eq!(first, second);
}

#[test]
fn typed_session_over_byte_stream() {
    let shelf = Shelf::new();
    let term = RefCell::new(Terminal::default());
    let mut shell = diag_shell(&shelf, &term);

    shell.activate().unwrap();
    term.borrow_mut().keys.extend(b"ls\r\ntest setvar 1\rtest bogus\r");
    while !term.borrow().keys.is_empty() {
        shell.poll().unwrap();
    }

    let screen = term.borrow().screen.replace("\r\n", "\n");
    assert!(screen.contains("  test  - test commands\n"));
    assert!(screen.contains("test setvar 1\nnew 'var' value: 1\n"));
    assert!(screen.contains("test bogus\n  Error: Command not found\n"));
    assert!(screen.ends_with(PROMPT));
    assert_eq!(shelf.var().get(), 1);
}

#[test]
fn backspace_edits_the_line() {
    let shelf = Shelf::new();
    let term = RefCell::new(Terminal::default());
    let mut shell = open(&shelf, &term);

    for c in "test setvar 9\x087\r".chars() {
        shell.process_char(c).unwrap();
    }
    assert_eq!(shelf.var().get(), 7);
    assert!(term.borrow().screen.contains("9\x08 \x087"));
}
