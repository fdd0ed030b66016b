#![no_std]
#![no_main]

use core::cell::RefCell;

use defmt::{error, info, unwrap, warn};
use embassy_executor::Spawner;
use embassy_nrf::pwm::SimplePwm;
use embassy_time::{Duration, Ticker, Timer};
use fade_shell::config::*;
use fade_shell::console::RttConsole;
use fade_shell::led::NrfPwmLed;
use fade_shell::*;
use rtt_target::{rtt_init, ChannelMode};
use static_cell::StaticCell;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // RTT first: up 0 / down 0 carry the shell, up 1 carries defmt.
    // Nothing waits on the host, a slow or detached reader only loses output.
    let channels = rtt_init! {
        up: {
            0: {
                size: RTT_TERMINAL_SIZE,
                mode: ChannelMode::NoBlockTrim,
                name: "Terminal"
            }
            1: {
                size: RTT_DEFMT_SIZE,
                mode: ChannelMode::NoBlockSkip,
                name: "defmt"
            }
        }
        down: {
            0: {
                size: RTT_INPUT_SIZE,
                name: "Terminal"
            }
        }
    };
    rtt_target::set_defmt_channel(channels.up.1);

    let p = embassy_nrf::init(Default::default());

    // lives for the whole program so `test var` always reports the same address
    static SHELF: StaticCell<Shelf> = StaticCell::new();
    let shelf = SHELF.init(Shelf::new());
    let console = RttConsole::new(channels.up.0, channels.down.0);
    unwrap!(spawner.spawn(shell_task(console, shelf)));

    // blue LED on the Conexio Stratus
    let led = NrfPwmLed::new(SimplePwm::new_1ch(p.PWM0, p.P0_03));
    match FadeController::start(led, FADE_PERIOD_NS, FADE_STEPS, FADE_TICK_MS) {
        Ok(fade) => unwrap!(spawner.spawn(fade_task(fade))),
        Err(e) => error!("LED fade not started: {}", e),
    }
}

#[embassy_executor::task]
async fn fade_task(mut fade: FadeController<NrfPwmLed<'static>>) {
    let mut ticker = Ticker::every(Duration::from_millis(fade.tick_ms()));

    loop {
        if let Err(e) = fade.on_tick() {
            // dropping the ticker stops the fade timer for good
            error!("LED fade stopped: {}", e);
            return;
        }
        ticker.next().await;
    }
}

#[embassy_executor::task]
async fn shell_task(console: RttConsole, shelf: &'static Shelf) {
    let console = RefCell::new(console);
    let mut shell = diag_shell(shelf, &console);

    if shell.activate().is_err() {
        warn!("shell prompt not written");
    }
    console.borrow_mut().flush();
    info!("shell ready");

    loop {
        let mut idle = true;
        loop {
            // the port must be free again before the shell writes to it
            let byte = console.borrow_mut().read_byte();
            let Some(byte) = byte else { break };
            idle = false;
            if shell.process_char(char::from(byte)).is_err() {
                warn!("shell output failed");
            }
        }
        console.borrow_mut().flush();

        if idle {
            Timer::after(Duration::from_millis(SHELL_POLL_MS)).await;
        }
    }
}
