use std::collections::HashMap;

#[cfg(target_arch = "wasm32")]
use web_sys::console;

use crate::timer::Stopwatch;

/// Levelled logger that writes to stdout natively and to the browser console
/// on wasm.
#[derive(Clone)]
pub struct Logger {
    /// 10 is everything and 0 is nothing
    level: u8,
    timings: HashMap<String, Stopwatch>,
}

impl Logger {

    pub fn new(level: u8) -> Self {
        Logger { level, timings: HashMap::new() }
    }

    pub fn silent() -> Self { Logger::new(0) }

    pub fn level(&self) -> u8 { self.level }

    pub fn enabled(&self, level: u8) -> bool { level > 0 && level <= self.level }

    pub fn log(&self, level: u8, msg: &str) {
        if self.enabled(level) {

            #[cfg(not(target_arch = "wasm32"))]
            println!("{}", msg);

            #[cfg(target_arch = "wasm32")]
            console::log_1(&msg.into());

        }
    }

    /// Only builds the message if it would be printed.
    pub fn log_lazy(&self, level: u8, msg: impl FnOnce() -> String) {
        if self.enabled(level) {
            self.log(level, &msg());
        }
    }

    pub fn warn(&self, msg: &str) {
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("warning: {}", msg);

        #[cfg(target_arch = "wasm32")]
        console::warn_1(&msg.into());
    }

    pub fn time_start(&mut self, level: u8, name: &str) {
        if self.enabled(level) {
            self.timings.insert(name.to_string(), Stopwatch::start());
        }
    }

    pub fn time_end(&mut self, level: u8, name: &str) {
        if !self.enabled(level) { return; }
        match self.timings.remove(name) {
            Some(watch) => {
                let millis = watch.elapsed_millis();
                self.log(level, &format!("{}: {}.{:03}s", name, millis / 1000, millis % 1000));
            }
            None => self.warn(&format!("time_end called for unknown timing \"{}\"", name)),
        }
    }
}

impl Default for Logger {
    fn default() -> Self { Logger::silent() }
}
