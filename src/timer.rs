#[cfg(not(target_arch = "wasm32"))]
pub use normal::Stopwatch;
#[cfg(target_arch = "wasm32")]
pub use wasm::Stopwatch;

#[cfg(target_arch = "wasm32")]
mod wasm {

    use js_sys::Date;

    #[derive(Copy, Clone)]
    pub struct Stopwatch {
        started: f64,
    }

    impl Stopwatch {
        pub fn start() -> Stopwatch {
            Stopwatch { started: Date::now() }
        }
        pub fn elapsed_millis(&self) -> u64 { (Date::now() - self.started).max(0.0) as u64 }
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod normal {

    use std::time::Instant;

    #[derive(Copy, Clone)]
    pub struct Stopwatch {
        started: Instant,
    }

    impl Stopwatch {
        pub fn start() -> Stopwatch {
            Stopwatch { started: Instant::now() }
        }
        pub fn elapsed_millis(&self) -> u64 { self.started.elapsed().as_millis() as u64 }
    }
}
