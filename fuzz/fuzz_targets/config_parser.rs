#![no_main]

use coinsim::{Experiment, SimulatorConfig};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        // Parsing and validation must reject bad input without panicking
        if let Ok(config) = SimulatorConfig::from_toml_str(input) {
            let _ = Experiment::new(config);
        }
    }
});
