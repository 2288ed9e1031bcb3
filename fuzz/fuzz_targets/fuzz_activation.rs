#![no_main]

use libfuzzer_sys::fuzz_target;
use perch_runtime::{ActivationController, Phase};

fuzz_target!(|data: &[u8]| {
    let mut ctl = ActivationController::new();

    // Each byte is one event: the high bits pick the operation, the low
    // bits the target.
    for &byte in data {
        let id = byte & 0x07;
        match byte >> 6 {
            0 | 1 => {
                ctl.tap(id);
            }
            2 => {
                ctl.run_deferred();
            }
            _ => {
                if byte & 0x20 == 0 {
                    ctl.dismiss();
                } else {
                    ctl.clear_active();
                }
            }
        }

        let state = ctl.state();
        assert!(
            !(state.presented && state.pending.is_some()),
            "presented while a switch is pending: {state:?}"
        );
        assert!(!state.presented || state.active.is_some());
        match ctl.phase() {
            Phase::Idle => assert!(!state.presented && state.pending.is_none()),
            Phase::Presenting => assert!(state.presented),
            Phase::Transitioning => assert!(state.pending.is_some()),
        }
    }

    ctl.dismiss();
    ctl.run_deferred();
    assert_eq!(ctl.phase(), Phase::Idle);
});
