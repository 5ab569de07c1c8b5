#![no_main]

use std::cell::Cell;
use std::rc::Rc;
use std::task::Context;

use arbitrary::Arbitrary;
use futures::FutureExt as _;
use futures::task::noop_waker_ref;
use libfuzzer_sys::fuzz_target;
use tactile_core::pull_refresh::RefreshFuture;
use tactile_core::{PullPhase, PullRefreshConfig, PullRefreshController, RefreshError};

#[derive(Debug, Arbitrary)]
enum Op {
    Start { y: i16, scroll_top: i8 },
    Move { y: i16, scroll_top: i8 },
    End,
    Cancel,
    Enable(bool),
    Settle { fail: bool },
}

fuzz_target!(|ops: Vec<Op>| {
    let calls = Rc::new(Cell::new(0u32));
    let outcome = Rc::new(Cell::new(false));
    let (calls_in, outcome_in) = (Rc::clone(&calls), Rc::clone(&outcome));
    let refresher = move || -> RefreshFuture {
        calls_in.set(calls_in.get() + 1);
        let fail = outcome_in.get();
        async move {
            if fail {
                Err(RefreshError::failed("fuzz"))
            } else {
                Ok(())
            }
        }
        .boxed_local()
    };
    let mut ctl = PullRefreshController::new(PullRefreshConfig::default(), refresher);
    let mut cx = Context::from_waker(noop_waker_ref());
    let mut settled = 0u32;

    for op in ops.into_iter().take(512) {
        match op {
            Op::Start { y, scroll_top } => {
                ctl.on_drag_start(f64::from(y), f64::from(scroll_top));
            }
            Op::Move { y, scroll_top } => ctl.on_drag_move(f64::from(y), f64::from(scroll_top)),
            Op::End => {
                ctl.on_drag_end();
            }
            Op::Cancel => ctl.on_drag_cancel(),
            Op::Enable(on) => ctl.set_enabled(on),
            Op::Settle { fail } => {
                outcome.set(fail);
                if ctl.poll_refresh(&mut cx).is_ready() {
                    settled = calls.get();
                }
            }
        }
        // Never more than one refresh in flight.
        let in_flight = calls.get() - settled;
        assert!(in_flight <= 1);
        assert_eq!(in_flight == 1, ctl.phase() == PullPhase::Refreshing);
        assert_eq!(u64::from(calls.get()), ctl.refresh_count());
    }
});
