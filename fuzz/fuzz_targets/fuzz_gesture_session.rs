#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tactile_core::{
    ContactEvent, ContactPoint, Gesture, GestureConfig, GestureHandlers, GestureSession,
    TouchPhase,
};

#[derive(Debug, Arbitrary)]
enum Phase {
    Start,
    Move,
    End,
    Cancel,
    Tick,
}

#[derive(Debug, Arbitrary)]
struct Step {
    phase: Phase,
    dt: u16,
    contacts: Vec<(i16, i16)>,
    released: Option<(i16, i16)>,
}

fuzz_target!(|steps: Vec<Step>| {
    let mut gs = GestureSession::new(GestureConfig::default(), GestureHandlers::new());
    let mut t = 0u64;
    let mut terminal_since_start = 0usize;

    for step in steps.into_iter().take(256) {
        t += u64::from(step.dt);
        let point = |(x, y): (i16, i16)| ContactPoint::new(f64::from(x), f64::from(y), t);
        let contacts: Vec<ContactPoint> =
            step.contacts.iter().take(4).copied().map(point).collect();

        let phase = match step.phase {
            Phase::Start => TouchPhase::Start,
            Phase::Move => TouchPhase::Move,
            Phase::End => TouchPhase::End,
            Phase::Cancel => TouchPhase::Cancel,
            Phase::Tick => {
                let out = gs.advance(t);
                check(&out);
                terminal_since_start += lifecycle_terminals(&out);
                assert!(terminal_since_start <= 1);
                continue;
            }
        };
        let event = ContactEvent {
            phase,
            contacts,
            released: step.released.map(point),
        };
        let out = gs.handle(&event);
        check(&out);

        // Timers due before a start belong to the superseded lifecycle, and
        // a deferred tap always belongs to an earlier one.
        if phase == TouchPhase::Start {
            terminal_since_start = 0;
            continue;
        }
        terminal_since_start += lifecycle_terminals(&out);
        assert!(terminal_since_start <= 1, "lifecycle emitted {terminal_since_start}");
    }

    gs.reset();
    assert!(gs.advance(u64::MAX).is_empty());
});

fn lifecycle_terminals(out: &[Gesture]) -> usize {
    out.iter()
        .filter(|g| g.is_terminal() && !matches!(g, Gesture::Tap { .. }))
        .count()
}

fn check(out: &[Gesture]) {
    for g in out {
        if let Gesture::PinchZoom { scale } = g {
            assert!(scale.is_finite() && *scale >= 0.0, "bad scale {scale}");
        }
    }
}
