use std::error::Error;
use std::sync::Arc;

use panic_rail::{chain, into_shared, Errs, SharedError, TraceConfig, TracedError};

fn err(msg: &'static str) -> SharedError {
    into_shared(TracedError::plain(msg))
}

#[test]
fn collapse_of_no_failures_is_none() {
    assert!(Errs::new().collapse().is_none());
    assert!(Errs::with_len(4).collapse().is_none());
    assert!(Errs::with_len(2).into_result().is_ok());
}

#[test]
fn collapse_of_one_failure_is_that_error() {
    let only = err("disk full");
    let errs: Errs = vec![None, Some(only.clone()), None].into_iter().collect();

    let collapsed = errs.collapse().expect("one failure");
    assert!(Arc::ptr_eq(&collapsed, &only));
    assert!(collapsed.downcast_ref::<Errs>().is_none());
}

#[test]
fn collapse_of_several_failures_is_the_aggregate() {
    let errs: Errs =
        vec![Some(err("a")), None, Some(err("b")), Some(err("c"))].into_iter().collect();

    let collapsed = errs.collapse().expect("failures");
    let aggregate = collapsed.downcast_ref::<Errs>().expect("aggregate");
    assert_eq!(aggregate.len(), 4);
    assert_eq!(aggregate.failed(), 3);

    let mut seen = Vec::new();
    let _ = chain::walk(&*collapsed, &mut |e| {
        if let Some(traced) = e.downcast_ref::<TracedError>() {
            seen.push(traced.to_string());
        }
        std::ops::ControlFlow::Continue(())
    });
    assert_eq!(seen, ["a", "b", "c"]);
}

#[test]
fn slots_keep_their_positions() {
    let mut errs = Errs::with_len(3);
    assert!(errs.set(2, Some(err("late"))));
    assert!(!errs.set(3, Some(err("out of range"))));

    assert_eq!(errs.len(), 3);
    assert!(errs.get(0).is_none());
    assert_eq!(errs.get(2).map(ToString::to_string).as_deref(), Some("late"));
    assert_eq!(errs.iter().map(|slot| slot.is_some()).collect::<Vec<_>>(), [false, false, true]);
}

#[test]
fn display_joins_failures() {
    let errs: Errs = vec![Some(err("refused")), None, Some(err("timeout"))].into_iter().collect();

    assert_eq!(errs.to_string(), "2 errors: refused; timeout");
    assert_eq!(errs.source().map(ToString::to_string).as_deref(), Some("refused"));
}

#[test]
fn render_lists_failed_slots_by_index() {
    let errs: Errs = vec![Some(err("refused")), None, Some(err("timeout"))].into_iter().collect();

    let text = panic_rail::types::render_with_trace(&errs, &TraceConfig::default());
    assert_eq!(text, "2 errors:\n  [0]\n    refused\n  [2]\n    timeout");
}

#[test]
fn equality_is_slotwise() {
    let shared = err("a");
    let lhs: Errs = vec![Some(shared.clone()), None].into_iter().collect();
    let rhs: Errs = vec![Some(shared), None].into_iter().collect();
    let shifted: Errs = vec![None, Some(err("a"))].into_iter().collect();

    assert_eq!(lhs, rhs);
    assert_ne!(lhs, shifted);
}

#[test]
fn aggregates_nest() {
    let inner: Errs = vec![Some(err("x")), Some(err("y"))].into_iter().collect();
    let outer: Errs =
        vec![Some(Arc::new(inner) as SharedError), Some(err("z"))].into_iter().collect();

    assert_eq!(chain::count(&outer, |e| e.is::<TracedError>()), 3);
    assert!(chain::is(&outer, &TracedError::plain("y")));
}
