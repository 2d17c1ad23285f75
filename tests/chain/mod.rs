use std::io;
use std::ops::ControlFlow;
use std::sync::Arc;

use panic_rail::{chain, into_shared, Errs, PanicError, SharedError, TracedError};

fn aggregate() -> (Errs, SharedError) {
    let timeout = into_shared(io::Error::new(io::ErrorKind::TimedOut, "timed out"));
    let errs: Errs = vec![
        Some(into_shared(TracedError::plain("refused"))),
        None,
        Some(into_shared(TracedError::wrap(timeout.clone(), "probe 3"))),
    ]
    .into_iter()
    .collect();
    (errs, timeout)
}

#[test]
fn walk_visits_causes_in_depth_first_order() {
    let err = TracedError::plain("outer")
        .with_cause(TracedError::plain("middle").with_cause(io::Error::other("root")));

    let mut seen = Vec::new();
    let flow = chain::walk(&err, &mut |e| {
        seen.push(e.to_string());
        ControlFlow::Continue(())
    });

    assert!(flow.is_continue());
    assert_eq!(seen, ["outer: middle: root", "middle: root", "root"]);
}

#[test]
fn walk_stops_when_visitor_breaks() {
    let (errs, _) = aggregate();

    let mut visited = 0;
    let flow = chain::walk(&errs, &mut |_| {
        visited += 1;
        if visited == 2 {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    });

    assert!(flow.is_break());
    assert_eq!(visited, 2);
}

#[test]
fn is_finds_members_of_aggregates() {
    let (errs, timeout) = aggregate();

    assert!(chain::is(&errs, &*timeout));
    assert!(chain::is(&errs, &TracedError::plain("refused")));
    assert!(!chain::is(&errs, &TracedError::plain("unreachable")));
}

#[test]
fn find_returns_first_match_of_type() {
    let (errs, _) = aggregate();

    let io_err = chain::find::<io::Error>(&errs).expect("io error");
    assert_eq!(io_err.kind(), io::ErrorKind::TimedOut);
    assert!(chain::find::<PanicError>(&errs).is_none());
}

#[test]
fn foreign_errors_compare_by_identity() {
    let a = into_shared(io::Error::other("same text"));
    let b = into_shared(io::Error::other("same text"));

    assert!(chain::same_shared(&a, &a.clone()));
    assert!(!chain::same_shared(&a, &b));
    assert!(chain::same_error(&*a, &*a));
}

#[test]
fn has_trace_looks_through_the_whole_chain() {
    let untraced = TracedError::plain("outer").with_cause(io::Error::other("root"));
    assert!(!chain::has_trace(&untraced));

    let traced = TracedError::plain("outer").with_cause(TracedError::new("root"));
    assert!(chain::has_trace(&traced));

    let errs: Errs =
        vec![Some(into_shared(untraced)), Some(into_shared(traced))].into_iter().collect();
    assert!(chain::has_trace(&errs));
}

#[test]
fn root_cause_follows_sources() {
    let root: SharedError = Arc::new(io::Error::other("root"));
    let err = TracedError::wrap(TracedError::wrap(root.clone(), "a"), "b");

    assert!(std::ptr::addr_eq(chain::root_cause(&err), &*root));
}

#[test]
fn optional_subjects_answer_for_none() {
    let (errs, timeout) = aggregate();
    let shared = into_shared(errs);

    assert!(chain::is_opt(Some(&shared), &*timeout));
    assert!(chain::find_opt::<io::Error>(Some(&shared)).is_some());
    assert!(chain::any_opt(Some(&shared), |e| e.to_string() == "refused"));

    assert!(!chain::is_opt(None, &*timeout));
    assert!(chain::find_opt::<io::Error>(None).is_none());
    assert!(!chain::any_opt(None, |_| true));
    assert!(!chain::has_trace_opt(None));
}

#[test]
fn is_looks_through_extra_wrapping_of_the_cause() {
    let reset = into_shared(io::Error::new(io::ErrorKind::ConnectionReset, "reset"));
    let direct = TracedError::plain("sync").with_cause(reset.clone());
    let through_wrap =
        TracedError::plain("sync").with_cause(TracedError::wrap(reset.clone(), "dial"));

    assert!(chain::is(&through_wrap, &direct));
    let other_cause = TracedError::plain("sync").with_cause(io::Error::other("reset"));
    assert!(!chain::is(&through_wrap, &other_cause));
    let other_msg = TracedError::plain("push").with_cause(reset);
    assert!(!chain::is(&through_wrap, &other_msg));
    // equality itself stays strict and symmetric
    assert!(through_wrap != direct);
    assert!(direct != through_wrap);
}
