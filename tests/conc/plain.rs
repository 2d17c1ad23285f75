use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use panic_rail::conc::{
    conc, conc_errs, conc_map, conc_map_errs, conc_map_or_raise, conc_or_raise,
};
use panic_rail::recover::catch;
use panic_rail::{chain, into_shared, Errs, PanicError, SharedError, TraceConfig, TracedError};

type Task<'a> = Box<dyn FnOnce() -> Result<(), TracedError> + Send + 'a>;

#[inline(never)]
fn run_batch() {
    let tasks: Vec<Task<'static>> = vec![
        Box::new(|| Ok(())),
        Box::new(|| Err(TracedError::plain("replica 2 lagging"))),
    ];
    conc_or_raise(tasks);
}

#[test]
fn no_tasks_means_no_errors() {
    let errs = conc_errs(Vec::<Task<'static>>::new());

    assert!(errs.is_empty());
    assert!(conc(Vec::<Task<'static>>::new()).is_ok());
    assert_eq!(conc_map(Vec::<u8>::new(), |n| Ok::<_, io::Error>(n)).unwrap(), Vec::<u8>::new());
}

#[test]
fn single_task_runs_on_the_calling_thread() {
    let caller = thread::current().id();
    let mut ran_on = None;

    let errs = conc_errs([|| {
        ran_on = Some(thread::current().id());
        Ok::<_, io::Error>(())
    }]);

    assert!(errs.all_ok());
    assert_eq!(ran_on, Some(caller));
}

#[test]
fn several_tasks_run_on_named_threads() {
    let (names, errs) = conc_map_errs(0..3, |_| {
        Ok::<_, io::Error>(thread::current().name().map(str::to_owned).unwrap_or_default())
    });

    assert!(errs.all_ok());
    assert_eq!(names, ["conc-0", "conc-1", "conc-2"]);
}

#[test]
fn map_preserves_input_order() {
    let delays = [40_u64, 5, 25, 0, 15];

    let (values, errs) = conc_map_errs(delays, |delay| {
        thread::sleep(Duration::from_millis(delay));
        Ok::<_, io::Error>(delay * 2)
    });

    assert!(errs.all_ok());
    assert_eq!(values, [80, 10, 50, 0, 30]);
}

#[test]
fn every_task_runs_even_after_a_failure() {
    let finished = AtomicUsize::new(0);
    let finished = &finished;

    let tasks: Vec<Task<'_>> = vec![
        Box::new(|| Err(TracedError::plain("first fails fast"))),
        Box::new(move || {
            thread::sleep(Duration::from_millis(20));
            finished.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
        Box::new(move || {
            thread::sleep(Duration::from_millis(30));
            finished.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }),
    ];
    let errs = conc_errs(tasks);

    assert_eq!(finished.load(Ordering::SeqCst), 2);
    assert_eq!(errs.len(), 3);
    assert_eq!(errs.failed(), 1);
}

#[test]
fn a_panicking_task_is_isolated() {
    let tasks: Vec<Task<'static>> = vec![
        Box::new(|| Ok(())),
        Box::new(|| -> Result<(), TracedError> { panic!("worker 1 crashed") }),
        Box::new(|| Ok(())),
    ];
    let errs = conc_errs(tasks);

    assert_eq!(errs.failed(), 1);
    let failure = errs.get(1).expect("slot 1 failed");
    let panic = chain::find::<PanicError>(&**failure).expect("panic error");
    assert_eq!(panic.message(), "worker 1 crashed");
    assert!(chain::has_trace(&**failure));
}

#[test]
fn one_failure_collapses_to_itself() {
    let tasks: Vec<Task<'static>> = vec![
        Box::new(|| Ok(())),
        Box::new(|| Err(TracedError::plain("quota exceeded"))),
    ];

    let err = conc(tasks).unwrap_err();
    assert!(err.downcast_ref::<Errs>().is_none());
    assert_eq!(err.to_string(), "quota exceeded");
}

#[test]
fn a_lone_failing_task_comes_back_as_its_own_error() {
    let refused: SharedError = into_shared(TracedError::plain("connection refused"));
    let returned = refused.clone();

    let err = conc([move || Err::<(), _>(returned)]).unwrap_err();

    assert!(err.downcast_ref::<Errs>().is_none());
    assert!(Arc::ptr_eq(&err, &refused));
}

#[test]
fn a_lone_panicking_task_comes_back_as_its_own_error() {
    let err = conc([|| -> Result<(), TracedError> { panic!("worker 0 crashed") }]).unwrap_err();

    assert!(err.downcast_ref::<Errs>().is_none());
    let panic = chain::find::<PanicError>(&*err).expect("panic error");
    assert_eq!(panic.message(), "worker 0 crashed");
    assert!(chain::has_trace(&*err));
}

#[test]
fn several_failures_collapse_to_the_aggregate() {
    let tasks: Vec<Task<'static>> = vec![
        Box::new(|| Err(TracedError::plain("a"))),
        Box::new(|| Ok(())),
        Box::new(|| Err(TracedError::plain("b"))),
    ];

    let err = conc(tasks).unwrap_err();
    let errs = err.downcast_ref::<Errs>().expect("aggregate");
    assert_eq!(errs.len(), 3);
    assert!(chain::is(&*err, &TracedError::plain("a")));
    assert!(chain::is(&*err, &TracedError::plain("b")));
}

#[test]
fn conc_or_raise_traces_the_call_site() {
    let err = catch(run_batch).unwrap_err();

    assert_eq!(err.to_string(), "replica 2 lagging");
    let traces = chain::traces(&*err);
    assert_eq!(traces.len(), 1);
    let frames = traces[0].frames(&TraceConfig::full());
    assert!(
        frames.first().is_some_and(|frame| frame.function.contains("run_batch")),
        "trace did not start at the runner's caller: {frames:?}"
    );
}

#[test]
fn map_fills_failed_slots_with_default() {
    let (values, errs) = conc_map_errs(["3", "x", "5"], |s: &str| s.parse::<i64>());

    assert_eq!(values, [3, 0, 5]);
    assert_eq!(errs.failed(), 1);
    assert!(chain::find::<std::num::ParseIntError>(&**errs.get(1).expect("failed")).is_some());
}

#[test]
fn map_or_raise_returns_values_or_raises() {
    let doubled = catch(|| conc_map_or_raise(1..=3, |n: u32| Ok::<_, io::Error>(n * 2))).unwrap();
    assert_eq!(doubled, [2, 4, 6]);

    let err = catch(|| {
        conc_map_or_raise(1..=3, |n: u32| {
            if n == 2 {
                return Err(io::Error::other("two is not allowed"));
            }
            Ok(n)
        })
    })
    .unwrap_err();
    assert!(chain::find::<io::Error>(&*err).is_some());
}

#[test]
fn tasks_may_borrow_from_the_caller() {
    let shared = Arc::new(vec![1_u32, 2, 3]);
    let local = vec![10_u32, 20, 30];

    let sums = conc_map(0..3_usize, |i| Ok::<_, io::Error>(shared[i] + local[i])).unwrap();

    assert_eq!(sums, [11, 22, 33]);
}
