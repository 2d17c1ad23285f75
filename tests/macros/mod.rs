use std::io;

use panic_rail::recover::catch;
use panic_rail::{chain, ensure, raise, traced, wrap, TraceConfig};

#[inline(never)]
fn fail_with_macro(shard: u32) -> u32 {
    raise!("shard {shard} unavailable")
}

#[test]
fn traced_formats_and_traces() {
    let region = "eu-west";
    let err = traced!("no capacity in {region}");

    assert_eq!(err.msg(), Some("no capacity in eu-west"));
    assert!(err.trace().is_some());
}

#[test]
fn wrap_macro_skips_none() {
    let mut formatted = false;
    let none = wrap!(None::<io::Error>, "{}", {
        formatted = true;
        "never"
    });

    assert!(none.is_none());
    assert!(!formatted);
}

#[test]
fn wrap_macro_wraps_some() {
    let err = wrap!(Some(io::Error::other("denied")), "opening {}", "db.sqlite").expect("wrapped");

    assert_eq!(err.to_string(), "opening db.sqlite: denied");
    assert!(err.trace().is_some());
}

#[test]
fn raise_macro_traces_the_macro_site() {
    let err = catch(|| fail_with_macro(4)).unwrap_err();

    assert_eq!(err.to_string(), "shard 4 unavailable");
    let traces = chain::traces(&*err);
    let frames = traces[0].frames(&TraceConfig::full());
    assert!(frames.first().is_some_and(|frame| frame.function.contains("fail_with_macro")));
}

#[test]
fn ensure_raises_only_when_false() {
    assert!(catch(|| ensure!(1 + 1 == 2, "math is broken")).is_ok());

    let err = catch(|| ensure!(2 < 1, "expected {} < {}", 2, 1)).unwrap_err();
    assert_eq!(err.to_string(), "expected 2 < 1");
}
