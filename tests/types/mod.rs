use panic_rail::{into_shared, BoxError, SharedError, TracedError};

pub mod errs;

#[test]
fn into_shared_keeps_identity_of_shared_errors() {
    let shared: SharedError = into_shared(TracedError::plain("boom"));
    let again = into_shared(shared.clone());

    assert!(std::sync::Arc::ptr_eq(&shared, &again));
    assert!(again.downcast_ref::<TracedError>().is_some());
}

#[test]
fn into_shared_accepts_boxed_and_string_errors() {
    let boxed: BoxError = Box::new(std::io::Error::other("denied"));
    let from_box = into_shared(boxed);
    assert!(from_box.downcast_ref::<std::io::Error>().is_some());

    let from_str = into_shared("plain message");
    assert_eq!(from_str.to_string(), "plain message");
}
