//! Waits for every task and reports every failure.

use std::thread;
use std::time::Duration;

use panic_rail::conc::{conc_errs, conc_map_errs};
use panic_rail::recover::report_failure;
use panic_rail::TracedError;

fn fetch_size(url: &str) -> Result<usize, TracedError> {
    thread::sleep(Duration::from_millis(url.len() as u64));
    if url.contains("broken") {
        return Err(TracedError::new(format!("{url} returned 503")));
    }
    if url.contains("crash") {
        panic!("parser crashed on {url}");
    }
    Ok(url.len() * 100)
}

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let urls = [
        "https://example.com/a",
        "https://example.com/broken",
        "https://example.com/b",
        "https://example.com/crash",
    ];

    let (sizes, errs) = conc_map_errs(urls, fetch_size);
    for (url, size) in urls.iter().zip(&sizes) {
        println!("{url}: {size}");
    }
    println!("{} of {} failed", errs.failed(), errs.len());

    if let Some(err) = errs.collapse() {
        println!("{}", report_failure(&*err));
    }

    let errs = conc_errs((0..3).map(|i| {
        move || {
            thread::sleep(Duration::from_millis(10 * i));
            Ok::<_, TracedError>(())
        }
    }));
    println!("second batch all ok: {}", errs.all_ok());
}
