//! Probes a set of endpoints and stops at the first one that fails.

use std::thread;
use std::time::{Duration, Instant};

use panic_rail::conc::{conc_race, conc_race_with, CancellationToken};
use panic_rail::TracedError;

type Probe = Box<dyn FnOnce(CancellationToken) -> Result<(), TracedError> + Send>;

fn probe(name: &'static str, delay: Duration, healthy: bool) -> Probe {
    Box::new(move |token: CancellationToken| {
        let start = Instant::now();
        while start.elapsed() < delay {
            if token.is_cancelled() {
                println!("  {name}: cancelled after {:?}", start.elapsed());
                return Ok(());
            }
            thread::sleep(Duration::from_millis(1));
        }
        if healthy {
            println!("  {name}: healthy");
            Ok(())
        } else {
            Err(TracedError::new(format!("{name} did not answer")))
        }
    })
}

fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    println!("1. One failing probe:");
    let start = Instant::now();
    let result = conc_race([
        probe("db", Duration::from_millis(100), true),
        probe("cache", Duration::from_millis(10), false),
        probe("queue", Duration::from_millis(100), true),
    ]);
    println!("  result after {:?}: {:?}", start.elapsed(), result.map_err(|e| e.to_string()));
    // give the cancelled probes a moment to print
    thread::sleep(Duration::from_millis(20));

    println!("\n2. Deadline from a parent token:");
    let deadline = CancellationToken::new();
    let timer = deadline.clone();
    thread::spawn(move || {
        thread::sleep(Duration::from_millis(30));
        timer.cancel();
    });
    let probes = [
        probe("slow-a", Duration::from_secs(5), true),
        probe("slow-b", Duration::from_secs(5), true),
    ];
    let result = conc_race_with(&deadline, probes);
    println!("  result: {:?}", result.map_err(|e| e.to_string()));
}
