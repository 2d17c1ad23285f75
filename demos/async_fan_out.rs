//! The same two contracts over futures on the tokio runtime.

use std::time::Duration;

use panic_rail::async_ext::{conc_futures_map, conc_race_futures};
use panic_rail::conc::CancellationToken;
use panic_rail::TracedError;

async fn lookup(id: u32) -> Result<String, TracedError> {
    tokio::time::sleep(Duration::from_millis(u64::from(id) * 5)).await;
    if id == 3 {
        return Err(TracedError::new(format!("user {id} not found")));
    }
    Ok(format!("user-{id}"))
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_max_level(tracing::Level::DEBUG).init();

    let (names, errs) = conc_futures_map((1..=4).map(lookup)).await;
    println!("names: {names:?}");
    if let Some(err) = errs.collapse() {
        println!("failure: {err}");
    }

    let result = conc_race_futures((1..=4_u32).map(|id| {
        move |token: CancellationToken| async move {
            tokio::select! {
                _ = token.cancelled() => {
                    println!("probe {id} cancelled");
                    Ok(())
                }
                found = lookup(id) => found.map(drop),
            }
        }
    }))
    .await;
    println!("race: {:?}", result.map_err(|e| e.to_string()));
}
