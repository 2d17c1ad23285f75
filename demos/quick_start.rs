use panic_rail::prelude::*;
use panic_rail::recover::report_failure;
use panic_rail::{chain, TraceConfig};

fn read_config(path: &str) -> Result<String, TracedError> {
    std::fs::read_to_string(path).wrap_err_with(|| format!("reading {path}"))
}

fn load_settings() -> Result<String, TracedError> {
    // The io error gets its trace here; the outer wrap does not take another.
    read_config("does-not-exist.toml").wrap_err("loading settings")
}

fn checked_port(raw: &str) -> u16 {
    let port = raw.parse::<u16>().or_raise();
    ensure!(port >= 1024, "port {port} is privileged");
    port
}

fn main() {
    println!("Running Quick Start examples...");

    // 1. Wrapping errors
    println!("\n1. Wrapping errors:");
    match load_settings() {
        Ok(_) => println!("Success!"),
        Err(e) => {
            println!("Error: {e}");
            println!("Traces in chain: {}", chain::traces(&e).len());
        },
    }

    // 2. Nil-safe wrapping
    println!("\n2. Nil-safe wrapping:");
    let nothing = wrap!(None::<std::io::Error>, "this is never formatted");
    println!("wrap of None: {nothing:?}");

    // 3. Raising and catching
    println!("\n3. Raising and catching:");
    for raw in ["8080", "80", "http"] {
        match catch(|| checked_port(raw)) {
            Ok(port) => println!("{raw}: ok ({port})"),
            Err(e) => println!("{raw}: {e}"),
        }
    }

    // 4. Full report
    println!("\n4. Report with traces:");
    if let Err(e) = load_settings() {
        println!("{}", e.render_with_trace_config(&TraceConfig::compact()));
        println!("---");
        println!("{}", report_failure(&e));
    }
}
