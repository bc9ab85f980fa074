pub mod action_executor;
pub mod actions;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod logging;
pub mod model;
pub mod runtime;
pub mod search;
pub mod snapshot;
pub mod tags;
pub mod transport;
pub mod updates;

#[cfg(test)]
mod tests {
    mod query_latency_test {
        include!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../tests/perf/query_latency_test.rs"
        ));
    }
}
