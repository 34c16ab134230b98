mod allocation;
mod engine;

pub use allocation::bench_allocation;
pub use engine::bench_engine;
