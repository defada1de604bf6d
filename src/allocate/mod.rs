mod greedy;
mod result;

pub use greedy::{GreedyAllocator, allocate_facilities};
pub use result::{AllocationResult, AllocationStep, Recommendation};
