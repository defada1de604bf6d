mod generator;
mod kmeans;

pub use generator::{Candidate, CandidateGenerator, CandidateSite, ClusterCount};
