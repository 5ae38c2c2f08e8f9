pub mod controller;
pub mod enrichment;
pub mod session;
