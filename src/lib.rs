pub mod dataset;
pub mod output;
pub mod parser;
pub mod pipeline;
pub mod routes;
pub mod stats;
