pub mod classifier;
pub mod date_parser;
pub mod flow;
pub mod normalizer;
pub mod resolver;
