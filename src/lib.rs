// Brand assignment for catalog records: synonym graph, title matcher, per-record pipeline.

pub mod assigner;
pub mod brands;
pub mod config;
pub mod matcher;
pub mod model;
pub mod normalizer;
pub mod source;
pub mod storage;
