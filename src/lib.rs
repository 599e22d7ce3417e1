pub mod cli;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod errors;
pub mod merge;
pub mod search;
pub mod storage;
pub mod tree;
