mod common;
mod export;
mod search;
