pub mod app;
pub mod cli;
pub mod config;
pub mod fallback;
pub mod normalizer;
pub mod output;
pub mod pagination;
pub mod post;
pub mod prober;
pub mod runner;
pub mod view;

#[cfg(test)]
mod tests;
