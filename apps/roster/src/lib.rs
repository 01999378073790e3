pub mod app;
pub mod config;
pub mod gateway;
pub mod prefetch;
pub mod selection;
pub mod state;
pub mod ui;

#[cfg(test)]
pub(crate) mod testing;
