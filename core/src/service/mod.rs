pub mod export;
pub mod preferences;
pub mod projection;
pub mod task_store;

#[cfg(test)]
mod task_store_test;
