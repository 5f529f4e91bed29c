pub mod aggregate;
pub mod error;
pub mod interval;
pub mod period;
pub mod provider;
pub mod requirement;
pub mod selector;
pub mod series;
pub mod slot;
