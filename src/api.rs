mod client;
pub mod octopus;
