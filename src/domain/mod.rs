pub mod cart;
pub mod errors;
pub mod events;
pub mod identity;
pub mod menu;
pub mod order;
pub mod ports;
pub mod pricing;
