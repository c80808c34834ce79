pub mod cart_service;
pub mod locks;
pub mod order_service;
