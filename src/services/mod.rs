pub mod consumption;
pub mod inventory;
pub mod lots;
pub mod products;
pub mod purchases;
pub mod sales;
