pub mod bundle;
pub mod customer;
pub mod drink;
pub mod history;
pub mod menu;
pub mod tags;
