pub mod activity;
pub mod category;
pub mod context;
pub mod lenient;
pub mod order;
pub mod permission;
pub mod product;
pub mod role;
pub mod settings;
