//! fungi-domain
//!
//! Pure domain models (Item, Category, Supplier, Movement, Inventory).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod category;
pub mod common;
pub mod id;
pub mod inventory;
pub mod item;
pub mod movement;
pub mod supplier;

pub use category::*;
pub use common::*;
pub use id::*;
pub use inventory::*;
pub use item::*;
pub use movement::*;
pub use supplier::*;
