pub mod boundary;
pub mod chat;
pub mod collision;
pub mod constants;
pub mod contact;
pub mod effects;
pub mod entity;
pub mod error;
pub mod forces;
pub mod frame;
pub mod grid;
pub mod influence;
pub mod input;
pub mod relay;
pub mod render;
pub mod scene;
pub mod store;

pub use boundary::*;
pub use entity::*;
pub use error::*;
pub use forces::*;
pub use frame::*;
pub use influence::*;
pub use input::*;
pub use render::*;
pub use scene::*;
pub use store::*;
