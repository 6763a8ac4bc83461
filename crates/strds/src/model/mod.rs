//! The entity model: Repository → Module → {Function, Class → Method} → Parameter.
//!
//! Every entity owns its children; nothing points back at its parent.

pub mod callable;
pub mod class;
pub mod module;
pub mod parameter;
pub mod repository;

pub use callable::{Callable, CallableRef, Function, Method, INITIALIZER_NAME};
pub use class::Class;
pub use module::{is_rooted, Module};
pub use parameter::Parameter;
pub use repository::Repository;
