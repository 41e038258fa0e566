pub mod actor;
pub mod appointment;
pub mod enums;
pub mod slot;
pub mod timeline;
pub mod treatment;

pub use actor::*;
pub use appointment::*;
pub use slot::*;
pub use timeline::*;
pub use treatment::*;
