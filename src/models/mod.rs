pub mod actor;
pub mod appointment;
pub mod consultation;
pub mod doctor;
pub mod enums;
pub mod facility;
pub mod filters;
pub mod units;

pub use actor::*;
pub use appointment::*;
pub use consultation::*;
pub use doctor::*;
pub use facility::*;
pub use filters::*;
pub use units::*;
