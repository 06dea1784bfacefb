mod booking;
mod facility;
mod facility_unit;

pub use booking::*;
pub use facility::*;
pub use facility_unit::*;
