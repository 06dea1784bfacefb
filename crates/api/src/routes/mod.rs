pub mod assets;
pub mod bookings;
pub mod facilities;
pub mod system;
