mod ids;

pub use ids::{BookingId, FacilityId, FacilityUnitId};
