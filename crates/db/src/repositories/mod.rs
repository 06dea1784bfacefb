mod availability_repo;
mod booking_repo;
mod facility_repo;
mod facility_unit_repo;
mod schedule_repo;

pub use availability_repo::AvailabilityRepository;
pub use booking_repo::BookingRepository;
pub use facility_repo::FacilityRepository;
pub use facility_unit_repo::FacilityUnitRepository;
pub use schedule_repo::ScheduleRepository;
