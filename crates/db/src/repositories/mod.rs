//! Repository layer.
//!
//! Each repository is a zero-sized struct whose async methods take
//! `&PgPool` and return `Result<_, sqlx::Error>`.

pub mod announcement_repo;
pub mod appointment_repo;
pub mod branch_repo;
pub mod customer_repo;
pub mod dates_repo;
pub mod document_repo;
pub mod line_item_repo;
pub mod promo_repo;
pub mod service_repo;
pub mod unavailability_repo;

pub use announcement_repo::AnnouncementRepo;
pub use appointment_repo::AppointmentRepo;
pub use branch_repo::BranchRepo;
pub use customer_repo::CustomerRepo;
pub use dates_repo::DatesRepo;
pub use document_repo::DocumentRepo;
pub use line_item_repo::LineItemRepo;
pub use promo_repo::PromoRepo;
pub use service_repo::ServiceRepo;
pub use unavailability_repo::UnavailabilityRepo;
