pub mod owner;
pub mod registration;
pub mod visit;

pub use owner::OwnerService;
pub use registration::RegistrationService;
pub use visit::VisitService;
