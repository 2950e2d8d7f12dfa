pub mod exam;
pub mod records;

pub use exam::ExamService;
pub use records::RecordsService;
