//! Page components.

mod diagnosis;

pub use diagnosis::DiagnosisPage;
