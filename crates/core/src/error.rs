//! Structural failures (§7, domain 2): programmer-visible conditions
//! distinct from the accumulated [`crate::diagnostics::Diagnostic`]s the
//! evaluator never aborts on.

pub use dnssec_analysis_domain::DomainError as AnalysisError;

pub type Result<T> = std::result::Result<T, AnalysisError>;
