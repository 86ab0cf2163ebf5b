//! Verification harness for reactor assemblies.
//!
//! - [`oracle`]: checks returning pass/fail verdicts instead of panicking
//! - [`helpers`]: canonical builds, cutters and the harness error type
//! - [`report`]: plain-text assembly reports

pub mod helpers;
pub mod oracle;
pub mod report;

pub use helpers::HarnessError;
pub use oracle::OracleVerdict;
pub use report::AssemblyReport;
