//! Report data structures for commands.
//!
//! Commands build reports, then render them to an Output target.

mod check;
mod explain;
mod list;
mod output;

pub use check::CheckReport;
pub use explain::{ExplainReport, PropertyInfo};
pub use list::{ListReport, ResourceSummary};
pub use output::{Report, TerminalOutput};
