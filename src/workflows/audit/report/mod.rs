mod assemble;
pub mod document;

pub use assemble::{assemble_report, NOT_PROVIDED, REPORT_EDITION, REPORT_SUBTITLE, REPORT_TITLE};
pub use document::{PageContent, ReportDocument, ReportPage};
