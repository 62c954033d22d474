pub mod chart;
pub mod format;
pub mod report_generators;
pub mod table;

pub use chart::{render_line_chart, write_line_chart, ChartSpec};
pub use report_generators::{generator_for, ReportContext, ReportGenerator, ReportKind};
pub use table::{SummaryTable, TableFormat};
