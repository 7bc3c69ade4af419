mod xlsx;

pub use xlsx::XlsxReportWriter;
