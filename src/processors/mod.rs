pub mod corrections;
pub mod data_merger;
pub mod derived;
pub mod extractor;
pub mod integrity_checker;
pub mod interpolation;
pub mod parallel_processor;
pub mod pipeline;

pub use corrections::{CorrectionReport, QualityCorrector};
pub use data_merger::{DataMerger, MergeStats, VariableColumn};
pub use derived::FieldDeriver;
pub use extractor::{ExtractedTable, ExtractionSummary, Extractor};
pub use integrity_checker::{BoundViolation, DateGap, IntegrityChecker, IntegrityReport, ViolationType};
pub use parallel_processor::ParallelProcessor;
pub use pipeline::{extract_all, generate_dssat, generate_swap, validate_file, FormatSummary};
