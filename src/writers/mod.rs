pub mod csv_writer;
pub mod dssat_writer;
pub mod swap_writer;

pub use csv_writer::{ExtractedCsvWriter, OutputColumn};
pub use dssat_writer::DssatWriter;
pub use swap_writer::SwapWriter;
