pub mod co2;
pub mod daily;
pub mod dssat;
pub mod met;
pub mod scenario;
pub mod station;
pub mod variable;

pub use co2::{Co2Entry, Co2Series};
pub use daily::{DailyRecord, RecordKey};
pub use dssat::{DssatDay, DssatHeader};
pub use met::MetRecord;
pub use scenario::Scenario;
pub use station::Station;
pub use variable::ClimateVariable;
