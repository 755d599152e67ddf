//! Time tracking.
//!
//! Session records and their pause/resume lifecycle, the JSON-backed
//! session store, category configuration, and report aggregation.

mod categories;
mod duration;
mod filter;
mod report;
mod session;
mod store;

pub use categories::Categories;
pub use duration::{format_duration, format_duration_short, format_hms, hours, parse_duration};
pub use filter::SessionFilter;
pub use report::{
    cospend_in, detailed_in, summarize, summarize_in, Bucket, CategoryTotal, CospendDay,
    CospendEntry, DetailedReport, DetailedRow, Granularity, Report, SubcategoryTotal,
};
pub use session::{PauseInterval, Session, SessionId, SessionState};
pub use store::{SessionEdit, SessionLog, SessionStore};
