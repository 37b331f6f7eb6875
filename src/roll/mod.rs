//! Pure rules of the nominal roll: month keys, derived approval state,
//! transfer and archive guards, pagination. Everything here is synchronous
//! and side-effect free; the services wire it to the stores.

pub mod archive;
pub mod month;
pub mod page;
pub mod status;
pub mod transfer;

pub use month::{current_month_start, month_start_of};
pub use page::{page_from_overfetch, Page};
pub use status::{derive_status, RollStatus};
