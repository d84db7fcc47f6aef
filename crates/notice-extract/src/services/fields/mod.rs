//! Field extractors.
//!
//! Every extractor reads the normalized text through the active dialect's
//! rule table and returns a [`notice::models::FieldValue`]; none of them
//! returns an error or panics on document content.

mod app_number;
mod applicant;
mod identifiers;
mod location;
mod manager;
mod narrative;

pub use app_number::{application_number_from_title, extract_application_number};
pub use applicant::{extract_applicant, ApplicantInfo};
pub use identifiers::{
    extract_coastal_use_permits, extract_comment_window, extract_water_quality_cert,
};
pub use location::{extract_location, location_parts, LocationParts};
pub use manager::{extract_manager, ManagerContact};
pub use narrative::{extract_mitigation, extract_work_description};
