pub mod duplicates;
pub mod eligibility;

pub use duplicates::{group_by_image_path, DuplicateGroup};
pub use eligibility::{select_removable, EligibilityPolicy};
