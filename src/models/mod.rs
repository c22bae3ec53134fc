pub mod business_idea;
pub mod image;
pub mod partnership;
pub mod submission;
pub mod user;
