//! SeaORM entities mirroring the domain model.

pub mod comment;
pub mod community;
pub mod membership;
pub mod post;
pub mod post_bookmark;
pub mod post_like;
pub mod post_report;
pub mod profile;
pub mod user;
