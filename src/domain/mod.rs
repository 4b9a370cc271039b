pub mod business_focus;
pub mod company_profile;
pub mod signals;
pub mod tables;
pub mod text;

pub use company_profile::*;
