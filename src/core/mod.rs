pub mod image;
pub mod layout;
pub mod measure;
pub mod style;
pub mod units;
pub mod view;
