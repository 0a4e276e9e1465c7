pub mod check;
pub mod platforms;
pub mod releases;
pub mod update;
