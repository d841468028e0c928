pub mod clean;
pub mod convert;
pub mod download;
pub mod inputs;
pub mod scan;
pub mod unzip;
