pub mod bar;
pub mod bar_series;
pub mod interval;
pub mod profile;
pub mod request_params;
