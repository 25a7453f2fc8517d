pub mod observation;
pub mod observation_frame;
pub mod output_format;
pub mod request;
pub mod traits;
pub mod weather_condition;
