//! Weather data providers.

pub mod openweather;
pub mod traits;

pub use openweather::OpenWeatherSource;
pub use traits::{FetchError, WeatherDataSource};
