//! Error taxonomy for a single city search.
//!
//! Every variant maps to exactly one user-facing message; the controller
//! converts all of them into the error state, so none of these ever escape
//! an interactive session.

/// Input rejected before any network call is attempted.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty city name")]
    EmptyCity,
    #[error("no OpenWeatherMap API key configured")]
    MissingApiKey,
}

#[derive(Debug, thiserror::Error)]
pub enum WeatherError {
    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("city \"{0}\" not found")]
    NotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

impl WeatherError {
    /// Message shown to the user in the error line.
    pub fn user_message(&self) -> String {
        match self {
            WeatherError::Validation(ValidationError::EmptyCity) => {
                "Please enter a city name".to_string()
            }
            WeatherError::Validation(ValidationError::MissingApiKey) => {
                "Please add your OpenWeatherMap API key (run `citywx configure` \
                 or set OPENWEATHER_API_KEY)"
                    .to_string()
            }
            WeatherError::NotFound(city) => format!("City \"{city}\" not found. Please try again."),
            WeatherError::Network(_) => "Something went wrong. Please try again later.".to_string(),
            WeatherError::MalformedResponse(_) => "Error displaying weather data".to_string(),
        }
    }
}
