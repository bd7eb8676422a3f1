//! Interaction controller: one text input, one trigger, one search at a time.

use tracing::{debug, error, info, warn};

use crate::{
    error::{ValidationError, WeatherError},
    model::CurrentConditions,
    presenter::Presenter,
    provider::{Geocoder, WeatherSource},
    surface::{Layout, Slot, Surface},
};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UiState {
    #[default]
    Placeholder,
    Loading,
    Result,
    Error(String),
}

impl UiState {
    pub fn layout(&self) -> Layout {
        match self {
            UiState::Placeholder => Layout {
                placeholder_visible: true,
                result_visible: false,
                error_visible: false,
            },
            UiState::Loading => Layout {
                placeholder_visible: true,
                result_visible: false,
                error_visible: false,
            },
            UiState::Result => Layout {
                placeholder_visible: false,
                result_visible: true,
                error_visible: false,
            },
            UiState::Error(_) => Layout {
                placeholder_visible: true,
                result_visible: false,
                error_visible: true,
            },
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, UiState::Loading)
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            UiState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

/// Presenter plus the state it currently reflects.
struct View<S> {
    presenter: Presenter<S>,
    state: UiState,
}

impl<S: Surface> View<S> {
    fn surface_mut(&mut self) -> &mut S {
        self.presenter.surface_mut()
    }

    fn clear_error(&mut self) {
        self.surface_mut().set_text(Slot::ErrorMessage, "");
    }

    fn fail(&mut self, err: &WeatherError) {
        match err {
            WeatherError::Validation(_) | WeatherError::NotFound(_) => debug!("Search rejected: {err}"),
            WeatherError::Network(_) => warn!("Search failed: {err}"),
            WeatherError::MalformedResponse(_) => error!("Search failed: {err}"),
        }

        let message = err.user_message();
        self.surface_mut().set_text(Slot::ErrorMessage, &message);
        self.transition(UiState::Error(message));
    }

    fn transition(&mut self, next: UiState) {
        debug!(from = ?self.state, to = ?next, "UI state change");
        self.state = next;
        let layout = self.state.layout();
        self.surface_mut().apply_layout(layout);
    }
}

/// Holds the view in `Loading` with the trigger disabled. Dropping it
/// re-enables the trigger; a search whose future was dropped before it
/// settled falls back to the placeholder first.
struct LoadingGuard<'a, S: Surface> {
    view: &'a mut View<S>,
}

impl<'a, S: Surface> LoadingGuard<'a, S> {
    fn enter(view: &'a mut View<S>) -> Self {
        view.transition(UiState::Loading);
        view.surface_mut().set_trigger_enabled(false);
        Self { view }
    }
}

impl<S: Surface> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        if self.view.state.is_loading() {
            warn!("Search abandoned before it settled");
            self.view.transition(UiState::Placeholder);
        }
        self.view.surface_mut().set_trigger_enabled(true);
    }
}

pub struct Controller<G, W, S> {
    geocoder: G,
    weather: W,
    view: View<S>,
}

impl<G, W, S> Controller<G, W, S>
where
    G: Geocoder,
    W: WeatherSource,
    S: Surface,
{
    /// Starts in [`UiState::Placeholder`] and pushes that layout to the surface.
    pub fn new(geocoder: G, weather: W, mut presenter: Presenter<S>) -> Self {
        let state = UiState::Placeholder;
        presenter.surface_mut().apply_layout(state.layout());
        Self {
            geocoder,
            weather,
            view: View { presenter, state },
        }
    }

    pub fn state(&self) -> &UiState {
        &self.view.state
    }

    pub fn surface(&self) -> &S {
        self.view.presenter.surface()
    }

    /// Handle one trigger (button press or Enter) with the raw input text.
    ///
    /// Every failure ends in [`UiState::Error`]; nothing is returned to the
    /// caller. The trigger is re-enabled exactly once per search that
    /// reached `Loading`, even when the returned future is dropped early.
    pub async fn search(&mut self, input: &str) -> &UiState {
        self.view.clear_error();

        let city = input.trim();
        if city.is_empty() {
            self.view.fail(&WeatherError::from(ValidationError::EmptyCity));
            return &self.view.state;
        }

        if let Err(err) = self
            .geocoder
            .ensure_configured()
            .and_then(|_| self.weather.ensure_configured())
        {
            self.view.fail(&err);
            return &self.view.state;
        }

        {
            let mut loading = LoadingGuard::enter(&mut self.view);
            match fetch_conditions(&self.geocoder, &self.weather, city).await {
                Ok(conditions) => {
                    loading.view.presenter.render(&conditions);
                    info!("Displayed weather for {city:?}");
                    loading.view.transition(UiState::Result);
                    loading.view.surface_mut().clear_input();
                }
                Err(err) => loading.view.fail(&err),
            }
        }

        &self.view.state
    }
}

async fn fetch_conditions<G: Geocoder, W: WeatherSource>(
    geocoder: &G,
    weather: &W,
    city: &str,
) -> Result<CurrentConditions, WeatherError> {
    let location = geocoder
        .resolve(city)
        .await?
        .ok_or_else(|| WeatherError::NotFound(city.to_string()))?;

    weather
        .fetch_current(location.latitude, location.longitude)
        .await
}
