/// Views a failed call can send the user to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    NotFound,
    ServerError,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::NotFound => "/not-found",
            Route::ServerError => "/server-error",
        }
    }
}

/// Side effects the gateway asks the view layer to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiSignal {
    /// Transient error notification
    Toast(String),
    Navigate(Route),
}
