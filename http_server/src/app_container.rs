use parcel_resolution::App;

/// Everything a request handler needs, wired once at startup and shared
/// through `web::Data`.
pub struct Application {
    pub operations: App,
}

impl Application {
    pub fn new(operations: App) -> Self {
        Self { operations }
    }
}
