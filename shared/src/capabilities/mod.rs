mod http;
mod navigate;
mod timer;

pub use self::http::{
    Http, HttpError, HttpHeaders, HttpMethod, HttpOperation, HttpRequest, HttpResponse,
    HttpResult, ValidatedUrl,
};
pub use self::navigate::{Navigate, NavigateOperation};
pub use self::timer::{Timer, TimerId, TimerOperation, TimerOutput};

// Crux's built-in Render capability covers view updates.
pub use crux_core::render::Render;

use crate::app::App;
use crate::event::Event;

#[derive(crux_core::macros::Effect)]
pub struct Capabilities {
    pub http: Http<Event>,
    pub navigate: Navigate<Event>,
    pub render: Render<Event>,
    pub timer: Timer<Event>,
}
