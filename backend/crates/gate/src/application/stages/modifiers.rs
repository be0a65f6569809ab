//! Response modifiers
//!
//! Applied to every outgoing response. Each one only fills in a header that
//! is still absent, so applying a modifier twice changes nothing.

use crate::application::config::{EASTER_EGG_CHARACTER, GateConfig};
use crate::domain::response::{CONTENT_TYPE_TEXT, GateResponse};
use http::header::{self, HeaderName};
use http::HeaderValue;

pub const FAVORITE_CHARACTER_HEADER: HeaderName =
    HeaderName::from_static("x-service-owner-favorite-character");
pub const EASTER_EGG_HEADER: HeaderName =
    HeaderName::from_static("x-project-developer-favorite-character");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modifier {
    FavoriteCharacter,
    EasterEgg,
    DefaultContentType,
}

impl Modifier {
    pub fn apply(&self, response: &mut GateResponse, config: &GateConfig) {
        match self {
            Modifier::FavoriteCharacter => {
                let value = config
                    .favorite_character
                    .as_deref()
                    .filter(|v| !v.is_empty())
                    .and_then(|v| HeaderValue::from_str(v).ok());
                if let Some(value) = value {
                    set_if_absent(response, FAVORITE_CHARACTER_HEADER, value);
                }
            }
            Modifier::EasterEgg => {
                if config.easter_egg {
                    set_if_absent(
                        response,
                        EASTER_EGG_HEADER,
                        HeaderValue::from_static(EASTER_EGG_CHARACTER),
                    );
                }
            }
            Modifier::DefaultContentType => set_if_absent(
                response,
                header::CONTENT_TYPE,
                HeaderValue::from_static(CONTENT_TYPE_TEXT),
            ),
        }
    }
}

fn set_if_absent(response: &mut GateResponse, name: HeaderName, value: HeaderValue) {
    response.headers.entry(name).or_insert(value);
}
