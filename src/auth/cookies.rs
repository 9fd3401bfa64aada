use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};

use crate::auth::session::Storage;

/// Session storage kept in the browser's cookie jar. Values are
/// percent-encoded so JSON survives the cookie grammar.
#[derive(Debug, Clone, Default)]
pub struct CookieStorage {
    jar: CookieJar,
    secure: bool,
}

impl CookieStorage {
    pub fn new(jar: CookieJar) -> Self {
        Self { jar, secure: false }
    }

    pub fn secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// The jar to return with the response so the browser applies changes.
    pub fn into_jar(self) -> CookieJar {
        self.jar
    }
}

impl Storage for CookieStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        let cookie = self.jar.get(key)?;
        urlencoding::decode(cookie.value())
            .map(|value| value.into_owned())
            .map_err(|e| tracing::debug!("Undecodable cookie {key}: {e}"))
            .ok()
    }

    fn set_item(&mut self, key: &str, value: String) {
        let cookie = Cookie::build((key.to_string(), urlencoding::encode(&value).into_owned()))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build();
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.add(cookie);
    }

    fn remove_item(&mut self, key: &str) {
        let jar = std::mem::take(&mut self.jar);
        self.jar = jar.remove(Cookie::build(key.to_string()).path("/"));
    }
}
