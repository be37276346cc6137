use reqwest::Method;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSpec {
    pub path: &'static str,
    pub method: Method,
}

impl PathSpec {
    pub const fn get(path: &'static str) -> Self {
        Self {
            path,
            method: Method::GET,
        }
    }

    pub const fn post(path: &'static str) -> Self {
        Self {
            path,
            method: Method::POST,
        }
    }

    pub const fn delete(path: &'static str) -> Self {
        Self {
            path,
            method: Method::DELETE,
        }
    }
}
