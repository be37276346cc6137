//! Stores settings that are not expected to need to change but grouped together
//! for discoverability and reuse. Each constant should be prefixed by the module
//! name to allow importing the constant only and still be readable

pub mod client {
    /// Where the client lands after a successful sign-in, regardless of how the
    /// sign-in started
    pub const CLIENT_POST_LOGIN_PAGE: &str = "Profile";
    pub const CLIENT_DEFAULT_SERVER_ADDRESS: &str = "http://localhost:8000";
}

pub mod oauth {
    use crate::user::AuthProvider;

    /// Prefix of the hosted authorization endpoints, relative to the server
    pub const OAUTH_AUTH_BASE: &str = "/api/auth";

    /// Builds the URL the browser must navigate to so the provider can take
    /// over the sign-in flow
    pub fn authorize_url(server_address: &str, provider: AuthProvider) -> String {
        format!("{server_address}{OAUTH_AUTH_BASE}/{provider}")
    }
}

pub mod path {
    mod path_spec;
    pub use path_spec::PathSpec;
    pub const PATH_API_STOCKS: PathSpec = PathSpec::get("/api/stocks");
    pub const PATH_HEALTH_CHECK: PathSpec = PathSpec::get("/health_check");
    pub const PATH_USERS_COMPANIES_DATA: PathSpec = PathSpec::get("/users/companies/data");
    pub const PATH_USERS_COMPANIES_TRACK: PathSpec = PathSpec::post("/users/companies");
    pub const PATH_USERS_COMPANIES_UNTRACK: PathSpec = PathSpec::delete("/users/companies");
    pub const PATH_USERS_LOGIN: PathSpec = PathSpec::post("/users/login");
    pub const PATH_USERS_OAUTH: PathSpec = PathSpec::post("/users/oauth");
    pub const PATH_USERS_PROFILE: PathSpec = PathSpec::get("/users/profile");
    pub const PATH_USERS_REGISTER: PathSpec = PathSpec::post("/users/register");
}

pub mod queries {
    use super::path::PathSpec;

    /// A canned analysis exposed by the backend. The column set varies per
    /// query so results are rendered from the rows themselves.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct CuratedQuery {
        pub title: &'static str,
        pub description: &'static str,
        pub spec: PathSpec,
    }

    pub const CURATED_QUERIES: &[CuratedQuery] = &[
        CuratedQuery {
            title: "Financial improvement",
            description: "Companies whose assets grew while liabilities shrank \
                          over the most recent reporting periods",
            spec: PathSpec::get("/api/companies/financial_improvement"),
        },
        CuratedQuery {
            title: "Debt to asset ratio",
            description: "Long term debt as a share of total assets, lowest first",
            spec: PathSpec::get("/api/companies/debt_to_asset_ratio"),
        },
        CuratedQuery {
            title: "Advanced trading metrics",
            description: "Composite liquidity and leverage metrics for screening",
            spec: PathSpec::get("/api/stock/advanced-trading-metrics"),
        },
        CuratedQuery {
            title: "Similar inventory ratios",
            description: "Pairs of companies with closely matching inventory to \
                          asset ratios",
            spec: PathSpec::get("/api/companies/similar_inventory_ratios"),
        },
    ];
}

#[cfg(test)]
mod tests {
    use static_assertions::const_assert;

    use super::queries::CURATED_QUERIES;

    // The carousel arrows assume there is something to cycle through
    const_assert!(!CURATED_QUERIES.is_empty());

    #[test]
    fn curated_query_titles_are_unique() {
        let mut titles: Vec<_> = CURATED_QUERIES.iter().map(|q| q.title).collect();
        titles.sort_unstable();
        titles.dedup();
        assert_eq!(titles.len(), CURATED_QUERIES.len());
    }
}
