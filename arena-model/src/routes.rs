macro_rules! v1_path {
    ($path:literal) => {
        concat!("/api/v1", $path)
    };
}

pub const PING: &str = "/ping";
pub const HEALTH: &str = "/health";

/// Versioned API route definitions shared by the server and its clients
pub mod v1 {
    pub const ROOT: &str = "/api/v1";
    pub const VERSION: &str = "v1";

    pub mod auth {
        pub const REGISTER: &str = v1_path!("/auth/register");
        pub const LOGIN: &str = v1_path!("/auth/login");
        pub const ME: &str = v1_path!("/auth/me");
    }

    /// Consumer-facing reads, active rows only.
    pub mod listings {
        pub const COLLECTION: &str = v1_path!("/listings/{entity}");
        pub const ITEM: &str = v1_path!("/listings/{entity}/{id}");
    }

    pub mod favoritos {
        pub const COLLECTION: &str = v1_path!("/favoritos");
        pub const TOGGLE: &str = v1_path!("/favoritos/toggle");
        pub const ITEM: &str = v1_path!("/favoritos/{item_type}/{item_id}");
    }

    pub mod admin {
        pub mod listings {
            pub const COLLECTION: &str = v1_path!("/admin/listings/{entity}");
            pub const ITEM: &str = v1_path!("/admin/listings/{entity}/{id}");
            pub const TRANSLATE: &str =
                v1_path!("/admin/listings/{entity}/{id}/translate");
            pub const TRANSLATE_MISSING: &str =
                v1_path!("/admin/listings/{entity}/translate-missing");
        }

        pub mod uploads {
            pub const COLLECTION: &str = v1_path!("/admin/uploads");
            pub const ITEM: &str = v1_path!("/admin/uploads/{*key}");
        }

        pub mod users {
            pub const COLLECTION: &str = v1_path!("/admin/users");
            pub const ROLE: &str = v1_path!("/admin/users/{id}/role");
        }
    }
}

pub mod utils {
    /// Replace a single path parameter (e.g. `"{id}"`) with the provided value.
    pub fn replace_param(
        route: &str,
        param: &str,
        value: impl AsRef<str>,
    ) -> String {
        route.replace(param, value.as_ref())
    }

    /// Replace multiple path parameters in order.
    pub fn replace_params(
        route: &str,
        params: &[(impl AsRef<str>, impl AsRef<str>)],
    ) -> String {
        let mut path = route.to_string();
        for (param, value) in params {
            path = path.replace(param.as_ref(), value.as_ref());
        }
        path
    }

    /// Append query parameters to the provided route.
    pub fn with_query(route: &str, params: &[(&str, &str)]) -> String {
        if params.is_empty() {
            return route.to_string();
        }
        let query: Vec<String> = params
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        format!("{route}?{}", query.join("&"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_concrete_paths() {
        let path = utils::replace_params(
            v1::admin::listings::ITEM,
            &[("{entity}", "bares"), ("{id}", "7")],
        );
        assert_eq!(path, "/api/v1/admin/listings/bares/7");
        assert_eq!(
            utils::with_query(v1::favoritos::COLLECTION, &[("expand", "true"), ("lang", "en")]),
            "/api/v1/favoritos?expand=true&lang=en"
        );
    }
}
