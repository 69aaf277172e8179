use crate::CatalogError;

pub const DEFAULT_ENVIRONMENT: &str = "master";
pub const DEFAULT_LIMIT: u32 = 500;
const GRAPHQL_BASE: &str = "https://graphql.contentful.com/content/v1/spaces";

/// Connection settings for the headless CMS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmsConfig {
    pub space_id: String,
    pub access_token: String,
    pub environment: String,
    pub limit: u32,
}

impl CmsConfig {
    pub fn new(space_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            space_id: space_id.into(),
            access_token: access_token.into(),
            environment: DEFAULT_ENVIRONMENT.to_string(),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Reads `CMS_SPACE_ID`, `CMS_ACCESS_TOKEN` and the optional
    /// `CMS_ENVIRONMENT`.
    pub fn from_env() -> Result<Self, CatalogError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CatalogError> {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(CatalogError::MissingConfig(key))
        };
        let mut config = Self::new(required("CMS_SPACE_ID")?, required("CMS_ACCESS_TOKEN")?);
        if let Some(env) = lookup("CMS_ENVIRONMENT")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
        {
            config.environment = env;
        }
        Ok(config)
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{GRAPHQL_BASE}/{}/environments/{}",
            self.space_id, self.environment
        )
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.access_token)
    }
}

#[cfg(test)]
mod tests {
    use super::CmsConfig;
    use crate::CatalogError;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn builds_endpoint_with_default_environment() {
        let cfg = CmsConfig::from_lookup(lookup(&[
            ("CMS_SPACE_ID", "abc123"),
            ("CMS_ACCESS_TOKEN", "tok"),
        ]))
        .unwrap();
        assert_eq!(
            cfg.endpoint(),
            "https://graphql.contentful.com/content/v1/spaces/abc123/environments/master"
        );
        assert_eq!(cfg.bearer(), "Bearer tok");
        assert_eq!(cfg.limit, 500);
    }

    #[test]
    fn environment_override_and_missing_values() {
        let cfg = CmsConfig::from_lookup(lookup(&[
            ("CMS_SPACE_ID", "abc"),
            ("CMS_ACCESS_TOKEN", "tok"),
            ("CMS_ENVIRONMENT", "staging"),
        ]))
        .unwrap();
        assert!(cfg.endpoint().ends_with("/environments/staging"));

        let err = CmsConfig::from_lookup(lookup(&[("CMS_SPACE_ID", "abc")])).unwrap_err();
        assert_eq!(err, CatalogError::MissingConfig("CMS_ACCESS_TOKEN"));
        let err = CmsConfig::from_lookup(lookup(&[("CMS_SPACE_ID", "  ")])).unwrap_err();
        assert_eq!(err, CatalogError::MissingConfig("CMS_SPACE_ID"));
    }
}
