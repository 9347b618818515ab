use serde::Deserialize;
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug, Deserialize)]
pub struct RedisSettings {
    pub host: String,
    pub port: u16,
    pub password: SecretString,
    #[serde(default)]
    pub url: Option<SecretString>,
}

impl RedisSettings {
    pub fn get_redis_url(&self) -> SecretString {
        if let Some(url) = &self.url {
            return url.clone();
        }
        let password = self.password.expose_secret();
        let url = if password.is_empty() {
            format!("redis://{}:{}", self.host, self.port)
        } else {
            format!("redis://:{}@{}:{}", password, self.host, self.port)
        };
        SecretString::new(url.into_boxed_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_without_password_omits_credentials() {
        let settings = RedisSettings {
            host: "localhost".into(),
            port: 6379,
            password: SecretString::new("".into()),
            url: None,
        };
        assert_eq!(settings.get_redis_url().expose_secret(), "redis://localhost:6379");
    }

    #[test]
    fn explicit_url_wins() {
        let settings = RedisSettings {
            host: "localhost".into(),
            port: 6379,
            password: SecretString::new("pw".into()),
            url: Some(SecretString::new("redis://cache:6380".into())),
        };
        assert_eq!(settings.get_redis_url().expose_secret(), "redis://cache:6380");
    }
}
