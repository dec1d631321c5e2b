use std::env;

pub struct Config {
    pub database_url: String,
    pub server_port: u16,
    pub server_host: String,
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("SERVER_PORT must be a number"),
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            jwt_secret: env::var("JWT_SECRET").expect("JWT_SECRET must be set"),
            token_ttl_hours: env::var("TOKEN_TTL_HOURS")
                .unwrap_or_else(|_| "24".to_string())
                .parse()
                .expect("TOKEN_TTL_HOURS must be a number"),
            bcrypt_cost: env::var("BCRYPT_COST")
                .unwrap_or_else(|_| "12".to_string())
                .parse()
                .expect("BCRYPT_COST must be a number"),
        }
    }

    pub fn server_url(&self) -> String {
        format!("http://{}:{}", self.server_host, self.server_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        // Set required environment variables
        env::set_var("DATABASE_URL", "postgres://test");
        env::set_var("JWT_SECRET", "test-secret");

        let config = Config::from_env();

        assert_eq!(config.database_url, "postgres://test");
        assert_eq!(config.server_port, 8080);
        assert_eq!(config.server_host, "127.0.0.1");
        assert_eq!(config.jwt_secret, "test-secret");
        assert_eq!(config.token_ttl_hours, 24);
        assert_eq!(config.bcrypt_cost, 12);

        // Test custom values
        env::set_var("SERVER_PORT", "3000");
        env::set_var("SERVER_HOST", "0.0.0.0");
        env::set_var("TOKEN_TTL_HOURS", "1");
        env::set_var("BCRYPT_COST", "4");

        let config = Config::from_env();

        assert_eq!(config.server_port, 3000);
        assert_eq!(config.server_host, "0.0.0.0");
        assert_eq!(config.token_ttl_hours, 1);
        assert_eq!(config.bcrypt_cost, 4);
    }
}
