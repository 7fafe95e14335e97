use std::env;
use std::str::FromStr;

pub enum EnvKey {
    ServerPort,
    BaseUrl,
    MinioEndpoint,
    MinioAccessKey,
    MinioSecretKey,
    MinioBucket,
    MinioUseSsl,
    RabbitMqUrl,
    RabbitMqQueue,
}

impl EnvKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvKey::ServerPort => "SERVER_PORT",
            EnvKey::BaseUrl => "BASE_URL",
            EnvKey::MinioEndpoint => "MINIO_ENDPOINT",
            EnvKey::MinioAccessKey => "MINIO_ACCESS_KEY",
            EnvKey::MinioSecretKey => "MINIO_SECRET_KEY",
            EnvKey::MinioBucket => "MINIO_BUCKET",
            EnvKey::MinioUseSsl => "MINIO_USE_SSL",
            EnvKey::RabbitMqUrl => "RABBITMQ_URL",
            EnvKey::RabbitMqQueue => "RABBITMQ_QUEUE",
        }
    }
}

pub fn get_or(key: EnvKey, default: &str) -> String {
    env::var(key.as_str()).unwrap_or_else(|_| default.to_string())
}

pub fn get_parsed<T: FromStr>(key: EnvKey, default: T) -> T {
    match env::var(key.as_str()) {
        Ok(val) => val.parse::<T>().unwrap_or(default),
        Err(_) => default,
    }
}
