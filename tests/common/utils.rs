use secrecy::ExposeSecret;
use sqlx::{Connection, Executor, PgConnection, PgPool};
use std::net::TcpListener;
use std::sync::Arc;
use uuid::Uuid;
use once_cell::sync::Lazy;

use futbol5_backend::auth::jwt::generate_token;
use futbol5_backend::config::jwt::JwtSettings;
use futbol5_backend::config::settings::{get_config, get_jwt_settings, get_redis_url, DatabaseSettings};
use futbol5_backend::db::players::create_player;
use futbol5_backend::db::tournaments::create_tournament;
use futbol5_backend::models::player::Player;
use futbol5_backend::models::user::UserRole;
use futbol5_backend::run;
use futbol5_backend::telemetry::{get_subscriber, init_subscriber};

// Ensure that the `tracing` stack is only initialised once using `once_cell`
static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber);
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber);
    }
});

pub struct TestApp {
    pub address: String,
    pub db_pool: PgPool,
    pub jwt_settings: JwtSettings,
}

pub struct TestUser {
    pub user_id: Uuid,
    pub name: String,
    pub token: String,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
    let port = listener.local_addr().unwrap().port();
    let address = format!("http://127.0.0.1:{}", port);

    let mut configuration = get_config().expect("Failed to read configuration.");
    configuration.database.db_name = Uuid::new_v4().to_string();
    configuration.database.db_url = None;
    let connection_pool = configure_db(&configuration.database).await;

    let redis_client = redis::Client::open(get_redis_url(&configuration).expose_secret())
        .expect("Failed to create Redis client");

    let server = run(
        listener,
        connection_pool.clone(),
        get_jwt_settings(&configuration),
        Arc::new(redis_client),
        Vec::new(),
    )
    .expect("Failed to bind address");
    let _ = tokio::spawn(server);

    TestApp {
        address,
        db_pool: connection_pool,
        jwt_settings: get_jwt_settings(&configuration),
    }
}

pub async fn configure_db(config: &DatabaseSettings) -> PgPool {
    let mut connection = PgConnection::connect(&config.connection_string_without_db())
        .await
        .expect("Failed to connect to Postgres");
    connection
        .execute(format!(r#"CREATE DATABASE "{}";"#, config.db_name).as_str())
        .await
        .expect("Failed to create database.");

    let connection_pool = PgPool::connect(config.connection_string().expose_secret())
        .await
        .expect("Failed to connect to Postgres.");
    sqlx::migrate!("./migrations")
        .run(&connection_pool)
        .await
        .expect("Failed to migrate the database");

    connection_pool
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    /// Mints a token the way the identity provider would.
    pub fn user_with_id(&self, user_id: Uuid, name: &str, role: UserRole) -> TestUser {
        let token = generate_token(&self.jwt_settings, user_id, name, Some("river"), role)
            .expect("Failed to sign token");
        TestUser { user_id, name: name.to_string(), token }
    }

    pub fn user(&self, name: &str) -> TestUser {
        self.user_with_id(Uuid::new_v4(), name, UserRole::User)
    }

    pub fn admin(&self) -> TestUser {
        self.user_with_id(Uuid::new_v4(), "admin", UserRole::Admin)
    }

    /// A user whose identity is linked to an existing player.
    pub fn user_for_player(&self, player: &Player) -> TestUser {
        self.user_with_id(player.id.as_uuid(), &player.name, UserRole::User)
    }

    pub async fn seed_tournament(&self, name: &str) -> Uuid {
        create_tournament(&self.db_pool, name, "")
            .await
            .expect("Failed to create tournament")
            .id
    }

    pub async fn seed_players(&self, names: &[&str]) -> Vec<Player> {
        let mut players = Vec::new();
        for name in names {
            players.push(create_player(&self.db_pool, name).await.expect("Failed to create player"));
        }
        players
    }
}
