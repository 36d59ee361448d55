//! Contexto compartido de las pruebas de integración contra PostgreSQL

use sqlx::PgPool;
use uuid::Uuid;

use tour_itinerary::config::{DatabaseConfig, EnvironmentConfig};
use tour_itinerary::controllers::{
    AccommodationController, AccountController, CommandContext, LedgerController,
    LogisticsController, ParticipantController, RouteController, SegmentController,
};
use tour_itinerary::database::run_migrations;
use tour_itinerary::dto::route_dto::CreateRouteRequest;
use tour_itinerary::models::Route;

pub struct TestContext {
    pub pool: PgPool,
    pub commands: CommandContext,
}

impl TestContext {
    pub async fn new() -> Self {
        dotenvy::dotenv().ok();
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for integration tests");
        let pool = DatabaseConfig::new(url)
            .create_test_pool()
            .await
            .expect("Failed to connect to test database");
        run_migrations(&pool).await.expect("Failed to run migrations");

        let commands = CommandContext::new(pool.clone(), &EnvironmentConfig::default());
        Self { pool, commands }
    }

    /// Inserta una fila en una tabla de referencia (clients, hotels, vehicles, ...)
    pub async fn seed(&self, table: &str) -> Uuid {
        let id = Uuid::new_v4();
        sqlx::query(&format!("INSERT INTO {} (id, name) VALUES ($1, $2)", table))
            .bind(id)
            .bind(format!("{} fixture", table))
            .execute(&self.pool)
            .await
            .expect("Failed to seed reference row");
        id
    }

    pub async fn draft_route(&self, name: &str) -> Route {
        self.routes()
            .create(CreateRouteRequest {
                id: None,
                name: name.to_string(),
                description: None,
                currency: None,
            })
            .await
            .expect("Failed to create route")
    }

    pub fn routes(&self) -> RouteController {
        RouteController::new(self.commands.clone())
    }

    pub fn segments(&self) -> SegmentController {
        SegmentController::new(self.commands.clone())
    }

    pub fn logistics(&self) -> LogisticsController {
        LogisticsController::new(self.commands.clone())
    }

    pub fn participants(&self) -> ParticipantController {
        ParticipantController::new(self.commands.clone())
    }

    pub fn accommodations(&self) -> AccommodationController {
        AccommodationController::new(self.commands.clone())
    }

    pub fn ledger(&self) -> LedgerController {
        LedgerController::new(self.commands.clone())
    }

    pub fn accounts(&self) -> AccountController {
        AccountController::new(self.commands.clone())
    }
}
