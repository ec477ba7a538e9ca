// src/config.rs

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};
use tokio::sync::RwLock;

use crate::{
    db::{EvaluationRepository, OrganizationRepository, TaxonomyRepository},
    services::{
        auth::AuthService,
        evaluation_service::EvaluationService,
        organization_service::OrganizationService,
        taxonomy_service::{SharedTaxonomy, TaxonomyService},
    },
};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Configuração lida do ambiente (`.env` incluso).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Mesmo que `from_env`, mas com a fonte das variáveis injetada.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = lookup("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = lookup("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let max_connections = match lookup("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("DATABASE_MAX_CONNECTIONS inválido: '{raw}'"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr,
            max_connections,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub taxonomy_service: TaxonomyService,
    pub organization_service: OrganizationService,
    pub evaluation_service: EvaluationService,
}

impl AppState {
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        sqlx::migrate!()
            .run(&db_pool)
            .await
            .context("Falha ao rodar as migrações do banco de dados")?;

        tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

        // --- Monta o gráfico de dependências ---
        let taxonomy_repo = TaxonomyRepository::new(db_pool.clone());
        let organization_repo = OrganizationRepository::new(db_pool.clone());
        let evaluation_repo = EvaluationRepository::new(db_pool.clone());

        let store = TaxonomyService::load(&taxonomy_repo).await?;
        let taxonomy: SharedTaxonomy = Arc::new(RwLock::new(store));

        let auth_service = AuthService::new(config.jwt_secret.clone());
        let taxonomy_service = TaxonomyService::new(taxonomy_repo, db_pool.clone(), taxonomy.clone());
        let organization_service = OrganizationService::new(organization_repo, db_pool.clone());
        let evaluation_service = EvaluationService::new(evaluation_repo, db_pool.clone(), taxonomy);

        Ok(Self {
            db_pool,
            auth_service,
            taxonomy_service,
            organization_service,
            evaluation_service,
        })
    }
}
