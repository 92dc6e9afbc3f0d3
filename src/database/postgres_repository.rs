use sqlx::PgPool;

/// Store handle shared by every repository. Cloning only bumps the pool's reference count.
#[derive(Clone)]
pub struct PostgresRepository {
    pub pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: &PgPool) -> Self {
        Self { pool: pool.clone() }
    }
}
