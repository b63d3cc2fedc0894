use super::Database;
use crate::domain::{Model, Provider, ProviderType};
use crate::error::Result;
use crate::validation::check;
use sqlx::any::AnyRow;
use sqlx::Row;
use uuid::Uuid;

impl Database {
    pub async fn insert_provider(&self, provider: &Provider) -> Result<()> {
        check(provider)?;

        sqlx::query(
            "INSERT INTO providers (id, name, account_id, provider_type, api_key) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(provider.id.to_string())
        .bind(provider.name.clone())
        .bind(provider.account_id.to_string())
        .bind(provider.provider_type.as_str().to_string())
        .bind(provider.api_key.clone())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn find_provider(&self, id: Uuid) -> Result<Option<Provider>> {
        let row = sqlx::query(
            "SELECT id, name, account_id, provider_type, api_key FROM providers WHERE id = $1",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool())
        .await?;

        row.map(|row| provider_from_row(&row)).transpose()
    }

    pub async fn insert_model(&self, model: &Model) -> Result<()> {
        check(model)?;

        sqlx::query(
            "INSERT INTO models (id, name, account_id, provider_id) VALUES ($1, $2, $3, $4)",
        )
        .bind(model.id.to_string())
        .bind(model.name.clone())
        .bind(model.account_id.to_string())
        .bind(model.provider_id.to_string())
        .execute(self.pool())
        .await?;

        Ok(())
    }

    pub async fn find_model(&self, id: Uuid) -> Result<Option<Model>> {
        let row = sqlx::query("SELECT id, name, account_id, provider_id FROM models WHERE id = $1")
            .bind(id.to_string())
            .fetch_optional(self.pool())
            .await?;

        row.map(|row| model_from_row(&row)).transpose()
    }
}

fn provider_from_row(row: &AnyRow) -> Result<Provider> {
    let provider_type: ProviderType = row.try_get::<String, _>("provider_type")?.parse()?;

    Ok(Provider::builder()
        .id(uuid_column(row, "id")?)
        .name(row.try_get::<String, _>("name")?)
        .account_id(uuid_column(row, "account_id")?)
        .provider_type(provider_type)
        .api_key(row.try_get::<String, _>("api_key")?)
        .build()?)
}

fn model_from_row(row: &AnyRow) -> Result<Model> {
    Ok(Model::builder()
        .id(uuid_column(row, "id")?)
        .name(row.try_get::<String, _>("name")?)
        .account_id(uuid_column(row, "account_id")?)
        .provider_id(uuid_column(row, "provider_id")?)
        .build()?)
}

fn uuid_column(row: &AnyRow, column: &str) -> Result<Uuid> {
    let raw: String = row.try_get(column)?;
    Uuid::parse_str(&raw).map_err(|e| {
        sqlx::Error::ColumnDecode {
            index: column.to_string(),
            source: Box::new(e),
        }
        .into()
    })
}
