//! PostgreSQL-backed [`MenuRepository`] implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{MenuRepository, RepositoryError};
use crate::domain::{MenuItem, MenuItemId};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{MenuItemRow, NewMenuItemRow};
use super::pool::DbPool;
use super::schema::menu_items;

/// Diesel adapter for the canteen menu.
#[derive(Clone)]
pub struct DieselMenuRepository {
    pool: DbPool,
}

impl DieselMenuRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepository for DieselMenuRepository {
    async fn insert(&self, item: &MenuItem) -> Result<(), RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row = NewMenuItemRow {
            id: *item.id.as_uuid(),
            name: &item.name,
            description: item.description.as_deref(),
            price: item.price.minor(),
            category: &item.category,
            allergens: &item.allergens,
            available: item.available,
            created_at: item.created_at,
        };
        diesel::insert_into(menu_items::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: MenuItemId) -> Result<Option<MenuItem>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<MenuItemRow> = menu_items::table
            .filter(menu_items::id.eq(id.as_uuid()))
            .select(MenuItemRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(MenuItemRow::into_domain))
    }

    async fn list(&self) -> Result<Vec<MenuItem>, RepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<MenuItemRow> = menu_items::table
            .order(menu_items::name.asc())
            .select(MenuItemRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(MenuItemRow::into_domain).collect())
    }
}
