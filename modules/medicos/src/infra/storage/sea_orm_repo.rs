//! SeaORM-backed repository implementation for the domain port.
//!
//! This struct is generic over `C: ConnectionTrait`, so it is constructed
//! with a `DatabaseConnection` (the store) **or** a `DatabaseTransaction`
//! (one unit of work handed out by `begin`).

use anyhow::Context;
use modkit::{Direction, Page, PageRequest};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DatabaseTransaction,
    DbErr, EntityTrait, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr,
    TransactionTrait,
};

use crate::contract::model::{Medico, NewMedico};
use crate::domain::repo::{
    MedicosRepository, MedicosStore, MedicosTransaction, SortField, SortKey, UniqueViolation,
};
use crate::infra::storage::entity::{Column, Entity as MedicoEntity};
use crate::infra::storage::mapper::{new_active_model, to_active_model};

/// SeaORM repository impl.
/// Holds a connection object; its lifetime/ownership is up to the caller.
pub struct SeaOrmMedicosRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmMedicosRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn column_for(field: SortField) -> Column {
    match field {
        SortField::Id => Column::Id,
        SortField::Name => Column::Name,
        SortField::DocumentId => Column::DocumentId,
        SortField::Email => Column::Email,
        SortField::Specialty => Column::Specialty,
    }
}

/// Attach a typed `UniqueViolation` when the database rejected a duplicate.
fn write_error(e: DbErr, op: &'static str) -> anyhow::Error {
    if let Some(SqlErr::UniqueConstraintViolation(msg)) = e.sql_err() {
        let field = if msg.contains("document_id") {
            "documentId"
        } else if msg.contains("email") {
            "email"
        } else {
            "unknown"
        };
        tracing::debug!(%msg, field, "unique constraint violation");
        return anyhow::Error::new(UniqueViolation {
            field: field.to_string(),
        });
    }
    anyhow::Error::new(e).context(op)
}

#[async_trait::async_trait]
impl<C> MedicosRepository for SeaOrmMedicosRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn create(&self, new_medico: NewMedico) -> anyhow::Result<Medico> {
        let model = new_active_model(new_medico)
            .insert(&self.conn)
            .await
            .map_err(|e| write_error(e, "insert failed"))?;
        Ok(model.into())
    }

    async fn find_by_id(&self, id: i64) -> anyhow::Result<Option<Medico>> {
        let found = MedicoEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn save(&self, m: &Medico) -> anyhow::Result<()> {
        let _ = to_active_model(m)
            .update(&self.conn)
            .await
            .map_err(|e| write_error(e, "update failed"))?;
        Ok(())
    }

    async fn find_active_page(
        &self,
        request: &PageRequest,
        order: &[SortKey],
    ) -> anyhow::Result<Page<Medico>> {
        let total = MedicoEntity::find()
            .filter(Column::Active.eq(true))
            .count(&self.conn)
            .await
            .context("count active failed")?;

        let mut query = MedicoEntity::find().filter(Column::Active.eq(true));
        for key in order {
            let dir = match key.direction {
                Direction::Asc => Order::Asc,
                Direction::Desc => Order::Desc,
            };
            query = query.order_by(column_for(key.field), dir);
        }

        let rows = query
            .offset(request.offset())
            .limit(request.size)
            .all(&self.conn)
            .await
            .context("find_active_page failed")?;

        Ok(Page::new(
            rows.into_iter().map(Into::into).collect(),
            total,
            request.clone(),
        ))
    }
}

#[async_trait::async_trait]
impl MedicosStore for SeaOrmMedicosRepository<DatabaseConnection> {
    async fn begin(&self) -> anyhow::Result<Box<dyn MedicosTransaction>> {
        let txn = self.conn.begin().await.context("begin transaction failed")?;
        Ok(Box::new(SeaOrmMedicosRepository::new(txn)))
    }
}

#[async_trait::async_trait]
impl MedicosTransaction for SeaOrmMedicosRepository<DatabaseTransaction> {
    async fn commit(self: Box<Self>) -> anyhow::Result<()> {
        let this = *self;
        this.conn.commit().await.context("commit failed")
    }
}
