// src/db/product_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::{error::{AppError, Resource}, pagination::Pagination},
    models::product::{
        IncomingOrder, OrderHistoryEntry, OrderStatus, Product, ProductForm, ProductOrder,
        ProductPatch, ProductStatus, ProductWithCreator,
    },
};

/// Persistência de produtos e pedidos.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn insert(&self, creator: Uuid, form: &ProductForm) -> Result<Product, AppError>;

    async fn find(&self, id: Uuid) -> Result<Option<Product>, AppError>;

    /// Produtos ativos com status `submitted`, mais novos primeiro.
    async fn list_submitted(&self) -> Result<Vec<ProductWithCreator>, AppError>;

    /// Produtos ativos, aprovados e com estoque, atualizados mais recentemente primeiro.
    async fn list_orderable(&self) -> Result<Vec<ProductWithCreator>, AppError>;

    async fn list_by_creator(
        &self,
        creator: Uuid,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), AppError>;

    /// Catálogo público. `pattern` já vem pronto para ILIKE.
    async fn search_catalog(
        &self,
        pattern: Option<&str>,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), AppError>;

    async fn review(
        &self,
        id: Uuid,
        status: ProductStatus,
        note: Option<&str>,
        reviewer: Uuid,
    ) -> Result<Option<Product>, AppError>;

    /// Aplica a edição e volta o produto para `submitted`.
    /// `None` quando o produto não existe, está inativo ou já foi aprovado.
    async fn update_unapproved(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, AppError>;

    async fn deactivate(&self, id: Uuid) -> Result<bool, AppError>;

    /// Reposição de estoque; não mexe no status. `None` se o produto não existe ou está inativo.
    async fn set_stock(&self, id: Uuid, stock: i32) -> Result<Option<Product>, AppError>;

    /// Unidade atômica do pedido: trava a linha, confere, baixa o estoque
    /// e grava o pedido. Ou tudo é gravado, ou nada.
    async fn place_order(
        &self,
        product_id: Uuid,
        orderer: Uuid,
        quantity: i32,
        note: Option<&str>,
    ) -> Result<ProductOrder, AppError>;

    async fn find_order(&self, id: Uuid) -> Result<Option<ProductOrder>, AppError>;

    async fn set_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<ProductOrder>, AppError>;

    async fn orders_by_orderer(&self, orderer: Uuid) -> Result<Vec<OrderHistoryEntry>, AppError>;

    async fn orders_for_creator(&self, creator: Uuid) -> Result<Vec<IncomingOrder>, AppError>;
}

#[derive(Clone)]
pub struct ProductRepository {
    pool: PgPool,
}

impl ProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for ProductRepository {
    async fn insert(&self, creator: Uuid, form: &ProductForm) -> Result<Product, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products
                (title, description, price, stock, address, image_url, category_id, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING *
            "#,
        )
        .bind(&form.title)
        .bind(&form.description)
        .bind(form.price)
        .bind(form.stock)
        .bind(&form.address)
        .bind(&form.image_url)
        .bind(form.category_id)
        .bind(creator)
        .fetch_one(&self.pool)
        .await?;
        Ok(product)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(product)
    }

    async fn list_submitted(&self) -> Result<Vec<ProductWithCreator>, AppError> {
        let products = sqlx::query_as::<_, ProductWithCreator>(
            r#"
            SELECT p.*, u.user_name AS creator_name
            FROM products p
            LEFT JOIN users u ON u.id = p.created_by
            WHERE p.status = 'submitted' AND p.is_active
            ORDER BY p.created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn list_orderable(&self) -> Result<Vec<ProductWithCreator>, AppError> {
        let products = sqlx::query_as::<_, ProductWithCreator>(
            r#"
            SELECT p.*, u.user_name AS creator_name
            FROM products p
            LEFT JOIN users u ON u.id = p.created_by
            WHERE p.status = 'approved' AND p.stock > 0 AND p.is_active
            ORDER BY p.updated_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(products)
    }

    async fn list_by_creator(
        &self,
        creator: Uuid,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), AppError> {
        let items = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE created_by = $1 AND is_active
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(creator)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM products WHERE created_by = $1 AND is_active",
        )
        .bind(creator)
        .fetch_one(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn search_catalog(
        &self,
        pattern: Option<&str>,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), AppError> {
        let items = sqlx::query_as::<_, Product>(
            r#"
            SELECT * FROM products
            WHERE status = 'approved' AND is_active
              AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(pattern)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM products
            WHERE status = 'approved' AND is_active
              AND ($1::text IS NULL OR title ILIKE $1 OR description ILIKE $1)
            "#,
        )
        .bind(pattern)
        .fetch_one(&self.pool)
        .await?;

        Ok((items, total))
    }

    async fn review(
        &self,
        id: Uuid,
        status: ProductStatus,
        note: Option<&str>,
        reviewer: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET status = $2, government_note = $3, reviewed_by = $4, updated_at = now()
            WHERE id = $1 AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(note)
        .bind(reviewer)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn update_unapproved(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, AppError> {
        // O filtro por status fecha a janela entre a leitura no serviço e a escrita
        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                stock = COALESCE($5, stock),
                address = COALESCE($6, address),
                category_id = COALESCE($7, category_id),
                image_url = COALESCE($8, image_url),
                status = 'submitted',
                government_note = NULL,
                updated_at = now()
            WHERE id = $1 AND status <> 'approved' AND is_active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&patch.title)
        .bind(&patch.description)
        .bind(patch.price)
        .bind(patch.stock)
        .bind(&patch.address)
        .bind(patch.category_id)
        .bind(&patch.image_url)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE products SET is_active = FALSE, updated_at = now() WHERE id = $1 AND is_active",
        )
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn set_stock(&self, id: Uuid, stock: i32) -> Result<Option<Product>, AppError> {
        let product = sqlx::query_as::<_, Product>(
            "UPDATE products SET stock = $2, updated_at = now() WHERE id = $1 AND is_active RETURNING *",
        )
        .bind(id)
        .bind(stock)
        .fetch_optional(&self.pool)
        .await?;
        Ok(product)
    }

    async fn place_order(
        &self,
        product_id: Uuid,
        orderer: Uuid,
        quantity: i32,
        note: Option<&str>,
    ) -> Result<ProductOrder, AppError> {
        // --- INÍCIO DA TRANSAÇÃO ---
        let mut tx = self.pool.begin().await?;

        // 1. Trava a linha do produto até o commit
        let product = sqlx::query_as::<_, Product>(
            "SELECT * FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::NotFound(Resource::Product))?;

        if !product.is_orderable() {
            return Err(AppError::ProductNotOrderable);
        }
        if quantity > product.stock {
            return Err(AppError::InsufficientStock { available: product.stock });
        }

        // 2. Baixa condicional; zero linhas = estoque insuficiente
        let updated = sqlx::query(
            r#"
            UPDATE products
            SET stock = stock - $2, updated_at = now()
            WHERE id = $1 AND stock >= $2
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() != 1 {
            return Err(AppError::InsufficientStock { available: product.stock });
        }

        // 3. Grava o pedido
        let order = sqlx::query_as::<_, ProductOrder>(
            r#"
            INSERT INTO product_orders (product_id, quantity, note, ordered_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(product_id)
        .bind(quantity)
        .bind(note)
        .bind(orderer)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        // --- FIM DA TRANSAÇÃO ---

        Ok(order)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<ProductOrder>, AppError> {
        let order = sqlx::query_as::<_, ProductOrder>("SELECT * FROM product_orders WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(order)
    }

    async fn set_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<ProductOrder>, AppError> {
        let order = sqlx::query_as::<_, ProductOrder>(
            r#"
            UPDATE product_orders SET status = $2, updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    async fn orders_by_orderer(&self, orderer: Uuid) -> Result<Vec<OrderHistoryEntry>, AppError> {
        let orders = sqlx::query_as::<_, OrderHistoryEntry>(
            r#"
            SELECT o.*, p.title AS product_title, p.image_url AS product_image_url
            FROM product_orders o
            JOIN products p ON p.id = o.product_id
            WHERE o.ordered_by = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(orderer)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    async fn orders_for_creator(&self, creator: Uuid) -> Result<Vec<IncomingOrder>, AppError> {
        let orders = sqlx::query_as::<_, IncomingOrder>(
            r#"
            SELECT o.*, p.title AS product_title, u.user_name AS orderer_name
            FROM product_orders o
            JOIN products p ON p.id = o.product_id
            LEFT JOIN users u ON u.id = o.ordered_by
            WHERE p.created_by = $1
            ORDER BY o.created_at DESC
            "#,
        )
        .bind(creator)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }
}
