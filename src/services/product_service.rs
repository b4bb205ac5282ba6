// src/services/product_service.rs

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    clients::media::{MediaKind, MediaUpload, MediaUploader, PRODUCT_IMAGES},
    common::{
        db_utils::contains_pattern,
        error::{AppError, Denial, Resource},
        pagination::{Paged, Pagination},
        validation::ValidateForm,
    },
    db::ProductStore,
    models::{
        auth::{Role, SessionContext, COMMUNITY, GOVERNMENT},
        product::{
            CreateOrderPayload, IncomingOrder, OrderHistoryEntry, OrderStatusUpdate, Product,
            ProductForm, ProductOrder, ProductPatch, ProductStatus, ProductWithCreator,
            ReviewDecision,
        },
    },
};

/// Fluxo de produtos: submissão pela comunidade, revisão pelo governo e pedidos.
#[derive(Clone)]
pub struct ProductService {
    products: Arc<dyn ProductStore>,
    uploader: Arc<dyn MediaUploader>,
}

impl ProductService {
    pub fn new(products: Arc<dyn ProductStore>, uploader: Arc<dyn MediaUploader>) -> Self {
        Self { products, uploader }
    }

    // ---
    // Lado da comunidade
    // ---

    pub async fn submit_product(
        &self,
        ctx: &SessionContext,
        mut form: ProductForm,
        image: Option<MediaUpload>,
    ) -> Result<Product, AppError> {
        let creator = ctx.require(COMMUNITY)?;
        form.validate_form()?;

        if let Some(file) = image {
            let url = self.uploader.upload(file, MediaKind::Image, PRODUCT_IMAGES).await?;
            form.image_url = Some(url);
        }

        let product = self.products.insert(creator, &form).await?;
        tracing::info!("📦 Produto {} submetido por {}", product.id, creator);
        Ok(product)
    }

    pub async fn edit_product(
        &self,
        ctx: &SessionContext,
        product_id: Uuid,
        mut patch: ProductPatch,
        image: Option<MediaUpload>,
    ) -> Result<Product, AppError> {
        let caller = ctx.require(COMMUNITY)?;
        patch.validate_form()?;

        let product = self
            .products
            .find(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AppError::NotFound(Resource::Product))?;

        if product.created_by != caller {
            return Err(AppError::Forbidden(Denial::NotOwner));
        }
        if product.status == ProductStatus::Approved {
            return Err(AppError::CannotEditApproved);
        }

        if let Some(file) = image {
            let url = self.uploader.upload(file, MediaKind::Image, PRODUCT_IMAGES).await?;
            patch.image_url = Some(url);
        }

        // Pode ter sido aprovado entre a leitura e a escrita
        let updated = self
            .products
            .update_unapproved(product_id, &patch)
            .await?
            .ok_or(AppError::CannotEditApproved)?;

        tracing::info!("✏️ Produto {} editado e reenviado para revisão", product_id);
        Ok(updated)
    }

    pub async fn list_my_products(
        &self,
        ctx: &SessionContext,
        page: Pagination,
    ) -> Result<Paged<Product>, AppError> {
        let creator = ctx.require(COMMUNITY)?;
        let (items, total) = self.products.list_by_creator(creator, page).await?;
        Ok(Paged::new(items, total, page))
    }

    /// Desativa o produto (soft delete). Dono ou super admin.
    pub async fn deactivate_product(&self, ctx: &SessionContext, product_id: Uuid) -> Result<(), AppError> {
        let caller = ctx.require(COMMUNITY)?;

        let product = self
            .products
            .find(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AppError::NotFound(Resource::Product))?;

        if product.created_by != caller && !ctx.is(Role::SuperAdmin) {
            return Err(AppError::Forbidden(Denial::NotOwner));
        }

        if !self.products.deactivate(product_id).await? {
            return Err(AppError::NotFound(Resource::Product));
        }
        tracing::info!("🗑️ Produto {} desativado por {}", product_id, caller);
        Ok(())
    }

    /// Reposição de estoque pelo dono (ou super_admin). Vale também para produtos aprovados.
    pub async fn update_stock(
        &self,
        ctx: &SessionContext,
        product_id: Uuid,
        new_stock: i32,
    ) -> Result<Product, AppError> {
        let caller = ctx.require(COMMUNITY)?;
        if new_stock < 0 {
            return Err(AppError::ValidationError("Stok tidak boleh negatif.".to_string()));
        }

        let product = self
            .products
            .find(product_id)
            .await?
            .filter(|p| p.is_active)
            .ok_or(AppError::NotFound(Resource::Product))?;

        if product.created_by != caller && !ctx.is(Role::SuperAdmin) {
            return Err(AppError::Forbidden(Denial::NotOwner));
        }

        let updated = self
            .products
            .set_stock(product_id, new_stock)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        tracing::info!("📦 Estoque do produto {} atualizado para {}", product_id, new_stock);
        Ok(updated)
    }

    pub async fn list_incoming_orders(&self, ctx: &SessionContext) -> Result<Vec<IncomingOrder>, AppError> {
        let creator = ctx.require(COMMUNITY)?;
        self.products.orders_for_creator(creator).await
    }

    pub async fn update_order_status(
        &self,
        ctx: &SessionContext,
        order_id: Uuid,
        status: OrderStatusUpdate,
    ) -> Result<ProductOrder, AppError> {
        let caller = ctx.require(COMMUNITY)?;

        // 1. Pedido -> produto -> dono
        let order = self
            .products
            .find_order(order_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Order))?;
        let product = self
            .products
            .find(order.product_id)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        if product.created_by != caller {
            return Err(AppError::Forbidden(Denial::NotOwner));
        }

        // 2. Só o status muda; cancelar não devolve estoque
        let updated = self
            .products
            .set_order_status(order_id, status.into())
            .await?
            .ok_or(AppError::NotFound(Resource::Order))?;

        tracing::info!("🚚 Pedido {} agora está {:?}", order_id, updated.status);
        Ok(updated)
    }

    // ---
    // Lado do governo
    // ---

    pub async fn list_submitted_products(&self, ctx: &SessionContext) -> Result<Vec<ProductWithCreator>, AppError> {
        ctx.require(GOVERNMENT)?;
        self.products.list_submitted().await
    }

    /// Revisão sem trava de estado: revisar de novo sobrescreve a decisão anterior.
    pub async fn review_product(
        &self,
        ctx: &SessionContext,
        product_id: Uuid,
        decision: ReviewDecision,
        note: Option<String>,
    ) -> Result<Product, AppError> {
        let reviewer = ctx.require(GOVERNMENT)?;
        let note = note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());

        let product = self
            .products
            .review(product_id, decision.into(), note.as_deref(), reviewer)
            .await?
            .ok_or(AppError::NotFound(Resource::Product))?;

        tracing::info!("🏛️ Produto {} revisado: {:?} por {}", product_id, decision, reviewer);
        Ok(product)
    }

    pub async fn list_approved_products(&self, ctx: &SessionContext) -> Result<Vec<ProductWithCreator>, AppError> {
        ctx.require(GOVERNMENT)?;
        self.products.list_orderable().await
    }

    pub async fn create_order(
        &self,
        ctx: &SessionContext,
        payload: CreateOrderPayload,
    ) -> Result<ProductOrder, AppError> {
        let orderer = ctx.require(GOVERNMENT)?;
        if payload.quantity <= 0 {
            return Err(AppError::InvalidQuantity);
        }
        let note = payload.note.as_deref().map(str::trim).filter(|n| !n.is_empty());

        let order = self
            .products
            .place_order(payload.product_id, orderer, payload.quantity, note)
            .await?;

        tracing::info!(
            "🛒 Pedido {} criado: {} unidade(s) do produto {}",
            order.id,
            order.quantity,
            order.product_id
        );
        Ok(order)
    }

    pub async fn list_order_history(&self, ctx: &SessionContext) -> Result<Vec<OrderHistoryEntry>, AppError> {
        let orderer = ctx.require(GOVERNMENT)?;
        self.products.orders_by_orderer(orderer).await
    }

    // ---
    // Catálogo público
    // ---

    pub async fn get_product(&self, product_id: Uuid) -> Result<Product, AppError> {
        self.products
            .find(product_id)
            .await?
            .filter(Product::is_orderable)
            .ok_or(AppError::NotFound(Resource::Product))
    }

    pub async fn search_products(
        &self,
        query: Option<&str>,
        page: Pagination,
    ) -> Result<Paged<Product>, AppError> {
        let term = query.map(str::trim).filter(|q| !q.is_empty());
        if let Some(term) = term {
            if term.chars().count() < 2 {
                return Err(AppError::ValidationError(
                    "Kata kunci pencarian minimal 2 karakter.".to_string(),
                ));
            }
        }

        let pattern = term.map(contains_pattern);
        let (items, total) = self.products.search_catalog(pattern.as_deref(), page).await?;
        Ok(Paged::new(items, total, page))
    }
}
