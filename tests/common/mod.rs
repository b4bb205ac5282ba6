// Infraestrutura compartilhada dos testes de integração: um banco em memória
// que implementa todos os stores, fakes dos clientes externos e o emissor de tokens.
#![allow(dead_code)]

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use axum::Router;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use uuid::Uuid;

use paman::{
    clients::{
        chat::{ChatCompletion, ChatMessage},
        media::{MediaKind, MediaUpload, MediaUploader},
    },
    common::{
        error::{AppError, Denial, Resource},
        pagination::Pagination,
    },
    config::{AppState, Stores},
    db::{
        CategoryStore, ConversationStore, Exchange, MaterialFilter, MaterialStore, ProductStore,
        SavedMaterialStore, UserStore,
    },
    models::{
        assistant::{Conversation, MessageRole, StoredMessage},
        auth::{Claims, RegisterProfilePayload, Role, SessionContext, User, UserSearchAttribute},
        category::{Category, CategoryPayload},
        material::{
            Material, MaterialForm, MaterialPatch, MaterialSortField, MaterialSuggestion,
            MaterialWithCategory, SavedMaterialEntry, SortOrder,
        },
        product::{
            IncomingOrder, OrderHistoryEntry, OrderStatus, Product, ProductForm, ProductOrder,
            ProductPatch, ProductStatus, ProductWithCreator,
        },
    },
    routes::build_router,
};

pub const TEST_SECRET: &str = "segredo-dos-testes";

// ---
// ILIKE e paginação em memória
// ---

/// Emula `valor ILIKE padrão` para os padrões `%termo%` e `termo%`.
pub fn ilike(value: &str, pattern: &str) -> bool {
    let (anchored, body) = match pattern.strip_prefix('%') {
        Some(rest) => (false, rest),
        None => (true, pattern),
    };
    let body = body.strip_suffix('%').unwrap_or(body);
    let needle = body
        .replace("\\%", "%")
        .replace("\\_", "_")
        .replace("\\\\", "\\")
        .to_lowercase();
    let haystack = value.to_lowercase();
    if anchored {
        haystack.starts_with(&needle)
    } else {
        haystack.contains(&needle)
    }
}

fn paginate<T>(items: Vec<T>, page: Pagination) -> (Vec<T>, i64) {
    let total = items.len() as i64;
    let page_items = items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    (page_items, total)
}

// ---
// Banco em memória
// ---

#[derive(Default)]
pub struct Tables {
    tick: i64,
    pub users: Vec<User>,
    pub categories: Vec<Category>,
    pub materials: Vec<Material>,
    pub products: Vec<Product>,
    pub orders: Vec<ProductOrder>,
    pub saved: Vec<(Uuid, Uuid, DateTime<Utc>)>,
    pub conversations: Vec<Conversation>,
    pub messages: Vec<StoredMessage>,
}

impl Tables {
    // Relógio monotônico: cada escrita ganha um instante distinto
    fn now(&mut self) -> DateTime<Utc> {
        self.tick += 1;
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).single().unwrap_or_else(Utc::now)
            + Duration::seconds(self.tick)
    }

    fn user_name(&self, id: Uuid) -> Option<String> {
        self.users.iter().find(|u| u.id == id).map(|u| u.user_name.clone())
    }

    fn category_title(&self, id: Option<Uuid>) -> Option<String> {
        let id = id?;
        self.categories.iter().find(|c| c.id == id).map(|c| c.title.clone())
    }

    fn with_creator(&self, product: &Product) -> ProductWithCreator {
        ProductWithCreator {
            product: product.clone(),
            creator_name: self.user_name(product.created_by),
        }
    }

    fn with_category(&self, material: &Material) -> MaterialWithCategory {
        MaterialWithCategory {
            material: material.clone(),
            category_title: self.category_title(material.category_id),
        }
    }
}

/// Todas as tabelas atrás de um único lock. Nenhum método segura o lock
/// através de um `.await`, então cada operação é atômica.
#[derive(Clone, Default)]
pub struct MemoryDb {
    inner: Arc<Mutex<Tables>>,
}

impl MemoryDb {
    pub fn tables(&self) -> MutexGuard<'_, Tables> {
        self.inner.lock().unwrap()
    }

    pub fn seed_user(&self, role: Role, name: &str) -> User {
        let mut t = self.tables();
        let created_at = t.now();
        let user = User {
            id: Uuid::new_v4(),
            user_name: name.to_string(),
            user_email: format!("{}@papuamandiri.test", name.to_lowercase().replace(' ', ".")),
            role,
            location: Some("Jayapura".to_string()),
            created_at,
        };
        t.users.push(user.clone());
        user
    }

    pub fn seed_category(&self, title: &str) -> Category {
        let mut t = self.tables();
        let created_at = t.now();
        let category = Category {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: None,
            created_at,
        };
        t.categories.push(category.clone());
        category
    }

    pub fn seed_material(&self, title: &str, description: &str, category_id: Option<Uuid>) -> Material {
        let mut t = self.tables();
        let now = t.now();
        let material = Material {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.to_string(),
            image_url: None,
            video_url: None,
            steps: vec!["Siapkan bibit".to_string()],
            category_id,
            uploader_id: None,
            views_count: 0,
            created_at: now,
            updated_at: now,
        };
        t.materials.push(material.clone());
        material
    }

    pub fn product(&self, id: Uuid) -> Product {
        self.tables()
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .unwrap()
    }
}

#[async_trait]
impl ProductStore for MemoryDb {
    async fn insert(&self, creator: Uuid, form: &ProductForm) -> Result<Product, AppError> {
        let mut t = self.tables();
        let now = t.now();
        let product = Product {
            id: Uuid::new_v4(),
            title: form.title.clone(),
            description: form.description.clone(),
            price: form.price,
            stock: form.stock,
            address: form.address.clone(),
            image_url: form.image_url.clone(),
            status: ProductStatus::Submitted,
            government_note: None,
            category_id: form.category_id,
            created_by: creator,
            reviewed_by: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        t.products.push(product.clone());
        Ok(product)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.tables().products.iter().find(|p| p.id == id).cloned())
    }

    async fn list_submitted(&self) -> Result<Vec<ProductWithCreator>, AppError> {
        let t = self.tables();
        Ok(t.products
            .iter()
            .rev()
            .filter(|p| p.is_active && p.status == ProductStatus::Submitted)
            .map(|p| t.with_creator(p))
            .collect())
    }

    async fn list_orderable(&self) -> Result<Vec<ProductWithCreator>, AppError> {
        let t = self.tables();
        let mut products: Vec<&Product> = t
            .products
            .iter()
            .filter(|p| p.is_orderable() && p.stock > 0)
            .collect();
        products.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(products.into_iter().map(|p| t.with_creator(p)).collect())
    }

    async fn list_by_creator(
        &self,
        creator: Uuid,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), AppError> {
        let t = self.tables();
        let products = t
            .products
            .iter()
            .rev()
            .filter(|p| p.created_by == creator && p.is_active)
            .cloned()
            .collect();
        Ok(paginate(products, page))
    }

    async fn search_catalog(
        &self,
        pattern: Option<&str>,
        page: Pagination,
    ) -> Result<(Vec<Product>, i64), AppError> {
        let t = self.tables();
        let products = t
            .products
            .iter()
            .rev()
            .filter(|p| p.is_orderable())
            .filter(|p| match pattern {
                Some(pat) => ilike(&p.title, pat) || ilike(&p.description, pat),
                None => true,
            })
            .cloned()
            .collect();
        Ok(paginate(products, page))
    }

    async fn review(
        &self,
        id: Uuid,
        status: ProductStatus,
        note: Option<&str>,
        reviewer: Uuid,
    ) -> Result<Option<Product>, AppError> {
        let mut t = self.tables();
        let now = t.now();
        let Some(product) = t.products.iter_mut().find(|p| p.id == id && p.is_active) else {
            return Ok(None);
        };
        product.status = status;
        product.government_note = note.map(str::to_string);
        product.reviewed_by = Some(reviewer);
        product.updated_at = now;
        Ok(Some(product.clone()))
    }

    async fn update_unapproved(
        &self,
        id: Uuid,
        patch: &ProductPatch,
    ) -> Result<Option<Product>, AppError> {
        let mut t = self.tables();
        let now = t.now();
        let Some(product) = t
            .products
            .iter_mut()
            .find(|p| p.id == id && p.is_active && p.status != ProductStatus::Approved)
        else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            product.title = title.clone();
        }
        if let Some(description) = &patch.description {
            product.description = description.clone();
        }
        if let Some(price) = patch.price {
            product.price = price;
        }
        if let Some(stock) = patch.stock {
            product.stock = stock;
        }
        if let Some(address) = &patch.address {
            product.address = address.clone();
        }
        if let Some(category_id) = patch.category_id {
            product.category_id = Some(category_id);
        }
        if let Some(image_url) = &patch.image_url {
            product.image_url = Some(image_url.clone());
        }
        product.status = ProductStatus::Submitted;
        product.government_note = None;
        product.updated_at = now;
        Ok(Some(product.clone()))
    }

    async fn deactivate(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables();
        let now = t.now();
        match t.products.iter_mut().find(|p| p.id == id && p.is_active) {
            Some(product) => {
                product.is_active = false;
                product.updated_at = now;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn set_stock(&self, id: Uuid, stock: i32) -> Result<Option<Product>, AppError> {
        let mut t = self.tables();
        let now = t.now();
        Ok(t.products
            .iter_mut()
            .find(|p| p.id == id && p.is_active)
            .map(|product| {
                product.stock = stock;
                product.updated_at = now;
                product.clone()
            }))
    }

    async fn place_order(
        &self,
        product_id: Uuid,
        orderer: Uuid,
        quantity: i32,
        note: Option<&str>,
    ) -> Result<ProductOrder, AppError> {
        let mut t = self.tables();
        let now = t.now();
        let product = t
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or(AppError::NotFound(Resource::Product))?;

        if !product.is_orderable() {
            return Err(AppError::ProductNotOrderable);
        }
        if quantity > product.stock {
            return Err(AppError::InsufficientStock { available: product.stock });
        }
        product.stock -= quantity;
        product.updated_at = now;

        let order = ProductOrder {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            note: note.map(str::to_string),
            ordered_by: orderer,
            status: OrderStatus::InProgress,
            created_at: now,
            updated_at: now,
        };
        t.orders.push(order.clone());
        Ok(order)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<ProductOrder>, AppError> {
        Ok(self.tables().orders.iter().find(|o| o.id == id).cloned())
    }

    async fn set_order_status(
        &self,
        id: Uuid,
        status: OrderStatus,
    ) -> Result<Option<ProductOrder>, AppError> {
        let mut t = self.tables();
        let now = t.now();
        Ok(t.orders.iter_mut().find(|o| o.id == id).map(|order| {
            order.status = status;
            order.updated_at = now;
            order.clone()
        }))
    }

    async fn orders_by_orderer(&self, orderer: Uuid) -> Result<Vec<OrderHistoryEntry>, AppError> {
        let t = self.tables();
        Ok(t.orders
            .iter()
            .rev()
            .filter(|o| o.ordered_by == orderer)
            .filter_map(|o| {
                let product = t.products.iter().find(|p| p.id == o.product_id)?;
                Some(OrderHistoryEntry {
                    order: o.clone(),
                    product_title: product.title.clone(),
                    product_image_url: product.image_url.clone(),
                })
            })
            .collect())
    }

    async fn orders_for_creator(&self, creator: Uuid) -> Result<Vec<IncomingOrder>, AppError> {
        let t = self.tables();
        Ok(t.orders
            .iter()
            .rev()
            .filter_map(|o| {
                let product = t
                    .products
                    .iter()
                    .find(|p| p.id == o.product_id && p.created_by == creator)?;
                Some(IncomingOrder {
                    order: o.clone(),
                    product_title: product.title.clone(),
                    orderer_name: t.user_name(o.ordered_by),
                })
            })
            .collect())
    }
}

#[async_trait]
impl MaterialStore for MemoryDb {
    async fn insert(&self, uploader: Uuid, form: &MaterialForm) -> Result<Material, AppError> {
        let mut t = self.tables();
        let now = t.now();
        let material = Material {
            id: Uuid::new_v4(),
            title: form.title.clone(),
            description: form.description.clone(),
            image_url: form.image_url.clone(),
            video_url: form.video_url.clone(),
            steps: form.steps.clone(),
            category_id: form.category_id,
            uploader_id: Some(uploader),
            views_count: 0,
            created_at: now,
            updated_at: now,
        };
        t.materials.push(material.clone());
        Ok(material)
    }

    async fn find(&self, id: Uuid) -> Result<Option<MaterialWithCategory>, AppError> {
        let t = self.tables();
        Ok(t.materials.iter().find(|m| m.id == id).map(|m| t.with_category(m)))
    }

    async fn list_all(&self) -> Result<Vec<MaterialWithCategory>, AppError> {
        let t = self.tables();
        Ok(t.materials.iter().rev().map(|m| t.with_category(m)).collect())
    }

    async fn list_by_category(&self, category_id: Uuid) -> Result<Vec<Material>, AppError> {
        let t = self.tables();
        let mut materials: Vec<Material> = t
            .materials
            .iter()
            .filter(|m| m.category_id == Some(category_id))
            .cloned()
            .collect();
        materials.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(materials)
    }

    async fn search(&self, filter: &MaterialFilter) -> Result<(Vec<MaterialWithCategory>, i64), AppError> {
        let t = self.tables();
        let mut materials: Vec<&Material> = t
            .materials
            .iter()
            .filter(|m| match &filter.pattern {
                Some(pat) => ilike(&m.title, pat) || ilike(&m.description, pat),
                None => true,
            })
            .collect();
        materials.sort_by(|a, b| {
            let ordering = match filter.sort_by {
                MaterialSortField::CreatedAt => a.created_at.cmp(&b.created_at),
                MaterialSortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
                MaterialSortField::Title => a.title.cmp(&b.title),
            };
            match filter.sort_order {
                SortOrder::Asc => ordering,
                SortOrder::Desc => ordering.reverse(),
            }
        });
        let rows = materials.into_iter().map(|m| t.with_category(m)).collect();
        Ok(paginate(rows, filter.page))
    }

    async fn suggestions(&self, prefix_pattern: &str, limit: i64) -> Result<Vec<MaterialSuggestion>, AppError> {
        let t = self.tables();
        Ok(t.materials
            .iter()
            .rev()
            .filter(|m| ilike(&m.title, prefix_pattern))
            .take(limit as usize)
            .map(|m| MaterialSuggestion {
                id: m.id,
                text: m.title.clone(),
            })
            .collect())
    }

    async fn popular(&self, limit: i64) -> Result<Vec<MaterialWithCategory>, AppError> {
        let t = self.tables();
        let mut materials: Vec<&Material> = t.materials.iter().collect();
        materials.sort_by(|a, b| {
            b.views_count
                .cmp(&a.views_count)
                .then(b.created_at.cmp(&a.created_at))
        });
        Ok(materials
            .into_iter()
            .take(limit as usize)
            .map(|m| t.with_category(m))
            .collect())
    }

    async fn update(&self, id: Uuid, patch: &MaterialPatch) -> Result<Option<Material>, AppError> {
        let mut t = self.tables();
        let now = t.now();
        let Some(material) = t.materials.iter_mut().find(|m| m.id == id) else {
            return Ok(None);
        };
        if let Some(title) = &patch.title {
            material.title = title.clone();
        }
        if let Some(description) = &patch.description {
            material.description = description.clone();
        }
        if let Some(steps) = &patch.steps {
            material.steps = steps.clone();
        }
        if let Some(category_id) = patch.category_id {
            material.category_id = Some(category_id);
        }
        if let Some(image_url) = &patch.image_url {
            material.image_url = Some(image_url.clone());
        }
        if let Some(video_url) = &patch.video_url {
            material.video_url = Some(video_url.clone());
        }
        material.updated_at = now;
        Ok(Some(material.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables();
        let before = t.materials.len();
        t.materials.retain(|m| m.id != id);
        // ON DELETE CASCADE
        t.saved.retain(|(_, material_id, _)| *material_id != id);
        Ok(t.materials.len() < before)
    }

    async fn increment_views(&self, id: Uuid) -> Result<Option<i64>, AppError> {
        let mut t = self.tables();
        Ok(t.materials.iter_mut().find(|m| m.id == id).map(|m| {
            m.views_count += 1;
            m.views_count
        }))
    }

    async fn matching_any(&self, patterns: &[String], limit: i64) -> Result<Vec<Material>, AppError> {
        let t = self.tables();
        Ok(t.materials
            .iter()
            .rev()
            .filter(|m| {
                patterns
                    .iter()
                    .any(|pat| ilike(&m.title, pat) || ilike(&m.description, pat))
            })
            .take(limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables().materials.len() as i64)
    }
}

#[async_trait]
impl CategoryStore for MemoryDb {
    async fn insert(&self, payload: &CategoryPayload) -> Result<Category, AppError> {
        let mut t = self.tables();
        if t.categories.iter().any(|c| c.title == payload.title) {
            return Err(AppError::CategoryAlreadyExists);
        }
        let created_at = t.now();
        let category = Category {
            id: Uuid::new_v4(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            created_at,
        };
        t.categories.push(category.clone());
        Ok(category)
    }

    async fn list(&self) -> Result<Vec<Category>, AppError> {
        let mut categories = self.tables().categories.clone();
        categories.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(categories)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Category>, AppError> {
        Ok(self.tables().categories.iter().find(|c| c.id == id).cloned())
    }

    async fn update(&self, id: Uuid, payload: &CategoryPayload) -> Result<Option<Category>, AppError> {
        let mut t = self.tables();
        if t.categories.iter().any(|c| c.id != id && c.title == payload.title) {
            return Err(AppError::CategoryAlreadyExists);
        }
        Ok(t.categories.iter_mut().find(|c| c.id == id).map(|category| {
            category.title = payload.title.clone();
            category.description = payload.description.clone();
            category.clone()
        }))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables();
        let in_use = t.materials.iter().any(|m| m.category_id == Some(id))
            || t.products.iter().any(|p| p.category_id == Some(id));
        if in_use {
            return Err(AppError::CategoryInUse);
        }
        let before = t.categories.len();
        t.categories.retain(|c| c.id != id);
        Ok(t.categories.len() < before)
    }
}

#[async_trait]
impl UserStore for MemoryDb {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        Ok(self.tables().users.iter().find(|u| u.id == id).cloned())
    }

    async fn create_profile(&self, id: Uuid, payload: &RegisterProfilePayload) -> Result<User, AppError> {
        let mut t = self.tables();
        if t.users.iter().any(|u| u.id == id) {
            return Err(AppError::ProfileAlreadyExists);
        }
        if t.users.iter().any(|u| u.user_email == payload.email) {
            return Err(AppError::ValidationError(
                "Email sudah digunakan oleh akun lain".to_string(),
            ));
        }
        let created_at = t.now();
        let user = User {
            id,
            user_name: payload.full_name.clone(),
            user_email: payload.email.clone(),
            role: Role::User,
            location: payload.location.clone(),
            created_at,
        };
        t.users.push(user.clone());
        Ok(user)
    }

    async fn search(
        &self,
        attribute: UserSearchAttribute,
        pattern: Option<&str>,
        page: Pagination,
    ) -> Result<(Vec<User>, i64), AppError> {
        let t = self.tables();
        let users = t
            .users
            .iter()
            .rev()
            .filter(|u| {
                let Some(pat) = pattern else { return true };
                let value = match attribute {
                    UserSearchAttribute::UserName => Some(u.user_name.as_str()),
                    UserSearchAttribute::UserEmail => Some(u.user_email.as_str()),
                    UserSearchAttribute::Location => u.location.as_deref(),
                };
                value.is_some_and(|v| ilike(v, pat))
            })
            .cloned()
            .collect();
        Ok(paginate(users, page))
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AppError> {
        let mut t = self.tables();
        let in_use = t.products.iter().any(|p| p.created_by == id)
            || t.orders.iter().any(|o| o.ordered_by == id);
        if in_use {
            return Err(AppError::UserInUse);
        }
        let before = t.users.len();
        t.users.retain(|u| u.id != id);
        t.saved.retain(|(user_id, _, _)| *user_id != id);
        let removed: Vec<Uuid> = t
            .conversations
            .iter()
            .filter(|c| c.user_id == id)
            .map(|c| c.id)
            .collect();
        t.conversations.retain(|c| c.user_id != id);
        t.messages.retain(|m| !removed.contains(&m.conversation_id));
        Ok(t.users.len() < before)
    }

    async fn count(&self) -> Result<i64, AppError> {
        Ok(self.tables().users.len() as i64)
    }
}

#[async_trait]
impl SavedMaterialStore for MemoryDb {
    async fn save(&self, user_id: Uuid, material_id: Uuid) -> Result<(), AppError> {
        let mut t = self.tables();
        if !t.materials.iter().any(|m| m.id == material_id) {
            return Err(AppError::NotFound(Resource::Material));
        }
        if t.saved.iter().any(|(u, m, _)| *u == user_id && *m == material_id) {
            return Err(AppError::DuplicateSaved);
        }
        let now = t.now();
        t.saved.push((user_id, material_id, now));
        Ok(())
    }

    async fn remove(&self, user_id: Uuid, material_id: Uuid) -> Result<(), AppError> {
        self.tables()
            .saved
            .retain(|(u, m, _)| !(*u == user_id && *m == material_id));
        Ok(())
    }

    async fn list(&self, user_id: Uuid) -> Result<Vec<SavedMaterialEntry>, AppError> {
        let t = self.tables();
        Ok(t.saved
            .iter()
            .rev()
            .filter(|(u, _, _)| *u == user_id)
            .filter_map(|(_, material_id, saved_at)| {
                let material = t.materials.iter().find(|m| m.id == *material_id)?;
                Some(SavedMaterialEntry {
                    material: material.clone(),
                    category_title: t.category_title(material.category_id),
                    saved_at: *saved_at,
                })
            })
            .collect())
    }

    async fn exists(&self, user_id: Uuid, material_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .tables()
            .saved
            .iter()
            .any(|(u, m, _)| *u == user_id && *m == material_id))
    }
}

#[async_trait]
impl ConversationStore for MemoryDb {
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Conversation>, AppError> {
        Ok(self
            .tables()
            .conversations
            .iter()
            .rev()
            .filter(|c| c.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find(&self, id: Uuid) -> Result<Option<Conversation>, AppError> {
        Ok(self.tables().conversations.iter().find(|c| c.id == id).cloned())
    }

    async fn messages(&self, conversation_id: Uuid) -> Result<Vec<StoredMessage>, AppError> {
        Ok(self
            .tables()
            .messages
            .iter()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }

    async fn append_exchange(&self, exchange: Exchange<'_>) -> Result<Uuid, AppError> {
        let mut t = self.tables();
        let conversation_id = match exchange.conversation_id {
            Some(id) => {
                let conversation = t
                    .conversations
                    .iter()
                    .find(|c| c.id == id)
                    .ok_or(AppError::NotFound(Resource::Conversation))?;
                if conversation.user_id != exchange.user_id {
                    return Err(AppError::Forbidden(Denial::NotOwner));
                }
                id
            }
            None => {
                let created_at = t.now();
                let conversation = Conversation {
                    id: Uuid::new_v4(),
                    user_id: exchange.user_id,
                    title: exchange.new_title.to_string(),
                    created_at,
                };
                t.conversations.push(conversation.clone());
                conversation.id
            }
        };

        for (role, content) in [
            (MessageRole::User, exchange.question),
            (MessageRole::Assistant, exchange.answer),
        ] {
            let created_at = t.now();
            t.messages.push(StoredMessage {
                id: Uuid::new_v4(),
                conversation_id,
                role,
                content: content.to_string(),
                created_at,
            });
        }
        Ok(conversation_id)
    }
}

// ---
// Fakes dos clientes externos
// ---

/// Modelo de chat que devolve uma resposta fixa e guarda cada prompt recebido.
pub struct FakeChat {
    pub reply: Mutex<Option<String>>,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
}

impl FakeChat {
    pub fn answering(reply: &str) -> Self {
        Self {
            reply: Mutex::new(Some(reply.to_string())),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn set_reply(&self, reply: Option<&str>) {
        *self.reply.lock().unwrap() = reply.map(str::to_string);
    }

    pub fn last_prompt(&self) -> Vec<ChatMessage> {
        self.prompts.lock().unwrap().last().cloned().unwrap_or_default()
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatCompletion for FakeChat {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>, AppError> {
        self.prompts.lock().unwrap().push(messages.to_vec());
        Ok(self.reply.lock().unwrap().clone())
    }
}

/// Host de mídia falso: devolve uma URL previsível por pasta e nome.
#[derive(Default)]
pub struct FakeUploader {
    pub uploads: Mutex<Vec<(MediaKind, String, String)>>,
}

#[async_trait]
impl MediaUploader for FakeUploader {
    async fn upload(&self, file: MediaUpload, kind: MediaKind, folder: &str) -> Result<String, AppError> {
        let url = format!("https://media.test/{}/{}", folder, file.file_name);
        self.uploads
            .lock()
            .unwrap()
            .push((kind, folder.to_string(), file.file_name));
        Ok(url)
    }
}

pub fn image_upload(name: &str) -> MediaUpload {
    MediaUpload {
        file_name: name.to_string(),
        content_type: "image/png".to_string(),
        bytes: vec![0x89, 0x50, 0x4e, 0x47],
    }
}

// ---
// Aplicação de teste
// ---

pub struct TestApp {
    pub db: MemoryDb,
    pub chat: Arc<FakeChat>,
    pub uploader: Arc<FakeUploader>,
    pub state: AppState,
}

impl TestApp {
    pub fn new() -> Self {
        let db = MemoryDb::default();
        let chat = Arc::new(FakeChat::answering("## Sagu\nSagu tumbuh di rawa."));
        let uploader = Arc::new(FakeUploader::default());

        let stores = Stores {
            products: Arc::new(db.clone()),
            materials: Arc::new(db.clone()),
            categories: Arc::new(db.clone()),
            users: Arc::new(db.clone()),
            saved_materials: Arc::new(db.clone()),
            conversations: Arc::new(db.clone()),
        };
        let state = AppState::build(stores, chat.clone(), uploader.clone(), TEST_SECRET, None);

        Self { db, chat, uploader, state }
    }

    pub fn router(&self) -> Router {
        build_router(self.state.clone())
    }

    /// Cria o perfil e devolve a sessão correspondente.
    pub fn session(&self, role: Role, name: &str) -> SessionContext {
        let user = self.db.seed_user(role, name);
        SessionContext::new(user.id, user.role)
    }
}

/// Token HS256 como o provedor de identidade emitiria.
pub fn token_for(user_id: Uuid) -> String {
    let claims = Claims {
        sub: user_id,
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        iat: Some(Utc::now().timestamp() as usize),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .unwrap()
}
