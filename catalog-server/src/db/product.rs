//! Product persistence: CRUD with owned variants/images, tag links and
//! inventory links. Mutations touching child rows run in one transaction
//! and the caller gets the reloaded product with relationships populated.

use rust_decimal::Decimal;
use serde::Deserialize;
use shared::error::AppError;
use shared::models::inventory::InventoryProduct;
use shared::models::product::{
    AvailabilityStatus, InventoryLinkCreate, Product, ProductCreate, ProductFull, ProductImage,
    ProductUpdate, ProductVariant,
};
use shared::models::tag::Tag;
use sqlx::{PgPool, Postgres, QueryBuilder, Transaction};
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use super::reconcile::reconcile_by_id;
use crate::error::ServiceResult;

/// List filters, combined with AND
#[derive(Debug, Clone, Deserialize)]
pub struct ProductFilter {
    /// Case-insensitive substring match
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category_id: Option<Uuid>,
    pub tag_id: Option<Uuid>,
    pub availability: Option<AvailabilityStatus>,
    /// Inclusive bound on the effective (sale-or-base) price
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub min_rating: Option<Decimal>,
    #[serde(default = "super::default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

pub async fn list(pool: &PgPool, filter: &ProductFilter) -> ServiceResult<Vec<ProductFull>> {
    let mut qb = QueryBuilder::<Postgres>::new("SELECT DISTINCT p.* FROM products p");
    if filter.tag_id.is_some() {
        qb.push(" JOIN product_tags pt ON pt.product_id = p.id");
    }
    qb.push(" WHERE TRUE");
    if let Some(name) = &filter.name {
        qb.push(" AND p.name ILIKE ").push_bind(format!("%{name}%"));
    }
    if let Some(sku) = &filter.sku {
        qb.push(" AND p.sku = ").push_bind(sku);
    }
    if let Some(category_id) = filter.category_id {
        qb.push(" AND p.category_id = ").push_bind(category_id);
    }
    if let Some(tag_id) = filter.tag_id {
        qb.push(" AND pt.tag_id = ").push_bind(tag_id);
    }
    if let Some(availability) = filter.availability {
        qb.push(" AND p.availability = ").push_bind(availability);
    }
    if let Some(min) = filter.min_price {
        qb.push(" AND COALESCE(p.sale_price, p.base_price) >= ")
            .push_bind(min);
    }
    if let Some(max) = filter.max_price {
        qb.push(" AND COALESCE(p.sale_price, p.base_price) <= ")
            .push_bind(max);
    }
    if let Some(min_rating) = filter.min_rating {
        qb.push(" AND p.rating >= ").push_bind(min_rating);
    }
    qb.push(" ORDER BY p.created_at DESC LIMIT ")
        .push_bind(filter.limit.max(0))
        .push(" OFFSET ")
        .push_bind(filter.offset.max(0));

    let products: Vec<Product> = qb.build_query_as().fetch_all(pool).await?;
    attach_relations(pool, products).await
}

pub async fn get_full(pool: &PgPool, id: Uuid) -> ServiceResult<ProductFull> {
    let product: Option<Product> = sqlx::query_as("SELECT * FROM products WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let product = product.ok_or_else(|| AppError::not_found("Product"))?;
    let mut full = attach_relations(pool, vec![product]).await?;
    full.pop()
        .ok_or_else(|| AppError::internal("Internal server error").into())
}

pub async fn create(pool: &PgPool, payload: ProductCreate) -> ServiceResult<ProductFull> {
    let mut tx = pool.begin().await?;

    if let Some(category_id) = payload.category_id {
        ensure_category_exists(&mut tx, category_id).await?;
    }
    let tags = resolve_tags(&mut tx, &payload.tag_ids).await?;

    let id = Uuid::new_v4();
    sqlx::query(
        "INSERT INTO products \
           (id, name, sku, description, base_price, sale_price, availability, rating, category_id) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.sku)
    .bind(&payload.description)
    .bind(payload.base_price)
    .bind(payload.sale_price)
    .bind(payload.availability)
    .bind(payload.rating.unwrap_or(Decimal::ZERO))
    .bind(payload.category_id)
    .execute(&mut *tx)
    .await?;

    for tag in &tags {
        link_tag(&mut tx, id, tag.id).await?;
    }
    for v in &payload.variants {
        insert_variant(&mut tx, id, &v.variant_name, &v.sku, v.price, v.stock).await?;
    }
    for img in &payload.images {
        insert_image(&mut tx, id, &img.url, img.alt_text.as_deref(), img.is_primary).await?;
    }
    for link in &payload.inventory {
        insert_inventory_link(&mut tx, id, link).await?;
    }

    tx.commit().await?;
    get_full(pool, id).await
}

pub async fn update(pool: &PgPool, id: Uuid, payload: ProductUpdate) -> ServiceResult<ProductFull> {
    let mut tx = pool.begin().await?;

    if let Some(category_id) = payload.category_id {
        ensure_category_exists(&mut tx, category_id).await?;
    }

    let updated = sqlx::query(
        "UPDATE products SET \
           name = COALESCE($2, name), \
           sku = COALESCE($3, sku), \
           description = COALESCE($4, description), \
           base_price = COALESCE($5, base_price), \
           sale_price = COALESCE($6, sale_price), \
           availability = COALESCE($7, availability), \
           rating = COALESCE($8, rating), \
           category_id = COALESCE($9, category_id), \
           updated_at = now() \
         WHERE id = $1",
    )
    .bind(id)
    .bind(&payload.name)
    .bind(&payload.sku)
    .bind(&payload.description)
    .bind(payload.base_price)
    .bind(payload.sale_price)
    .bind(payload.availability)
    .bind(payload.rating)
    .bind(payload.category_id)
    .execute(&mut *tx)
    .await?;
    if updated.rows_affected() == 0 {
        return Err(AppError::not_found("Product").into());
    }

    if let Some(tag_ids) = &payload.tag_ids {
        let tags = resolve_tags(&mut tx, tag_ids).await?;
        sqlx::query("DELETE FROM product_tags WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for tag in &tags {
            link_tag(&mut tx, id, tag.id).await?;
        }
    }

    if let Some(variants) = payload.variants {
        let existing: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM product_variants WHERE product_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        let diff = reconcile_by_id(&existing, variants.into_iter().map(|v| (v.id, v)).collect());
        for variant_id in &diff.delete_ids {
            sqlx::query("DELETE FROM product_variants WHERE id = $1")
                .bind(variant_id)
                .execute(&mut *tx)
                .await?;
        }
        for (variant_id, v) in &diff.updates {
            sqlx::query(
                "UPDATE product_variants SET variant_name = $2, sku = $3, price = $4, stock = $5 \
                 WHERE id = $1",
            )
            .bind(variant_id)
            .bind(&v.variant_name)
            .bind(&v.sku)
            .bind(v.price)
            .bind(v.stock)
            .execute(&mut *tx)
            .await?;
        }
        for v in &diff.inserts {
            insert_variant(&mut tx, id, &v.variant_name, &v.sku, v.price, v.stock).await?;
        }
    }

    if let Some(images) = payload.images {
        let existing: Vec<Uuid> =
            sqlx::query_scalar("SELECT id FROM product_images WHERE product_id = $1")
                .bind(id)
                .fetch_all(&mut *tx)
                .await?;
        let diff = reconcile_by_id(&existing, images.into_iter().map(|i| (i.id, i)).collect());
        for image_id in &diff.delete_ids {
            sqlx::query("DELETE FROM product_images WHERE id = $1")
                .bind(image_id)
                .execute(&mut *tx)
                .await?;
        }
        for (image_id, img) in &diff.updates {
            sqlx::query(
                "UPDATE product_images SET url = $2, alt_text = $3, is_primary = $4 WHERE id = $1",
            )
            .bind(image_id)
            .bind(&img.url)
            .bind(&img.alt_text)
            .bind(img.is_primary)
            .execute(&mut *tx)
            .await?;
        }
        for img in &diff.inserts {
            insert_image(&mut tx, id, &img.url, img.alt_text.as_deref(), img.is_primary).await?;
        }
    }

    // Inventory links carry no client-visible identity, replaced wholesale
    if let Some(links) = &payload.inventory {
        sqlx::query("DELETE FROM inventory_products WHERE product_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;
        for link in links {
            insert_inventory_link(&mut tx, id, link).await?;
        }
    }

    tx.commit().await?;
    get_full(pool, id).await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> ServiceResult<()> {
    let result = sqlx::query("DELETE FROM products WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(AppError::not_found("Product").into());
    }
    Ok(())
}

// ==================== helpers ====================

#[derive(sqlx::FromRow)]
struct ProductTagRow {
    product_id: Uuid,
    id: Uuid,
    name: String,
}

/// Batch-load children for a page of products, preserving input order.
async fn attach_relations(
    pool: &PgPool,
    products: Vec<Product>,
) -> ServiceResult<Vec<ProductFull>> {
    if products.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<Uuid> = products.iter().map(|p| p.id).collect();

    let tag_rows: Vec<ProductTagRow> = sqlx::query_as(
        "SELECT pt.product_id, t.id, t.name FROM product_tags pt \
         JOIN tags t ON t.id = pt.tag_id WHERE pt.product_id = ANY($1) ORDER BY t.name",
    )
    .bind(&ids)
    .fetch_all(pool)
    .await?;
    let variants: Vec<ProductVariant> =
        sqlx::query_as("SELECT * FROM product_variants WHERE product_id = ANY($1) ORDER BY id")
            .bind(&ids)
            .fetch_all(pool)
            .await?;
    let images: Vec<ProductImage> =
        sqlx::query_as("SELECT * FROM product_images WHERE product_id = ANY($1) ORDER BY id")
            .bind(&ids)
            .fetch_all(pool)
            .await?;
    let links: Vec<InventoryProduct> =
        sqlx::query_as("SELECT * FROM inventory_products WHERE product_id = ANY($1) ORDER BY id")
            .bind(&ids)
            .fetch_all(pool)
            .await?;

    let mut tags_by_product: HashMap<Uuid, Vec<Tag>> = HashMap::new();
    for row in tag_rows {
        tags_by_product.entry(row.product_id).or_default().push(Tag {
            id: row.id,
            name: row.name,
        });
    }
    let mut variants_by_product: HashMap<Uuid, Vec<ProductVariant>> = HashMap::new();
    for v in variants {
        variants_by_product.entry(v.product_id).or_default().push(v);
    }
    let mut images_by_product: HashMap<Uuid, Vec<ProductImage>> = HashMap::new();
    for img in images {
        images_by_product.entry(img.product_id).or_default().push(img);
    }
    let mut links_by_product: HashMap<Uuid, Vec<InventoryProduct>> = HashMap::new();
    for link in links {
        links_by_product.entry(link.product_id).or_default().push(link);
    }

    Ok(products
        .into_iter()
        .map(|product| {
            let id = product.id;
            ProductFull {
                product,
                tags: tags_by_product.remove(&id).unwrap_or_default(),
                variants: variants_by_product.remove(&id).unwrap_or_default(),
                images: images_by_product.remove(&id).unwrap_or_default(),
                inventory: links_by_product.remove(&id).unwrap_or_default(),
            }
        })
        .collect())
}

async fn ensure_category_exists(
    tx: &mut Transaction<'_, Postgres>,
    category_id: Uuid,
) -> ServiceResult<()> {
    let exists: bool = sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)")
        .bind(category_id)
        .fetch_one(&mut **tx)
        .await?;
    if !exists {
        return Err(AppError::not_found("Category").into());
    }
    Ok(())
}

/// Resolve tag ids to rows, failing if any id is unknown.
async fn resolve_tags(
    tx: &mut Transaction<'_, Postgres>,
    tag_ids: &[Uuid],
) -> ServiceResult<Vec<Tag>> {
    if tag_ids.is_empty() {
        return Ok(Vec::new());
    }
    let tags: Vec<Tag> = sqlx::query_as("SELECT * FROM tags WHERE id = ANY($1)")
        .bind(tag_ids)
        .fetch_all(&mut **tx)
        .await?;
    let distinct: HashSet<Uuid> = tag_ids.iter().copied().collect();
    if tags.len() != distinct.len() {
        return Err(AppError::not_found("Tag").into());
    }
    Ok(tags)
}

async fn link_tag(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    tag_id: Uuid,
) -> ServiceResult<()> {
    sqlx::query("INSERT INTO product_tags (product_id, tag_id) VALUES ($1, $2)")
        .bind(product_id)
        .bind(tag_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn insert_variant(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    variant_name: &str,
    sku: &str,
    price: Decimal,
    stock: i32,
) -> ServiceResult<()> {
    sqlx::query(
        "INSERT INTO product_variants (id, product_id, variant_name, sku, price, stock) \
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(Uuid::new_v4())
    .bind(product_id)
    .bind(variant_name)
    .bind(sku)
    .bind(price)
    .bind(stock)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_image(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    url: &str,
    alt_text: Option<&str>,
    is_primary: bool,
) -> ServiceResult<()> {
    sqlx::query(
        "INSERT INTO product_images (id, product_id, url, alt_text, is_primary) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(product_id)
    .bind(url)
    .bind(alt_text)
    .bind(is_primary)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn insert_inventory_link(
    tx: &mut Transaction<'_, Postgres>,
    product_id: Uuid,
    link: &InventoryLinkCreate,
) -> ServiceResult<()> {
    sqlx::query(
        "INSERT INTO inventory_products (id, inventory_id, product_id, quantity, low_stock_threshold) \
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(Uuid::new_v4())
    .bind(link.inventory_id)
    .bind(product_id)
    .bind(link.quantity)
    .bind(link.low_stock_threshold)
    .execute(&mut **tx)
    .await?;
    Ok(())
}
