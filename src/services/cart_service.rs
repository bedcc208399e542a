use std::collections::{BTreeMap, BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sqlx::FromRow;

use crate::{
    dto::cart::{AddToCartRequest, CartLineView, CartUpdateItem, CartView, UpdateCartRequest},
    entity::{
        cart::{
            ActiveModel as CartActive, Column as CartCol, Entity as CartLines, Model as CartModel,
        },
        categories::{Column as CategoryCol, Entity as Categories},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        publishers::{Column as PublisherCol, Entity as Publishers},
        sliders::{Column as SliderCol, Entity as Sliders},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Category, Product, Publisher, SliderImage},
    response::{ApiResponse, Meta},
    services::auth_service::resolve_customer,
    state::AppState,
};

/// Products sold strictly more than this many units are best sellers.
pub const BEST_SELLER_MIN_SOLD: i32 = 50;
pub const BEST_SELLER_LIMIT: u64 = 5;

pub const ADJUSTED_NOTICE: &str =
    "Some items were adjusted to the maximum quantity available in stock.";

/// What a cart mutation hands back to the caller. `notice` is the transient,
/// user-facing message shown once on the next cart view.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CartOutcome {
    pub notice: Option<String>,
}

impl CartOutcome {
    pub fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum AddDecision {
    Upsert(i32),
    Rejected,
}

#[derive(Debug, PartialEq, Eq)]
enum LineUpdate {
    Set(i32),
    Clamp(i32),
    /// Nothing left in stock; a zero-quantity line is not kept.
    Drop,
}

fn decide_add(current: i32, delta: i32, stock: i32) -> AddDecision {
    let total = current.saturating_add(delta);
    if total > stock {
        AddDecision::Rejected
    } else {
        AddDecision::Upsert(total)
    }
}

fn decide_update(requested: i32, stock: i32) -> Option<LineUpdate> {
    if requested <= 0 {
        return None;
    }
    if requested <= stock {
        return Some(LineUpdate::Set(requested));
    }
    if stock > 0 {
        Some(LineUpdate::Clamp(stock))
    } else {
        Some(LineUpdate::Drop)
    }
}

pub fn stock_notice(product_name: &str, stock: i32) -> String {
    format!(
        "Book \"{product_name}\" has only {stock} left in stock. Please choose another product!"
    )
}

/// Merge `quantity` more units of a product into the customer's cart.
///
/// Exceeding stock is a soft failure: nothing is written and the outcome
/// carries a notice naming the product and what is left.
pub async fn add_to_cart(
    state: &AppState,
    user: &AuthUser,
    payload: AddToCartRequest,
) -> AppResult<CartOutcome> {
    if payload.quantity < 1 {
        return Err(AppError::BadRequest(
            "quantity must be greater than 0".to_string(),
        ));
    }

    let txn = state.orm.begin().await?;
    let customer = resolve_customer(&txn, user).await?;

    let product = Products::find_by_id(payload.product_id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let product = match product {
        Some(p) => p,
        None => return Err(AppError::NotFound("product")),
    };

    let existing = CartLines::find()
        .filter(CartCol::CustomerId.eq(customer.id))
        .filter(CartCol::ProductId.eq(product.id))
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let current = existing.as_ref().map_or(0, |line| line.quantity);

    let total = match decide_add(current, payload.quantity, product.stock) {
        AddDecision::Upsert(total) => total,
        AddDecision::Rejected => {
            txn.rollback().await?;
            tracing::info!(
                customer_id = customer.id,
                product_id = product.id,
                requested = payload.quantity,
                in_cart = current,
                stock = product.stock,
                "add to cart rejected, stock exceeded"
            );
            return Ok(CartOutcome::with_notice(stock_notice(
                &product.name,
                product.stock,
            )));
        }
    };

    match existing {
        Some(line) => {
            let mut active: CartActive = line.into();
            active.quantity = Set(total);
            active.update(&txn).await?;
        }
        None => {
            CartActive {
                id: NotSet,
                customer_id: Set(customer.id),
                product_id: Set(product.id),
                quantity: Set(total),
                created_at: NotSet,
            }
            .insert(&txn)
            .await?;
        }
    }

    txn.commit().await?;
    tracing::debug!(
        customer_id = customer.id,
        product_id = product.id,
        quantity = total,
        "cart line upserted"
    );

    Ok(CartOutcome::default())
}

/// Apply a batch of quantity edits in one transaction.
///
/// Entries with a non-positive quantity, or naming a line the customer does
/// not own, are skipped without error. Quantities above stock are clamped and
/// reported through a single aggregate notice. Later entries for the same line
/// win.
pub async fn update_cart(
    state: &AppState,
    user: &AuthUser,
    payload: UpdateCartRequest,
) -> AppResult<CartOutcome> {
    let txn = state.orm.begin().await?;
    let customer = resolve_customer(&txn, user).await?;

    let ids: BTreeSet<i32> = payload
        .cart_items
        .iter()
        .filter(|item| item.quantity > 0)
        .map(|item| item.cart_id)
        .collect();
    if ids.is_empty() {
        txn.commit().await?;
        return Ok(CartOutcome::default());
    }

    // Lines are locked in one statement, ordered by id. Per-entry locking in
    // request order deadlocks against a batch listing the same lines reversed.
    let mut lines: BTreeMap<i32, CartModel> = CartLines::find()
        .filter(CartCol::Id.is_in(ids))
        .filter(CartCol::CustomerId.eq(customer.id))
        .order_by_asc(CartCol::Id)
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|line| (line.id, line))
        .collect();

    let product_ids: BTreeSet<i32> = lines.values().map(|line| line.product_id).collect();
    let stock_by_product: HashMap<i32, i32> = Products::find()
        .filter(ProdCol::Id.is_in(product_ids))
        .all(&txn)
        .await?
        .into_iter()
        .map(|product| (product.id, product.stock))
        .collect();

    let mut adjusted = false;
    // `None` marks a line to delete.
    let mut targets: BTreeMap<i32, Option<i32>> = BTreeMap::new();
    for CartUpdateItem { cart_id, quantity } in payload.cart_items {
        let Some(line) = lines.get(&cart_id) else {
            tracing::debug!(cart_id, "update skipped unknown cart line");
            continue;
        };
        let Some(&stock) = stock_by_product.get(&line.product_id) else {
            continue;
        };
        let Some(change) = decide_update(quantity, stock) else {
            continue;
        };

        let target = match change {
            LineUpdate::Set(q) => Some(q),
            LineUpdate::Clamp(q) => {
                adjusted = true;
                Some(q)
            }
            LineUpdate::Drop => {
                adjusted = true;
                None
            }
        };
        targets.insert(cart_id, target);
    }

    for (cart_id, target) in targets {
        let Some(line) = lines.remove(&cart_id) else {
            continue;
        };
        match target {
            Some(q) if q == line.quantity => {}
            Some(q) => set_quantity(&txn, line, q).await?,
            None => {
                line.delete(&txn).await?;
            }
        }
    }

    txn.commit().await?;

    if adjusted {
        tracing::info!(customer_id = customer.id, "cart update clamped to stock");
        return Ok(CartOutcome::with_notice(ADJUSTED_NOTICE));
    }
    Ok(CartOutcome::default())
}

async fn set_quantity<C>(conn: &C, line: CartModel, quantity: i32) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let mut active: CartActive = line.into();
    active.quantity = Set(quantity);
    active.update(conn).await?;
    Ok(())
}

/// Delete a cart line. Removing a line that is already gone is logged and
/// otherwise treated as success.
pub async fn remove_from_cart(
    state: &AppState,
    user: &AuthUser,
    cart_id: i32,
) -> AppResult<CartOutcome> {
    let customer = resolve_customer(&state.orm, user).await?;

    let result = CartLines::delete_many()
        .filter(CartCol::Id.eq(cart_id))
        .filter(CartCol::CustomerId.eq(customer.id))
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        tracing::warn!(
            cart_id,
            customer_id = customer.id,
            "remove from cart: cart line not found"
        );
    }

    Ok(CartOutcome::default())
}

#[derive(FromRow)]
struct CartLineRow {
    cart_id: i32,
    quantity: i32,
    created_at: DateTime<Utc>,
    product_id: i32,
    name: String,
    price: i64,
    stock: i32,
    sold: i32,
    image: String,
    description: String,
    category_id: Option<i32>,
    category_name: Option<String>,
    publisher_id: Option<i32>,
    publisher_name: Option<String>,
}

pub async fn cart_view(
    state: &AppState,
    user: &AuthUser,
    notice: Option<String>,
) -> AppResult<ApiResponse<CartView>> {
    let customer = resolve_customer(&state.orm, user).await?;

    let rows = sqlx::query_as::<_, CartLineRow>(
        r#"
        SELECT c."CartId" AS cart_id, c."Quantity" AS quantity, c."CreatedDate" AS created_at,
               p."Id" AS product_id, p."Name" AS name, p."Price" AS price,
               p."SoLuong" AS stock, p."SoLuongBan" AS sold, p."Image" AS image,
               p."MoTa" AS description,
               cd."Id" AS category_id, cd."Name" AS category_name,
               nxb."Id" AS publisher_id, nxb."Name" AS publisher_name
        FROM "Cart" c
        JOIN "Product" p ON p."Id" = c."ProductId"
        LEFT JOIN "ChuDe" cd ON cd."Id" = p."ChuDe_Id"
        LEFT JOIN "NhaXuatBan" nxb ON nxb."Id" = p."NhaXuatBan_Id"
        WHERE c."MaKH" = $1
        ORDER BY c."CreatedDate" DESC, c."CartId" DESC
        "#,
    )
    .bind(customer.id)
    .fetch_all(&state.pool)
    .await?;

    let cart_count: (i64,) = sqlx::query_as(
        r#"SELECT COALESCE(SUM("Quantity"), 0)::BIGINT FROM "Cart" WHERE "MaKH" = $1"#,
    )
    .bind(customer.id)
    .fetch_one(&state.pool)
    .await?;

    let items = rows.into_iter().map(line_from_row).collect();

    let categories = Categories::find()
        .order_by_asc(CategoryCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| Category {
            id: c.id,
            name: c.name,
        })
        .collect();

    let publishers = Publishers::find()
        .order_by_asc(PublisherCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| Publisher {
            id: p.id,
            name: p.name,
        })
        .collect();

    let sliders = Sliders::find()
        .order_by_asc(SliderCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|s| SliderImage {
            id: s.id,
            name: s.name,
            image: s.image,
        })
        .collect();

    let best_sellers = Products::find()
        .filter(ProdCol::Sold.gt(BEST_SELLER_MIN_SOLD))
        .order_by_desc(ProdCol::Sold)
        .limit(BEST_SELLER_LIMIT)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(product_from_entity)
        .collect();

    let data = CartView {
        items,
        cart_count: cart_count.0,
        categories,
        publishers,
        sliders,
        best_sellers,
        notice: notice.filter(|n| !n.is_empty()),
    };

    Ok(ApiResponse::success(
        "Cart",
        data,
        Some(Meta::total(cart_count.0)),
    ))
}

fn line_from_row(row: CartLineRow) -> CartLineView {
    let category = match (row.category_id, row.category_name) {
        (Some(id), Some(name)) => Some(Category { id, name }),
        _ => None,
    };
    let publisher = match (row.publisher_id, row.publisher_name) {
        (Some(id), Some(name)) => Some(Publisher { id, name }),
        _ => None,
    };

    CartLineView {
        id: row.cart_id,
        quantity: row.quantity,
        created_at: row.created_at,
        product: Product {
            id: row.product_id,
            name: row.name,
            price: row.price,
            stock: row.stock,
            sold: row.sold,
            image: row.image,
            description: row.description,
            category_id: row.category_id,
            publisher_id: row.publisher_id,
        },
        category,
        publisher,
    }
}

fn product_from_entity(model: ProductModel) -> Product {
    Product {
        id: model.id,
        name: model.name,
        price: model.price,
        stock: model.stock,
        sold: model.sold,
        image: model.image,
        description: model.description,
        category_id: model.category_id,
        publisher_id: model.publisher_id,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_over_stock_is_rejected() {
        // 8 already in cart, 10 in stock, asking for 5 more.
        assert_eq!(decide_add(8, 5, 10), AddDecision::Rejected);
    }

    #[test]
    fn add_without_existing_line_uses_delta() {
        assert_eq!(decide_add(0, 3, 10), AddDecision::Upsert(3));
    }

    #[test]
    fn add_merges_into_existing_line() {
        assert_eq!(decide_add(4, 6, 10), AddDecision::Upsert(10));
    }

    #[test]
    fn add_against_empty_stock_is_rejected() {
        assert_eq!(decide_add(0, 1, 0), AddDecision::Rejected);
    }

    #[test]
    fn add_does_not_overflow() {
        assert_eq!(decide_add(i32::MAX, 1, 10), AddDecision::Rejected);
    }

    #[test]
    fn update_within_stock_sets_exactly() {
        assert_eq!(decide_update(7, 12), Some(LineUpdate::Set(7)));
        assert_eq!(decide_update(12, 12), Some(LineUpdate::Set(12)));
    }

    #[test]
    fn update_over_stock_clamps_to_stock() {
        assert_eq!(decide_update(20, 12), Some(LineUpdate::Clamp(12)));
    }

    #[test]
    fn update_with_non_positive_quantity_is_skipped() {
        assert_eq!(decide_update(0, 12), None);
        assert_eq!(decide_update(-3, 12), None);
    }

    #[test]
    fn update_against_empty_stock_drops_line() {
        assert_eq!(decide_update(2, 0), Some(LineUpdate::Drop));
    }

    #[test]
    fn stock_notice_names_product_and_remaining_stock() {
        let notice = stock_notice("Dế Mèn Phiêu Lưu Ký", 10);
        assert!(notice.contains("Dế Mèn Phiêu Lưu Ký"));
        assert!(notice.contains("10"));
    }

    #[test]
    fn default_outcome_has_no_notice() {
        assert_eq!(CartOutcome::default().notice, None);
        assert_eq!(
            CartOutcome::with_notice(ADJUSTED_NOTICE).notice.as_deref(),
            Some(ADJUSTED_NOTICE)
        );
    }
}
