use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use bookstore_cart::{
    config::database_url_from_env,
    db::{create_orm_conn, create_pool, run_migrations},
};

struct SeedBook {
    name: &'static str,
    price: i64,
    category: &'static str,
    publisher: &'static str,
    stock: i32,
    sold: i32,
}

const CATEGORIES: &[&str] = &["Văn học", "Thiếu nhi", "Kinh tế", "Khoa học"];
const PUBLISHERS: &[&str] = &["NXB Kim Đồng", "NXB Trẻ", "NXB Lao Động"];

const BOOKS: &[SeedBook] = &[
    SeedBook {
        name: "Dế Mèn Phiêu Lưu Ký",
        price: 45_000,
        category: "Thiếu nhi",
        publisher: "NXB Kim Đồng",
        stock: 10,
        sold: 120,
    },
    SeedBook {
        name: "Số Đỏ",
        price: 62_000,
        category: "Văn học",
        publisher: "NXB Trẻ",
        stock: 12,
        sold: 75,
    },
    SeedBook {
        name: "Nhà Giả Kim",
        price: 79_000,
        category: "Văn học",
        publisher: "NXB Lao Động",
        stock: 3,
        sold: 210,
    },
    SeedBook {
        name: "Cha Giàu Cha Nghèo",
        price: 98_000,
        category: "Kinh tế",
        publisher: "NXB Trẻ",
        stock: 0,
        sold: 51,
    },
    SeedBook {
        name: "Lược Sử Thời Gian",
        price: 115_000,
        category: "Khoa học",
        publisher: "NXB Trẻ",
        stock: 25,
        sold: 12,
    },
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = database_url_from_env()?;

    let orm = create_orm_conn(&database_url).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    let pool = create_pool(&database_url).await?;
    let customer_id = ensure_customer(&pool, "khachhang", "123456").await?;
    seed_catalog(&pool).await?;

    println!("Seed completed. Customer MaKH: {customer_id}");
    Ok(())
}

async fn ensure_customer(
    pool: &sqlx::PgPool,
    login: &str,
    password: &str,
) -> anyhow::Result<i32> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (id,): (i32,) = sqlx::query_as(
        r#"
        INSERT INTO "Users" ("HoTen", "TaiKhoan", "MatKhau", "Email", "DiaChi", "DienThoai")
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT ("TaiKhoan") DO UPDATE SET "MatKhau" = EXCLUDED."MatKhau"
        RETURNING "MaKH"
        "#,
    )
    .bind("Nguyễn Văn A")
    .bind(login)
    .bind(password_hash)
    .bind("khachhang@example.com")
    .bind("12 Lê Lợi, Quận 1, TP.HCM")
    .bind("0901234567")
    .fetch_one(pool)
    .await?;

    Ok(id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let (existing,): (i64,) = sqlx::query_as(r#"SELECT COUNT(*) FROM "Product""#)
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        println!("Catalog already seeded, skipping");
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    for name in CATEGORIES {
        sqlx::query(r#"INSERT INTO "ChuDe" ("Name") VALUES ($1)"#)
            .bind(*name)
            .execute(&mut *tx)
            .await?;
    }
    for name in PUBLISHERS {
        sqlx::query(r#"INSERT INTO "NhaXuatBan" ("Name") VALUES ($1)"#)
            .bind(*name)
            .execute(&mut *tx)
            .await?;
    }
    for (i, name) in ["Khuyến mãi mùa hè", "Sách mới tháng này"].iter().enumerate() {
        sqlx::query(r#"INSERT INTO "Slider" ("Name", "Image") VALUES ($1, $2)"#)
            .bind(*name)
            .bind(format!("/images/slider/{}.jpg", i + 1))
            .execute(&mut *tx)
            .await?;
    }

    for book in BOOKS {
        sqlx::query(
            r#"
            INSERT INTO "Product"
                ("Name", "Price", "ChuDe_Id", "NhaXuatBan_Id", "Image", "SoLuong", "SoLuongBan", "MoTa")
            VALUES (
                $1, $2,
                (SELECT "Id" FROM "ChuDe" WHERE "Name" = $3 LIMIT 1),
                (SELECT "Id" FROM "NhaXuatBan" WHERE "Name" = $4 LIMIT 1),
                '', $5, $6, ''
            )
            "#,
        )
        .bind(book.name)
        .bind(book.price)
        .bind(book.category)
        .bind(book.publisher)
        .bind(book.stock)
        .bind(book.sold)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    println!("Seeded {} books", BOOKS.len());
    Ok(())
}
