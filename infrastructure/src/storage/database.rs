//! Read-only SQLite handle

use super::{Result, StorageError};
use cafe_domain::whatif::{ItemFigures, SalesTotals};
use cafe_domain::{ExpenseCategory, QueryRows};
use rusqlite::types::ValueRef;
use rusqlite::{Connection, OpenFlags, OptionalExtension, params, params_from_iter};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::debug;

/// Where a catalog item lives.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemSource {
    /// `board_games.id`
    Game(i64),
    /// `food_bev_items.item_name`
    Menu(String),
}

/// A board game or menu item with its unit economics.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogItem {
    pub source: ItemSource,
    pub name: String,
    pub price: f64,
    pub cost: f64,
}

impl CatalogItem {
    pub fn figures(&self, units_sold: f64) -> ItemFigures {
        ItemFigures {
            name: self.name.clone(),
            price: self.price,
            cost: self.cost,
            units_sold,
        }
    }
}

/// Historical sales of one item.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ItemSales {
    pub units: f64,
    pub revenue: f64,
}

/// A `board_games` row, as indexed by search.
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub in_stock: i64,
}

/// The cafe database, opened read-only.
///
/// All access goes through one connection behind a mutex; statements are
/// short and tools run sequentially within a question.
pub struct CafeDatabase {
    conn: Mutex<Connection>,
    path: PathBuf,
    max_rows: usize,
}

impl CafeDatabase {
    pub const DEFAULT_MAX_ROWS: usize = 50;

    /// Open an existing database with `SQLITE_OPEN_READ_ONLY` and `PRAGMA query_only`.
    pub fn open_read_only(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(StorageError::NotFound(path.to_path_buf()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;
        conn.pragma_update(None, "query_only", true)?;
        debug!(path = %path.display(), "Opened cafe database read-only");

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
            max_rows: Self::DEFAULT_MAX_ROWS,
        })
    }

    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn max_rows(&self) -> usize {
        self.max_rows
    }

    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        let conn = self.conn.lock().map_err(|_| StorageError::Poisoned)?;
        Ok(f(&conn)?)
    }

    /// Run a statement and collect at most `max_rows` rows.
    pub fn query(&self, sql: &str) -> Result<QueryRows> {
        let max_rows = self.max_rows;
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(sql)?;
            let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
            let width = columns.len();
            let mut out = QueryRows {
                columns,
                ..Default::default()
            };

            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                if out.rows.len() == max_rows {
                    out.truncated = true;
                    break;
                }
                let values = (0..width)
                    .map(|i| row.get_ref(i).map(to_json))
                    .collect::<rusqlite::Result<Vec<_>>>()?;
                out.rows.push(values);
            }
            Ok(out)
        })
    }

    /// Revenue and gross profit over all game sales, `None` if there are none.
    pub fn game_sales_totals(&self) -> Result<Option<SalesTotals>> {
        self.sales_totals(
            "SELECT SUM(gs.quantity * gs.unit_price), \
                    SUM(gs.quantity * (gs.unit_price - bg.cost)) \
             FROM game_sales gs JOIN board_games bg ON gs.game_id = bg.id",
        )
    }

    /// Revenue and gross profit over all food & beverage orders.
    pub fn food_sales_totals(&self) -> Result<Option<SalesTotals>> {
        self.sales_totals(
            "SELECT SUM(fbo.quantity * fbo.unit_price), \
                    SUM(fbo.quantity * (fbo.unit_price - fbi.cost)) \
             FROM food_bev_orders fbo JOIN food_bev_items fbi ON fbo.item_name = fbi.item_name",
        )
    }

    fn sales_totals(&self, sql: &str) -> Result<Option<SalesTotals>> {
        self.with_conn(|conn| {
            let (revenue, profit): (Option<f64>, Option<f64>) =
                conn.query_row(sql, [], |row| Ok((row.get(0)?, row.get(1)?)))?;
            Ok(revenue.map(|revenue| SalesTotals {
                revenue,
                profit: profit.unwrap_or_default(),
            }))
        })
    }

    /// Total table rental revenue.
    pub fn rental_revenue(&self) -> Result<Option<f64>> {
        self.scalar("SELECT SUM(duration_hours * hourly_rate) FROM table_rentals")
    }

    /// Average historical hourly rental rate.
    pub fn average_hourly_rate(&self) -> Result<Option<f64>> {
        self.scalar("SELECT AVG(hourly_rate) FROM table_rentals")
    }

    fn scalar(&self, sql: &str) -> Result<Option<f64>> {
        self.with_conn(|conn| conn.query_row(sql, [], |row| row.get(0)))
    }

    /// First board game, then menu item, whose name contains `target` (case-insensitive).
    pub fn find_item(&self, target: &str) -> Result<Option<CatalogItem>> {
        let pattern = format!("%{}%", target.trim().to_lowercase());
        self.with_conn(|conn| {
            let game = conn
                .query_row(
                    "SELECT id, name, price, cost FROM board_games \
                     WHERE LOWER(name) LIKE ?1 ORDER BY id LIMIT 1",
                    params![pattern],
                    |row| {
                        Ok(CatalogItem {
                            source: ItemSource::Game(row.get(0)?),
                            name: row.get(1)?,
                            price: row.get(2)?,
                            cost: row.get(3)?,
                        })
                    },
                )
                .optional()?;
            if game.is_some() {
                return Ok(game);
            }

            conn.query_row(
                "SELECT item_name, sell_price, cost FROM food_bev_items \
                 WHERE LOWER(item_name) LIKE ?1 ORDER BY id LIMIT 1",
                params![pattern],
                |row| {
                    let name: String = row.get(0)?;
                    Ok(CatalogItem {
                        source: ItemSource::Menu(name.clone()),
                        name,
                        price: row.get(1)?,
                        cost: row.get(2)?,
                    })
                },
            )
            .optional()
        })
    }

    /// Units sold and revenue for one catalog item.
    pub fn item_sales(&self, item: &CatalogItem) -> Result<ItemSales> {
        self.with_conn(|conn| {
            let map = |row: &rusqlite::Row<'_>| {
                Ok(ItemSales {
                    units: row.get::<_, Option<f64>>(0)?.unwrap_or_default(),
                    revenue: row.get::<_, Option<f64>>(1)?.unwrap_or_default(),
                })
            };
            match &item.source {
                ItemSource::Game(id) => conn.query_row(
                    "SELECT SUM(quantity), SUM(quantity * unit_price) FROM game_sales WHERE game_id = ?1",
                    params![id],
                    map,
                ),
                ItemSource::Menu(name) => conn.query_row(
                    "SELECT SUM(quantity), SUM(quantity * unit_price) FROM food_bev_orders \
                     WHERE LOWER(item_name) = LOWER(?1)",
                    params![name],
                    map,
                ),
            }
        })
    }

    /// Sum of operating expenses, optionally restricted by category substring and `YYYY-MM` month.
    pub fn expense_total(
        &self,
        category: &ExpenseCategory,
        month: Option<&str>,
    ) -> Result<Option<f64>> {
        let mut sql = String::from("SELECT SUM(amount) FROM operating_expenses WHERE 1=1");
        let mut args: Vec<String> = Vec::new();
        if let ExpenseCategory::Matching(fragment) = category {
            args.push(format!("%{}%", fragment.to_lowercase()));
            sql.push_str(&format!(" AND LOWER(category) LIKE ?{}", args.len()));
        }
        if let Some(month) = month {
            args.push(month.to_string());
            sql.push_str(&format!(" AND month = ?{}", args.len()));
        }

        self.with_conn(|conn| conn.query_row(&sql, params_from_iter(args.iter()), |row| row.get(0)))
    }

    /// Every board game, ordered by id.
    pub fn games(&self) -> Result<Vec<GameRecord>> {
        self.with_conn(|conn| {
            let mut stmt =
                conn.prepare("SELECT id, name, category, price, in_stock FROM board_games ORDER BY id")?;
            let rows = stmt.query_map([], |row| {
                Ok(GameRecord {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    category: row.get(2)?,
                    price: row.get(3)?,
                    in_stock: row.get(4)?,
                })
            })?;
            rows.collect()
        })
    }
}

fn to_json(value: ValueRef<'_>) -> Value {
    match value {
        ValueRef::Null => Value::Null,
        ValueRef::Integer(i) => Value::from(i),
        ValueRef::Real(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        ValueRef::Text(bytes) => Value::String(String::from_utf8_lossy(bytes).into_owned()),
        ValueRef::Blob(bytes) => Value::String(format!("<blob {} bytes>", bytes.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::init_db;
    use serde_json::json;

    fn seeded() -> (tempfile::TempDir, CafeDatabase) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.db");
        init_db(&path).unwrap();
        let db = CafeDatabase::open_read_only(&path).unwrap();
        (dir, db)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn test_missing_database_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = CafeDatabase::open_read_only(&dir.path().join("nope.db")).err();
        assert!(matches!(err, Some(StorageError::NotFound(_))));
    }

    #[test]
    fn test_query_preserves_column_order_and_types() {
        let (_dir, db) = seeded();
        let rows = db
            .query("SELECT name, in_stock, price FROM board_games WHERE id = 1")
            .unwrap();
        assert_eq!(rows.columns, vec!["name", "in_stock", "price"]);
        assert_eq!(rows.rows, vec![vec![json!("Catan"), json!(8), json!(49.99)]]);
        assert!(!rows.truncated);
    }

    #[test]
    fn test_query_caps_rows() {
        let (_dir, db) = seeded();
        let db = db.with_max_rows(5);
        let rows = db.query("SELECT id FROM board_games").unwrap();
        assert_eq!(rows.len(), 5);
        assert!(rows.truncated);
    }

    #[test]
    fn test_connection_rejects_writes() {
        let (_dir, db) = seeded();
        assert!(db.query("DELETE FROM board_games").is_err());
        assert_eq!(db.query("SELECT COUNT(*) AS n FROM board_games").unwrap().rows[0][0], json!(15));
    }

    #[test]
    fn test_sales_totals() {
        let (_dir, db) = seeded();
        let games = db.game_sales_totals().unwrap().unwrap();
        assert!(approx(games.revenue, 1229.69));

        let food = db.food_sales_totals().unwrap().unwrap();
        assert!(approx(food.revenue, 237.5));
        assert!(food.profit > 0.0 && food.profit < food.revenue);

        assert!(approx(db.rental_revenue().unwrap().unwrap(), 396.0));
        assert!(approx(db.average_hourly_rate().unwrap().unwrap(), 8.625));
    }

    #[test]
    fn test_find_item_prefers_games_then_menu() {
        let (_dir, db) = seeded();

        let catan = db.find_item("catan").unwrap().unwrap();
        assert_eq!(catan.source, ItemSource::Game(1));
        let sales = db.item_sales(&catan).unwrap();
        assert!(approx(sales.units, 3.0));
        assert!(approx(sales.revenue, 149.97));

        let coffee = db.find_item("Coffee").unwrap().unwrap();
        assert_eq!(coffee.source, ItemSource::Menu("Coffee".to_string()));
        assert!(approx(db.item_sales(&coffee).unwrap().units, 7.0));

        assert!(db.find_item("Monopoly").unwrap().is_none());
    }

    #[test]
    fn test_item_without_sales_reports_zero() {
        let (_dir, db) = seeded();
        // Gloomhaven is stocked but never sold
        let item = db.find_item("gloom").unwrap().unwrap();
        assert_eq!(db.item_sales(&item).unwrap(), ItemSales::default());
    }

    #[test]
    fn test_expense_total_filters() {
        let (_dir, db) = seeded();
        let all = db.expense_total(&ExpenseCategory::All, None).unwrap().unwrap();
        assert!(approx(all, 27440.0));

        let january = db
            .expense_total(&ExpenseCategory::All, Some("2026-01"))
            .unwrap()
            .unwrap();
        assert!(approx(january, 13780.0));

        let labor = db
            .expense_total(&ExpenseCategory::parse("Labor"), None)
            .unwrap()
            .unwrap();
        assert!(approx(labor, 16500.0));

        let none = db
            .expense_total(&ExpenseCategory::All, Some("2026-07"))
            .unwrap();
        assert!(none.is_none());
    }

    #[test]
    fn test_games_lists_catalog() {
        let (_dir, db) = seeded();
        let games = db.games().unwrap();
        assert_eq!(games.len(), 15);
        assert_eq!(games[12].name, "Gloomhaven");
        assert_eq!(games[12].in_stock, 2);
    }
}
