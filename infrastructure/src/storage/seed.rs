//! Sample data for a fresh cafe database.

use super::{Result, StorageError, schema::DDL};
use rusqlite::{Connection, params};
use std::path::Path;
use tracing::info;

// (name, price, cost, category, in_stock); cost is wholesale, ~55% of retail
const GAMES: [(&str, f64, f64, &str, i64); 15] = [
    ("Catan", 49.99, 27.50, "Strategy", 8),
    ("Ticket to Ride", 44.99, 24.75, "Family", 12),
    ("Pandemic", 39.99, 22.00, "Cooperative", 5),
    ("Wingspan", 59.99, 33.00, "Strategy", 6),
    ("Azul", 34.99, 19.25, "Abstract", 10),
    ("Codenames", 19.99, 11.00, "Party", 15),
    ("Splendor", 29.99, 16.50, "Strategy", 7),
    ("7 Wonders", 49.99, 27.50, "Strategy", 4),
    ("Carcassonne", 34.99, 19.25, "Family", 9),
    ("Dominion", 44.99, 24.75, "Deck Building", 6),
    ("Scythe", 79.99, 44.00, "Strategy", 3),
    ("Root", 69.99, 38.50, "Strategy", 4),
    ("Gloomhaven", 139.99, 77.00, "RPG", 2),
    ("Exploding Kittens", 19.99, 11.00, "Party", 20),
    ("Mysterium", 44.99, 24.75, "Cooperative", 5),
];

// (game_id, sale_date, quantity, unit_price, channel)
const SALES: [(i64, &str, i64, f64, &str); 15] = [
    (1, "2026-01-15", 2, 49.99, "in_store"),
    (2, "2026-01-18", 1, 44.99, "online"),
    (3, "2026-01-20", 3, 39.99, "in_store"),
    (6, "2026-01-22", 4, 19.99, "online"),
    (5, "2026-01-25", 2, 34.99, "in_store"),
    (14, "2026-01-28", 5, 19.99, "online"),
    (1, "2026-02-01", 1, 49.99, "in_store"),
    (4, "2026-02-03", 2, 59.99, "online"),
    (7, "2026-02-05", 1, 29.99, "in_store"),
    (11, "2026-02-08", 1, 79.99, "online"),
    (12, "2026-02-10", 2, 69.99, "in_store"),
    (9, "2026-02-12", 3, 34.99, "online"),
    (10, "2026-02-14", 1, 44.99, "in_store"),
    (8, "2026-02-16", 2, 49.99, "online"),
    (15, "2026-02-18", 1, 44.99, "in_store"),
];

// (table_number, rental_date, start_time, duration_hours, hourly_rate)
const RENTALS: [(i64, &str, &str, f64, f64); 16] = [
    (1, "2026-01-15", "14:00", 2.0, 8.00),
    (2, "2026-01-15", "16:00", 3.0, 8.00),
    (3, "2026-01-16", "18:00", 2.5, 8.00),
    (1, "2026-01-18", "12:00", 4.0, 8.00),
    (4, "2026-01-20", "15:00", 2.0, 10.00),
    (2, "2026-01-22", "17:00", 3.0, 8.00),
    (5, "2026-01-25", "14:00", 2.0, 10.00),
    (3, "2026-01-28", "19:00", 3.5, 8.00),
    (1, "2026-02-01", "13:00", 2.0, 8.00),
    (4, "2026-02-03", "16:00", 4.0, 10.00),
    (2, "2026-02-05", "18:00", 2.5, 8.00),
    (5, "2026-02-08", "15:00", 3.0, 10.00),
    (3, "2026-02-10", "14:00", 2.0, 8.00),
    (1, "2026-02-12", "17:00", 3.0, 8.00),
    (4, "2026-02-15", "12:00", 5.0, 10.00),
    (2, "2026-02-18", "16:00", 2.0, 8.00),
];

// (item_name, sell_price, cost, category)
const MENU: [(&str, f64, f64, &str); 11] = [
    ("Coffee", 4.50, 1.20, "Beverage"),
    ("Latte", 5.50, 1.60, "Beverage"),
    ("Tea", 3.50, 0.60, "Beverage"),
    ("Hot Chocolate", 4.00, 1.10, "Beverage"),
    ("Soda", 2.50, 0.50, "Beverage"),
    ("Craft Beer", 7.00, 2.80, "Alcohol"),
    ("Wine", 8.00, 3.00, "Alcohol"),
    ("Nachos", 9.00, 3.20, "Food"),
    ("Pizza Slice", 5.00, 1.80, "Food"),
    ("Brownie", 3.50, 1.00, "Food"),
    ("Cookie", 2.50, 0.70, "Food"),
];

// (rental_id, item_name, quantity, unit_price)
const ORDERS: [(i64, &str, i64, f64); 20] = [
    (1, "Coffee", 2, 4.50),
    (1, "Brownie", 1, 3.50),
    (2, "Craft Beer", 3, 7.00),
    (2, "Nachos", 1, 9.00),
    (3, "Tea", 2, 3.50),
    (4, "Pizza Slice", 4, 5.00),
    (4, "Soda", 4, 2.50),
    (5, "Coffee", 2, 4.50),
    (6, "Craft Beer", 4, 7.00),
    (7, "Hot Chocolate", 2, 4.00),
    (7, "Cookie", 3, 2.50),
    (8, "Wine", 2, 8.00),
    (9, "Latte", 2, 5.50),
    (10, "Nachos", 2, 9.00),
    (10, "Soda", 3, 2.50),
    (11, "Tea", 1, 3.50),
    (12, "Pizza Slice", 3, 5.00),
    (13, "Coffee", 3, 4.50),
    (14, "Craft Beer", 2, 7.00),
    (15, "Brownie", 2, 3.50),
];

// (month, category, amount, description)
const EXPENSES: [(&str, &str, f64, &str); 12] = [
    ("2026-01", "rent", 3500.00, "Monthly lease"),
    ("2026-01", "utilities", 620.00, "Electricity, water, internet"),
    ("2026-01", "labor", 8400.00, "Staff wages"),
    ("2026-01", "insurance", 350.00, "Liability insurance"),
    ("2026-01", "marketing", 500.00, "Social media ads"),
    ("2026-01", "supplies", 410.00, "Cleaning and kitchen supplies"),
    ("2026-02", "rent", 3500.00, "Monthly lease"),
    ("2026-02", "utilities", 580.00, "Electricity, water, internet"),
    ("2026-02", "labor", 8100.00, "Staff wages"),
    ("2026-02", "insurance", 350.00, "Liability insurance"),
    ("2026-02", "marketing", 750.00, "Game night flyers and ads"),
    ("2026-02", "supplies", 380.00, "Cleaning and kitchen supplies"),
];

/// Row counts written by [`init_db`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub games: usize,
    pub sales: usize,
    pub rentals: usize,
    pub menu_items: usize,
    pub orders: usize,
    pub expenses: usize,
}

/// Create (or recreate) all tables at `path` and load the sample data.
pub fn init_db(path: &Path) -> Result<SeedSummary> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent).map_err(|source| StorageError::CreateDir {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut conn = Connection::open(path)?;
    conn.execute_batch(DDL)?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare(
            "INSERT INTO board_games (name, price, cost, category, in_stock) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (name, price, cost, category, in_stock) in GAMES {
            stmt.execute(params![name, price, cost, category, in_stock])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO game_sales (game_id, sale_date, quantity, unit_price, channel) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (game_id, date, quantity, unit_price, channel) in SALES {
            stmt.execute(params![game_id, date, quantity, unit_price, channel])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO table_rentals (table_number, rental_date, start_time, duration_hours, hourly_rate) VALUES (?1, ?2, ?3, ?4, ?5)",
        )?;
        for (table, date, start, hours, rate) in RENTALS {
            stmt.execute(params![table, date, start, hours, rate])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO food_bev_items (item_name, sell_price, cost, category) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (name, price, cost, category) in MENU {
            stmt.execute(params![name, price, cost, category])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO food_bev_orders (rental_id, item_name, quantity, unit_price) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (rental_id, item, quantity, unit_price) in ORDERS {
            stmt.execute(params![rental_id, item, quantity, unit_price])?;
        }

        let mut stmt = tx.prepare(
            "INSERT INTO operating_expenses (month, category, amount, description) VALUES (?1, ?2, ?3, ?4)",
        )?;
        for (month, category, amount, description) in EXPENSES {
            stmt.execute(params![month, category, amount, description])?;
        }
    }
    tx.commit()?;

    let summary = SeedSummary {
        games: GAMES.len(),
        sales: SALES.len(),
        rentals: RENTALS.len(),
        menu_items: MENU.len(),
        orders: ORDERS.len(),
        expenses: EXPENSES.len(),
    };
    info!(path = %path.display(), ?summary, "Seeded cafe database");
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_order_has_a_menu_item() {
        for (_, item, _, price) in ORDERS {
            let menu = MENU.iter().find(|(name, ..)| *name == item);
            assert!(menu.is_some(), "{item} missing from menu");
            assert_eq!(menu.unwrap().1, price);
        }
    }

    #[test]
    fn test_init_db_creates_tables() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("cafe.db");

        let summary = init_db(&path).unwrap();
        assert_eq!(summary.games, 15);
        assert_eq!(summary.expenses, 12);

        let conn = Connection::open(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM food_bev_orders", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 20);
    }

    #[test]
    fn test_init_db_is_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cafe.db");
        init_db(&path).unwrap();
        init_db(&path).unwrap();

        let conn = Connection::open(&path).unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM board_games", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 15);
    }
}
