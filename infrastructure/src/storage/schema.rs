//! Table definitions and the schema description used in the system prompt.

/// Table names in creation order.
pub const TABLES: [&str; 6] = [
    "board_games",
    "game_sales",
    "table_rentals",
    "food_bev_items",
    "food_bev_orders",
    "operating_expenses",
];

pub(crate) const DDL: &str = r#"
DROP TABLE IF EXISTS operating_expenses;
DROP TABLE IF EXISTS food_bev_orders;
DROP TABLE IF EXISTS food_bev_items;
DROP TABLE IF EXISTS table_rentals;
DROP TABLE IF EXISTS game_sales;
DROP TABLE IF EXISTS board_games;

CREATE TABLE board_games (
    id INTEGER PRIMARY KEY,
    name TEXT NOT NULL,
    price REAL NOT NULL,
    cost REAL NOT NULL,
    category TEXT NOT NULL,
    in_stock INTEGER NOT NULL
);

CREATE TABLE game_sales (
    id INTEGER PRIMARY KEY,
    game_id INTEGER NOT NULL,
    sale_date TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price REAL NOT NULL,
    channel TEXT NOT NULL,
    FOREIGN KEY (game_id) REFERENCES board_games(id)
);

CREATE TABLE table_rentals (
    id INTEGER PRIMARY KEY,
    table_number INTEGER NOT NULL,
    rental_date TEXT NOT NULL,
    start_time TEXT NOT NULL,
    duration_hours REAL NOT NULL,
    hourly_rate REAL NOT NULL
);

CREATE TABLE food_bev_items (
    id INTEGER PRIMARY KEY,
    item_name TEXT NOT NULL UNIQUE,
    sell_price REAL NOT NULL,
    cost REAL NOT NULL,
    category TEXT NOT NULL
);

CREATE TABLE food_bev_orders (
    id INTEGER PRIMARY KEY,
    rental_id INTEGER NOT NULL,
    item_name TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price REAL NOT NULL,
    FOREIGN KEY (rental_id) REFERENCES table_rentals(id)
);

CREATE TABLE operating_expenses (
    id INTEGER PRIMARY KEY,
    month TEXT NOT NULL,
    category TEXT NOT NULL,
    amount REAL NOT NULL,
    description TEXT NOT NULL
);
"#;

const DESCRIPTION: &str = "\
Database Tables:

1. board_games
   - id: INTEGER PRIMARY KEY
   - name: TEXT (game name)
   - price: REAL (retail/selling price)
   - cost: REAL (wholesale cost we paid)
   - category: TEXT (Strategy, Family, Cooperative, Abstract, Party, Deck Building, RPG)
   - in_stock: INTEGER (quantity in stock)

2. game_sales
   - id: INTEGER PRIMARY KEY
   - game_id: INTEGER (FK to board_games.id)
   - sale_date: TEXT (YYYY-MM-DD)
   - quantity: INTEGER
   - unit_price: REAL
   - channel: TEXT (online or in_store)

3. table_rentals
   - id: INTEGER PRIMARY KEY
   - table_number: INTEGER (1-5)
   - rental_date: TEXT (YYYY-MM-DD)
   - start_time: TEXT (HH:MM)
   - duration_hours: REAL
   - hourly_rate: REAL

4. food_bev_items
   - id: INTEGER PRIMARY KEY
   - item_name: TEXT (menu item, matches food_bev_orders.item_name)
   - sell_price: REAL (customer price)
   - cost: REAL (our cost per unit)
   - category: TEXT (Beverage, Alcohol, Food)

5. food_bev_orders
   - id: INTEGER PRIMARY KEY
   - rental_id: INTEGER (FK to table_rentals.id)
   - item_name: TEXT
   - quantity: INTEGER
   - unit_price: REAL

6. operating_expenses
   - id: INTEGER PRIMARY KEY
   - month: TEXT (YYYY-MM)
   - category: TEXT (rent, utilities, labor, insurance, marketing, supplies)
   - amount: REAL
   - description: TEXT";

/// Human-readable schema for the model's system prompt.
pub fn schema_description() -> &'static str {
    DESCRIPTION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_description_mentions_every_table() {
        for table in TABLES {
            assert!(schema_description().contains(table), "missing {table}");
            assert!(DDL.contains(&format!("CREATE TABLE {table} (")));
        }
    }
}
