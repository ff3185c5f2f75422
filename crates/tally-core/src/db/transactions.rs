//! Transaction operations

use chrono::NaiveDate;
use rusqlite::params;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::{NewTransaction, TrainingExample, Transaction};
use crate::store::TransactionStore;

impl Database {
    /// Append a parsed statement batch for one user.
    ///
    /// The whole batch runs inside a single SQL transaction: either every
    /// row lands or none do, which is what the pipeline's no-partial-batch
    /// guarantee rests on.
    pub fn append_statement_batch(
        &self,
        user_id: i64,
        rows: &[NewTransaction],
    ) -> Result<Vec<Transaction>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let mut inserted = Vec::with_capacity(rows.len());
        for row in rows {
            tx.execute(
                r#"
                INSERT INTO transactions (user_id, date, description, amount, category, source)
                VALUES (?, ?, ?, ?, ?, 'statement')
                "#,
                params![
                    user_id,
                    row.date.to_string(),
                    row.description,
                    row.amount,
                    row.category,
                ],
            )?;

            let id = tx.last_insert_rowid();
            let created_at: String = tx.query_row(
                "SELECT created_at FROM transactions WHERE id = ?",
                [id],
                |r| r.get(0),
            )?;

            inserted.push(Transaction {
                id,
                user_id,
                date: row.date,
                description: row.description.clone(),
                amount: row.amount,
                category: row.category.clone(),
                created_at: parse_datetime(&created_at),
            });
        }

        tx.commit()?;
        Ok(inserted)
    }

    /// Insert a manually entered transaction.
    ///
    /// Unlike statement rows, manual entries must carry a non-zero amount.
    pub fn insert_manual(
        &self,
        user_id: i64,
        date: NaiveDate,
        description: &str,
        amount: f64,
        category: &str,
    ) -> Result<Transaction> {
        if amount == 0.0 {
            return Err(Error::InvalidData("Amount must be non-zero.".to_string()));
        }

        let conn = self.conn()?;
        conn.execute(
            r#"
            INSERT INTO transactions (user_id, date, description, amount, category, source)
            VALUES (?, ?, ?, ?, ?, 'manual')
            "#,
            params![user_id, date.to_string(), description, amount, category],
        )?;

        let id = conn.last_insert_rowid();
        let created_at: String = conn.query_row(
            "SELECT created_at FROM transactions WHERE id = ?",
            [id],
            |r| r.get(0),
        )?;

        Ok(Transaction {
            id,
            user_id,
            date,
            description: description.to_string(),
            amount,
            category: category.to_string(),
            created_at: parse_datetime(&created_at),
        })
    }

    /// List a user's transactions, newest first
    pub fn list_transactions(&self, user_id: i64, limit: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, user_id, date, description, amount, category, created_at
            FROM transactions
            WHERE user_id = ?
            ORDER BY date DESC, id DESC
            LIMIT ?
            "#,
        )?;

        let rows = stmt.query_map(params![user_id, limit], |row| {
            let date: String = row.get(2)?;
            let created_at: String = row.get(6)?;
            Ok(Transaction {
                id: row.get(0)?,
                user_id: row.get(1)?,
                date: NaiveDate::parse_from_str(&date, "%Y-%m-%d").unwrap_or_default(),
                description: row.get(3)?,
                amount: row.get(4)?,
                category: row.get(5)?,
                created_at: parse_datetime(&created_at),
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Every labeled transaction across all users (the retrain corpus)
    pub fn labeled_examples_all(&self) -> Result<Vec<TrainingExample>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT description, amount, category FROM transactions WHERE category <> ''",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(TrainingExample {
                description: row.get(0)?,
                amount: row.get(1)?,
                category: row.get(2)?,
            })
        })?;

        rows.collect::<rusqlite::Result<Vec<_>>>().map_err(Into::into)
    }

    /// Total number of persisted transactions
    pub fn transaction_count(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count = conn.query_row("SELECT COUNT(*) FROM transactions", [], |r| r.get(0))?;
        Ok(count)
    }
}

impl TransactionStore for Database {
    fn append_batch(&self, user_id: i64, rows: &[NewTransaction]) -> Result<Vec<Transaction>> {
        self.append_statement_batch(user_id, rows)
    }

    fn labeled_examples(&self) -> Result<Vec<TrainingExample>> {
        self.labeled_examples_all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn new_tx(date: NaiveDate, description: &str, amount: f64, category: &str) -> NewTransaction {
        NewTransaction {
            date,
            description: description.to_string(),
            amount,
            category: category.to_string(),
        }
    }

    #[test]
    fn append_batch_materializes_records() {
        let db = Database::in_memory().unwrap();

        let rows = vec![
            new_tx(date(2024, 1, 15), "Coffee Shop", -5.50, "Uncategorized"),
            new_tx(date(2024, 1, 16), "Paycheck", 2500.00, "Uncategorized"),
        ];
        let stored = db.append_statement_batch(1, &rows).unwrap();

        assert_eq!(stored.len(), 2);
        assert!(stored[0].id > 0);
        assert_eq!(stored[0].user_id, 1);
        assert_eq!(stored[0].description, "Coffee Shop");
        assert_eq!(stored[1].amount, 2500.00);
        assert_eq!(db.transaction_count().unwrap(), 2);
    }

    #[test]
    fn list_is_per_user_and_newest_first() {
        let db = Database::in_memory().unwrap();

        db.append_statement_batch(
            1,
            &[
                new_tx(date(2024, 1, 10), "Older", -1.0, ""),
                new_tx(date(2024, 1, 20), "Newer", -2.0, ""),
            ],
        )
        .unwrap();
        db.append_statement_batch(2, &[new_tx(date(2024, 1, 15), "Other user", -3.0, "")])
            .unwrap();

        let listed = db.list_transactions(1, 10).unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].description, "Newer");
        assert_eq!(listed[1].description, "Older");
        assert_eq!(listed[0].date, date(2024, 1, 20));
    }

    #[test]
    fn labeled_examples_skip_unlabeled_rows() {
        let db = Database::in_memory().unwrap();

        db.append_statement_batch(
            1,
            &[
                new_tx(date(2024, 1, 15), "Coffee Shop", -5.50, "Food"),
                new_tx(date(2024, 1, 16), "Mystery", -9.99, ""),
            ],
        )
        .unwrap();
        // Labeled rows from other users count toward the corpus too
        db.append_statement_batch(2, &[new_tx(date(2024, 1, 17), "Bus Fare", -2.75, "Transport")])
            .unwrap();

        let examples = db.labeled_examples_all().unwrap();
        assert_eq!(examples.len(), 2);
        assert!(examples.iter().any(|e| e.category == "Food"));
        assert!(examples.iter().any(|e| e.category == "Transport"));
    }

    #[test]
    fn manual_entry_rejects_zero_amount() {
        let db = Database::in_memory().unwrap();

        let err = db
            .insert_manual(1, date(2024, 1, 15), "Nothing", 0.0, "Misc")
            .unwrap_err();
        assert!(matches!(err, Error::InvalidData(_)));

        let tx = db
            .insert_manual(1, date(2024, 1, 15), "Groceries", -42.00, "Food")
            .unwrap();
        assert_eq!(tx.amount, -42.00);
        assert_eq!(db.transaction_count().unwrap(), 1);
    }

    #[test]
    fn statement_rows_may_be_zero() {
        let db = Database::in_memory().unwrap();
        let stored = db
            .append_statement_batch(1, &[new_tx(date(2024, 1, 15), "Fee waived", 0.0, "")])
            .unwrap();
        assert_eq!(stored[0].amount, 0.0);
    }
}
