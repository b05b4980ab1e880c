#![forbid(unsafe_code)]

use super::*;
use rusqlite::types::Value;
use rusqlite::params_from_iter;
use std::collections::BTreeSet;

impl SqliteStore {
    pub fn create_taxonomy(&mut self, taxonomy: &Taxonomy) -> Result<(), StoreError> {
        let inserted = self.conn.execute(
            "INSERT OR IGNORE INTO taxonomies(name, created_at_ms) VALUES (?1, ?2)",
            params![taxonomy.as_str(), now_ms()],
        )?;
        if inserted == 0 {
            return Err(StoreError::TaxonomyAlreadyExists);
        }
        Ok(())
    }

    pub fn has_taxonomy(&self, taxonomy: &Taxonomy) -> Result<bool, StoreError> {
        taxonomy_known(&self.conn, taxonomy)
    }

    pub fn list_taxonomies(&self) -> Result<Vec<TaxonomyRow>, StoreError> {
        let mut stmt = self.conn.prepare(
            r#"
            SELECT x.name, x.created_at_ms, COUNT(t.id)
            FROM taxonomies x
            LEFT JOIN terms t ON t.taxonomy = x.name
            GROUP BY x.name, x.created_at_ms
            ORDER BY x.name ASC
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, i64>(1)?,
                row.get::<_, i64>(2)?,
            ))
        })?;

        let mut out = Vec::new();
        for row in rows {
            let (name, created_at_ms, count) = row?;
            out.push(TaxonomyRow {
                taxonomy: Taxonomy::try_new(name)?,
                term_count: u64::try_from(count).unwrap_or_default(),
                created_at_ms,
            });
        }
        Ok(out)
    }

    pub fn create_term(&mut self, request: CreateTermRequest) -> Result<Term, StoreError> {
        let name = request.name.trim();
        if name.is_empty() {
            return Err(StoreError::InvalidInput("term name must not be empty"));
        }
        if !taxonomy_known(&self.conn, &request.taxonomy)? {
            return Err(StoreError::UnknownTaxonomy(request.taxonomy.into_string()));
        }
        if let Some(parent) = request.parent
            && self.load_term(parent, &request.taxonomy)?.is_none()
        {
            return Err(StoreError::UnknownParent(parent));
        }

        let order = request.order.unwrap_or(0);
        let now = now_ms();
        self.conn.execute(
            r#"
            INSERT INTO terms(taxonomy, name, parent, sort_order, created_at_ms, updated_at_ms)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            "#,
            params![
                request.taxonomy.as_str(),
                name,
                sql_parent(request.parent)?,
                order,
                now
            ],
        )?;
        let id = term_id_from_sql(self.conn.last_insert_rowid())
            .ok_or(StoreError::CorruptRow("term id"))?;

        Ok(Term {
            id,
            taxonomy: request.taxonomy,
            name: name.to_string(),
            parent: request.parent,
            order,
        })
    }

    pub fn term(&self, id: TermId, taxonomy: &Taxonomy) -> Result<Option<Term>, StoreError> {
        self.load_term(id, taxonomy)
    }

    /// Children of one parent in display order: `sort_order`, then name, then id.
    pub fn list_terms(&self, request: ListTermsRequest) -> Result<Vec<Term>, StoreError> {
        self.select_children(
            &request.taxonomy,
            request.parent,
            &BTreeSet::new(),
            request.limit,
            request.offset,
        )
    }

    /// Sets one term's order directly, as the term edit form does. Returns whether the stored
    /// value changed.
    pub fn term_order_set(
        &mut self,
        id: TermId,
        taxonomy: &Taxonomy,
        order: i64,
    ) -> Result<bool, StoreError> {
        let Some(current) = self.load_term(id, taxonomy)? else {
            return Err(StoreError::UnknownTerm(id));
        };
        if current.order == order {
            return Ok(false);
        }
        self.write_order(id, taxonomy, order)?;
        Ok(true)
    }

    pub(super) fn select_children(
        &self,
        taxonomy: &Taxonomy,
        parent: Option<TermId>,
        exclude: &BTreeSet<TermId>,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Term>, StoreError> {
        let mut sql = String::from(
            "SELECT id, name, parent, sort_order FROM terms WHERE taxonomy=? AND parent IS ?",
        );
        let mut values = vec![
            Value::Text(taxonomy.as_str().to_string()),
            match sql_parent(parent)? {
                Some(raw) => Value::Integer(raw),
                None => Value::Null,
            },
        ];

        // Ids past i64::MAX cannot be stored, so there is nothing to exclude for them.
        let excluded = exclude.iter().filter_map(|id| sql_id(*id)).collect::<Vec<_>>();
        if !excluded.is_empty() {
            sql.push_str(" AND id NOT IN (");
            for (index, raw) in excluded.into_iter().enumerate() {
                if index > 0 {
                    sql.push(',');
                }
                sql.push('?');
                values.push(Value::Integer(raw));
            }
            sql.push(')');
        }
        sql.push_str(" ORDER BY sort_order ASC, name ASC, id ASC LIMIT ? OFFSET ?");
        values.push(Value::Integer(i64::try_from(limit).unwrap_or(i64::MAX)));
        values.push(Value::Integer(i64::try_from(offset).unwrap_or(i64::MAX)));

        let mut stmt = self.conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(values), raw_term)?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?.into_term(taxonomy)?);
        }
        Ok(out)
    }
}
