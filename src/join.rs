//! Equi-joins: nested-loop, hash and natural join.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use bitvec::prelude::*;

use crate::error::{Result, TableError};
use crate::schema::{ColumnDef, Schema, Tuple, disambiguate_names};
use crate::table::Table;
use crate::value::Value;

impl Table {
    /// Nested-loop equi-join: every pair of tuples whose values agree on all of
    /// `left_attrs[i] = right_attrs[i]` produces `left ++ right`.
    ///
    /// The result has this table's attributes followed by `other`'s, where a
    /// right attribute whose name is already used on the left gets a `2`
    /// appended. The key is this table's key.
    ///
    /// # Errors
    /// - [TableError::ArityMismatch] if the attribute lists differ in length.
    /// - [TableError::AttributeNotFound] if an attribute is missing on its side.
    /// - [TableError::DuplicateAttribute] if renaming still leaves a clash.
    pub fn join(&self, left_attrs: &[&str], right_attrs: &[&str], other: &Table) -> Result<Table> {
        log::debug!(
            "{}.join({}, {}, {})",
            self.name(),
            left_attrs.join(" "),
            right_attrs.join(" "),
            other.name()
        );
        let (left_cols, right_cols) = self.join_columns(left_attrs, right_attrs, other)?;
        let schema = self.joined_schema(other)?;

        let mut rows = Vec::new();
        for these in self.tuples() {
            for those in other.tuples() {
                let matched = left_cols
                    .iter()
                    .zip(&right_cols)
                    .all(|(&i, &j)| these[i].cmp(&those[j]) == Ordering::Equal);
                if matched {
                    rows.push(concat(these, those));
                }
            }
        }
        Ok(Table::derived(self.name(), schema, rows))
    }

    /// Hash equi-join. Same result shape and preconditions as [Table::join].
    ///
    /// One hash bucket is built per left join column. A left tuple is joined
    /// with a right tuple when it matches on *any* of the column pairs, each
    /// left tuple at most once per right tuple. With a single column
    /// pair this is the same relation as [Table::join]; with several it can
    /// return more rows, since the per-column matches are unioned rather than
    /// intersected.
    pub fn h_join(&self, left_attrs: &[&str], right_attrs: &[&str], other: &Table) -> Result<Table> {
        log::debug!(
            "{}.h_join({}, {}, {})",
            self.name(),
            left_attrs.join(" "),
            right_attrs.join(" "),
            other.name()
        );
        let (left_cols, right_cols) = self.join_columns(left_attrs, right_attrs, other)?;
        let schema = self.joined_schema(other)?;
        let rows = self.hash_join_rows(other, &left_cols, &right_cols);
        Ok(Table::derived(self.name(), schema, rows))
    }

    /// Natural join on every attribute name the two tables share, with the
    /// shared columns of `other` removed from the result.
    ///
    /// Matching goes through the hash join, taking the shared attributes in
    /// this table's attribute order. Tables without a shared attribute produce
    /// an empty result. The key is this table's key.
    ///
    /// # Example
    /// ```
    /// use reltable::Table;
    ///
    /// let mut student = Table::define("student", "name id gpa", "String Integer Double", "id").unwrap();
    /// student.insert(vec!["Susan".into(), 2.into(), 3.9.into()]).unwrap();
    /// let mut ta = Table::define("ta", "name id course", "String Integer String", "id").unwrap();
    /// ta.insert(vec!["Susan".into(), 2.into(), "Basket Weaving".into()]).unwrap();
    ///
    /// let joined = student.natural_join(&ta).unwrap();
    /// assert_eq!(joined.attributes(), vec!["name", "id", "gpa", "course"]);
    /// assert_eq!(joined.len(), 1);
    /// ```
    pub fn natural_join(&self, other: &Table) -> Result<Table> {
        log::debug!("{}.join({})", self.name(), other.name());
        let left_names: HashSet<&str> = self.attributes().into_iter().collect();
        let right_names: HashSet<&str> = other.attributes().into_iter().collect();
        let shared: Vec<&str> = self
            .attributes()
            .into_iter()
            .filter(|a| right_names.contains(a))
            .collect();

        let left_cols = self.schema().resolve_columns(&shared)?;
        let right_cols = other.schema().resolve_columns(&shared)?;

        // one bit per column of `self ++ other`; right columns sharing a left name are dropped
        let keep: BitVec = std::iter::repeat_n(true, self.schema().arity())
            .chain(
                other
                    .schema()
                    .columns()
                    .iter()
                    .map(|c| !left_names.contains(c.name.as_str())),
            )
            .collect();

        let columns: Vec<ColumnDef> = self
            .schema()
            .columns()
            .iter()
            .chain(other.schema().columns())
            .enumerate()
            .filter(|(i, _)| keep[*i])
            .map(|(_, c)| c.clone())
            .collect();
        let schema = Schema::new(columns, self.key().to_vec())?;

        let rows = self
            .hash_join_rows(other, &left_cols, &right_cols)
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .enumerate()
                    .filter(|(i, _)| keep[*i])
                    .map(|(_, v)| v)
                    .collect()
            })
            .collect();
        Ok(Table::derived(self.name(), schema, rows))
    }

    fn join_columns(
        &self,
        left_attrs: &[&str],
        right_attrs: &[&str],
        other: &Table,
    ) -> Result<(Vec<usize>, Vec<usize>)> {
        if left_attrs.len() != right_attrs.len() {
            return Err(TableError::ArityMismatch {
                left: left_attrs.len(),
                right: right_attrs.len(),
            });
        }
        Ok((
            self.schema().resolve_columns(left_attrs)?,
            other.schema().resolve_columns(right_attrs)?,
        ))
    }

    fn joined_schema(&self, other: &Table) -> Result<Schema> {
        let names = disambiguate_names(&self.attributes(), &other.attributes());
        let domains = self.domains().into_iter().chain(other.domains()).collect();
        Schema::from_parts(names, domains, self.key().to_vec())
    }

    fn hash_join_rows(&self, other: &Table, left_cols: &[usize], right_cols: &[usize]) -> Vec<Tuple> {
        let left = self.tuples();
        // buckets[i]: value at left_cols[i] -> positions of the left tuples holding it
        let buckets: Vec<HashMap<&Value, Vec<usize>>> = left_cols
            .iter()
            .map(|&col| {
                let mut bucket: HashMap<&Value, Vec<usize>> = HashMap::new();
                for (pos, row) in left.iter().enumerate() {
                    bucket.entry(&row[col]).or_default().push(pos);
                }
                bucket
            })
            .collect();

        let mut rows = Vec::new();
        // left positions already joined with the current right tuple
        let mut seen = bitvec![0; left.len()];
        let mut hits = Vec::new();
        for those in other.tuples() {
            for (bucket, &col) in buckets.iter().zip(right_cols) {
                let Some(candidates) = bucket.get(&those[col]) else {
                    continue;
                };
                for &pos in candidates {
                    if !seen[pos] {
                        seen.set(pos, true);
                        hits.push(pos);
                        rows.push(concat(&left[pos], those));
                    }
                }
            }
            for pos in hits.drain(..) {
                seen.set(pos, false);
            }
        }
        rows
    }
}

fn concat(left: &[Value], right: &[Value]) -> Tuple {
    let mut row = Vec::with_capacity(left.len() + right.len());
    row.extend_from_slice(left);
    row.extend_from_slice(right);
    row
}
